//! Client-side mirror of one user's notes and tasks.
//!
//! The store never talks to the server; [crate::dashboard::Dashboard] calls
//! the server first and only touches the store once the call succeeded.

use super::models::{Note, Task};
use uuid::Uuid;

#[derive(Clone, Debug, Default)]
pub struct AppStore {
    pub notes: Vec<Note>,
    pub tasks: Vec<Task>,
    pub is_loading: bool,
}

impl AppStore {
    pub fn set_notes(&mut self, notes: Vec<Note>) {
        self.notes = notes;
    }

    /// New notes go on top, matching the server's newest-first order.
    pub fn add_note(&mut self, note: Note) {
        self.notes.insert(0, note);
    }

    pub fn update_note(&mut self, id: Uuid, note: Note) {
        if let Some(slot) = self.notes.iter_mut().find(|n| n.id == id) {
            *slot = note;
        }
    }

    pub fn delete_note(&mut self, id: Uuid) {
        self.notes.retain(|n| n.id != id);
    }

    pub fn note(&self, id: Uuid) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    pub fn add_task(&mut self, task: Task) {
        self.tasks.insert(0, task);
    }

    pub fn update_task(&mut self, id: Uuid, task: Task) {
        if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == id) {
            *slot = task;
        }
    }

    pub fn delete_task(&mut self, id: Uuid) {
        self.tasks.retain(|t| t.id != id);
    }

    pub fn task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn set_loading(&mut self, is_loading: bool) {
        self.is_loading = is_loading;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use chrono::Utc;

    fn note(title: &str) -> Note {
        Note {
            id: Uuid::new_v4(),
            title: title.into(),
            content: "c".into(),
            user_email: "a@b.c".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn task(title: &str) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: title.into(),
            description: "".into(),
            priority: Priority::Medium,
            completed: false,
            user_email: "a@b.c".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_prepends() {
        let mut store = AppStore::default();
        store.set_notes(vec![note("old")]);
        store.add_note(note("new"));
        let titles: Vec<&str> =
            store.notes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["new", "old"]);
    }

    #[test]
    fn test_update_replaces_only_match() {
        let mut store = AppStore::default();
        let a = note("a");
        let b = note("b");
        store.set_notes(vec![a.clone(), b.clone()]);

        let mut renamed = a.clone();
        renamed.title = "a2".into();
        store.update_note(a.id, renamed);
        assert_eq!(store.note(a.id).unwrap().title, "a2");
        assert_eq!(store.note(b.id), Some(&b));

        // unknown ids are ignored rather than inserted
        store.update_note(Uuid::new_v4(), note("ghost"));
        assert_eq!(store.notes.len(), 2);
    }

    #[test]
    fn test_task_mutations() {
        let mut store = AppStore::default();
        let t = task("t");
        store.add_task(t.clone());
        let mut done = t.clone();
        done.completed = true;
        store.update_task(t.id, done);
        assert!(store.task(t.id).unwrap().completed);
        store.delete_task(t.id);
        assert!(store.tasks.is_empty());
    }

    #[test]
    fn test_loading_flag() {
        let mut store = AppStore::default();
        assert!(!store.is_loading);
        store.set_loading(true);
        assert!(store.is_loading);
    }
}
