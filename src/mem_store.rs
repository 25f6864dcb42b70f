//! In-process [DocumentStore] for local development (`NOTEDECK_STORAGE=memory`)
//! and for tests. Nothing survives a restart.

use super::{
    db_ops::{DocumentStore, GetQuery},
    models::{Note, NoteInput, Task, TaskInput},
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Records are kept in insertion order, so walking a vec backwards gives
/// newest-first without sorting.
#[derive(Default)]
pub struct MemStore {
    notes: RwLock<Vec<Note>>,
    tasks: RwLock<Vec<Task>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemStore {
    async fn list_notes(&self, user_email: &str) -> Result<Vec<Note>> {
        let notes = self.notes.read().await;
        Ok(notes
            .iter()
            .rev()
            .filter(|n| n.user_email == user_email)
            .cloned()
            .collect())
    }

    async fn get_note(&self, q: &GetQuery<'_>) -> Result<Option<Note>> {
        let notes = self.notes.read().await;
        Ok(notes
            .iter()
            .find(|n| n.id == q.id && n.user_email == q.user_email)
            .cloned())
    }

    async fn insert_note(
        &self,
        user_email: &str,
        note: &NoteInput,
    ) -> Result<Note> {
        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4(),
            title: note.title.clone(),
            content: note.content.clone(),
            user_email: user_email.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.notes.write().await.push(note.clone());

        Ok(note)
    }

    async fn update_note(
        &self,
        q: &GetQuery<'_>,
        input: &NoteInput,
    ) -> Result<Option<Note>> {
        let mut notes = self.notes.write().await;
        Ok(notes
            .iter_mut()
            .find(|n| n.id == q.id && n.user_email == q.user_email)
            .map(|note| {
                note.title = input.title.clone();
                note.content = input.content.clone();
                note.updated_at = Utc::now();
                note.clone()
            }))
    }

    async fn delete_note(&self, q: &GetQuery<'_>) -> Result<bool> {
        let mut notes = self.notes.write().await;
        let before = notes.len();
        notes.retain(|n| !(n.id == q.id && n.user_email == q.user_email));

        Ok(notes.len() != before)
    }

    async fn list_tasks(&self, user_email: &str) -> Result<Vec<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks
            .iter()
            .rev()
            .filter(|t| t.user_email == user_email)
            .cloned()
            .collect())
    }

    async fn get_task(&self, q: &GetQuery<'_>) -> Result<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks
            .iter()
            .find(|t| t.id == q.id && t.user_email == q.user_email)
            .cloned())
    }

    async fn insert_task(
        &self,
        user_email: &str,
        task: &TaskInput,
    ) -> Result<Task> {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            completed: task.completed,
            user_email: user_email.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.tasks.write().await.push(task.clone());

        Ok(task)
    }

    async fn update_task(
        &self,
        q: &GetQuery<'_>,
        input: &TaskInput,
    ) -> Result<Option<Task>> {
        let mut tasks = self.tasks.write().await;
        Ok(tasks
            .iter_mut()
            .find(|t| t.id == q.id && t.user_email == q.user_email)
            .map(|task| {
                task.title = input.title.clone();
                task.description = input.description.clone();
                task.priority = input.priority;
                task.completed = input.completed;
                task.updated_at = Utc::now();
                task.clone()
            }))
    }

    async fn delete_task(&self, q: &GetQuery<'_>) -> Result<bool> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|t| !(t.id == q.id && t.user_email == q.user_email));

        Ok(tasks.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;

    fn note(title: &str) -> NoteInput {
        NoteInput {
            title: title.into(),
            content: "body".into(),
        }
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_scoped() {
        let store = MemStore::new();
        store.insert_note("a@x.com", &note("first")).await.unwrap();
        store.insert_note("b@x.com", &note("other")).await.unwrap();
        store.insert_note("a@x.com", &note("second")).await.unwrap();

        let titles: Vec<String> = store
            .list_notes("a@x.com")
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_update_refreshes_timestamp_only_for_owner() {
        let store = MemStore::new();
        let created = store.insert_note("a@x.com", &note("t")).await.unwrap();

        let foreign = GetQuery {
            id: created.id,
            user_email: "b@x.com",
        };
        assert!(store
            .update_note(&foreign, &note("hijack"))
            .await
            .unwrap()
            .is_none());

        let mine = GetQuery {
            id: created.id,
            user_email: "a@x.com",
        };
        let updated = store
            .update_note(&mine, &note("renamed"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "renamed");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_task_delete() {
        let store = MemStore::new();
        let task = store
            .insert_task(
                "a@x.com",
                &TaskInput {
                    title: "t".into(),
                    description: "".into(),
                    priority: Priority::High,
                    completed: false,
                },
            )
            .await
            .unwrap();
        let q = GetQuery {
            id: task.id,
            user_email: "a@x.com",
        };
        assert!(store.delete_task(&q).await.unwrap());
        assert!(!store.delete_task(&q).await.unwrap());
        assert!(store.get_task(&q).await.unwrap().is_none());
    }
}
