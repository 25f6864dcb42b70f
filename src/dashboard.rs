//! The dashboard is the client's composition root: it owns the API client
//! and the [AppStore], turns user commands into server calls, and applies
//! each result to the store only after the server accepted it.

use super::{
    client::ApiClient,
    components::{Component, DashboardView, NoteList, SummaryBlock, TaskList},
    models::{NewTaskInput, NoteInput, Priority, TaskInput},
    store::AppStore,
};
use chrono::Utc;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastVariant {
    Default,
    Destructive,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub title: &'static str,
    pub description: String,
    pub variant: ToastVariant,
}

impl Toast {
    fn success(description: impl Into<String>) -> Self {
        Toast {
            title: "Success",
            description: description.into(),
            variant: ToastVariant::Default,
        }
    }

    fn error(description: impl Into<String>) -> Self {
        Toast {
            title: "Error",
            description: description.into(),
            variant: ToastVariant::Destructive,
        }
    }

    pub fn is_error(&self) -> bool {
        self.variant == ToastVariant::Destructive
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AiSummary {
    pub note_id: Uuid,
    pub summary: String,
}

/// Fields of the task edit form. Anything left as `None` keeps the value
/// the task currently has, the way a pre-filled form would.
#[derive(Clone, Debug, Default)]
pub struct TaskEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
}

pub struct Dashboard {
    client: ApiClient,
    pub store: AppStore,
    pub ai_summary: Option<AiSummary>,
}

impl Dashboard {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            store: AppStore::default(),
            ai_summary: None,
        }
    }

    /// Fetch both collections concurrently. A collection that fails to load
    /// is left as it was; the failure is logged rather than toasted.
    pub async fn load(&mut self) {
        self.store.set_loading(true);
        let (notes, tasks) =
            futures::join!(self.client.list_notes(), self.client.list_tasks());
        match notes {
            Ok(notes) => self.store.set_notes(notes),
            Err(e) => tracing::warn!(error = %e, "error fetching notes"),
        }
        match tasks {
            Ok(tasks) => self.store.set_tasks(tasks),
            Err(e) => tracing::warn!(error = %e, "error fetching tasks"),
        }
        self.store.set_loading(false);
    }

    pub async fn create_note(&mut self, title: &str, content: &str) -> Toast {
        if title.trim().is_empty() || content.trim().is_empty() {
            return Toast::error("Please fill in all fields");
        }
        let input = NoteInput {
            title: title.to_string(),
            content: content.to_string(),
        };
        match self.client.create_note(&input).await {
            Ok(note) => {
                self.store.add_note(note);
                Toast::success("Note created successfully")
            }
            Err(e) => failed("Failed to create note", e),
        }
    }

    /// `None` fields keep what the cached note already has.
    pub async fn update_note(
        &mut self,
        id: Uuid,
        title: Option<&str>,
        content: Option<&str>,
    ) -> Toast {
        let Some(current) = self.store.note(id) else {
            return Toast::error("Note not found");
        };
        let input = NoteInput {
            title: title.unwrap_or(current.title.as_str()).to_string(),
            content: content.unwrap_or(current.content.as_str()).to_string(),
        };
        if input.title.trim().is_empty() || input.content.trim().is_empty() {
            return Toast::error("Please fill in all fields");
        }
        match self.client.update_note(id, &input).await {
            Ok(note) => {
                self.store.update_note(id, note);
                Toast::success("Note updated successfully")
            }
            Err(e) => failed("Failed to update note", e),
        }
    }

    pub async fn delete_note(&mut self, id: Uuid) -> Toast {
        match self.client.delete_note(id).await {
            Ok(()) => {
                self.store.delete_note(id);
                if self.ai_summary.as_ref().is_some_and(|s| s.note_id == id) {
                    self.ai_summary = None;
                }
                Toast::success("Note deleted successfully")
            }
            Err(e) => failed("Failed to delete note", e),
        }
    }

    /// The summary is kept on the dashboard, not in the store; it is not
    /// part of the note.
    pub async fn summarize_note(&mut self, id: Uuid) -> Option<Toast> {
        match self.client.summarize_note(id).await {
            Ok(summary) => {
                self.ai_summary = Some(AiSummary {
                    note_id: id,
                    summary,
                });
                None
            }
            Err(e) => Some(failed("Failed to generate AI summary", e)),
        }
    }

    pub async fn create_task(
        &mut self,
        title: &str,
        description: &str,
        priority: Priority,
    ) -> Toast {
        if title.trim().is_empty() {
            return Toast::error("Please enter a task title");
        }
        let input = NewTaskInput {
            title: title.to_string(),
            description: description.to_string(),
            priority,
        };
        match self.client.create_task(&input).await {
            Ok(task) => {
                self.store.add_task(task);
                Toast::success("Task created successfully")
            }
            Err(e) => failed("Failed to create task", e),
        }
    }

    /// Editing never changes `completed`; that is what [Self::toggle_task]
    /// is for.
    pub async fn update_task(&mut self, id: Uuid, edit: TaskEdit) -> Toast {
        let Some(current) = self.store.task(id) else {
            return Toast::error("Task not found");
        };
        let input = TaskInput {
            title: edit.title.unwrap_or_else(|| current.title.clone()),
            description: edit
                .description
                .unwrap_or_else(|| current.description.clone()),
            priority: edit.priority.unwrap_or(current.priority),
            completed: current.completed,
        };
        if input.title.trim().is_empty() {
            return Toast::error("Please enter a task title");
        }
        self.put_task(id, input, "Task updated successfully").await
    }

    pub async fn toggle_task(&mut self, id: Uuid) -> Toast {
        let Some(current) = self.store.task(id) else {
            return Toast::error("Task not found");
        };
        let mut input = TaskInput::from(current);
        input.completed = !input.completed;
        let message = if input.completed {
            "Task marked as completed"
        } else {
            "Task marked as incomplete"
        };
        self.put_task(id, input, message).await
    }

    async fn put_task(
        &mut self,
        id: Uuid,
        input: TaskInput,
        message: &str,
    ) -> Toast {
        match self.client.update_task(id, &input).await {
            Ok(task) => {
                self.store.update_task(id, task);
                Toast::success(message)
            }
            Err(e) => failed("Failed to update task", e),
        }
    }

    pub async fn delete_task(&mut self, id: Uuid) -> Toast {
        match self.client.delete_task(id).await {
            Ok(()) => {
                self.store.delete_task(id);
                Toast::success("Task deleted successfully")
            }
            Err(e) => failed("Failed to delete task", e),
        }
    }

    pub fn render(&self) -> String {
        DashboardView {
            store: &self.store,
            summary: self.ai_summary.as_ref(),
            now: Utc::now(),
        }
        .render()
    }

    pub fn render_notes(&self) -> String {
        NoteList {
            notes: &self.store.notes,
            now: Utc::now(),
        }
        .render()
    }

    pub fn render_tasks(&self) -> String {
        TaskList {
            tasks: &self.store.tasks,
            now: Utc::now(),
        }
        .render()
    }

    pub fn render_summary(&self) -> Option<String> {
        let summary = self.ai_summary.as_ref()?;
        let title = self.store.note(summary.note_id).map(|n| n.title.as_str());
        Some(SummaryBlock { summary, title }.render())
    }
}

fn failed(description: &str, err: anyhow::Error) -> Toast {
    tracing::debug!(error = %err, "{description}");
    Toast::error(description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        routes,
        test_helpers::{session_token, test_state, ALICE, BOB, FIXTURE_SUMMARY},
    };
    use std::net::{SocketAddr, TcpListener};

    /// Bind the real router to an ephemeral port and return its base URL.
    fn spawn_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        let app = routes::get_routes().with_state(test_state());
        let server = axum::Server::from_tcp(listener)
            .unwrap()
            .serve(app.into_make_service());
        tokio::spawn(server);
        format!("http://{addr}")
    }

    fn dashboard(base_url: &str, email: &str) -> Dashboard {
        Dashboard::new(ApiClient::new(base_url, &session_token(email)).unwrap())
    }

    #[tokio::test]
    async fn test_notes_flow() {
        let url = spawn_server();
        let mut dash = dashboard(&url, ALICE);
        dash.load().await;
        assert!(dash.store.notes.is_empty());
        assert!(!dash.store.is_loading);

        let toast = dash.create_note("First", "one").await;
        assert!(!toast.is_error(), "{toast:?}");
        let toast = dash.create_note("Second", "two").await;
        assert_eq!(toast.description, "Note created successfully");
        assert_eq!(dash.store.notes[0].title, "Second");

        let id = dash.store.notes[1].id;
        let toast = dash.update_note(id, Some("First!"), None).await;
        assert_eq!(toast.description, "Note updated successfully");
        assert_eq!(dash.store.note(id).unwrap().title, "First!");
        assert_eq!(dash.store.note(id).unwrap().content, "one");

        // a fresh dashboard sees what the server has, newest first
        let mut other = dashboard(&url, ALICE);
        other.load().await;
        let titles: Vec<&str> =
            other.store.notes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Second", "First!"]);

        let toast = dash.delete_note(id).await;
        assert!(!toast.is_error());
        assert!(dash.store.note(id).is_none());
        let toast = dash.delete_note(id).await;
        assert_eq!(toast.description, "Failed to delete note");
    }

    #[tokio::test]
    async fn test_local_validation_skips_server() {
        let url = spawn_server();
        let mut dash = dashboard(&url, ALICE);
        let toast = dash.create_note("", "content").await;
        assert_eq!(toast.description, "Please fill in all fields");
        let toast = dash.create_task("  ", "", Priority::Low).await;
        assert_eq!(toast.description, "Please enter a task title");

        dash.load().await;
        assert!(dash.store.notes.is_empty());
        assert!(dash.store.tasks.is_empty());
    }

    #[tokio::test]
    async fn test_failed_calls_leave_cache_alone() {
        let url = spawn_server();
        let mut bob = dashboard(&url, BOB);
        bob.create_note("Bob's", "private").await;
        let bobs_id = bob.store.notes[0].id;

        let mut alice = dashboard(&url, ALICE);
        alice.load().await;
        assert!(alice.store.notes.is_empty());
        let toast = alice.delete_note(bobs_id).await;
        assert!(toast.is_error());
        let toast = alice.summarize_note(bobs_id).await.unwrap();
        assert_eq!(toast.description, "Failed to generate AI summary");
        assert!(alice.ai_summary.is_none());

        let mut nobody = dashboard(&url, "");
        nobody.load().await;
        let toast = nobody.create_note("T", "C").await;
        assert_eq!(toast.description, "Failed to create note");
        assert!(nobody.store.notes.is_empty());
    }

    #[tokio::test]
    async fn test_tasks_flow() {
        let url = spawn_server();
        let mut dash = dashboard(&url, ALICE);
        dash.load().await;

        let toast = dash.create_task("Water plants", "", Priority::High).await;
        assert!(!toast.is_error(), "{toast:?}");
        let id = dash.store.tasks[0].id;
        assert!(!dash.store.tasks[0].completed);

        let toast = dash.toggle_task(id).await;
        assert_eq!(toast.description, "Task marked as completed");
        assert!(dash.store.task(id).unwrap().completed);

        let toast = dash
            .update_task(
                id,
                TaskEdit {
                    description: Some("the ferns".into()),
                    ..Default::default()
                },
            )
            .await;
        assert_eq!(toast.description, "Task updated successfully");
        let task = dash.store.task(id).unwrap();
        assert!(task.completed, "editing must not reset completion");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.description, "the ferns");

        let mut fresh = dashboard(&url, ALICE);
        fresh.load().await;
        assert!(fresh.store.tasks[0].completed);
        assert!(fresh.render_tasks().contains("Completed (1)"));

        let toast = dash.toggle_task(id).await;
        assert_eq!(toast.description, "Task marked as incomplete");
        let toast = dash.delete_task(id).await;
        assert_eq!(toast.description, "Task deleted successfully");
        assert!(dash.store.tasks.is_empty());
    }

    #[tokio::test]
    async fn test_summary_is_rendered() {
        let url = spawn_server();
        let mut dash = dashboard(&url, ALICE);
        dash.create_note("Buy milk", "Remember to buy milk and eggs tomorrow")
            .await;
        let id = dash.store.notes[0].id;

        assert!(dash.summarize_note(id).await.is_none());
        let block = dash.render_summary().unwrap();
        assert!(block.starts_with("AI Summary: Buy milk"));
        assert!(block.contains(FIXTURE_SUMMARY));
        assert!(dash.render().contains(FIXTURE_SUMMARY));

        dash.delete_note(id).await;
        assert!(dash.render_summary().is_none());
    }
}
