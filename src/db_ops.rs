//! Storage for notes and tasks. Every method that touches a single record
//! takes a [GetQuery], which carries the owner's email alongside the id, so
//! there is no way to address a record without also naming its owner.

use super::models::{Note, NoteInput, Task, TaskInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPool, query, query_as, FromRow};
use uuid::Uuid;

pub struct GetQuery<'a> {
    pub id: Uuid,
    pub user_email: &'a str,
}

/// Lookups return `Ok(None)` when the record is missing or owned by
/// someone else; `Err` is reserved for the store itself misbehaving.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Newest first.
    async fn list_notes(&self, user_email: &str) -> Result<Vec<Note>>;
    async fn get_note(&self, query: &GetQuery<'_>) -> Result<Option<Note>>;
    async fn insert_note(
        &self,
        user_email: &str,
        note: &NoteInput,
    ) -> Result<Note>;
    async fn update_note(
        &self,
        query: &GetQuery<'_>,
        note: &NoteInput,
    ) -> Result<Option<Note>>;
    /// `false` if nothing matched.
    async fn delete_note(&self, query: &GetQuery<'_>) -> Result<bool>;

    /// Newest first.
    async fn list_tasks(&self, user_email: &str) -> Result<Vec<Task>>;
    async fn get_task(&self, query: &GetQuery<'_>) -> Result<Option<Task>>;
    async fn insert_task(
        &self,
        user_email: &str,
        task: &TaskInput,
    ) -> Result<Task>;
    async fn update_task(
        &self,
        query: &GetQuery<'_>,
        task: &TaskInput,
    ) -> Result<Option<Task>>;
    async fn delete_task(&self, query: &GetQuery<'_>) -> Result<bool>;
}

pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[derive(FromRow)]
struct NoteRow {
    id: Uuid,
    title: String,
    content: String,
    user_email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<NoteRow> for Note {
    fn from(row: NoteRow) -> Self {
        Note {
            id: row.id,
            title: row.title,
            content: row.content,
            user_email: row.user_email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct TaskRow {
    id: Uuid,
    title: String,
    description: String,
    priority: String,
    completed: bool,
    user_email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TaskRow> for Task {
    type Error = anyhow::Error;

    fn try_from(row: TaskRow) -> Result<Self> {
        // The check constraint on `tasks.priority` makes this unreachable
        // unless someone edits the table by hand.
        let priority = row
            .priority
            .parse()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("task {} has a bad priority", row.id))?;
        Ok(Task {
            id: row.id,
            title: row.title,
            description: row.description,
            priority,
            completed: row.completed,
            user_email: row.user_email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn list_notes(&self, user_email: &str) -> Result<Vec<Note>> {
        let rows = query_as::<_, NoteRow>(
            "select id, title, content, user_email, created_at, updated_at
            from notes
            where user_email = $1
            order by created_at desc, id desc",
        )
        .bind(user_email)
        .fetch_all(&self.db)
        .await
        .context("list notes")?;

        Ok(rows.into_iter().map(Note::from).collect())
    }

    async fn get_note(&self, q: &GetQuery<'_>) -> Result<Option<Note>> {
        let row = query_as::<_, NoteRow>(
            "select id, title, content, user_email, created_at, updated_at
            from notes
            where id = $1 and user_email = $2",
        )
        .bind(q.id)
        .bind(q.user_email)
        .fetch_optional(&self.db)
        .await
        .context("get note")?;

        Ok(row.map(Note::from))
    }

    async fn insert_note(
        &self,
        user_email: &str,
        note: &NoteInput,
    ) -> Result<Note> {
        let row = query_as::<_, NoteRow>(
            "insert into notes (id, title, content, user_email)
            values ($1, $2, $3, $4)
            returning id, title, content, user_email, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(&note.title)
        .bind(&note.content)
        .bind(user_email)
        .fetch_one(&self.db)
        .await
        .context("insert note")?;

        Ok(row.into())
    }

    async fn update_note(
        &self,
        q: &GetQuery<'_>,
        note: &NoteInput,
    ) -> Result<Option<Note>> {
        let row = query_as::<_, NoteRow>(
            "update notes
            set
                title = $1,
                content = $2,
                updated_at = now()
            where id = $3 and user_email = $4
            returning id, title, content, user_email, created_at, updated_at",
        )
        .bind(&note.title)
        .bind(&note.content)
        .bind(q.id)
        .bind(q.user_email)
        .fetch_optional(&self.db)
        .await
        .context("update note")?;

        Ok(row.map(Note::from))
    }

    async fn delete_note(&self, q: &GetQuery<'_>) -> Result<bool> {
        let res = query("delete from notes where id = $1 and user_email = $2")
            .bind(q.id)
            .bind(q.user_email)
            .execute(&self.db)
            .await
            .context("delete note")?;

        Ok(res.rows_affected() > 0)
    }

    async fn list_tasks(&self, user_email: &str) -> Result<Vec<Task>> {
        let rows = query_as::<_, TaskRow>(
            "select id, title, description, priority, completed,
                user_email, created_at, updated_at
            from tasks
            where user_email = $1
            order by created_at desc, id desc",
        )
        .bind(user_email)
        .fetch_all(&self.db)
        .await
        .context("list tasks")?;

        rows.into_iter().map(Task::try_from).collect()
    }

    async fn get_task(&self, q: &GetQuery<'_>) -> Result<Option<Task>> {
        let row = query_as::<_, TaskRow>(
            "select id, title, description, priority, completed,
                user_email, created_at, updated_at
            from tasks
            where id = $1 and user_email = $2",
        )
        .bind(q.id)
        .bind(q.user_email)
        .fetch_optional(&self.db)
        .await
        .context("get task")?;

        row.map(Task::try_from).transpose()
    }

    async fn insert_task(
        &self,
        user_email: &str,
        task: &TaskInput,
    ) -> Result<Task> {
        let row = query_as::<_, TaskRow>(
            "insert into tasks
                (id, title, description, priority, completed, user_email)
            values ($1, $2, $3, $4, $5, $6)
            returning id, title, description, priority, completed,
                user_email, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.priority.as_str())
        .bind(task.completed)
        .bind(user_email)
        .fetch_one(&self.db)
        .await
        .context("insert task")?;

        row.try_into()
    }

    async fn update_task(
        &self,
        q: &GetQuery<'_>,
        task: &TaskInput,
    ) -> Result<Option<Task>> {
        let row = query_as::<_, TaskRow>(
            "update tasks
            set
                title = $1,
                description = $2,
                priority = $3,
                completed = $4,
                updated_at = now()
            where id = $5 and user_email = $6
            returning id, title, description, priority, completed,
                user_email, created_at, updated_at",
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.priority.as_str())
        .bind(task.completed)
        .bind(q.id)
        .bind(q.user_email)
        .fetch_optional(&self.db)
        .await
        .context("update task")?;

        row.map(Task::try_from).transpose()
    }

    async fn delete_task(&self, q: &GetQuery<'_>) -> Result<bool> {
        let res = query("delete from tasks where id = $1 and user_email = $2")
            .bind(q.id)
            .bind(q.user_email)
            .execute(&self.db)
            .await
            .context("delete task")?;

        Ok(res.rows_affected() > 0)
    }
}
