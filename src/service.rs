//! Note and task use-cases. Callers hand us an already-verified owner email
//! (see [crate::extractors::AuthenticatedUser]); every lookup below is
//! scoped by it, and a record owned by someone else is indistinguishable
//! from one that does not exist.

use super::{
    db_ops::{DocumentStore, GetQuery},
    errors::AppError,
    models::{NewTaskInput, Note, NoteInput, Task, TaskInput},
    summarize::{build_prompt, Summarizer, SYSTEM_INSTRUCTION},
};
use tracing::debug;
use uuid::Uuid;

/// Ids arrive as raw path segments. Something that is not a UUID cannot
/// name a record, so it is reported the same way as a missing one.
pub fn parse_id(raw: &str, kind: &'static str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(kind))
}

fn require(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        Err(AppError::Validation(format!("{field} is required")))
    } else {
        Ok(())
    }
}

fn validate_note(note: &NoteInput) -> Result<(), AppError> {
    require("title", &note.title)?;
    require("content", &note.content)
}

fn validate_task(task: &TaskInput) -> Result<(), AppError> {
    require("title", &task.title)
}

pub async fn list_notes(
    db: &dyn DocumentStore,
    user_email: &str,
) -> Result<Vec<Note>, AppError> {
    Ok(db.list_notes(user_email).await?)
}

pub async fn create_note(
    db: &dyn DocumentStore,
    user_email: &str,
    note: &NoteInput,
) -> Result<Note, AppError> {
    validate_note(note)?;
    let note = db.insert_note(user_email, note).await?;
    debug!(user = user_email, note = %note.id, "created note");

    Ok(note)
}

pub async fn get_note(
    db: &dyn DocumentStore,
    user_email: &str,
    id: Uuid,
) -> Result<Note, AppError> {
    db.get_note(&GetQuery { id, user_email })
        .await?
        .ok_or(AppError::NotFound("Note"))
}

pub async fn update_note(
    db: &dyn DocumentStore,
    user_email: &str,
    id: Uuid,
    note: &NoteInput,
) -> Result<Note, AppError> {
    validate_note(note)?;
    let note = db
        .update_note(&GetQuery { id, user_email }, note)
        .await?
        .ok_or(AppError::NotFound("Note"))?;
    debug!(user = user_email, note = %id, "updated note");

    Ok(note)
}

pub async fn delete_note(
    db: &dyn DocumentStore,
    user_email: &str,
    id: Uuid,
) -> Result<(), AppError> {
    if !db.delete_note(&GetQuery { id, user_email }).await? {
        return Err(AppError::NotFound("Note"));
    }
    debug!(user = user_email, note = %id, "deleted note");

    Ok(())
}

pub async fn summarize_note(
    db: &dyn DocumentStore,
    summarizer: &dyn Summarizer,
    user_email: &str,
    id: Uuid,
) -> Result<String, AppError> {
    let note = get_note(db, user_email, id).await?;
    let summary = summarizer
        .generate(SYSTEM_INSTRUCTION, &build_prompt(&note))
        .await
        .map_err(AppError::Summarization)?;
    debug!(user = user_email, note = %id, "summarized note");

    Ok(summary)
}

pub async fn list_tasks(
    db: &dyn DocumentStore,
    user_email: &str,
) -> Result<Vec<Task>, AppError> {
    Ok(db.list_tasks(user_email).await?)
}

pub async fn create_task(
    db: &dyn DocumentStore,
    user_email: &str,
    task: NewTaskInput,
) -> Result<Task, AppError> {
    let task: TaskInput = task.into();
    validate_task(&task)?;
    let task = db.insert_task(user_email, &task).await?;
    debug!(user = user_email, task = %task.id, "created task");

    Ok(task)
}

pub async fn get_task(
    db: &dyn DocumentStore,
    user_email: &str,
    id: Uuid,
) -> Result<Task, AppError> {
    db.get_task(&GetQuery { id, user_email })
        .await?
        .ok_or(AppError::NotFound("Task"))
}

pub async fn update_task(
    db: &dyn DocumentStore,
    user_email: &str,
    id: Uuid,
    task: &TaskInput,
) -> Result<Task, AppError> {
    validate_task(task)?;
    let task = db
        .update_task(&GetQuery { id, user_email }, task)
        .await?
        .ok_or(AppError::NotFound("Task"))?;
    debug!(user = user_email, task = %id, completed = task.completed, "updated task");

    Ok(task)
}

pub async fn delete_task(
    db: &dyn DocumentStore,
    user_email: &str,
    id: Uuid,
) -> Result<(), AppError> {
    if !db.delete_task(&GetQuery { id, user_email }).await? {
        return Err(AppError::NotFound("Task"));
    }
    debug!(user = user_email, task = %id, "deleted task");

    Ok(())
}
