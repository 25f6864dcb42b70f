use super::{
    errors::AppError,
    extractors::{AuthenticatedUser, ValidJson},
    models::{AppState, NewTaskInput, Note, NoteInput, Summary, Task, TaskInput},
    service,
    service::parse_id,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

pub async fn pong() -> impl IntoResponse {
    "pong"
}

pub async fn list_notes(
    State(AppState { db, .. }): State<AppState>,
    AuthenticatedUser(email): AuthenticatedUser,
) -> Result<Json<Vec<Note>>, AppError> {
    Ok(Json(service::list_notes(db.as_ref(), &email).await?))
}

pub async fn create_note(
    State(AppState { db, .. }): State<AppState>,
    AuthenticatedUser(email): AuthenticatedUser,
    ValidJson(note): ValidJson<NoteInput>,
) -> Result<(StatusCode, Json<Note>), AppError> {
    let note = service::create_note(db.as_ref(), &email, &note).await?;

    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn get_note(
    State(AppState { db, .. }): State<AppState>,
    AuthenticatedUser(email): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<Note>, AppError> {
    let id = parse_id(&id, "Note")?;

    Ok(Json(service::get_note(db.as_ref(), &email, id).await?))
}

pub async fn update_note(
    State(AppState { db, .. }): State<AppState>,
    AuthenticatedUser(email): AuthenticatedUser,
    Path(id): Path<String>,
    ValidJson(note): ValidJson<NoteInput>,
) -> Result<Json<Note>, AppError> {
    let id = parse_id(&id, "Note")?;

    Ok(Json(service::update_note(db.as_ref(), &email, id, &note).await?))
}

pub async fn delete_note(
    State(AppState { db, .. }): State<AppState>,
    AuthenticatedUser(email): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id, "Note")?;
    service::delete_note(db.as_ref(), &email, id).await?;

    Ok(StatusCode::OK)
}

pub async fn summarize_note(
    State(AppState { db, summarizer, .. }): State<AppState>,
    AuthenticatedUser(email): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<Summary>, AppError> {
    let id = parse_id(&id, "Note")?;
    let summary =
        service::summarize_note(db.as_ref(), summarizer.as_ref(), &email, id)
            .await?;

    Ok(Json(Summary { summary }))
}

pub async fn list_tasks(
    State(AppState { db, .. }): State<AppState>,
    AuthenticatedUser(email): AuthenticatedUser,
) -> Result<Json<Vec<Task>>, AppError> {
    Ok(Json(service::list_tasks(db.as_ref(), &email).await?))
}

pub async fn create_task(
    State(AppState { db, .. }): State<AppState>,
    AuthenticatedUser(email): AuthenticatedUser,
    ValidJson(task): ValidJson<NewTaskInput>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let task = service::create_task(db.as_ref(), &email, task).await?;

    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn get_task(
    State(AppState { db, .. }): State<AppState>,
    AuthenticatedUser(email): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<Task>, AppError> {
    let id = parse_id(&id, "Task")?;

    Ok(Json(service::get_task(db.as_ref(), &email, id).await?))
}

pub async fn update_task(
    State(AppState { db, .. }): State<AppState>,
    AuthenticatedUser(email): AuthenticatedUser,
    Path(id): Path<String>,
    ValidJson(task): ValidJson<TaskInput>,
) -> Result<Json<Task>, AppError> {
    let id = parse_id(&id, "Task")?;

    Ok(Json(service::update_task(db.as_ref(), &email, id, &task).await?))
}

pub async fn delete_task(
    State(AppState { db, .. }): State<AppState>,
    AuthenticatedUser(email): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id, "Task")?;
    service::delete_task(db.as_ref(), &email, id).await?;

    Ok(StatusCode::OK)
}
