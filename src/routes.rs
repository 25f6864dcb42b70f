use super::{controllers, models};
use axum::routing::{get, post, Router};

#[rustfmt::skip]
pub fn get_routes() -> Router<models::AppState> {
    Router::new()
        .route("/ping", get(controllers::pong))
        .route("/notes", get(controllers::list_notes).post(controllers::create_note))
        .route("/notes/:id", get(controllers::get_note).put(controllers::update_note).delete(controllers::delete_note))
        .route("/notes/:id/summarize", post(controllers::summarize_note))
        .route("/tasks", get(controllers::list_tasks).post(controllers::create_task))
        .route("/tasks/:id", get(controllers::get_task).put(controllers::update_task).delete(controllers::delete_task))
}
