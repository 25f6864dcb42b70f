use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Everything the service layer can fail with. Conversion to a response
/// happens only at the HTTP boundary, and only generic messages leave the
/// process.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("invalid input: {0}")]
    Validation(String),
    /// Covers both "does not exist" and "belongs to someone else".
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("summarization failed: {0:#}")]
    Summarization(anyhow::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(kind) => {
                (StatusCode::NOT_FOUND, format!("{kind} not found"))
            }
            AppError::Summarization(err) => {
                tracing::error!(error = ?err, "summarize note failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to generate summary".to_string(),
                )
            }
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    async fn body_of(res: Response) -> serde_json::Value {
        let bytes = hyper::body::to_bytes(res.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_internal_details_are_not_surfaced() {
        let res = AppError::Internal(anyhow!("connection refused to 10.0.0.3"))
            .into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(res).await;
        assert_eq!(body["error"], "Something went wrong");
    }

    #[tokio::test]
    async fn test_status_mapping() {
        assert_eq!(
            AppError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Validation("title is required".into())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        let res = AppError::NotFound("Note").into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_of(res).await["error"], "Note not found");
        let res = AppError::Summarization(anyhow!("quota exceeded"))
            .into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(res).await["error"], "Failed to generate summary");
    }
}
