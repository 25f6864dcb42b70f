use super::{errors::AppError, models::AppState, session};
use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts},
    http::{header, request::Parts, HeaderMap, Request},
    Json,
};
use regex::Regex;
use std::sync::OnceLock;

/// The verified email of whoever is calling. Handlers that take this never
/// run for anonymous callers, so nothing downstream of it needs to re-check.
#[derive(Debug)]
pub struct AuthenticatedUser(pub String);

fn session_cookie_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:^|;\s*)session=([^;\s]+)")
            .expect("session cookie regex is valid")
    })
}

/// Pull the raw session token out of the `session` cookie, falling back to
/// an `Authorization: Bearer` header.
fn session_token(headers: &HeaderMap) -> Option<&str> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|cookie| {
            session_cookie_re()
                .captures(cookie)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str())
        });
    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
    })
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers).ok_or_else(|| {
            tracing::debug!("no session token on request");
            AppError::Unauthorized
        })?;
        match state.sessions.verify(token, session::now_secs()) {
            Ok(session) => Ok(AuthenticatedUser(session.email)),
            Err(e) => {
                tracing::debug!(reason = %e, "rejected session");
                Err(AppError::Unauthorized)
            }
        }
    }
}

/// `Json<T>`, except that every way a body can be wrong (bad JSON, missing
/// or unknown fields, wrong types) comes back as a 400 with our error shape.
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, B, T> FromRequest<S, B> for ValidJson<T>
where
    Json<T>: FromRequest<S, B, Rejection = JsonRejection>,
    S: Send + Sync,
    B: Send + 'static,
{
    type Rejection = AppError;

    async fn from_request(
        req: Request<B>,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        Ok(ValidJson(value))
    }
}
