use super::crypto;
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HMAC-secured session string, signed by $SESSION_SECRET.
///
/// Sessions are minted by the sign-in service, which shares the secret with
/// us. The only thing we trust in here is the email, and only after the
/// signature checks out.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    /// Unix seconds
    pub created_at: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid session")]
    Malformed,
    #[error("cannot base64 decode the digest")]
    BadDigestEncoding,
    #[error("failed to validate session signature")]
    BadSignature,
    #[error("cannot base64 decode session string")]
    BadPayloadEncoding,
    #[error("cannot deserialize session JSON")]
    BadPayload,
    #[error("session has no email")]
    MissingEmail,
    #[error("session expired")]
    Expired,
    #[error("session was issued in the future")]
    IssuedInFuture,
    #[error("session secret is unusable")]
    BadSecret,
}

/// How far ahead of our clock a session's `created_at` may be.
pub const MAX_CLOCK_SKEW_SECS: u64 = 60;

pub struct SessionKeys {
    pub secret: Vec<u8>,
    pub max_age_secs: u64,
}

impl SessionKeys {
    /// Check the signature, then the claims. `now` is unix seconds.
    pub fn verify(&self, token: &str, now: u64) -> Result<Session, SessionError> {
        let session = deserialize_session(token, &self.secret)?;
        if session.email.trim().is_empty() {
            return Err(SessionError::MissingEmail);
        }
        if session.created_at > now.saturating_add(MAX_CLOCK_SKEW_SECS) {
            return Err(SessionError::IssuedInFuture);
        }
        if now.saturating_sub(session.created_at) > self.max_age_secs {
            return Err(SessionError::Expired);
        }

        Ok(session)
    }
}

pub fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub fn serialize_session(
    session: &Session,
    secret: &[u8],
) -> Result<String, SessionError> {
    let json_bytes =
        serde_json::to_vec(&session).map_err(|_| SessionError::BadPayload)?;
    let b64 = general_purpose::STANDARD_NO_PAD.encode(json_bytes);
    let raw_digest = crypto::get_digest(secret, b64.as_bytes())
        .map_err(|_| SessionError::BadSecret)?;
    let digest = general_purpose::STANDARD_NO_PAD.encode(raw_digest);

    Ok(format!("{}:{}", b64, digest))
}

pub fn deserialize_session(
    token: &str,
    secret: &[u8],
) -> Result<Session, SessionError> {
    let Some((b64_json, b64_digest)) = token.split_once(':') else {
        return Err(SessionError::Malformed);
    };
    if b64_digest.contains(':') {
        return Err(SessionError::Malformed);
    }
    let digest = general_purpose::STANDARD_NO_PAD
        .decode(b64_digest)
        .map_err(|_| SessionError::BadDigestEncoding)?;

    if !crypto::is_valid(secret, b64_json.as_bytes(), &digest) {
        return Err(SessionError::BadSignature);
    }
    let json_bytes = general_purpose::STANDARD_NO_PAD
        .decode(b64_json)
        .map_err(|_| SessionError::BadPayloadEncoding)?;

    serde_json::from_slice(&json_bytes).map_err(|_| SessionError::BadPayload)
}
