use super::{
    mem_store::MemStore,
    models::AppState,
    session::{now_secs, serialize_session, Session, SessionKeys},
    summarize::Summarizer,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub const ALICE: &str = "alice@example.com";
pub const BOB: &str = "bob@example.com";
pub const SECRET: &[u8] = b"test-secret";
pub const FIXTURE_SUMMARY: &str =
    "Buy milk and eggs tomorrow. Add both to your shopping list.";

pub struct FixtureSummarizer;

#[async_trait]
impl Summarizer for FixtureSummarizer {
    async fn generate(&self, _system: &str, _prompt: &str) -> Result<String> {
        Ok(FIXTURE_SUMMARY.to_string())
    }
}

pub fn test_state() -> AppState {
    AppState {
        db: Arc::new(MemStore::new()),
        summarizer: Arc::new(FixtureSummarizer),
        sessions: Arc::new(SessionKeys {
            secret: SECRET.to_vec(),
            max_age_secs: 3600,
        }),
    }
}

pub fn session_token(email: &str) -> String {
    serialize_session(
        &Session {
            email: email.to_string(),
            created_at: now_secs(),
        },
        SECRET,
    )
    .unwrap()
}
