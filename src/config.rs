//! Everything configurable comes from the environment (a `.env` file is
//! loaded first, if there is one).

use anyhow::{bail, Context, Result};
use std::{env, net::SocketAddr, str::FromStr, time::Duration};

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_GEMINI_BASE_URL: &str =
    "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const THIRTY_DAYS_SECS: u64 = 30 * 24 * 60 * 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageKind {
    Postgres,
    Memory,
}

impl FromStr for StorageKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "postgres" => Ok(StorageKind::Postgres),
            "memory" => Ok(StorageKind::Memory),
            other => bail!("unknown storage `{other}` (expected postgres or memory)"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub storage: StorageKind,
    /// Only present when `storage` is `Postgres`.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub session_secret: Vec<u8>,
    pub session_max_age_secs: u64,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub gemini_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| get(key).filter(|v| !v.trim().is_empty());
        fn parsed<T>(raw: Option<String>, key: &str, default: T) -> Result<T>
        where
            T: FromStr,
            T::Err: std::fmt::Display,
        {
            match raw {
                None => Ok(default),
                Some(v) => v
                    .parse()
                    .map_err(|e| anyhow::anyhow!("{e}"))
                    .with_context(|| format!("invalid {key}: `{v}`")),
            }
        }

        let listen_addr: SocketAddr = parsed(
            var("LISTEN_ADDR"),
            "LISTEN_ADDR",
            DEFAULT_LISTEN_ADDR.parse::<SocketAddr>()?,
        )?;
        let storage = parsed(
            var("NOTEDECK_STORAGE"),
            "NOTEDECK_STORAGE",
            StorageKind::Postgres,
        )?;
        let database_url = match storage {
            StorageKind::Memory => None,
            StorageKind::Postgres => Some(database_url(&var)?),
        };
        let session_secret = var("SESSION_SECRET")
            .context("SESSION_SECRET must be defined in the environment")?
            .into_bytes();

        Ok(Config {
            listen_addr,
            storage,
            database_url,
            // Postgres default max connections is 100, and we'll take 80
            max_connections: parsed(
                var("DATABASE_MAX_CONNECTIONS"),
                "DATABASE_MAX_CONNECTIONS",
                80,
            )?,
            session_secret,
            session_max_age_secs: parsed(
                var("SESSION_MAX_AGE_SECS"),
                "SESSION_MAX_AGE_SECS",
                THIRTY_DAYS_SECS,
            )?,
            gemini_api_key: var("GEMINI_API_KEY"),
            gemini_model: var("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: var("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            gemini_timeout: Duration::from_secs(parsed(
                var("GEMINI_TIMEOUT_SECS"),
                "GEMINI_TIMEOUT_SECS",
                60,
            )?),
        })
    }
}

/// `DATABASE_URL` wins; otherwise it is assembled from the `POSTGRES_*`
/// variables the database container is configured with.
fn database_url(var: &impl Fn(&str) -> Option<String>) -> Result<String> {
    if let Some(url) = var("DATABASE_URL") {
        return Ok(url);
    }
    let pg_usr = var("POSTGRES_USER")
        .context("DATABASE_URL or POSTGRES_USER must be defined")?;
    let pg_pw = var("POSTGRES_PASSWORD")
        .context("DATABASE_URL or POSTGRES_PASSWORD must be defined")?;
    let pg_db = var("POSTGRES_DB")
        .context("DATABASE_URL or POSTGRES_DB must be defined")?;
    let pg_host = var("POSTGRES_HOST").unwrap_or_else(|| "localhost".into());

    Ok(format!("postgres://{pg_usr}:{pg_pw}@{pg_host}:5432/{pg_db}"))
}
