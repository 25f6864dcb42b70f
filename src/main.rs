use anyhow::{Context, Result};
use clap::Parser;
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod client;
mod components;
mod config;
mod controllers;
mod crypto;
mod dashboard;
mod db_ops;
mod errors;
mod extractors;
mod mem_store;
mod models;
mod routes;
mod service;
mod session;
mod store;
mod summarize;
#[cfg(test)]
mod test_helpers;

use cli::{Cli, Commands};
use config::{Config, StorageKind};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    // The client subcommands print to the terminal; keep their logs quiet
    // unless asked.
    let default_filter = match cli.command {
        Commands::Serve => "info,notedeck=debug,tower_http=debug",
        _ => "warn",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Serve => serve(Config::from_env()?).await,
        Commands::Session { email } => {
            let secret = std::env::var("SESSION_SECRET")
                .context("SESSION_SECRET must be defined in the environment")?;
            let token = session::serialize_session(
                &session::Session {
                    email,
                    created_at: session::now_secs(),
                },
                secret.as_bytes(),
            )?;
            println!("{token}");
            Ok(())
        }
        Commands::Notes { remote, action } => cli::run_notes(remote, action).await,
        Commands::Tasks { remote, action } => cli::run_tasks(remote, action).await,
        Commands::Dashboard { remote } => cli::run_dashboard(remote).await,
    }
}

async fn serve(config: Config) -> Result<()> {
    let db: Arc<dyn db_ops::DocumentStore> = match config.storage {
        StorageKind::Postgres => {
            let db_url = config
                .database_url
                .as_deref()
                .context("postgres storage needs a database url")?;
            Arc::new(db_ops::PgStore::new(
                create_pg_pool(db_url, config.max_connections).await?,
            ))
        }
        StorageKind::Memory => {
            warn!("using in-memory storage; nothing will survive a restart");
            Arc::new(mem_store::MemStore::new())
        }
    };
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; summarize requests will fail");
    }
    let summarizer = summarize::GeminiClient::new(
        config.gemini_base_url,
        config.gemini_model,
        config.gemini_api_key,
        config.gemini_timeout,
    )?;

    let state = models::AppState {
        db,
        summarizer: Arc::new(summarizer),
        sessions: Arc::new(session::SessionKeys {
            secret: config.session_secret,
            max_age_secs: config.session_max_age_secs,
        }),
    };
    let app = routes::get_routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("listening on {}", config.listen_addr);
    axum::Server::bind(&config.listen_addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn create_pg_pool(db_url: &str, max_connections: u32) -> Result<sqlx::PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(db_url)
        .await
        .context("pool to be able to connect")?;
    sqlx::migrate!()
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    Ok(pool)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
