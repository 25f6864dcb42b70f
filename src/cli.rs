use super::{
    client::ApiClient,
    components::{Component, ToastView},
    dashboard::{Dashboard, TaskEdit, Toast},
    models::Priority,
};
use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "notedeck")]
#[command(about = "Notes and tasks, with AI summaries")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve,

    /// Sign a session token with $SESSION_SECRET, for local development
    Session {
        #[arg(long)]
        email: String,
    },

    /// Note operations
    Notes {
        #[command(flatten)]
        remote: Remote,

        #[command(subcommand)]
        action: NoteAction,
    },

    /// Task operations
    Tasks {
        #[command(flatten)]
        remote: Remote,

        #[command(subcommand)]
        action: TaskAction,
    },

    /// Show notes and tasks together
    Dashboard {
        #[command(flatten)]
        remote: Remote,
    },
}

#[derive(Args)]
pub struct Remote {
    /// Server URL
    #[arg(long, env = "NOTEDECK_URL", default_value = "http://127.0.0.1:8000")]
    pub server: String,

    /// Session token
    #[arg(long, env = "NOTEDECK_SESSION", hide_env_values = true)]
    pub session: String,
}

#[derive(Subcommand)]
pub enum NoteAction {
    List,

    Create {
        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        content: String,
    },

    /// Replace a note's title and/or content
    Edit {
        id: Uuid,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        content: Option<String>,
    },

    Delete {
        id: Uuid,
    },

    /// Ask the model for a 2-3 sentence summary
    Summarize {
        id: Uuid,
    },
}

#[derive(Subcommand)]
pub enum TaskAction {
    List,

    Create {
        #[arg(short, long)]
        title: String,

        #[arg(short, long, default_value = "")]
        description: String,

        /// low, medium or high
        #[arg(short, long, default_value = "medium")]
        priority: Priority,
    },

    /// Change a task's fields; completion is left alone
    Edit {
        id: Uuid,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        priority: Option<Priority>,
    },

    /// Flip a task between pending and completed
    Toggle {
        id: Uuid,
    },

    Delete {
        id: Uuid,
    },
}

async fn open(remote: &Remote) -> Result<Dashboard> {
    let mut dashboard = Dashboard::new(ApiClient::new(&remote.server, &remote.session)?);
    dashboard.load().await;
    Ok(dashboard)
}

/// Toasts go to stderr so stdout only ever carries the rendered view.
fn report(toast: &Toast) -> Result<()> {
    eprintln!("{}", ToastView { toast }.render());
    if toast.is_error() {
        bail!("{}", toast.description);
    }
    Ok(())
}

pub async fn run_notes(remote: Remote, action: NoteAction) -> Result<()> {
    let mut dash = open(&remote).await?;
    match action {
        NoteAction::List => {}
        NoteAction::Create { title, content } => {
            report(&dash.create_note(&title, &content).await)?;
        }
        NoteAction::Edit { id, title, content } => {
            report(
                &dash
                    .update_note(id, title.as_deref(), content.as_deref())
                    .await,
            )?;
        }
        NoteAction::Delete { id } => report(&dash.delete_note(id).await)?,
        NoteAction::Summarize { id } => {
            if let Some(toast) = dash.summarize_note(id).await {
                return report(&toast);
            }
            if let Some(summary) = dash.render_summary() {
                println!("{summary}");
            }
            return Ok(());
        }
    }
    println!("{}", dash.render_notes());
    Ok(())
}

pub async fn run_tasks(remote: Remote, action: TaskAction) -> Result<()> {
    let mut dash = open(&remote).await?;
    match action {
        TaskAction::List => {}
        TaskAction::Create {
            title,
            description,
            priority,
        } => {
            report(&dash.create_task(&title, &description, priority).await)?;
        }
        TaskAction::Edit {
            id,
            title,
            description,
            priority,
        } => {
            let edit = TaskEdit {
                title,
                description,
                priority,
            };
            report(&dash.update_task(id, edit).await)?;
        }
        TaskAction::Toggle { id } => report(&dash.toggle_task(id).await)?,
        TaskAction::Delete { id } => report(&dash.delete_task(id).await)?,
    }
    println!("{}", dash.render_tasks());
    Ok(())
}

pub async fn run_dashboard(remote: Remote) -> Result<()> {
    let dash = open(&remote).await?;
    println!("{}", dash.render());
    Ok(())
}
