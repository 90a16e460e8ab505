//! pinnote - command-line front end for the note cache.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use pinnote_client::{
    ClientConfig, ClientError, Notification, NotificationLevel, NotificationLog, NoteCache,
    Notifier, RestClient,
};
use pinnote_core::{Note, NoteId};

#[derive(Parser)]
#[command(name = "pinnote")]
#[command(about = "Keep notes, pinned ones first")]
struct Cli {
    /// Path to the client configuration file
    #[arg(long, env = "PINNOTE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List notes, pinned first
    List,

    /// Create a note
    Add {
        title: String,
        tagline: String,
        body: String,
    },

    /// Replace the text of a note
    Edit {
        id: String,
        title: String,
        tagline: String,
        body: String,
    },

    /// Delete a note
    Delete { id: String },

    /// Pin a note
    Pin { id: String },

    /// Unpin a note
    Unpin { id: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let log = NotificationLog::new();

    let outcome = run(cli, &log).await;
    for notification in log.drain() {
        print_notification(&notification);
    }

    match outcome {
        Ok(notes) => {
            for note in &notes {
                print_note(note);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            if !matches!(err, ClientError::Store(_)) {
                eprintln!("error: {}", err);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, log: &NotificationLog) -> Result<Vec<Note>, ClientError> {
    let config = ClientConfig::load(cli.config)?;
    let api = Arc::new(RestClient::new(&config)?);
    let cache = NoteCache::start(api, Arc::new(log.clone()), config.optimistic_policy).await;

    match cli.command {
        Commands::List => {}
        Commands::Add {
            title,
            tagline,
            body,
        } => {
            cache.add(title, tagline, body).await?;
            log.notify(Notification::success("Note Added Successfully"));
        }
        Commands::Edit {
            id,
            title,
            tagline,
            body,
        } => {
            cache
                .update(&NoteId::from(id), title, tagline, body)
                .await?;
            log.notify(Notification::success("Note Updated Successfully"));
        }
        Commands::Delete { id } => {
            cache.delete(&NoteId::from(id)).await?;
            log.notify(Notification::success("Note Deleted Successfully"));
        }
        Commands::Pin { id } => {
            set_pin(&cache, id, true).await?;
            log.notify(Notification::success("Note Pinned"));
        }
        Commands::Unpin { id } => {
            set_pin(&cache, id, false).await?;
            log.notify(Notification::success("Note Unpinned"));
        }
    }

    Ok(cache.notes())
}

async fn set_pin(cache: &NoteCache, id: String, pinned: bool) -> Result<(), ClientError> {
    let id = NoteId::from(id);
    let note = cache
        .get(&id)
        .ok_or_else(|| ClientError::UnknownNote(id.to_string()))?;
    cache.update_pinned(note.with_pinned(pinned)).await?;
    Ok(())
}

fn print_notification(notification: &Notification) {
    let label = match notification.level {
        NotificationLevel::Error => "error",
        NotificationLevel::Success => "ok",
    };
    eprintln!("[{}] {}", label, notification.message);
}

fn print_note(note: &Note) {
    let marker = if note.pinned { "[*]" } else { "[ ]" };
    println!("{} {}  {} - {}", marker, note.id, note.title, note.tagline);
    if !note.body.is_empty() {
        println!("      {}", note.body);
    }
}
