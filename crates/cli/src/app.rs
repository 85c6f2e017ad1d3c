//! Command-line presentation over the leaderboard controller.
//!
//! This is the composition root: it assembles the two store adapters and
//! the preference capability, injects them into the controller, runs one
//! user action, and renders the resulting standings frame. Action errors
//! surface as notifications in the frame, never as a crash.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use controller::{Leaderboard, NotificationLevel, StandingsFrame};
use leaderboard_core::ParticipantId;
use store_core::KvStore;
use store_local::{FileKv, LocalStore};
use store_remote::RemoteStore;

/// Rank participants and adjust their scores from the terminal.
#[derive(Debug, Parser)]
#[command(name = "leaderboard", version, about)]
pub struct Cli {
    /// Base URL of the remote participants API.
    #[arg(
        long,
        env = "LEADERBOARD_API_URL",
        default_value = "http://127.0.0.1:8080"
    )]
    api_url: String,

    /// Optional timeout for remote requests, in seconds. Unset means wait
    /// indefinitely.
    #[arg(long, env = "LEADERBOARD_HTTP_TIMEOUT_SECS")]
    http_timeout_secs: Option<u64>,

    /// Override the directory used for local storage.
    #[arg(long, env = "LEADERBOARD_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the current standings.
    List,
    /// Add a participant with a zero score.
    Add { name: String },
    /// Apply a delta to a participant's score.
    Adjust {
        id: String,
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
    /// Remove a participant (asks for confirmation).
    Remove {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Switch between local and remote storage.
    Toggle,
}

pub async fn run(cli: Cli) -> Result<()> {
    let mut leaderboard = build(&cli)?;
    leaderboard.initialize().await?;

    match cli.command {
        Command::List => {}
        Command::Add { name } => {
            let _ = leaderboard.add_participant(&name).await;
        }
        Command::Adjust { id, delta } => {
            let _ = leaderboard
                .adjust_score(&ParticipantId::new(id), delta)
                .await;
        }
        Command::Remove { id, yes } => {
            remove(&mut leaderboard, ParticipantId::new(id), yes).await?;
        }
        Command::Toggle => {
            let _ = leaderboard.toggle_backend().await;
        }
    }

    render(&StandingsFrame::from_state(&leaderboard, 5));
    Ok(())
}

/// The two-step removal: stage the candidate, then confirm or cancel.
async fn remove(leaderboard: &mut Leaderboard, id: ParticipantId, yes: bool) -> Result<()> {
    let Some(candidate) = leaderboard.stage_removal(&id) else {
        println!("No participant with id {id}");
        return Ok(());
    };
    let name = candidate.name.clone();

    if yes || confirm(&format!("Remove {name}? This cannot be undone."))? {
        let _ = leaderboard.confirm_removal().await;
    } else {
        leaderboard.cancel_removal();
        println!("Kept {name}");
    }
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn build(cli: &Cli) -> Result<Leaderboard> {
    let data_dir = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => directories::ProjectDirs::from("", "", "leaderboard")
            .context("Could not determine a data directory; set --data-dir")?
            .data_dir()
            .to_path_buf(),
    };

    let kv: Arc<dyn KvStore> = Arc::new(
        FileKv::open(&data_dir)
            .with_context(|| format!("Failed to open local storage at {}", data_dir.display()))?,
    );

    let remote = RemoteStore::with_timeout(
        cli.api_url.clone(),
        cli.http_timeout_secs.map(Duration::from_secs),
    )
    .context("Failed to construct the remote store")?;

    Leaderboard::builder()
        .local(LocalStore::new(kv.clone()))
        .remote(remote)
        .preferences(kv)
        .build()
}

fn render(frame: &StandingsFrame) {
    // Notifications mirror the original's transient toasts, newest last.
    for note in frame.notifications.iter().rev() {
        match note.level {
            NotificationLevel::Info => eprintln!("{}", note.text),
            NotificationLevel::Warning => eprintln!("warning: {}", note.text),
            NotificationLevel::Error => eprintln!("error: {}", note.text),
        }
    }

    println!("Leaderboard ({} storage)", frame.backend.label());
    if frame.rows.is_empty() {
        println!("  no participants yet");
        return;
    }

    for row in &frame.rows {
        println!(
            "  {:>3}. {:<24} {:>6}  [{}]",
            row.rank, row.name, row.score, row.id
        );
    }
    println!(
        "  {} participants, {} total points",
        frame.participant_count, frame.total_score
    );
}
