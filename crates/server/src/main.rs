//! Leaderboard API server binary.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use leaderboard_server::{Db, router};

/// Serve the participants CRUD API over HTTP.
#[derive(Debug, Parser)]
#[command(name = "leaderboard-server", version, about)]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "LEADERBOARD_BIND", default_value = "127.0.0.1:8080")]
    bind: String,

    /// SQLite database path.
    #[arg(long, env = "LEADERBOARD_DB", default_value = "leaderboard.db")]
    db_path: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let db = Db::open(&args.db_path)
        .with_context(|| format!("Failed to open database at {}", args.db_path.display()))?;

    let app = router(Arc::new(db));
    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;

    tracing::info!("Serving participants API on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
