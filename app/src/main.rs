use table_client_lib::commands::{Command, execute};
use table_client_lib::config::AppConfig;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Before the subscriber, so RUST_LOG from .env is honoured.
    let dotenv = table_client_lib::load_dotenv();

    // Logs go to stderr; stdout carries one JSON reply per input line.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match dotenv {
        Ok(Some(path)) => tracing::info!("Loaded env from {}", path.display()),
        Ok(None) => {}
        Err(e) => tracing::warn!("Failed to load .env: {e}"),
    }
    let config = AppConfig::load();
    let mut session = table_client_lib::init_foundation(&config)?;

    let outcome = session.emotes().refresh(false).await;
    tracing::info!(?outcome, emotes = session.emotes().len(), "Emotes ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let reply = match Command::parse(line) {
            Ok(command) => execute(&mut session, command).await,
            Err(e) => serde_json::json!({ "error": e }),
        };
        println!("{reply}");
    }

    tracing::info!("stdin closed, shutting down");
    Ok(())
}
