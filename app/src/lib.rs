pub mod commands;
pub mod config;
pub mod session;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use client_store::Database;
use emote_client::{EmoteRepository, HttpEmoteFetcher};

use crate::config::AppConfig;
use crate::session::ChatSession;

pub use session::RenderedMessage;

/// Data directory for the client.
///
/// `TABLE_CLIENT_DATA_DIR` when set, otherwise `~/.table-client`.
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("TABLE_CLIENT_DATA_DIR")
        && !dir.trim().is_empty()
    {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".table-client")
}

/// Load `.env` from the working directory or one of its parents.
///
/// Runs before logging is set up so `RUST_LOG` in `.env` takes effect;
/// the caller logs the outcome.
pub fn load_dotenv() -> Result<Option<PathBuf>, dotenvy::Error> {
    load_dotenv_from([".env", "../.env", "../../.env"])
}

/// Load the first existing file among `candidates`. Variables already set
/// in the process environment are left untouched.
pub fn load_dotenv_from<P: AsRef<Path>>(
    candidates: impl IntoIterator<Item = P>,
) -> Result<Option<PathBuf>, dotenvy::Error> {
    for candidate in candidates {
        let path = candidate.as_ref();
        if path.exists() {
            dotenvy::from_path(path)?;
            return Ok(Some(path.to_path_buf()));
        }
    }
    Ok(None)
}

fn open_store(config: &AppConfig) -> Result<Database, client_store::DbError> {
    let path = config
        .client_db_path
        .clone()
        .unwrap_or_else(|| data_dir().join("client.db"));
    tracing::info!(path = %path.display(), "Opening client store");
    Database::open(path)
}

/// Build the chat session from configuration.
///
/// A store that cannot be opened is logged and the session runs without
/// persistence. Cached emotes and recent usage are hydrated before return.
pub fn init_foundation(config: &AppConfig) -> anyhow::Result<ChatSession<HttpEmoteFetcher>> {
    let fetcher = HttpEmoteFetcher::new(&config.emote_proxy_base_url)?;
    let mut repository = EmoteRepository::new(fetcher, config.repository_options());

    match open_store(config) {
        Ok(db) => repository = repository.with_store(Arc::new(db)),
        Err(e) => tracing::warn!("Client store unavailable, running without persistence: {e}"),
    }
    repository.ensure_hydrated();

    tracing::info!(
        cached = repository.len(),
        mode = %config.amount_formatter().mode(),
        "Foundation ready"
    );
    Ok(ChatSession::new(repository, config.amount_formatter()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotenv_sets_variables_from_first_existing_file() {
        let dir = std::env::temp_dir().join(format!("table-client-dotenv-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("test.env");
        std::fs::write(&file, "TABLE_CLIENT_DOTENV_CHECK=debug\n").unwrap();

        let loaded = load_dotenv_from([dir.join("missing.env"), file.clone()]).unwrap();
        assert_eq!(loaded, Some(file));
        assert_eq!(
            std::env::var("TABLE_CLIENT_DOTENV_CHECK").as_deref(),
            Ok("debug")
        );

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn dotenv_without_candidates_is_a_no_op() {
        let missing = std::env::temp_dir().join("table-client-no-such-dir/.env");
        assert_eq!(load_dotenv_from([missing]).unwrap(), None);
    }
}
