//! Emote client library.
//!
//! Fetches emote sets through the table proxy, keeps a name-indexed
//! repository with a durable TTL cache, and tracks recently used emotes.

pub mod emotes;

pub use emotes::{
    DurableStore, Emote, EmoteIndex, EmoteRepository, EmoteSetFetcher, EmoteSource,
    HttpEmoteFetcher, RawEmote, RefreshOutcome, RepositoryOptions,
};

/// Unified error type for the emote-client crate.
#[derive(Debug, thiserror::Error)]
pub enum EmoteError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Emote proxy error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Emote source timed out")]
    Timeout,

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid emote source: {0}")]
    InvalidSource(String),

    #[error("Storage error: {0}")]
    Storage(#[from] client_store::DbError),
}
