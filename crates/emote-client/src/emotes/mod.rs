//! Emote repository.
//!
//! Merges the global emote set and curated set sources into a name index,
//! persists it through a [`DurableStore`] with a 24h TTL, and keeps a
//! short most-recently-used list for the emote picker.

mod api;
mod cache;
mod index;
mod recent;
mod store;

pub use api::{EmoteSetFetcher, HttpEmoteFetcher};
pub use cache::RefreshOutcome;
pub use index::EmoteIndex;
pub use store::DurableStore;

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::EmoteError;

/// Versioned durable key for the emote list. Bump on schema change.
pub const EMOTE_CACHE_KEY: &str = "emote-cache:v2";
pub(crate) const EMOTE_CACHE_KEY_PREFIX: &str = "emote-cache:";
/// Durable key for the recent emote id list.
pub const RECENT_EMOTES_KEY: &str = "recent-emotes";
/// Maximum number of ids kept in the recent list.
pub const MAX_RECENT_EMOTES: usize = 10;
/// Age after which cached emotes are refetched.
pub const EMOTE_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_URL_TEMPLATE: &str = "https://cdn.7tv.app/emote/{id}/2x.webp";

/// A single emote with its image URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emote {
    pub id: String,
    pub name: String,
    pub url: String,
}

/// Untrusted emote-like record from an upstream set or the durable cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEmote {
    pub id: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
}

impl RawEmote {
    /// Read an upstream record. Only `id` and `name` are taken; the image
    /// URL is always derived from the id.
    pub fn from_upstream(value: &Value) -> Self {
        Self {
            url: None,
            ..Self::from_cached(value)
        }
    }

    /// Read a durable cache record, which also carries the stored `url`.
    pub fn from_cached(value: &Value) -> Self {
        let field = |key: &str| {
            value
                .get(key)
                .and_then(|v| v.as_str())
                .map(str::to_string)
        };
        Self {
            id: field("id"),
            name: field("name"),
            url: field("url"),
        }
    }

    /// Validate into an [`Emote`] whose URL comes from the template.
    ///
    /// Records without a non-empty id and name are rejected.
    pub fn into_emote(self, url_template: &str) -> Option<Emote> {
        let (id, name) = self.validated()?;
        let url = emote_url(url_template, &id);
        Some(Emote { id, name, url })
    }

    /// Like [`RawEmote::into_emote`], but keeps a stored URL when present.
    pub fn into_cached_emote(self, url_template: &str) -> Option<Emote> {
        let url = self.url.clone().filter(|url| !url.is_empty());
        let (id, name) = self.validated()?;
        let url = url.unwrap_or_else(|| emote_url(url_template, &id));
        Some(Emote { id, name, url })
    }

    fn validated(self) -> Option<(String, String)> {
        let id = self.id.filter(|id| !id.is_empty())?;
        let name = self.name.filter(|name| !name.is_empty())?;
        Some((id, name))
    }
}

/// Build an image URL from a template containing `{id}`.
pub fn emote_url(template: &str, id: &str) -> String {
    template.replace("{id}", id)
}

/// An upstream emote set reachable through the proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmoteSource {
    Global,
    Set(String),
}

impl EmoteSource {
    /// Short label used in logs.
    pub fn label(&self) -> &str {
        match self {
            Self::Global => "global",
            Self::Set(id) => id,
        }
    }
}

/// Tunables for an [`EmoteRepository`].
#[derive(Debug, Clone)]
pub struct RepositoryOptions {
    /// Fetched in order; later sources win exact-name collisions.
    pub sources: Vec<EmoteSource>,
    pub url_template: String,
    pub fetch_timeout: Duration,
    pub ttl: Duration,
}

impl Default for RepositoryOptions {
    fn default() -> Self {
        Self {
            sources: vec![EmoteSource::Global],
            url_template: DEFAULT_URL_TEMPLATE.into(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            ttl: EMOTE_CACHE_TTL,
        }
    }
}

impl RepositoryOptions {
    /// Global source followed by the given curated set ids.
    pub fn with_sets<I, S>(set_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut options = Self::default();
        options
            .sources
            .extend(set_ids.into_iter().map(|id| EmoteSource::Set(id.into())));
        options
    }
}

#[derive(Debug, Default)]
pub(super) struct RepoState {
    pub(super) index: Arc<EmoteIndex>,
    /// Milliseconds since the Unix epoch.
    pub(super) last_fetched_at: Option<i64>,
    pub(super) recent_ids: Vec<String>,
    pub(super) error: Option<String>,
}

/// Session-lifetime emote store.
///
/// All methods take `&self`; state lives behind a lock that is never held
/// across an await point.
pub struct EmoteRepository<F> {
    pub(super) fetcher: F,
    pub(super) store: Option<Arc<dyn DurableStore>>,
    pub(super) options: RepositoryOptions,
    pub(super) state: RwLock<RepoState>,
    pub(super) in_flight: AtomicBool,
    pub(super) hydrated: AtomicBool,
}

impl<F: EmoteSetFetcher> EmoteRepository<F> {
    /// Create an empty repository without durable storage.
    pub fn new(fetcher: F, options: RepositoryOptions) -> Self {
        Self {
            fetcher,
            store: None,
            options,
            state: RwLock::new(RepoState::default()),
            in_flight: AtomicBool::new(false),
            hydrated: AtomicBool::new(false),
        }
    }

    /// Attach durable storage for the emote cache and recent list.
    pub fn with_store(mut self, store: Arc<dyn DurableStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Look up an emote by name: exact match first, then case-insensitive.
    pub fn lookup(&self, name: &str) -> Option<Emote> {
        self.read_state().index.lookup(name).cloned()
    }

    /// Look up an emote by id.
    pub fn get(&self, emote_id: &str) -> Option<Emote> {
        self.read_state().index.get(emote_id).cloned()
    }

    /// Current index, cheap to clone and safe to hold while the repository refreshes.
    pub fn snapshot(&self) -> Arc<EmoteIndex> {
        Arc::clone(&self.read_state().index)
    }

    /// Case-insensitive name-prefix search.
    pub fn search(&self, prefix: &str, limit: usize) -> Vec<Emote> {
        self.read_state().index.search(prefix, limit)
    }

    /// Number of distinct emote ids.
    pub fn len(&self) -> usize {
        self.read_state().index.len()
    }

    /// Whether no emotes are loaded.
    pub fn is_empty(&self) -> bool {
        self.read_state().index.is_empty()
    }

    /// Timestamp (ms) of the data currently loaded, if any.
    pub fn last_fetched_at(&self) -> Option<i64> {
        self.read_state().last_fetched_at
    }

    /// Error from the most recent failed refresh, cleared on success.
    pub fn error(&self) -> Option<String> {
        self.read_state().error.clone()
    }

    pub(super) fn read_state(&self) -> RwLockReadGuard<'_, RepoState> {
        match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub(super) fn write_state(&self) -> RwLockWriteGuard<'_, RepoState> {
        match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

pub(super) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

impl From<tokio::time::error::Elapsed> for EmoteError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        Self::Timeout
    }
}
