use std::sync::atomic::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::*;

/// Durable string storage for cache entries.
///
/// Every failure is reported as an error; the repository logs it and
/// carries on as if the entry were absent.
pub trait DurableStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, EmoteError>;

    fn write(&self, key: &str, value: &str) -> Result<(), EmoteError>;

    /// Drop entries under `prefix` other than `keep`.
    fn purge_stale(&self, _prefix: &str, _keep: &str) -> Result<usize, EmoteError> {
        Ok(0)
    }
}

impl DurableStore for client_store::Database {
    fn read(&self, key: &str) -> Result<Option<String>, EmoteError> {
        Ok(self.get_entry(key)?)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), EmoteError> {
        Ok(self.set_entry(key, value)?)
    }

    fn purge_stale(&self, prefix: &str, keep: &str) -> Result<usize, EmoteError> {
        Ok(self.purge_entries_with_prefix(prefix, keep)?)
    }
}

/// Shape written to [`EMOTE_CACHE_KEY`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CachedEmotes<'a> {
    emotes: &'a [Emote],
    last_fetched_at: i64,
}

/// Shape read back; records are validated one by one.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CachedEmotesRecord {
    emotes: Vec<Value>,
    last_fetched_at: i64,
}

impl<F: EmoteSetFetcher> EmoteRepository<F> {
    /// Run both hydrations once per repository.
    pub fn ensure_hydrated(&self) {
        if self.hydrated.swap(true, Ordering::AcqRel) {
            return;
        }
        self.hydrate_from_cache();
        self.hydrate_recent_emotes();
    }

    /// Load the emote list from the durable cache.
    ///
    /// Stale entries are loaded too; `refresh` decides whether to refetch.
    /// Missing, unreadable or corrupt entries leave the repository untouched.
    pub fn hydrate_from_cache(&self) {
        let Some(store) = &self.store else {
            return;
        };

        match store.purge_stale(EMOTE_CACHE_KEY_PREFIX, EMOTE_CACHE_KEY) {
            Ok(0) => {}
            Ok(removed) => tracing::debug!(removed, "Dropped superseded emote cache entries"),
            Err(e) => tracing::warn!(error = %e, "Failed to drop superseded emote caches"),
        }

        let raw = match store.read(EMOTE_CACHE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read emote cache");
                return;
            }
        };

        let record: CachedEmotesRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring corrupt emote cache");
                return;
            }
        };

        let template = &self.options.url_template;
        let emotes: Vec<Emote> = record
            .emotes
            .iter()
            .filter_map(|value| RawEmote::from_cached(value).into_cached_emote(template))
            .collect();
        let index = EmoteIndex::from_emotes(emotes);
        let count = index.len();

        let mut state = self.write_state();
        state.index = Arc::new(index);
        state.last_fetched_at = Some(record.last_fetched_at);
        drop(state);

        tracing::info!(
            count,
            last_fetched_at = record.last_fetched_at,
            "Emotes hydrated from cache"
        );
    }

    /// Load the recent emote id list from durable storage.
    pub fn hydrate_recent_emotes(&self) {
        let Some(store) = &self.store else {
            return;
        };

        let raw = match store.read(RECENT_EMOTES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read recent emotes");
                return;
            }
        };

        let ids: Vec<String> = match serde_json::from_str(&raw) {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring corrupt recent emotes");
                return;
            }
        };

        let mut recent: Vec<String> = Vec::with_capacity(MAX_RECENT_EMOTES);
        for id in ids {
            if recent.len() == MAX_RECENT_EMOTES {
                break;
            }
            if !id.is_empty() && !recent.contains(&id) {
                recent.push(id);
            }
        }

        self.write_state().recent_ids = recent;
    }

    /// Best-effort write of the merged list.
    pub(super) fn persist_emotes(&self, index: &EmoteIndex, last_fetched_at: i64) {
        let Some(store) = &self.store else {
            return;
        };
        let payload = CachedEmotes {
            emotes: index.emotes(),
            last_fetched_at,
        };
        let result = serde_json::to_string(&payload)
            .map_err(EmoteError::from)
            .and_then(|json| store.write(EMOTE_CACHE_KEY, &json));
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to write emote cache");
        }
    }

    /// Best-effort write of the recent id list.
    pub(super) fn persist_recent(&self, recent_ids: &[String]) {
        let Some(store) = &self.store else {
            return;
        };
        let result = serde_json::to_string(recent_ids)
            .map_err(EmoteError::from)
            .and_then(|json| store.write(RECENT_EMOTES_KEY, &json));
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to write recent emotes");
        }
    }
}
