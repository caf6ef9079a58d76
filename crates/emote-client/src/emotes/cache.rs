use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::future::join_all;

use super::*;

/// Result of [`EmoteRepository::refresh`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Another refresh was running; nothing was done.
    AlreadyInFlight,
    /// Loaded data is younger than the TTL.
    Fresh,
    /// New data replaced the index.
    Refreshed { count: usize, failed_sources: usize },
    /// Nothing usable came back; the previous data is kept and `error()` is set.
    Failed,
}

/// Clears the in-flight flag on every exit path, including cancellation.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<F: EmoteSetFetcher> EmoteRepository<F> {
    /// Refresh the index from every configured source.
    ///
    /// Sources are fetched concurrently; one that errors or times out is
    /// left out of the merge. The refresh only fails when no source
    /// delivers a usable emote, in which case the existing data stays.
    pub async fn refresh(&self, force: bool) -> RefreshOutcome {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            tracing::debug!("Emote refresh already in flight");
            return RefreshOutcome::AlreadyInFlight;
        }
        let _guard = InFlightGuard(&self.in_flight);

        self.ensure_hydrated();

        let now = now_millis();
        if !force && self.is_fresh(now) {
            tracing::debug!("Emote cache is fresh, skipping refresh");
            return RefreshOutcome::Fresh;
        }

        let sources = &self.options.sources;
        if sources.is_empty() {
            return self.fail("no emote sources configured".into());
        }

        let timeout = self.options.fetch_timeout;
        let results = join_all(sources.iter().map(|source| async move {
            match tokio::time::timeout(timeout, self.fetcher.fetch_set(source)).await {
                Ok(result) => result,
                Err(elapsed) => Err(elapsed.into()),
            }
        }))
        .await;

        let mut records = Vec::new();
        let mut failed_sources = 0usize;
        for (source, result) in sources.iter().zip(results) {
            match result {
                Ok(raw) => records.extend(raw),
                Err(e) => {
                    failed_sources += 1;
                    tracing::warn!(error = %e, source = source.label(), "Failed to fetch emote set");
                }
            }
        }

        if failed_sources == sources.len() {
            return self.fail(format!("all {failed_sources} emote sources failed"));
        }

        let template = &self.options.url_template;
        let index = EmoteIndex::from_emotes(
            records
                .into_iter()
                .filter_map(|raw| raw.into_emote(template)),
        );
        if index.is_empty() {
            return self.fail("emote sources returned no emotes".into());
        }

        let count = index.len();
        let index = Arc::new(index);
        {
            let mut state = self.write_state();
            state.index = Arc::clone(&index);
            state.last_fetched_at = Some(now);
            state.error = None;
        }
        self.persist_emotes(&index, now);

        tracing::info!(count, failed_sources, "Emote cache refreshed");
        RefreshOutcome::Refreshed {
            count,
            failed_sources,
        }
    }

    /// Loaded, non-empty and younger than the TTL.
    pub fn is_fresh(&self, now: i64) -> bool {
        let state = self.read_state();
        let Some(last) = state.last_fetched_at else {
            return false;
        };
        let ttl_ms = i64::try_from(self.options.ttl.as_millis()).unwrap_or(i64::MAX);
        !state.index.is_empty() && now.saturating_sub(last) < ttl_ms
    }

    fn fail(&self, message: String) -> RefreshOutcome {
        tracing::warn!(error = %message, "Emote refresh failed, keeping previous data");
        self.write_state().error = Some(message);
        RefreshOutcome::Failed
    }
}
