use super::*;

impl<F: EmoteSetFetcher> EmoteRepository<F> {
    /// Move an emote to the front of the recent list and persist it.
    pub fn record_usage(&self, emote_id: &str) {
        if emote_id.is_empty() {
            return;
        }
        let recent = {
            let mut state = self.write_state();
            push_recent(&mut state.recent_ids, emote_id);
            state.recent_ids.clone()
        };
        self.persist_recent(&recent);
    }

    /// Recent emote ids, most recent first.
    pub fn recent_ids(&self) -> Vec<String> {
        self.read_state().recent_ids.clone()
    }

    /// Recent emotes that resolve in the current index.
    pub fn recent_emotes(&self) -> Vec<Emote> {
        let state = self.read_state();
        state
            .recent_ids
            .iter()
            .filter_map(|id| state.index.get(id).cloned())
            .collect()
    }
}

fn push_recent(recent: &mut Vec<String>, emote_id: &str) {
    recent.retain(|id| id != emote_id);
    recent.insert(0, emote_id.to_string());
    recent.truncate(MAX_RECENT_EMOTES);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_recent_dedupes_and_caps() {
        let mut recent = vec!["a".to_string(), "b".to_string()];
        push_recent(&mut recent, "b");
        assert_eq!(recent, vec!["b", "a"]);

        for i in 0..20 {
            push_recent(&mut recent, &i.to_string());
        }
        assert_eq!(recent.len(), MAX_RECENT_EMOTES);
        assert_eq!(recent[0], "19");
        assert_eq!(recent[MAX_RECENT_EMOTES - 1], "10");
    }
}
