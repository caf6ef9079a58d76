use std::collections::HashMap;

use super::Emote;

/// Name and id lookup tables over a merged emote list.
///
/// Exact and lowercase name maps are kept apart so an exact match always
/// beats a case-insensitive one. Both are last-writer-wins; every id stays
/// reachable through [`EmoteIndex::get`].
#[derive(Debug, Clone, Default)]
pub struct EmoteIndex {
    by_name: HashMap<String, Emote>,
    by_name_lower: HashMap<String, Emote>,
    by_id: HashMap<String, Emote>,
    emotes: Vec<Emote>,
}

impl EmoteIndex {
    /// Build an index from emotes in merge order.
    pub fn from_emotes(emotes: impl IntoIterator<Item = Emote>) -> Self {
        let mut index = Self::default();
        for emote in emotes {
            index.insert(emote);
        }
        index
    }

    fn insert(&mut self, emote: Emote) {
        self.by_name.insert(emote.name.clone(), emote.clone());
        self.by_name_lower
            .insert(emote.name.to_lowercase(), emote.clone());
        self.by_id.insert(emote.id.clone(), emote.clone());
        self.emotes.push(emote);
    }

    /// Exact name, then lowercase name.
    pub fn lookup(&self, name: &str) -> Option<&Emote> {
        self.by_name
            .get(name)
            .or_else(|| self.by_name_lower.get(&name.to_lowercase()))
    }

    pub fn get(&self, emote_id: &str) -> Option<&Emote> {
        self.by_id.get(emote_id)
    }

    /// Emotes in merge order, as written to the durable cache.
    pub fn emotes(&self) -> &[Emote] {
        &self.emotes
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Emotes whose name starts with `prefix` (ignoring case), shortest names first.
    pub fn search(&self, prefix: &str, limit: usize) -> Vec<Emote> {
        let prefix = prefix.to_lowercase();
        let mut hits: Vec<&Emote> = self
            .by_name
            .values()
            .filter(|emote| emote.name.to_lowercase().starts_with(&prefix))
            .collect();
        hits.sort_by(|a, b| {
            a.name
                .len()
                .cmp(&b.name.len())
                .then_with(|| a.name.cmp(&b.name))
        });
        hits.into_iter().take(limit).cloned().collect()
    }
}
