//! Per-session username colours for chat and the overlay.

use std::collections::{HashMap, HashSet};

pub const DEFAULT_PALETTE: [&str; 10] = [
    "#ef4444", "#f59e0b", "#10b981", "#3b82f6", "#8b5cf6", "#ec4899", "#14b8a6", "#f97316",
    "#06b6d4", "#a855f7",
];

/// Username to colour assignments for one chat session.
///
/// New users take the first palette colour nobody holds yet; once the
/// palette is used up, colours come from a hash of the name. Usernames
/// are compared case-insensitively.
#[derive(Debug, Clone)]
pub struct UserColors {
    palette: Vec<String>,
    assigned: HashMap<String, String>,
    used: HashSet<String>,
}

impl Default for UserColors {
    fn default() -> Self {
        Self::with_palette(DEFAULT_PALETTE)
    }
}

impl UserColors {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty palette falls back to [`DEFAULT_PALETTE`].
    pub fn with_palette<I, S>(palette: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut palette: Vec<String> = palette.into_iter().map(Into::into).collect();
        if palette.is_empty() {
            palette = DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect();
        }
        Self {
            palette,
            assigned: HashMap::new(),
            used: HashSet::new(),
        }
    }

    /// Colour for `username`, assigning one on first sight.
    pub fn color_for(&mut self, username: &str) -> &str {
        let key = username.to_lowercase();
        if !self.assigned.contains_key(&key) {
            let color = self
                .first_unused()
                .unwrap_or_else(|| self.hashed(&key))
                .to_string();
            tracing::trace!(username, color = %color, "Assigned chat colour");
            self.used.insert(color.clone());
            self.assigned.insert(key.clone(), color);
        }
        &self.assigned[&key]
    }

    /// Colour already assigned to `username`, if any.
    pub fn get(&self, username: &str) -> Option<&str> {
        self.assigned
            .get(&username.to_lowercase())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }

    fn first_unused(&self) -> Option<&str> {
        self.palette
            .iter()
            .find(|color| !self.used.contains(*color))
            .map(String::as_str)
    }

    fn hashed(&self, key: &str) -> &str {
        let mut hash: u64 = 0;
        for c in key.chars() {
            hash = hash.wrapping_mul(31).wrapping_add(c as u64);
        }
        let idx = (hash % self.palette.len() as u64) as usize;
        &self.palette[idx]
    }
}
