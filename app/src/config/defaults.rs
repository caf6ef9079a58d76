//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

type DefTuple = (&'static str, &'static str, &'static str);

const DEFS: &[DefTuple] = &[
    (
        "EMOTE_PROXY_BASE_URL",
        "http://localhost:3000/api/emotes",
        "Root of the emote proxy; sets live under /emote-sets/{id}",
    ),
    (
        "EMOTE_SET_IDS",
        "",
        "Comma-separated curated emote set ids fetched after the global set",
    ),
    (
        "EMOTE_URL_TEMPLATE",
        "https://cdn.7tv.app/emote/{id}/2x.webp",
        "Image URL template; {id} is replaced with the emote id",
    ),
    (
        "EMOTE_FETCH_TIMEOUT_SECS",
        "10",
        "Per-source fetch timeout in seconds",
    ),
    (
        "CLIENT_DB_PATH",
        "",
        "SQLite file for durable client state; empty uses the data directory",
    ),
    ("DISPLAY_MODE", "chips", "Amount display: chips, bb or usdc"),
    ("BIG_BLIND", "0", "Big blind size in chips; 0 disables bb display"),
    ("IS_CRYPTO", "false", "Whether the table settles in USDC"),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    description,
                },
            )
        })
        .collect()
});

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}

/// Human-readable description of a setting, used in validation warnings.
pub fn describe(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_setting_has_a_description() {
        for &(key, _, _) in DEFS {
            assert!(describe(key).is_some_and(|d| !d.is_empty()), "{key}");
        }
        assert_eq!(describe("UNKNOWN"), None);
    }
}
