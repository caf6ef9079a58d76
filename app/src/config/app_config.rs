//! Typed client configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use display_amount::{AmountFormatter, DisplayMode};
use emote_client::RepositoryOptions;

use super::defaults::{describe, get_default};
use super::validation::{split_list, validate_setting};

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub emote_proxy_base_url: String,
    pub emote_set_ids: Vec<String>,
    pub emote_url_template: String,
    pub emote_fetch_timeout: Duration,
    /// `None` means the default location under the data directory.
    pub client_db_path: Option<PathBuf>,
    pub display_mode: DisplayMode,
    pub big_blind: u64,
    pub is_crypto: bool,
}

impl AppConfig {
    /// Load from process environment variables.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` for each setting key.
    ///
    /// Missing or blank values take the default. Values that fail
    /// validation are logged and replaced by the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| -> String {
            let fallback = get_default(key).unwrap_or_default();
            match lookup(key).map(|v| v.trim().to_string()) {
                Some(v) if !v.is_empty() => match validate_setting(key, &v) {
                    Ok(()) => v,
                    Err(e) => {
                        tracing::warn!(
                            key,
                            value = %v,
                            expected = describe(key).unwrap_or_default(),
                            "Invalid setting ({e}); using default"
                        );
                        fallback.to_string()
                    }
                },
                _ => fallback.to_string(),
            }
        };

        let db_path = value("CLIENT_DB_PATH");
        Self {
            emote_proxy_base_url: value("EMOTE_PROXY_BASE_URL"),
            emote_set_ids: split_list(&value("EMOTE_SET_IDS"))
                .map(String::from)
                .collect(),
            emote_url_template: value("EMOTE_URL_TEMPLATE"),
            emote_fetch_timeout: Duration::from_secs(
                value("EMOTE_FETCH_TIMEOUT_SECS").parse().unwrap_or(10),
            ),
            client_db_path: (!db_path.is_empty()).then(|| PathBuf::from(db_path)),
            display_mode: value("DISPLAY_MODE").parse().unwrap_or_default(),
            big_blind: value("BIG_BLIND").parse().unwrap_or(0),
            is_crypto: value("IS_CRYPTO") == "true",
        }
    }

    /// Emote repository tunables: the global set plus every configured set.
    pub fn repository_options(&self) -> RepositoryOptions {
        RepositoryOptions {
            url_template: self.emote_url_template.clone(),
            fetch_timeout: self.emote_fetch_timeout,
            ..RepositoryOptions::with_sets(self.emote_set_ids.iter().cloned())
        }
    }

    pub fn amount_formatter(&self) -> AmountFormatter {
        AmountFormatter::new(self.display_mode, self.big_blind, self.is_crypto)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use emote_client::EmoteSource;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = AppConfig::default();
        assert_eq!(config.emote_proxy_base_url, "http://localhost:3000/api/emotes");
        assert!(config.emote_set_ids.is_empty());
        assert_eq!(config.emote_fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.client_db_path, None);
        assert_eq!(config.display_mode, DisplayMode::Chips);
        assert_eq!(config.big_blind, 0);
        assert!(!config.is_crypto);
    }

    #[test]
    fn reads_valid_values() {
        let config = config_from(&[
            ("EMOTE_PROXY_BASE_URL", "https://table.example/api/emotes"),
            ("EMOTE_SET_IDS", " setA , setB ,"),
            ("EMOTE_FETCH_TIMEOUT_SECS", "3"),
            ("CLIENT_DB_PATH", "/tmp/client.db"),
            ("DISPLAY_MODE", "bb"),
            ("BIG_BLIND", "200"),
            ("IS_CRYPTO", "true"),
        ]);
        assert_eq!(config.emote_proxy_base_url, "https://table.example/api/emotes");
        assert_eq!(config.emote_set_ids, vec!["setA", "setB"]);
        assert_eq!(config.emote_fetch_timeout, Duration::from_secs(3));
        assert_eq!(config.client_db_path, Some(PathBuf::from("/tmp/client.db")));
        assert_eq!(config.display_mode, DisplayMode::BigBlinds);
        assert_eq!(config.big_blind, 200);
        assert!(config.is_crypto);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = config_from(&[
            ("EMOTE_PROXY_BASE_URL", "not a url"),
            ("EMOTE_URL_TEMPLATE", "https://cdn.example/static.png"),
            ("EMOTE_FETCH_TIMEOUT_SECS", "9999"),
            ("DISPLAY_MODE", "yen"),
            ("BIG_BLIND", "lots"),
            ("IS_CRYPTO", "1"),
        ]);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn repository_options_list_global_first() {
        let config = config_from(&[
            ("EMOTE_SET_IDS", "setA,setB"),
            ("EMOTE_URL_TEMPLATE", "https://cdn.example/{id}.webp"),
            ("EMOTE_FETCH_TIMEOUT_SECS", "5"),
        ]);
        let options = config.repository_options();
        assert_eq!(
            options.sources,
            vec![
                EmoteSource::Global,
                EmoteSource::Set("setA".into()),
                EmoteSource::Set("setB".into()),
            ]
        );
        assert_eq!(options.url_template, "https://cdn.example/{id}.webp");
        assert_eq!(options.fetch_timeout, Duration::from_secs(5));
    }

    #[test]
    fn formatter_resolves_mode() {
        let config = config_from(&[("DISPLAY_MODE", "bb")]);
        // No big blind configured, so bb display is unavailable.
        assert_eq!(config.amount_formatter().mode(), DisplayMode::Chips);

        let config = config_from(&[("DISPLAY_MODE", "usdc"), ("IS_CRYPTO", "true")]);
        assert_eq!(config.amount_formatter().mode(), DisplayMode::Usdc);
    }
}
