//! Setting value validation.

use std::sync::LazyLock;

use display_amount::DisplayMode;
use regex::Regex;

static RE_HTTP_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/?#]+(/[^\s]*)?$").unwrap());
static RE_SET_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z_-]{1,64}$").unwrap());

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "EMOTE_PROXY_BASE_URL" => {
            if !RE_HTTP_URL.is_match(value) {
                return Err("must be an http(s) URL".into());
            }
        }
        "EMOTE_URL_TEMPLATE" => {
            if !value.contains("{id}") {
                return Err("must contain {id}".into());
            }
            if !RE_HTTP_URL.is_match(&value.replace("{id}", "x")) {
                return Err("must be an http(s) URL".into());
            }
        }
        "EMOTE_SET_IDS" => {
            for id in split_list(value) {
                if !RE_SET_ID.is_match(id) {
                    return Err(format!("invalid emote set id: {id}"));
                }
            }
        }
        "EMOTE_FETCH_TIMEOUT_SECS" => validate_int_range(value, 1, 120)?,
        "BIG_BLIND" => {
            value.parse::<u64>().map_err(|_| "must be a non-negative integer")?;
        }
        "DISPLAY_MODE" => {
            value.parse::<DisplayMode>().map_err(|e| e.to_string())?;
        }
        "IS_CRYPTO" => {
            if value != "true" && value != "false" {
                return Err("must be 'true' or 'false'".into());
            }
        }
        _ => {}
    }
    Ok(())
}

/// Non-empty, trimmed entries of a comma-separated list.
pub fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn validate_int_range(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v: i64 = value.parse().map_err(|_| "must be an integer")?;
    if !(min..=max).contains(&v) {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proxy_url() {
        assert!(validate_setting("EMOTE_PROXY_BASE_URL", "http://localhost:3000/api/emotes").is_ok());
        assert!(validate_setting("EMOTE_PROXY_BASE_URL", "https://table.example").is_ok());
        assert!(validate_setting("EMOTE_PROXY_BASE_URL", "ftp://table.example").is_err());
        assert!(validate_setting("EMOTE_PROXY_BASE_URL", "table.example").is_err());
    }

    #[test]
    fn url_template() {
        assert!(validate_setting("EMOTE_URL_TEMPLATE", "https://cdn.7tv.app/emote/{id}/2x.webp").is_ok());
        assert!(validate_setting("EMOTE_URL_TEMPLATE", "https://cdn.7tv.app/emote/2x.webp").is_err());
        assert!(validate_setting("EMOTE_URL_TEMPLATE", "{id}").is_err());
    }

    #[test]
    fn set_ids() {
        assert!(validate_setting("EMOTE_SET_IDS", "").is_ok());
        assert!(validate_setting("EMOTE_SET_IDS", "01HKQT8EWR, poker_table-2").is_ok());
        assert!(validate_setting("EMOTE_SET_IDS", "ok,../etc").is_err());
    }

    #[test]
    fn numbers_and_flags() {
        assert!(validate_setting("EMOTE_FETCH_TIMEOUT_SECS", "10").is_ok());
        assert!(validate_setting("EMOTE_FETCH_TIMEOUT_SECS", "0").is_err());
        assert!(validate_setting("EMOTE_FETCH_TIMEOUT_SECS", "ten").is_err());
        assert!(validate_setting("BIG_BLIND", "200").is_ok());
        assert!(validate_setting("BIG_BLIND", "-1").is_err());
        assert!(validate_setting("DISPLAY_MODE", "bb").is_ok());
        assert!(validate_setting("DISPLAY_MODE", "euro").is_err());
        assert!(validate_setting("IS_CRYPTO", "true").is_ok());
        assert!(validate_setting("IS_CRYPTO", "yes").is_err());
    }

    #[test]
    fn unknown_keys_pass() {
        assert!(validate_setting("SOMETHING_ELSE", "anything").is_ok());
    }
}
