//! Chip amount display formatting.
//!
//! Converts integer chip counts into chips, big-blind or USDC strings for
//! the table UI, and converts user-entered display values back to chips.

mod numbers;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use numbers::{format_compact, format_usd, group_thousands};
use numbers::{to_fixed, trim_zero_decimal};

/// Fixed conversion rate between chips and USDC.
pub const CHIPS_PER_USDC: u64 = 100;

/// How chip amounts are shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    #[default]
    Chips,
    BigBlinds,
    Usdc,
}

impl DisplayMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chips => "chips",
            Self::BigBlinds => "big_blinds",
            Self::Usdc => "usdc",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayMode {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chips" => Ok(Self::Chips),
            "bb" | "big_blinds" | "bigblinds" => Ok(Self::BigBlinds),
            "usdc" => Ok(Self::Usdc),
            other => Err(AmountError::UnknownMode(other.to_string())),
        }
    }
}

/// Formatter error type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Unknown display mode: {0}")]
    UnknownMode(String),

    #[error("Invalid amount: {0}")]
    InvalidInput(String),
}

/// Mode actually used for display.
///
/// USDC needs a crypto table and big blinds need a non-zero blind; both
/// otherwise fall back to chips.
pub fn resolve_mode(requested: DisplayMode, big_blind: u64, is_crypto: bool) -> DisplayMode {
    match requested {
        DisplayMode::Usdc if !is_crypto => DisplayMode::Chips,
        DisplayMode::BigBlinds if big_blind == 0 => DisplayMode::Chips,
        mode => mode,
    }
}

/// Formats chip amounts for one table.
///
/// The effective mode is recomputed whenever the requested mode, big blind
/// or crypto flag changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountFormatter {
    requested: DisplayMode,
    mode: DisplayMode,
    big_blind: u64,
    is_crypto: bool,
}

impl Default for AmountFormatter {
    fn default() -> Self {
        Self::new(DisplayMode::Chips, 0, false)
    }
}

impl AmountFormatter {
    pub fn new(requested: DisplayMode, big_blind: u64, is_crypto: bool) -> Self {
        Self {
            requested,
            mode: resolve_mode(requested, big_blind, is_crypto),
            big_blind,
            is_crypto,
        }
    }

    /// Effective mode after fallback.
    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn requested_mode(&self) -> DisplayMode {
        self.requested
    }

    pub fn big_blind(&self) -> u64 {
        self.big_blind
    }

    pub fn is_crypto(&self) -> bool {
        self.is_crypto
    }

    pub fn set_requested_mode(&mut self, requested: DisplayMode) {
        self.requested = requested;
        self.resolve();
    }

    pub fn set_big_blind(&mut self, big_blind: u64) {
        self.big_blind = big_blind;
        self.resolve();
    }

    pub fn set_crypto(&mut self, is_crypto: bool) {
        self.is_crypto = is_crypto;
        self.resolve();
    }

    fn resolve(&mut self) {
        self.mode = resolve_mode(self.requested, self.big_blind, self.is_crypto);
    }

    /// Display string for a chip amount.
    pub fn format(&self, chips: u64) -> String {
        match self.mode {
            DisplayMode::Chips => format_chips(chips),
            DisplayMode::BigBlinds => format_big_blinds(chips as f64 / self.big_blind as f64),
            DisplayMode::Usdc => format_usdc(chips as f64 / CHIPS_PER_USDC as f64),
        }
    }

    /// Chip amount as a number in the active unit (chips, bb or dollars).
    pub fn from_chips(&self, chips: u64) -> f64 {
        match self.mode {
            DisplayMode::Chips => chips as f64,
            DisplayMode::BigBlinds => chips as f64 / self.big_blind as f64,
            DisplayMode::Usdc => chips as f64 / CHIPS_PER_USDC as f64,
        }
    }

    /// Chips for a value in the active unit. Negative or non-finite values give 0.
    pub fn to_chips(&self, value: f64) -> u64 {
        if !value.is_finite() || value <= 0.0 {
            return 0;
        }
        let chips = match self.mode {
            DisplayMode::Chips => value,
            DisplayMode::BigBlinds => value * self.big_blind as f64,
            DisplayMode::Usdc => value * CHIPS_PER_USDC as f64,
        };
        chips.round() as u64
    }

    /// Parse user-entered text in the active unit into chips.
    ///
    /// Accepts a leading `$`, `,`/`_` separators, a `bb` suffix and a
    /// `K`/`M` multiplier, e.g. `"$1,250.50"`, `"12.5bb"`, `"1.5k"`.
    pub fn parse_input(&self, input: &str) -> Result<u64, AmountError> {
        parse_display_value(input).map(|value| self.to_chips(value))
    }
}

fn format_chips(chips: u64) -> String {
    if chips >= 100_000 {
        format_compact(chips as f64)
    } else {
        group_thousands(chips)
    }
}

fn format_big_blinds(bb: f64) -> String {
    if bb >= 10_000.0 {
        format!("{}bb", format_compact(bb))
    } else if bb >= 100.0 {
        format!("{}bb", to_fixed(bb, 0))
    } else {
        format!("{}bb", trim_zero_decimal(to_fixed(bb, 1)))
    }
}

fn format_usdc(dollars: f64) -> String {
    if dollars >= 10_000.0 {
        return format!("${}", format_compact(dollars));
    }
    if dollars >= 100.0 {
        let whole = dollars.round();
        if whole >= 10_000.0 {
            return format!("${}", format_compact(whole));
        }
        return format!("${}", to_fixed(whole, 0));
    }
    if dollars >= 10.0 {
        return format!("${}", to_fixed(dollars, 2));
    }
    format_usd(dollars)
}

fn parse_display_value(input: &str) -> Result<f64, AmountError> {
    let invalid = || AmountError::InvalidInput(input.to_string());

    let cleaned: String = input
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| !matches!(c, ',' | '_') && !c.is_whitespace())
        .collect();
    let lower = cleaned.to_ascii_lowercase();
    let number = lower.strip_suffix("bb").unwrap_or(&lower);

    let (number, multiplier) = match number.chars().last() {
        Some('k') => (&number[..number.len() - 1], 1_000.0),
        Some('m') => (&number[..number.len() - 1], 1_000_000.0),
        _ => (number, 1.0),
    };
    if number.is_empty() {
        return Err(invalid());
    }

    let value: f64 = number.parse().map_err(|_| invalid())?;
    let value = value * multiplier;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid());
    }
    Ok(value)
}
