//! Number-to-string helpers shared by every display mode.

/// Fixed-point string with ties rounded away from zero.
pub(crate) fn to_fixed(value: f64, decimals: u32) -> String {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    format!("{rounded:.prec$}", prec = decimals as usize)
}

/// Drop a trailing `.0`, so `2.0` reads `2` but `2.5` stays.
pub(crate) fn trim_zero_decimal(s: String) -> String {
    match s.strip_suffix(".0") {
        Some(trimmed) => trimmed.to_string(),
        None => s,
    }
}

/// Abbreviate with `K`/`M` suffixes.
///
/// - `>= 1,000,000`: millions, no decimals from 10M up, else one decimal
/// - `>= 100,000`: whole thousands, rolling over to `1M` when rounding hits 1000K
/// - `>= 1,000`: thousands with one decimal
/// - below: one decimal
///
/// A trailing `.0` is always dropped.
pub fn format_compact(value: f64) -> String {
    if value >= 1_000_000.0 {
        let millions = value / 1_000_000.0;
        let digits = if millions >= 10.0 { 0 } else { 1 };
        return format!("{}M", trim_zero_decimal(to_fixed(millions, digits)));
    }
    if value >= 100_000.0 {
        let thousands = (value / 1_000.0).round();
        if thousands >= 1_000.0 {
            return format_compact(thousands * 1_000.0);
        }
        return format!("{}K", to_fixed(thousands, 0));
    }
    if value >= 1_000.0 {
        return format!("{}K", trim_zero_decimal(to_fixed(value / 1_000.0, 1)));
    }
    trim_zero_decimal(to_fixed(value, 1))
}

/// Integer with `,` thousands separators.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// US dollar string with two decimals, e.g. `$1,234.50`.
pub fn format_usd(dollars: f64) -> String {
    let fixed = to_fixed(dollars, 2);
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let whole = whole.parse::<u64>().map(group_thousands).unwrap_or_else(|_| whole.to_string());
    format!("${whole}.{cents}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_fixed_rounds_ties_up() {
        assert_eq!(to_fixed(1.25, 1), "1.3");
        assert_eq!(to_fixed(0.25, 1), "0.3");
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(12.5, 2), "12.50");
    }

    #[test]
    fn compact_boundaries() {
        assert_eq!(format_compact(0.0), "0");
        assert_eq!(format_compact(999.0), "999");
        assert_eq!(format_compact(12.34), "12.3");
        assert_eq!(format_compact(1_000.0), "1K");
        assert_eq!(format_compact(1_250.0), "1.3K");
        assert_eq!(format_compact(15_000.0), "15K");
        assert_eq!(format_compact(99_999.0), "100K");
        assert_eq!(format_compact(100_000.0), "100K");
        assert_eq!(format_compact(123_456.0), "123K");
        assert_eq!(format_compact(999_499.0), "999K");
        assert_eq!(format_compact(999_500.0), "1M");
        assert_eq!(format_compact(1_000_000.0), "1M");
        assert_eq!(format_compact(1_500_000.0), "1.5M");
        assert_eq!(format_compact(9_990_000.0), "10M");
        assert_eq!(format_compact(12_345_678.0), "12M");
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(99_999), "99,999");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn usd_currency() {
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(1.5), "$1.50");
        assert_eq!(format_usd(9.999), "$10.00");
        assert_eq!(format_usd(1234.5), "$1,234.50");
    }
}
