//! Timeframe aliases and default history depth.

/// Timeframe used when the input is not recognized.
pub const DEFAULT_TIMEFRAME: &str = "15m";

const ALIASES: [(&str, &str); 17] = [
    ("1m", "1m"),
    ("3m", "3m"),
    ("5m", "5m"),
    ("15m", "15m"),
    ("30m", "30m"),
    ("1h", "1h"),
    ("2h", "2h"),
    ("4h", "4h"),
    ("6h", "6h"),
    ("8h", "8h"),
    ("12h", "12h"),
    ("1d", "1d"),
    ("3d", "3d"),
    ("1w", "1w"),
    ("1mo", "1M"),
    ("1mth", "1M"),
    ("1month", "1M"),
];

/// Canonical timeframe for a user-supplied alias (case-insensitive).
pub fn normalize_timeframe(raw: &str) -> &'static str {
    let key = raw.trim().to_ascii_lowercase();
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(DEFAULT_TIMEFRAME)
}

/// Bars of history to request for a timeframe.
pub fn lookback_bars(timeframe: &str) -> usize {
    match timeframe {
        "15m" => 2000,
        _ => 1200,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_normalize() {
        assert_eq!(normalize_timeframe("1H"), "1h");
        assert_eq!(normalize_timeframe(" 1Month "), "1M");
        assert_eq!(normalize_timeframe("1M"), "1m");
        assert_eq!(normalize_timeframe("7x"), "15m");
        assert_eq!(normalize_timeframe(""), "15m");
    }

    #[test]
    fn lookback_depends_on_timeframe() {
        assert_eq!(lookback_bars("15m"), 2000);
        assert_eq!(lookback_bars("1h"), 1200);
        assert_eq!(lookback_bars("1d"), 1200);
    }
}
