use chrono::{DateTime, Utc};

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// One decimal place, as shown for leaderboard times and answer lengths.
#[must_use]
pub fn format_one_decimal(value: f64) -> String {
    format!("{value:.1}")
}

/// Whole seconds, truncated.
#[must_use]
pub fn whole_secs(secs: f64) -> u64 {
    if secs.is_finite() && secs > 0.0 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let whole = secs.trunc() as u64;
        whole
    } else {
        0
    }
}
