use chrono::Duration;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{AppError, AppResult};

static DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(\d+)\s*(minutes?|mins?|hours?|hrs?|seconds?|secs?|m|h|s)?\s*$")
        .expect("DURATION_RE is a valid regex pattern")
});

/// Normalize a free-form duration spec ("60 minutes", "1 hour", "45m",
/// bare "30") into a `Duration`. A bare number means minutes.
pub fn parse_duration(spec: &str) -> AppResult<Duration> {
    let caps = DURATION_RE.captures(spec).ok_or_else(|| {
        AppError::ValidationError(format!("Unrecognized duration spec '{}'", spec))
    })?;

    let value: i64 = caps[1]
        .parse()
        .map_err(|_| AppError::ValidationError(format!("Duration value out of range in '{}'", spec)))?;

    if value == 0 {
        return Err(AppError::ValidationError(format!(
            "Duration must be positive: '{}'",
            spec
        )));
    }

    let unit = caps
        .get(2)
        .map(|m| m.as_str().to_ascii_lowercase())
        .unwrap_or_else(|| "m".to_string());

    let duration = match unit.as_bytes()[0] {
        b'h' => Duration::hours(value),
        b's' => Duration::seconds(value),
        _ => Duration::minutes(value),
    };

    Ok(duration)
}
