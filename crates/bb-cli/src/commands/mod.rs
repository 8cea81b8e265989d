pub mod adventure;
pub mod roll;
pub mod stats;

use std::sync::Arc;

use bb_adventure::{Adventure, AdventureConfig, ManualClock};
use bb_store::JsonStore;
use chrono::{DateTime, NaiveDate};

/// Shared state for one invocation.
pub struct Context {
    pub store: Arc<JsonStore>,
    /// Unix seconds, fixed for the whole invocation.
    pub now: i64,
}

impl Context {
    pub fn adventure(&self) -> Adventure<ManualClock> {
        Adventure::new(
            Arc::clone(&self.store),
            AdventureConfig::from_env(),
            ManualClock::new(self.now),
        )
    }

    /// Calendar day (UTC) used for roll streaks.
    pub fn today(&self) -> Result<NaiveDate, String> {
        DateTime::from_timestamp(self.now, 0)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| format!("timestamp out of range: {}", self.now))
    }
}

/// A fixed-width bar like `███████░░░░░`.
pub fn format_bar(value: i64, max: i64, width: usize) -> String {
    let ratio = (value as f64 / max.max(1) as f64).clamp(0.0, 1.0);
    let filled = (width as f64 * ratio).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Short stamina ETA for status lines.
pub fn format_eta(eta: Option<i64>) -> String {
    match eta {
        None => "Full".to_string(),
        Some(0) => "+1 ready".to_string(),
        Some(secs) => format!("+1 in {}h {:02}m", secs / 3600, (secs % 3600) / 60),
    }
}

/// `1h 05m 09s`
pub fn format_countdown(secs: i64) -> String {
    format!(
        "{}h {:02}m {:02}s",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

pub fn plural(n: u64) -> &'static str {
    if n == 1 { "" } else { "s" }
}
