//! Roll statistics: global counters and per-user tallies with daily streaks.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Totals across every user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalStats {
    /// Number of rolls recorded.
    pub total: u64,
    /// Count per outcome name.
    pub outcomes: BTreeMap<String, u64>,
    /// Fields written by other versions of the bot.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GlobalStats {
    /// Count one roll of `outcome`.
    pub fn record(&mut self, outcome: &str) {
        self.total += 1;
        *self.outcomes.entry(outcome.to_string()).or_insert(0) += 1;
    }

    /// How many times `outcome` was rolled.
    pub fn count(&self, outcome: &str) -> u64 {
        self.outcomes.get(outcome).copied().unwrap_or(0)
    }
}

/// One user's roll history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserStats {
    /// Number of rolls recorded.
    pub total: u64,
    /// Count per outcome name.
    pub outcomes: BTreeMap<String, u64>,
    /// Calendar day of the most recent roll.
    pub last_roll_date: Option<NaiveDate>,
    /// Consecutive days with at least one roll, ending at `last_roll_date`.
    pub streak_days: u32,
    /// Fields written by other versions of the bot.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserStats {
    /// Count one roll of `outcome` made on `today` and advance the streak.
    pub fn record(&mut self, outcome: &str, today: NaiveDate) {
        self.total += 1;
        *self.outcomes.entry(outcome.to_string()).or_insert(0) += 1;

        self.streak_days = match self.last_roll_date {
            // Same day, or the clock moved backwards.
            Some(last) if today <= last => self.streak_days.max(1),
            Some(last) if last.succ_opt() == Some(today) => self.streak_days + 1,
            _ => 1,
        };
        if self.last_roll_date.is_none_or(|last| today > last) {
            self.last_roll_date = Some(today);
        }
    }

    /// How many times `outcome` was rolled.
    pub fn count(&self, outcome: &str) -> u64 {
        self.outcomes.get(outcome).copied().unwrap_or(0)
    }

    /// Percentage (0.0 to 100.0) of rolls that landed on `outcome`.
    pub fn share(&self, outcome: &str) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        100.0 * self.count(outcome) as f64 / self.total as f64
    }

    /// The most frequent outcome, ties broken alphabetically. `None` if nothing was rolled.
    pub fn most_rolled(&self) -> Option<(&str, u64)> {
        self.outcomes
            .iter()
            .filter(|(_, c)| **c > 0)
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(name, c)| (name.as_str(), *c))
    }
}
