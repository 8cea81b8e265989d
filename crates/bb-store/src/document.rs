//! The persisted document: every namespace the bot stores, in one container.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::player::{PlayerDefaults, PlayerRecord};
use crate::stats::{GlobalStats, UserStats};

/// Current on-disk schema version. Files without a version are treated as 0.
pub const SCHEMA_VERSION: u32 = 1;

/// Everything the bot persists.
///
/// The document is the single source of truth: callers load it, mutate it,
/// and save it back whole. Unknown top-level keys are preserved in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Schema version this document was written with.
    #[serde(default)]
    pub version: u32,
    /// Roll totals across all users.
    #[serde(default)]
    pub global: GlobalStats,
    /// Roll statistics keyed by user id.
    #[serde(default)]
    pub users: BTreeMap<String, UserStats>,
    /// Brettventures records keyed by user id.
    #[serde(default)]
    pub players: BTreeMap<String, PlayerRecord>,
    /// Namespaces written by other versions of the bot.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document at the current schema version.
    pub fn new() -> Self {
        Self {
            version: SCHEMA_VERSION,
            global: GlobalStats::default(),
            users: BTreeMap::new(),
            players: BTreeMap::new(),
            extra: Map::new(),
        }
    }

    /// Bring a document written by an older version up to date.
    /// Returns true if anything changed.
    pub fn migrate(&mut self) -> bool {
        let mut changed = false;
        if self.version < SCHEMA_VERSION {
            self.version = SCHEMA_VERSION;
            changed = true;
        }
        for (id, player) in &mut self.players {
            if player.user_id.is_empty() {
                player.user_id = id.clone();
                changed = true;
            }
            changed |= player.normalize();
        }
        changed
    }

    // -- players --

    /// Look up a player record.
    pub fn player(&self, id: &str) -> Option<&PlayerRecord> {
        self.players.get(id)
    }

    /// Look up a player record for mutation.
    pub fn player_mut(&mut self, id: &str) -> Option<&mut PlayerRecord> {
        self.players.get_mut(id)
    }

    /// Return the existing record for `id`, or insert one built from `defaults`.
    pub fn player_or_insert(
        &mut self,
        id: &str,
        name: &str,
        defaults: &PlayerDefaults,
        now: i64,
    ) -> &mut PlayerRecord {
        self.players
            .entry(id.to_string())
            .or_insert_with(|| PlayerRecord::new(id, name, defaults, now))
    }

    // -- roll stats --

    /// Look up a user's roll statistics.
    pub fn user_stats(&self, id: &str) -> Option<&UserStats> {
        self.users.get(id)
    }

    /// Record one roll of `outcome` for `user_id`, updating global and user totals.
    pub fn record_roll(&mut self, user_id: &str, outcome: &str, today: NaiveDate) -> &UserStats {
        self.global.record(outcome);
        let user = self.users.entry(user_id.to_string()).or_default();
        user.record(outcome, today);
        user
    }

    /// Users with the most rolls, highest first, ties broken by id.
    pub fn leaderboard(&self, limit: usize) -> Vec<(&str, u64)> {
        let mut rows: Vec<(&str, u64)> = self
            .users
            .iter()
            .map(|(id, u)| (id.as_str(), u.total))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        rows.truncate(limit);
        rows
    }

    /// Replace one user's roll statistics with blank ones.
    /// Returns false if the user had none.
    pub fn reset_user_stats(&mut self, id: &str) -> bool {
        self.users
            .insert(id.to_string(), UserStats::default())
            .is_some()
    }

    /// Clear all roll statistics. Player records are kept.
    pub fn reset_stats(&mut self) {
        self.global = GlobalStats::default();
        self.users.clear();
    }
}
