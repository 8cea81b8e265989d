//! Brettventures player records.
//!
//! A record is created the first time a user starts an adventure and is
//! mutated in place afterwards. Fields this crate does not know about are
//! kept in `extra` so older or newer writers never lose each other's data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Values used when a record is created for a previously unseen id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerDefaults {
    /// Starting (and maximum) hit points.
    pub hp_max: i32,
    /// Stamina capacity.
    pub stamina_max: u32,
    /// Stamina on creation. Clamped to `stamina_max`.
    pub stamina_start: u32,
}

impl Default for PlayerDefaults {
    fn default() -> Self {
        Self {
            hp_max: 10,
            stamina_max: 5,
            stamina_start: 5,
        }
    }
}

/// Persisted state for one adventurer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerRecord {
    /// Externally assigned, stable user id.
    pub user_id: String,
    /// Display name captured at creation.
    pub name: String,
    /// Character level, starting at 1.
    pub level: u32,
    /// Experience toward the next level.
    pub xp: u32,
    /// Current hit points.
    pub hp: i32,
    /// Maximum hit points.
    pub hp_max: i32,
    /// Current stamina.
    pub stamina: u32,
    /// Stamina capacity, at least 1.
    pub stamina_max: u32,
    /// Unix seconds up to which stamina regeneration has been credited.
    pub stamina_last_tick: i64,
    /// Power.
    pub pow: i32,
    /// Smarts.
    pub smt: i32,
    /// Luck.
    pub luck: i32,
    /// Gold carried.
    pub gold: u64,
    /// Fields written by other versions of the bot.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for PlayerRecord {
    fn default() -> Self {
        let defaults = PlayerDefaults::default();
        Self {
            user_id: String::new(),
            name: String::new(),
            level: 1,
            xp: 0,
            hp: defaults.hp_max,
            hp_max: defaults.hp_max,
            stamina: defaults.stamina_start,
            stamina_max: defaults.stamina_max,
            stamina_last_tick: 0,
            pow: 0,
            smt: 0,
            luck: 0,
            gold: 0,
            extra: Map::new(),
        }
    }
}

impl PlayerRecord {
    /// Create a fresh level-1 record whose regeneration clock starts at `now`.
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        defaults: &PlayerDefaults,
        now: i64,
    ) -> Self {
        let stamina_max = defaults.stamina_max.max(1);
        let hp_max = defaults.hp_max.max(1);
        Self {
            user_id: user_id.into(),
            name: name.into(),
            hp: hp_max,
            hp_max,
            stamina: defaults.stamina_start.min(stamina_max),
            stamina_max,
            stamina_last_tick: now,
            ..Self::default()
        }
    }

    /// Returns true if stamina is at capacity.
    pub fn is_stamina_full(&self) -> bool {
        self.stamina >= self.stamina_max
    }

    /// Pull out-of-range values written by older versions back into range.
    /// Returns true if anything changed.
    pub fn normalize(&mut self) -> bool {
        let before = (self.level, self.hp, self.stamina, self.stamina_max);
        self.level = self.level.max(1);
        self.stamina_max = self.stamina_max.max(1);
        self.stamina = self.stamina.min(self.stamina_max);
        self.hp = self.hp.min(self.hp_max);
        before != (self.level, self.hp, self.stamina, self.stamina_max)
    }
}

impl std::fmt::Display for PlayerRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (Lv {}) HP {}/{} STA {}/{}",
            self.name, self.level, self.hp, self.hp_max, self.stamina, self.stamina_max
        )
    }
}
