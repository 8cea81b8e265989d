//! Configuration for the adventure mini-game.

use std::str::FromStr;

use bb_store::PlayerDefaults;
use tracing::warn;

/// Environment variable holding the stamina regeneration interval in seconds.
pub const ENV_REGEN_SECS: &str = "BV_STAMINA_REGEN_SECS";
/// Environment variable holding the stamina capacity for new players.
pub const ENV_STAMINA_MAX: &str = "BV_STAMINA_MAX";
/// Environment variable holding the stamina new players start with.
pub const ENV_STAMINA_START: &str = "BV_STAMINA_START";

/// Tunables for Brettventures.
///
/// Changing `regen_interval_secs` applies retroactively: stored tick
/// timestamps are never rewritten, so the ETA of existing records is simply
/// measured against the new interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdventureConfig {
    /// Seconds for one stamina point to regenerate. `<= 0` disables regeneration.
    pub regen_interval_secs: i64,
    /// Stamina capacity for new players.
    pub stamina_max: u32,
    /// Stamina new players start with (clamped to `stamina_max`).
    pub stamina_start: u32,
    /// Hit points for new players.
    pub hp_max: i32,
    /// Stamina spent per training session.
    pub train_cost: u32,
    /// Stamina spent per exploration.
    pub explore_cost: u32,
    /// XP needed per level: reaching level `n + 1` costs `xp_per_level * n`.
    pub xp_per_level: u32,
}

impl Default for AdventureConfig {
    fn default() -> Self {
        Self {
            regen_interval_secs: 3 * 60 * 60,
            stamina_max: 5,
            stamina_start: 5,
            hp_max: 10,
            train_cost: 2,
            explore_cost: 1,
            xp_per_level: 10,
        }
    }
}

impl AdventureConfig {
    /// Defaults overridden by `BV_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the `BV_*` keys.
    /// Values that fail to parse are ignored with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        if let Some(v) = parse_var(&lookup, ENV_REGEN_SECS) {
            cfg.regen_interval_secs = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_STAMINA_MAX) {
            cfg = cfg.with_stamina_max(v);
        }
        if let Some(v) = parse_var(&lookup, ENV_STAMINA_START) {
            cfg = cfg.with_stamina_start(v);
        }
        cfg
    }

    /// Set the regeneration interval in seconds.
    pub fn with_regen_interval(mut self, secs: i64) -> Self {
        self.regen_interval_secs = secs;
        self
    }

    /// Set the stamina capacity (at least 1). Also lowers the starting value if needed.
    pub fn with_stamina_max(mut self, max: u32) -> Self {
        self.stamina_max = max.max(1);
        self.stamina_start = self.stamina_start.min(self.stamina_max);
        self
    }

    /// Set the starting stamina (clamped to the capacity).
    pub fn with_stamina_start(mut self, start: u32) -> Self {
        self.stamina_start = start.min(self.stamina_max);
        self
    }

    /// Set the stamina cost of training.
    pub fn with_train_cost(mut self, cost: u32) -> Self {
        self.train_cost = cost;
        self
    }

    /// Set the stamina cost of exploring.
    pub fn with_explore_cost(mut self, cost: u32) -> Self {
        self.explore_cost = cost;
        self
    }

    /// XP needed to advance from `level` to the next one. Saturates.
    pub fn xp_to_next(&self, level: u32) -> u32 {
        self.xp_per_level.saturating_mul(level)
    }

    /// Values used for newly created player records.
    pub fn player_defaults(&self) -> PlayerDefaults {
        PlayerDefaults {
            hp_max: self.hp_max,
            stamina_max: self.stamina_max,
            stamina_start: self.stamina_start,
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparsable configuration value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config() {
        let cfg = AdventureConfig::default();
        assert_eq!(cfg.regen_interval_secs, 10_800);
        assert_eq!(cfg.stamina_max, 5);
        assert_eq!(cfg.stamina_start, 5);
        assert_eq!(cfg.train_cost, 2);
        assert_eq!(cfg.explore_cost, 1);
    }

    #[test]
    fn builder_methods() {
        let cfg = AdventureConfig::default()
            .with_regen_interval(60)
            .with_stamina_max(8)
            .with_stamina_start(3)
            .with_train_cost(1)
            .with_explore_cost(3);
        assert_eq!(cfg.regen_interval_secs, 60);
        assert_eq!(cfg.stamina_max, 8);
        assert_eq!(cfg.stamina_start, 3);
        assert_eq!(cfg.train_cost, 1);
        assert_eq!(cfg.explore_cost, 3);
    }

    #[test]
    fn stamina_values_clamped() {
        let cfg = AdventureConfig::default().with_stamina_max(0);
        assert_eq!(cfg.stamina_max, 1);
        assert_eq!(cfg.stamina_start, 1);
        let cfg = AdventureConfig::default().with_stamina_start(99);
        assert_eq!(cfg.stamina_start, 5);
    }

    #[test]
    fn xp_curve_saturates() {
        let cfg = AdventureConfig::default();
        assert_eq!(cfg.xp_to_next(1), 10);
        assert_eq!(cfg.xp_to_next(7), 70);
        assert_eq!(cfg.xp_to_next(u32::MAX), u32::MAX);
    }

    #[test]
    fn from_lookup_overrides() {
        let cfg = AdventureConfig::from_lookup(lookup(&[
            (ENV_REGEN_SECS, "21600"),
            (ENV_STAMINA_MAX, "10"),
            (ENV_STAMINA_START, " 4 "),
        ]));
        assert_eq!(cfg.regen_interval_secs, 21_600);
        assert_eq!(cfg.stamina_max, 10);
        assert_eq!(cfg.stamina_start, 4);
    }

    #[test]
    fn from_lookup_ignores_garbage() {
        let cfg = AdventureConfig::from_lookup(lookup(&[(ENV_REGEN_SECS, "three hours")]));
        assert_eq!(cfg, AdventureConfig::default());
    }

    #[test]
    fn player_defaults() {
        let d = AdventureConfig::default()
            .with_stamina_start(2)
            .player_defaults();
        assert_eq!(d.stamina_start, 2);
        assert_eq!(d.stamina_max, 5);
        assert_eq!(d.hp_max, 10);
    }
}
