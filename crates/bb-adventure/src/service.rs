//! The adventure service: the operations command handlers call.
//!
//! Every operation is one load-reconcile-mutate-save cycle through
//! [`JsonStore::update`]. Regeneration is reconciled before any rule is
//! checked, and a failed rule (not enough stamina, unknown player) writes
//! nothing at all.

use std::str::FromStr;
use std::sync::Arc;

use bb_store::{JsonStore, PlayerRecord};
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::config::AdventureConfig;
use crate::error::{AdventureError, AdventureResult};
use crate::regen::{eta_seconds, tick};

/// A stat that training can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainStat {
    /// Power.
    Pow,
    /// Smarts.
    Smt,
}

impl TrainStat {
    /// The stat trained when none is named: POW on odd levels, SMT on even ones.
    pub fn for_level(level: u32) -> Self {
        if level % 2 == 1 { Self::Pow } else { Self::Smt }
    }
}

impl FromStr for TrainStat {
    type Err = AdventureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pow" => Ok(Self::Pow),
            "smt" => Ok(Self::Smt),
            _ => Err(AdventureError::InvalidStat(s.to_string())),
        }
    }
}

impl std::fmt::Display for TrainStat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pow => write!(f, "POW"),
            Self::Smt => write!(f, "SMT"),
        }
    }
}

/// Result of granting XP.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelUp {
    /// The player after XP and any level-ups were applied.
    pub player: PlayerRecord,
    /// How many levels were gained.
    pub levels_gained: u32,
}

/// What an exploration turned up. Picking one is up to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Encounter {
    /// XP granted, run through the level curve.
    pub xp: u32,
    /// Gold found.
    pub gold: u64,
    /// HP change. The result is kept within `1..=hp_max`.
    pub hp_delta: i32,
    /// POW change.
    pub pow: i32,
    /// SMT change.
    pub smt: i32,
}

/// Brettventures operations over a shared store.
#[derive(Debug)]
pub struct Adventure<C: Clock = SystemClock> {
    store: Arc<JsonStore>,
    config: AdventureConfig,
    clock: C,
}

impl Adventure<SystemClock> {
    /// Create a service using wall-clock time.
    pub fn with_system_clock(store: Arc<JsonStore>, config: AdventureConfig) -> Self {
        Self::new(store, config, SystemClock)
    }
}

impl<C: Clock> Adventure<C> {
    /// Create a service reading time from `clock`.
    pub fn new(store: Arc<JsonStore>, config: AdventureConfig, clock: C) -> Self {
        Self {
            store,
            config,
            clock,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &AdventureConfig {
        &self.config
    }

    /// The clock this service reads.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// The underlying store.
    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    /// Return the player for `id`, creating a fresh character on first contact.
    pub fn get_or_create_player(
        &self,
        id: &str,
        display_name: &str,
    ) -> AdventureResult<PlayerRecord> {
        let now = self.clock.now();
        let defaults = self.config.player_defaults();
        let interval = self.config.regen_interval_secs;

        self.store.update(|doc| {
            let created = doc.player(id).is_none();
            let player = doc.player_or_insert(id, display_name, &defaults, now);
            if created {
                info!(user = id, name = display_name, "new adventurer");
            } else {
                tick(player, now, interval);
            }
            Ok(player.clone())
        })
    }

    /// Return the reconciled player for `id`, or `None` if they never started.
    pub fn get_player(&self, id: &str) -> AdventureResult<Option<PlayerRecord>> {
        let now = self.clock.now();
        let interval = self.config.regen_interval_secs;

        self.store.update(|doc| {
            Ok(doc.player_mut(id).map(|player| {
                tick(player, now, interval);
                player.clone()
            }))
        })
    }

    /// The reconciled player for `id` and the seconds until their next
    /// stamina point, read in one store cycle.
    pub fn get_player_with_eta(
        &self,
        id: &str,
    ) -> AdventureResult<Option<(PlayerRecord, Option<i64>)>> {
        let now = self.clock.now();
        let interval = self.config.regen_interval_secs;

        self.store.update(|doc| {
            Ok(doc.player_mut(id).map(|player| {
                tick(player, now, interval);
                let eta = eta_seconds(player, now, interval);
                (player.clone(), eta)
            }))
        })
    }

    /// Spend `amount` stamina.
    pub fn spend_stamina(&self, id: &str, amount: u32) -> AdventureResult<PlayerRecord> {
        self.with_player(id, |player, _| {
            take_stamina(player, amount)?;
            debug!(user = id, amount, left = player.stamina, "stamina spent");
            Ok(player.clone())
        })
    }

    /// Seconds until the next stamina point, `None` when full.
    pub fn stamina_eta(&self, id: &str) -> AdventureResult<Option<i64>> {
        let now = self.clock.now();
        self.with_player(id, |player, cfg| {
            Ok(eta_seconds(player, now, cfg.regen_interval_secs))
        })
    }

    /// Grant XP, levelling up as many times as the XP covers.
    ///
    /// Reaching level `n + 1` consumes `xp_per_level * n` XP. Each level
    /// raises max HP by one and restores HP to full.
    pub fn add_xp(&self, id: &str, amount: u32) -> AdventureResult<LevelUp> {
        self.with_player(id, |player, cfg| {
            player.xp = player.xp.saturating_add(amount);
            let levels_gained = level_up(player, cfg);
            if levels_gained > 0 {
                info!(user = id, level = player.level, "level up");
            }
            Ok(LevelUp {
                player: player.clone(),
                levels_gained,
            })
        })
    }

    /// Spend `explore_cost` stamina and apply `encounter`.
    ///
    /// Gold, HP and stat changes land before the XP, so a level-up during
    /// exploration still ends with full HP.
    pub fn explore(&self, id: &str, encounter: Encounter) -> AdventureResult<LevelUp> {
        self.with_player(id, |player, cfg| {
            take_stamina(player, cfg.explore_cost)?;

            player.gold = player.gold.saturating_add(encounter.gold);
            player.hp = player
                .hp
                .saturating_add(encounter.hp_delta)
                .clamp(1, player.hp_max.max(1));
            player.pow = player.pow.saturating_add(encounter.pow);
            player.smt = player.smt.saturating_add(encounter.smt);
            player.xp = player.xp.saturating_add(encounter.xp);

            let levels_gained = level_up(player, cfg);
            debug!(user = id, ?encounter, levels_gained, "explored");
            if levels_gained > 0 {
                info!(user = id, level = player.level, "level up");
            }
            Ok(LevelUp {
                player: player.clone(),
                levels_gained,
            })
        })
    }

    /// Spend stamina to raise POW or SMT by one.
    pub fn train(
        &self,
        id: &str,
        stat: Option<TrainStat>,
    ) -> AdventureResult<(TrainStat, PlayerRecord)> {
        self.with_player(id, |player, cfg| {
            let stat = stat.unwrap_or_else(|| TrainStat::for_level(player.level));
            take_stamina(player, cfg.train_cost)?;
            match stat {
                TrainStat::Pow => player.pow += 1,
                TrainStat::Smt => player.smt += 1,
            }
            Ok((stat, player.clone()))
        })
    }

    /// Run `f` on the reconciled record for `id` inside one store update.
    fn with_player<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut PlayerRecord, &AdventureConfig) -> AdventureResult<T>,
    ) -> AdventureResult<T> {
        let now = self.clock.now();
        self.store.update(|doc| {
            let player = doc
                .player_mut(id)
                .ok_or_else(|| AdventureError::RecordNotFound(id.to_string()))?;
            tick(player, now, self.config.regen_interval_secs);
            f(player, &self.config)
        })
    }
}

/// Convert banked XP into levels. Returns how many were gained.
fn level_up(player: &mut PlayerRecord, cfg: &AdventureConfig) -> u32 {
    let mut gained = 0;
    loop {
        let needed = cfg.xp_to_next(player.level);
        if needed == 0 || player.xp < needed {
            return gained;
        }
        player.xp -= needed;
        player.level += 1;
        player.hp_max += 1;
        player.hp = player.hp_max;
        gained += 1;
    }
}

fn take_stamina(player: &mut PlayerRecord, amount: u32) -> AdventureResult<()> {
    if player.stamina < amount {
        return Err(AdventureError::InsufficientStamina {
            needed: amount,
            available: player.stamina,
        });
    }
    player.stamina -= amount;
    Ok(())
}
