//! Brettventures: the adventure mini-game behind Brett Bot.
//!
//! Provides lazy stamina regeneration (no background timer; elapsed time is
//! credited whenever a record is observed), XP and level-up rules, stat
//! training and exploration, and the [`Adventure`] service that runs each
//! operation as one load-reconcile-mutate-save cycle against a
//! [`bb_store::JsonStore`].

pub mod clock;
pub mod config;
pub mod error;
pub mod regen;
pub mod service;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::AdventureConfig;
pub use error::{AdventureError, AdventureResult};
pub use regen::{Regenerating, eta_seconds, tick};
pub use service::{Adventure, Encounter, LevelUp, TrainStat};
