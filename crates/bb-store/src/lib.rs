//! Durable JSON document store for Brett Bot.
//!
//! A single file holds everything the bot remembers: per-user roll
//! statistics, global counters, and Brettventures player records. Every
//! operation reads the whole document and every change rewrites it
//! atomically (temp file plus rename), so a reader never sees a torn file.

pub mod document;
pub mod error;
pub mod player;
pub mod stats;
pub mod store;

pub use document::{Document, SCHEMA_VERSION};
pub use error::{StoreError, StoreResult};
pub use player::{PlayerDefaults, PlayerRecord};
pub use stats::{GlobalStats, UserStats};
pub use store::JsonStore;
