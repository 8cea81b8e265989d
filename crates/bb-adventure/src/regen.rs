//! Lazy stamina regeneration.
//!
//! There is no timer. Each record stores the instant up to which
//! regeneration has been credited, and whenever the record is observed the
//! whole intervals elapsed since then are converted into points. The stored
//! instant only ever moves by whole intervals while points are owed, so a
//! partial interval is never lost to rounding and the cadence never drifts.
//!
//! A full pool accrues nothing: each observation at capacity moves the
//! stored instant up to "now", so the first point after a spend arrives one
//! full interval after the spend rather than immediately.

use bb_store::PlayerRecord;
use tracing::trace;

/// A resource counter that refills one point per interval up to a cap.
pub trait Regenerating {
    /// Current amount.
    fn resource(&self) -> u32;
    /// Capacity.
    fn resource_max(&self) -> u32;
    /// Unix seconds up to which regeneration has been credited.
    fn last_tick(&self) -> i64;
    /// Overwrite the current amount.
    fn set_resource(&mut self, value: u32);
    /// Overwrite the credited-until instant.
    fn set_last_tick(&mut self, at: i64);
}

impl Regenerating for PlayerRecord {
    fn resource(&self) -> u32 {
        self.stamina
    }

    fn resource_max(&self) -> u32 {
        self.stamina_max
    }

    fn last_tick(&self) -> i64 {
        self.stamina_last_tick
    }

    fn set_resource(&mut self, value: u32) {
        self.stamina = value;
    }

    fn set_last_tick(&mut self, at: i64) {
        self.stamina_last_tick = at;
    }
}

/// Credit every whole interval elapsed since the record's last tick.
///
/// Returns the number of points applied. An `interval_secs <= 0` disables
/// regeneration. Time running backwards credits nothing and never moves the
/// stored instant back.
pub fn tick<R: Regenerating + ?Sized>(record: &mut R, now: i64, interval_secs: i64) -> u32 {
    if interval_secs <= 0 {
        return 0;
    }

    let resource = record.resource();
    let max = record.resource_max();
    let last = record.last_tick();

    if resource >= max {
        record.set_last_tick(now.max(last));
        return 0;
    }

    let elapsed = now.saturating_sub(last).max(0);
    if elapsed < interval_secs {
        return 0;
    }

    let ticks = elapsed / interval_secs;
    let applied = ticks.min(i64::from(max - resource));

    if applied > 0 {
        // applied <= max - resource, so it fits in u32.
        record.set_resource(resource + applied as u32);
        record.set_last_tick(last + applied * interval_secs);
        trace!(applied, resource = record.resource(), "stamina regenerated");
    } else if ticks > 0 {
        record.set_last_tick(now);
    }

    applied as u32
}

/// Seconds until the next point, or `None` if the pool is full or
/// regeneration is disabled.
///
/// Reconciles due points first. `Some(0)` means a point is ready now, which
/// only happens if the clock moved between reconciliation and the query.
pub fn eta_seconds<R: Regenerating + ?Sized>(
    record: &mut R,
    now: i64,
    interval_secs: i64,
) -> Option<i64> {
    if interval_secs <= 0 || record.resource() >= record.resource_max() {
        return None;
    }

    tick(record, now, interval_secs);
    if record.resource() >= record.resource_max() {
        return None;
    }

    let due = record.last_tick().saturating_add(interval_secs);
    Some(due.saturating_sub(now).max(0))
}
