//! Backup (alternate) generation for allocated slots.
//!
//! For each slot, the pool is every admitted, well-formed session of the
//! same day, other than the slot's primary, whose true window overlaps
//! the slot's true window. The pool is ranked with the allocator's order
//! and cut at `max(min_backup_sessions, backup_pool_size)`.
//!
//! The overlap window is never widened to find more alternates; a short
//! pool is recorded as the slot's shortfall.

use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::config::PlannerConfig;
use crate::models::{Schedule, Session, Slot};
use crate::validation::screen;

/// Fills ranked backup lists on an allocated schedule.
#[derive(Debug, Clone, Copy)]
pub struct BackupGenerator<'a> {
    config: &'a PlannerConfig,
}

impl<'a> BackupGenerator<'a> {
    /// Creates a generator for the given configuration.
    pub fn new(config: &'a PlannerConfig) -> Self {
        Self { config }
    }

    /// Fills the backup list and shortfall of every slot.
    ///
    /// Only backup lists and shortfalls change; primaries and slot order
    /// are left as allocated. Any existing backups are replaced.
    pub fn fill_backups(&self, mut schedule: Schedule, candidates: &[Session]) -> Schedule {
        let pool = self.ranked_pool_by_day(candidates);
        let target = self.config.backup_target();
        let minimum = self.config.min_backup_sessions;

        for slot in schedule.slots_mut() {
            let day_pool = pool.get(&slot.day).map(Vec::as_slice).unwrap_or(&[]);
            slot.backups = select_backups(slot, day_pool, target);
            slot.backup_shortfall = minimum.saturating_sub(slot.backups.len());

            if slot.is_under_provisioned() {
                warn!(
                    day = %slot.day,
                    primary = %slot.primary.id,
                    backups = slot.backups.len(),
                    required = minimum,
                    "Slot has insufficient backups"
                );
            } else {
                debug!(day = %slot.day, primary = %slot.primary.id, backups = slot.backups.len(), "Backups filled");
            }
        }

        let slots = schedule.slot_count();
        let under = schedule.slots().filter(|s| s.is_under_provisioned()).count();
        info!(
            backups = schedule.backup_count(),
            slots,
            under_provisioned = under,
            "Generated backup sessions"
        );

        schedule
    }

    /// Admitted, well-formed sessions grouped by day in ranking order.
    fn ranked_pool_by_day<'s>(&self, candidates: &'s [Session]) -> HashMap<NaiveDate, Vec<&'s Session>> {
        let mut by_day: HashMap<NaiveDate, Vec<&'s Session>> = HashMap::new();
        for session in screen(candidates, self.config).accepted {
            if self.config.admits(session) {
                by_day.entry(session.day).or_default().push(session);
            }
        }
        for sessions in by_day.values_mut() {
            sessions.sort_by(|a, b| a.rank_cmp(b));
        }
        by_day
    }
}

/// Takes the first `limit` pool sessions overlapping the slot's true window.
fn select_backups(slot: &Slot, ranked_pool: &[&Session], limit: usize) -> Vec<Session> {
    ranked_pool
        .iter()
        .filter(|s| s.id != slot.primary.id)
        .filter(|s| s.window().is_some_and(|w| w.overlaps(&slot.window)))
        .take(limit)
        .map(|&s| s.clone())
        .collect()
}
