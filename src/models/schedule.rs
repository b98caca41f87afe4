//! Schedule (solution) model.
//!
//! A schedule maps every conference day to its slots. Each slot holds
//! one primary session and a ranked list of backups. Sessions that
//! could not be considered at all (malformed input) are kept alongside
//! so reports can count them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Session, TimeWindow};
use crate::validation::SessionIssue;

/// A complete multi-day schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// One entry per conference day, in calendar order.
    pub days: BTreeMap<NaiveDate, DaySchedule>,
    /// Input sessions skipped as malformed.
    pub skipped: Vec<SessionIssue>,
}

/// The slots of a single day, ordered by start time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySchedule {
    /// Conference day.
    pub day: NaiveDate,
    /// Accepted slots, ordered by start time.
    pub slots: Vec<Slot>,
    /// Well-formed eligible candidates considered for this day.
    pub candidate_count: usize,
}

/// A day-scoped window occupied by one primary session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    /// Conference day.
    pub day: NaiveDate,
    /// True window of the primary (not buffer-extended).
    pub window: TimeWindow,
    /// Chosen session.
    pub primary: Session,
    /// Ranked alternates, in `Session::rank_cmp` order (descending score,
    /// then ascending start, then ascending id).
    pub backups: Vec<Session>,
    /// How many backups short of the configured minimum this slot is.
    pub backup_shortfall: usize,
}

impl Slot {
    /// Creates a slot for an accepted primary.
    ///
    /// Returns `None` if the session has no valid window.
    pub fn for_primary(primary: Session) -> Option<Self> {
        let window = primary.window()?;
        Some(Self {
            day: primary.day,
            window,
            primary,
            backups: Vec::new(),
            backup_shortfall: 0,
        })
    }

    /// Whether the slot has fewer backups than required.
    #[inline]
    pub fn is_under_provisioned(&self) -> bool {
        self.backup_shortfall > 0
    }

    /// Primary followed by backups.
    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        std::iter::once(&self.primary).chain(self.backups.iter())
    }
}

impl DaySchedule {
    /// Creates an empty day.
    pub fn new(day: NaiveDate) -> Self {
        Self {
            day,
            slots: Vec::new(),
            candidate_count: 0,
        }
    }

    /// Inserts a slot keeping start-time order.
    pub fn insert_slot(&mut self, slot: Slot) {
        let pos = self
            .slots
            .partition_point(|s| s.window.start_min <= slot.window.start_min);
        self.slots.insert(pos, slot);
    }

    /// Whether no slot was accepted on this day.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Primary sessions in start-time order.
    pub fn primaries(&self) -> impl Iterator<Item = &Session> {
        self.slots.iter().map(|s| &s.primary)
    }
}

impl Schedule {
    /// Creates a schedule with an empty entry for every given day.
    pub fn for_days<'a>(days: impl IntoIterator<Item = &'a NaiveDate>) -> Self {
        Self {
            days: days.into_iter().map(|d| (*d, DaySchedule::new(*d))).collect(),
            skipped: Vec::new(),
        }
    }

    /// Schedule for a given day.
    pub fn day(&self, day: &NaiveDate) -> Option<&DaySchedule> {
        self.days.get(day)
    }

    /// All slots across all days, in calendar then start-time order.
    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.days.values().flat_map(|d| d.slots.iter())
    }

    /// Mutable access to every slot.
    pub fn slots_mut(&mut self) -> impl Iterator<Item = &mut Slot> {
        self.days.values_mut().flat_map(|d| d.slots.iter_mut())
    }

    /// Number of slots (primaries) across all days.
    pub fn slot_count(&self) -> usize {
        self.days.values().map(|d| d.slots.len()).sum()
    }

    /// Number of backups across all slots.
    pub fn backup_count(&self) -> usize {
        self.slots().map(|s| s.backups.len()).sum()
    }

    /// Finds the slot whose primary has the given id.
    pub fn slot_for_primary(&self, session_id: &str) -> Option<&Slot> {
        self.slots().find(|s| s.primary.id == session_id)
    }

    /// Whether a session is the primary of any slot.
    pub fn is_primary(&self, session_id: &str) -> bool {
        self.slot_for_primary(session_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, day).unwrap()
    }

    fn session(id: &str, day: u32, start: (u32, u32), end: (u32, u32)) -> Session {
        Session::new(id, d(day)).with_times(
            NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
        )
    }

    fn sample_schedule() -> Schedule {
        let mut s = Schedule::for_days(&[d(2), d(1)]);
        let day1 = s.days.get_mut(&d(1)).unwrap();
        day1.insert_slot(Slot::for_primary(session("P2", 1, (14, 0), (15, 0))).unwrap());
        day1.insert_slot(Slot::for_primary(session("P1", 1, (9, 0), (10, 0))).unwrap());
        day1.slots[0].backups.push(session("B1", 1, (9, 30), (10, 30)));
        s
    }

    #[test]
    fn test_for_days_calendar_order() {
        let s = sample_schedule();
        let days: Vec<NaiveDate> = s.days.keys().copied().collect();
        assert_eq!(days, vec![d(1), d(2)]);
        assert!(s.day(&d(2)).unwrap().is_empty());
    }

    #[test]
    fn test_slots_ordered_by_start() {
        let s = sample_schedule();
        let ids: Vec<&str> = s.day(&d(1)).unwrap().primaries().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["P1", "P2"]);
    }

    #[test]
    fn test_counts_and_lookup() {
        let s = sample_schedule();
        assert_eq!(s.slot_count(), 2);
        assert_eq!(s.backup_count(), 1);
        assert!(s.is_primary("P2"));
        assert!(!s.is_primary("B1"));
        let slot = s.slot_for_primary("P1").unwrap();
        assert_eq!(slot.sessions().count(), 2);
    }

    #[test]
    fn test_slot_requires_window() {
        assert!(Slot::for_primary(Session::new("X", d(1))).is_none());
        let slot = Slot::for_primary(session("Y", 1, (9, 0), (10, 0))).unwrap();
        assert_eq!(slot.window, TimeWindow::new(540, 600));
        assert!(!slot.is_under_provisioned());
    }

    #[test]
    fn test_empty_schedule() {
        let s = Schedule::default();
        assert_eq!(s.slot_count(), 0);
        assert_eq!(s.backup_count(), 0);
        assert!(s.slots().next().is_none());
    }
}
