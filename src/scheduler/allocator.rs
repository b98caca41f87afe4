//! Greedy, score-ordered slot allocator.
//!
//! # Algorithm
//!
//! 1. Screen input; malformed sessions are recorded and skipped.
//! 2. Partition admitted sessions by day.
//! 3. Sort each day by descending score, then start time, then ID.
//! 4. Single pass: accept a session as a new slot's primary iff it is
//!    outside the lunch window, conflicts with no accepted primary under
//!    the travel buffer, and the day is below its cap.
//!
//! # Complexity
//! O(n log n + n * k) per day, where k = daily cap.
//!
//! # Limitation
//! Greedy and non-backtracking: an early high-score acceptance is never
//! traded for two later non-conflicting sessions with a larger total.
//! Maximizing total score would be weighted interval scheduling solved by
//! dynamic programming over sorted windows.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::config::PlannerConfig;
use crate::conflict::{in_lunch_window, overlaps};
use crate::models::{DaySchedule, Schedule, Session, Slot};
use crate::validation::screen;

/// Why a candidate was not accepted as a primary.
#[derive(Debug, Clone, Copy)]
enum Rejection<'a> {
    Lunch,
    Conflict(&'a Session),
    DailyCap,
}

/// Greedy slot allocator.
///
/// # Example
///
/// ```
/// use chrono::{NaiveDate, NaiveTime};
/// use u_agenda::config::PlannerConfig;
/// use u_agenda::models::Session;
/// use u_agenda::scheduler::SlotAllocator;
///
/// let day = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
/// let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
/// let sessions = vec![
///     Session::new("A", day).with_times(t(9, 0), t(10, 30)).with_score(0.9),
///     Session::new("B", day).with_times(t(10, 40), t(12, 0)).with_score(0.7),
/// ];
///
/// let config = PlannerConfig::default();
/// let schedule = SlotAllocator::new(&config).allocate(&sessions);
/// assert_eq!(schedule.slot_count(), 1);
/// assert!(schedule.is_primary("A"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SlotAllocator<'a> {
    config: &'a PlannerConfig,
}

impl<'a> SlotAllocator<'a> {
    /// Creates an allocator for the given configuration.
    pub fn new(config: &'a PlannerConfig) -> Self {
        Self { config }
    }

    /// Allocates primaries for every conference day.
    ///
    /// Every conference day gets an entry, possibly with no slots.
    /// Backups are left empty; see `BackupGenerator`.
    pub fn allocate(&self, candidates: &[Session]) -> Schedule {
        let screening = screen(candidates, self.config);
        for issue in &screening.issues {
            warn!(session = %issue.session_id, kind = ?issue.kind, "Skipping malformed session: {}", issue.message);
        }

        let mut schedule = Schedule::for_days(&self.config.conference_days);
        schedule.skipped = screening.issues;

        for (day, mut day_candidates) in self.partition_by_day(&screening.accepted) {
            day_candidates.sort_by(|a, b| a.rank_cmp(b));
            if let Some(day_schedule) = schedule.days.get_mut(&day) {
                day_schedule.candidate_count = day_candidates.len();
                self.allocate_day(day_schedule, &day_candidates);
            }
        }

        for day_schedule in schedule.days.values() {
            if day_schedule.is_empty() {
                info!(day = %day_schedule.day, candidates = day_schedule.candidate_count, "No sessions allocated");
            } else {
                info!(
                    day = %day_schedule.day,
                    slots = day_schedule.slots.len(),
                    candidates = day_schedule.candidate_count,
                    "Allocated day"
                );
            }
        }

        schedule
    }

    /// Groups admitted sessions by day.
    fn partition_by_day<'s>(&self, sessions: &[&'s Session]) -> BTreeMap<NaiveDate, Vec<&'s Session>> {
        let mut by_day: BTreeMap<NaiveDate, Vec<&'s Session>> = BTreeMap::new();
        for &session in sessions {
            if self.config.admits(session) {
                by_day.entry(session.day).or_default().push(session);
            } else {
                debug!(session = %session.id, "Not admitted (ineligible, excluded venue or low score)");
            }
        }
        by_day
    }

    /// Single greedy pass over one day's ranked candidates.
    fn allocate_day(&self, day_schedule: &mut DaySchedule, ranked: &[&Session]) {
        let mut accepted: Vec<&Session> = Vec::new();

        for &candidate in ranked {
            match self.rejection(candidate, &accepted) {
                None => accepted.push(candidate),
                Some(Rejection::Lunch) => {
                    debug!(session = %candidate.id, "Rejected: overlaps lunch window");
                }
                Some(Rejection::Conflict(with)) => {
                    debug!(session = %candidate.id, with = %with.id, "Rejected: conflicts within travel buffer");
                }
                Some(Rejection::DailyCap) => {
                    debug!(session = %candidate.id, "Rejected: daily cap reached");
                }
            }
        }

        for primary in accepted {
            if let Some(slot) = Slot::for_primary(primary.clone()) {
                day_schedule.insert_slot(slot);
            }
        }
    }

    fn rejection<'s>(&self, candidate: &Session, accepted: &[&'s Session]) -> Option<Rejection<'s>> {
        let config = self.config;
        if in_lunch_window(candidate, config.lunch_start, config.lunch_end) {
            return Some(Rejection::Lunch);
        }
        if let Some(&other) = accepted
            .iter()
            .find(|other| overlaps(candidate, other, config.buffer_minutes))
        {
            return Some(Rejection::Conflict(other));
        }
        if accepted.len() >= config.max_sessions_per_day {
            return Some(Rejection::DailyCap);
        }
        None
    }
}
