//! Time window model.
//!
//! All windows live on a single conference day and are measured in
//! minutes since midnight. Buffer-extended windows may reach below zero
//! or past 24:00; that is fine for comparison purposes.
//!
//! # Boundary semantics
//! Overlap is strict: two windows that merely touch (`a.end == b.start`)
//! do not overlap. A travel buffer of `b` minutes therefore requires a
//! gap of at least `b` minutes between consecutive sessions.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// A time interval on one day, in minutes since midnight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TimeWindow {
    /// Interval start (minutes since midnight).
    pub start_min: i64,
    /// Interval end (minutes since midnight).
    pub end_min: i64,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start_min: i64, end_min: i64) -> Self {
        Self { start_min, end_min }
    }

    /// Creates a window from wall-clock times.
    ///
    /// Seconds are truncated; sessions are minute-granular.
    pub fn from_times(start: NaiveTime, end: NaiveTime) -> Self {
        Self::new(minute_of_day(start), minute_of_day(end))
    }

    /// Duration of this window (minutes).
    #[inline]
    pub fn duration_min(&self) -> i64 {
        self.end_min - self.start_min
    }

    /// Whether `start < end`.
    #[inline]
    pub fn is_proper(&self) -> bool {
        self.start_min < self.end_min
    }

    /// Whether a minute falls within `[start, end)`.
    #[inline]
    pub fn contains(&self, minute: i64) -> bool {
        minute >= self.start_min && minute < self.end_min
    }

    /// Whether two windows overlap (touching endpoints do not).
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_min < other.end_min && other.start_min < self.end_min
    }

    /// This window widened by `buffer_min` on both sides.
    pub fn extended(&self, buffer_min: i64) -> Self {
        Self::new(self.start_min - buffer_min, self.end_min + buffer_min)
    }

    /// Minutes between the end of `self` and the start of `next`.
    ///
    /// Negative when the windows overlap.
    pub fn gap_to(&self, next: &Self) -> i64 {
        next.start_min - self.end_min
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}-{:02}:{:02}",
            self.start_min.div_euclid(60),
            self.start_min.rem_euclid(60),
            self.end_min.div_euclid(60),
            self.end_min.rem_euclid(60)
        )
    }
}

/// Minutes since midnight for a wall-clock time.
pub fn minute_of_day(time: NaiveTime) -> i64 {
    i64::from(time.hour()) * 60 + i64::from(time.minute())
}
