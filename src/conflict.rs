//! Conflict predicates between sessions.
//!
//! Two pure tests drive allocation and validation:
//! - [`overlaps`]: travel-buffer conflict between two sessions
//! - [`in_lunch_window`]: intersection with the daily lunch blackout
//!
//! # Boundary semantics
//! All comparisons are strict. With a zero buffer, back-to-back
//! sessions (`a.end == b.start`) do not conflict. With a buffer of `b`
//! minutes, any gap shorter than `b` conflicts and a gap of exactly
//! `b` is allowed. A session ending exactly when lunch starts is not
//! in the lunch window.

use chrono::NaiveTime;

use crate::models::{Session, TimeWindow};

/// Whether `a` and `b` conflict under a travel buffer.
///
/// True iff `a`'s window extended by `buffer_minutes` on both sides
/// intersects `b`'s true window. The test is symmetric. Sessions on
/// different days, or without a valid window, never conflict.
///
/// # Example
/// ```
/// use chrono::{NaiveDate, NaiveTime};
/// use u_agenda::conflict::overlaps;
/// use u_agenda::models::Session;
///
/// let day = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
/// let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
/// let a = Session::new("A", day).with_times(t(9, 0), t(10, 30));
/// let b = Session::new("B", day).with_times(t(10, 40), t(12, 0));
///
/// assert!(overlaps(&a, &b, 30));
/// assert!(!overlaps(&a, &b, 10));
/// ```
pub fn overlaps(a: &Session, b: &Session, buffer_minutes: u32) -> bool {
    if a.day != b.day {
        return false;
    }
    match (a.window(), b.window()) {
        (Some(wa), Some(wb)) => windows_conflict(&wa, &wb, i64::from(buffer_minutes)),
        _ => false,
    }
}

/// Window-level form of [`overlaps`].
pub fn windows_conflict(a: &TimeWindow, b: &TimeWindow, buffer_min: i64) -> bool {
    a.extended(buffer_min).overlaps(b)
}

/// Whether a session's window intersects `[lunch_start, lunch_end]`.
///
/// Sessions without a valid window are never in the lunch window.
pub fn in_lunch_window(session: &Session, lunch_start: NaiveTime, lunch_end: NaiveTime) -> bool {
    session
        .window()
        .is_some_and(|w| w.overlaps(&TimeWindow::from_times(lunch_start, lunch_end)))
}
