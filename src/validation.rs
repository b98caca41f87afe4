//! Input screening for candidate sessions.
//!
//! Checks structural integrity of each session before planning.
//! Detects:
//! - Empty or duplicate IDs (first occurrence wins)
//! - Missing or unparseable start/end times
//! - Windows where start is not before end
//! - Days outside the conference
//! - Non-finite scores
//!
//! A session failing any check is malformed: it is skipped by both the
//! allocator and the backup generator and reported, never fatal.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::PlannerConfig;
use crate::models::Session;

/// Validation result.
pub type ValidationResult = Result<(), Vec<SessionIssue>>;

/// A malformed input session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionIssue {
    /// Offending session ID (may be empty).
    pub session_id: String,
    /// Error category.
    pub kind: SessionIssueKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of malformed sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionIssueKind {
    /// The session has no identifier.
    EmptyId,
    /// Another session already uses this identifier.
    DuplicateId,
    /// Start or end time is missing or unparseable.
    MissingTime,
    /// The window is empty at minute granularity (start minute not before
    /// end minute). Seconds are ignored, so 09:00:00-09:00:30 lands here.
    InvertedWindow,
    /// The session's day is not a conference day.
    UnknownDay,
    /// The score is missing, NaN or infinite.
    NonFiniteScore,
}

impl SessionIssue {
    fn new(session: &Session, kind: SessionIssueKind, message: impl Into<String>) -> Self {
        Self {
            session_id: session.id.clone(),
            kind,
            message: message.into(),
        }
    }
}

/// Sessions split into usable input and malformed records.
#[derive(Debug, Clone, Default)]
pub struct Screening<'a> {
    /// Well-formed sessions, in input order.
    pub accepted: Vec<&'a Session>,
    /// One issue per skipped session, in input order.
    pub issues: Vec<SessionIssue>,
}

/// Screens candidate sessions.
///
/// Each session is checked in input order; the first failing check is
/// recorded and the session is skipped. Eligibility is not judged here.
pub fn screen<'a>(sessions: &'a [Session], config: &PlannerConfig) -> Screening<'a> {
    let mut screening = Screening::default();
    let mut seen_ids = HashSet::new();

    for session in sessions {
        match check_session(session, config, &mut seen_ids) {
            Some(issue) => screening.issues.push(issue),
            None => screening.accepted.push(session),
        }
    }

    screening
}

/// Validates candidate sessions.
///
/// # Returns
/// `Ok(())` if every session is well-formed, `Err(issues)` with all
/// detected problems otherwise.
pub fn validate_sessions(sessions: &[Session], config: &PlannerConfig) -> ValidationResult {
    let issues = screen(sessions, config).issues;
    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

fn check_session<'a>(
    session: &'a Session,
    config: &PlannerConfig,
    seen_ids: &mut HashSet<&'a str>,
) -> Option<SessionIssue> {
    use SessionIssueKind::*;

    if session.id.trim().is_empty() {
        return Some(SessionIssue::new(session, EmptyId, "Session has no ID"));
    }

    if !seen_ids.insert(session.id.as_str()) {
        return Some(SessionIssue::new(
            session,
            DuplicateId,
            format!("Duplicate session ID: {}", session.id),
        ));
    }

    let (Some(start), Some(end)) = (session.start, session.end) else {
        return Some(SessionIssue::new(
            session,
            MissingTime,
            format!("Session '{}' is missing a start or end time", session.id),
        ));
    };

    if session.window().is_none() {
        return Some(SessionIssue::new(
            session,
            InvertedWindow,
            format!(
                "Session '{}' starts at {} but ends at {} (minute granularity)",
                session.id,
                start.format("%H:%M"),
                end.format("%H:%M")
            ),
        ));
    }

    if !config.is_conference_day(&session.day) {
        return Some(SessionIssue::new(
            session,
            UnknownDay,
            format!("Session '{}' is on {}, not a conference day", session.id, session.day),
        ));
    }

    if !session.score.is_finite() {
        return Some(SessionIssue::new(
            session,
            NonFiniteScore,
            format!("Session '{}' has a missing or non-finite score", session.id),
        ));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn good(id: &str) -> Session {
        Session::new(id, day())
            .with_times(hm(9, 0), hm(10, 0))
            .with_score(0.5)
    }

    #[test]
    fn test_valid_input() {
        let sessions = vec![good("A"), good("B")];
        assert!(validate_sessions(&sessions, &PlannerConfig::default()).is_ok());
    }

    #[test]
    fn test_duplicate_id_first_wins() {
        let sessions = vec![good("A"), good("A").with_score(0.9)];
        let screening = screen(&sessions, &PlannerConfig::default());
        assert_eq!(screening.accepted.len(), 1);
        assert!((screening.accepted[0].score - 0.5).abs() < 1e-10);
        assert_eq!(screening.issues[0].kind, SessionIssueKind::DuplicateId);
    }

    #[test]
    fn test_missing_time() {
        let mut s = good("A");
        s.end = None;
        let errors = validate_sessions(&[s], &PlannerConfig::default()).unwrap_err();
        assert_eq!(errors[0].kind, SessionIssueKind::MissingTime);
        assert_eq!(errors[0].session_id, "A");
    }

    #[test]
    fn test_inverted_window() {
        let s = good("A").with_times(hm(10, 0), hm(10, 0));
        let errors = validate_sessions(&[s], &PlannerConfig::default()).unwrap_err();
        assert_eq!(errors[0].kind, SessionIssueKind::InvertedWindow);
    }

    #[test]
    fn test_sub_minute_window_is_inverted() {
        let s = good("A").with_times(hm(9, 0), NaiveTime::from_hms_opt(9, 0, 30).unwrap());
        let errors = validate_sessions(&[s], &PlannerConfig::default()).unwrap_err();
        assert_eq!(errors[0].kind, SessionIssueKind::InvertedWindow);
    }

    #[test]
    fn test_unknown_day() {
        let mut s = good("A");
        s.day = NaiveDate::from_ymd_opt(2025, 11, 30).unwrap();
        let errors = validate_sessions(&[s], &PlannerConfig::default()).unwrap_err();
        assert_eq!(errors[0].kind, SessionIssueKind::UnknownDay);
    }

    #[test]
    fn test_non_finite_score() {
        let s = good("A").with_score(f64::NAN);
        let errors = validate_sessions(&[s], &PlannerConfig::default()).unwrap_err();
        assert_eq!(errors[0].kind, SessionIssueKind::NonFiniteScore);
    }

    #[test]
    fn test_empty_id() {
        let errors = validate_sessions(&[good("  ")], &PlannerConfig::default()).unwrap_err();
        assert_eq!(errors[0].kind, SessionIssueKind::EmptyId);
    }

    #[test]
    fn test_ineligible_is_not_malformed() {
        let s = good("A").with_eligible(false).with_venue("MGM Grand");
        let screening = screen(std::slice::from_ref(&s), &PlannerConfig::default());
        assert_eq!(screening.accepted.len(), 1);
        assert!(screening.issues.is_empty());
    }

    #[test]
    fn test_multiple_errors() {
        let mut missing = good("B");
        missing.start = None;
        let sessions = vec![good("A"), missing, good("A"), good("C").with_score(f64::INFINITY)];
        let errors = validate_sessions(&sessions, &PlannerConfig::default()).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
