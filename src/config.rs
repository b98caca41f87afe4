//! Planner configuration.
//!
//! Supports TOML configuration with:
//! - Conference days and the daily lunch blackout
//! - Travel buffer, daily cap and backup requirements
//! - Defensive eligibility re-checks (excluded venues, minimum score)
//! - Validation with clear error messages
//!
//! Every key is optional; omitted keys fall back to the defaults of
//! [`PlannerConfig::default`].

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use thiserror::Error;

use crate::models::{parse_clock, Session, TimeWindow};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation failed: {errors:?}")]
    ValidationFailed { errors: Vec<ConfigIssue> },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// A single configuration problem.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigIssue {
    #[error("Invalid time format '{value}' for {field} (expected HH:MM)")]
    InvalidTime { field: &'static str, value: String },

    #[error("Invalid date format '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Duplicate conference day: {0}")]
    DuplicateDay(String),

    #[error("At least one conference day is required")]
    NoConferenceDays,

    #[error("Lunch window must start before it ends ({start} >= {end})")]
    EmptyLunchWindow { start: String, end: String },

    #[error("max_sessions_per_day must be at least 1")]
    ZeroDailyCap,

    #[error("min_score must be a finite number")]
    NonFiniteMinScore,

    #[error("excluded_venues[{0}] is blank")]
    BlankExcludedVenue(usize),
}

/// Raw configuration as parsed from TOML.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RawPlannerConfig {
    /// Conference days, `YYYY-MM-DD`.
    pub conference_days: Vec<String>,
    /// Lunch blackout start, `HH:MM`.
    pub lunch_start: String,
    /// Lunch blackout end, `HH:MM`.
    pub lunch_end: String,
    /// Minimum gap between consecutive primaries (minutes).
    pub buffer_minutes: u32,
    /// Minimum backups required per slot.
    pub min_backup_sessions: usize,
    /// Backups kept per slot when more than the minimum qualify.
    pub backup_pool_size: usize,
    /// Daily primary cap.
    pub max_sessions_per_day: usize,
    /// Venues that must never appear (case-insensitive substring match).
    pub excluded_venues: Vec<String>,
    /// Sessions scoring below this are treated as ineligible.
    pub min_score: f64,
    /// Keywords reported in coverage.
    pub tracked_keywords: Vec<String>,
}

impl Default for RawPlannerConfig {
    fn default() -> Self {
        Self {
            conference_days: [
                "2025-12-01",
                "2025-12-02",
                "2025-12-03",
                "2025-12-04",
                "2025-12-05",
            ]
            .map(String::from)
            .to_vec(),
            lunch_start: "11:00".into(),
            lunch_end: "13:00".into(),
            buffer_minutes: 30,
            min_backup_sessions: 2,
            backup_pool_size: 3,
            max_sessions_per_day: 8,
            excluded_venues: vec!["MGM Grand".into(), "Mandalay Bay".into()],
            min_score: 0.0,
            tracked_keywords: ["AI", "Kiro", "Architect", "Lakehouse", "ETL", "Trino", "DevOps"]
                .map(String::from)
                .to_vec(),
        }
    }
}

/// Validated, immutable planner configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannerConfig {
    /// Conference days in calendar order.
    pub conference_days: Vec<NaiveDate>,
    /// Lunch blackout start.
    pub lunch_start: NaiveTime,
    /// Lunch blackout end.
    pub lunch_end: NaiveTime,
    /// Minimum gap between consecutive primaries (minutes).
    pub buffer_minutes: u32,
    /// Minimum backups required per slot.
    pub min_backup_sessions: usize,
    /// Backups kept per slot when more than the minimum qualify.
    pub backup_pool_size: usize,
    /// Daily primary cap (≥ 1).
    pub max_sessions_per_day: usize,
    /// Excluded venue names.
    pub excluded_venues: BTreeSet<String>,
    /// Eligibility score threshold (inclusive).
    pub min_score: f64,
    /// Keywords reported in coverage, in configured order.
    pub tracked_keywords: Vec<String>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self::from_raw(RawPlannerConfig::default()).expect("default configuration is valid")
    }
}

impl PlannerConfig {
    /// Validates and converts a raw configuration.
    pub fn from_raw(raw: RawPlannerConfig) -> Result<Self, Vec<ConfigIssue>> {
        let issues = validate_config(&raw);
        if !issues.is_empty() {
            return Err(issues);
        }

        let mut conference_days: Vec<NaiveDate> = raw
            .conference_days
            .iter()
            .filter_map(|d| parse_date(d))
            .collect();
        conference_days.sort();

        Ok(Self {
            conference_days,
            lunch_start: parse_clock(&raw.lunch_start).unwrap_or(NaiveTime::MIN),
            lunch_end: parse_clock(&raw.lunch_end).unwrap_or(NaiveTime::MIN),
            buffer_minutes: raw.buffer_minutes,
            min_backup_sessions: raw.min_backup_sessions,
            backup_pool_size: raw.backup_pool_size,
            max_sessions_per_day: raw.max_sessions_per_day,
            excluded_venues: raw.excluded_venues.into_iter().collect(),
            min_score: raw.min_score,
            tracked_keywords: raw.tracked_keywords,
        })
    }

    /// Sets the travel buffer.
    pub fn with_buffer_minutes(mut self, minutes: u32) -> Self {
        self.buffer_minutes = minutes;
        self
    }

    /// Sets the lunch blackout.
    pub fn with_lunch(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.lunch_start = start;
        self.lunch_end = end;
        self
    }

    /// Sets the minimum backups per slot.
    pub fn with_min_backups(mut self, min: usize) -> Self {
        self.min_backup_sessions = min;
        self
    }

    /// Sets the over-provisioned backup pool size.
    pub fn with_backup_pool_size(mut self, size: usize) -> Self {
        self.backup_pool_size = size;
        self
    }

    /// Sets the daily primary cap.
    pub fn with_max_sessions_per_day(mut self, cap: usize) -> Self {
        self.max_sessions_per_day = cap;
        self
    }

    /// Replaces the conference days.
    pub fn with_days(mut self, days: impl IntoIterator<Item = NaiveDate>) -> Self {
        let mut days: Vec<NaiveDate> = days.into_iter().collect();
        days.sort();
        days.dedup();
        self.conference_days = days;
        self
    }

    /// Replaces the excluded venues.
    pub fn with_excluded_venues<I, S>(mut self, venues: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_venues = venues.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the eligibility score threshold.
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    /// Lunch blackout as a window.
    pub fn lunch_window(&self) -> TimeWindow {
        TimeWindow::from_times(self.lunch_start, self.lunch_end)
    }

    /// Travel buffer in minutes.
    #[inline]
    pub fn buffer(&self) -> i64 {
        i64::from(self.buffer_minutes)
    }

    /// Number of backups to keep for a slot.
    #[inline]
    pub fn backup_target(&self) -> usize {
        self.min_backup_sessions.max(self.backup_pool_size)
    }

    /// Whether a day belongs to the conference.
    pub fn is_conference_day(&self, day: &NaiveDate) -> bool {
        self.conference_days.binary_search(day).is_ok()
    }

    /// Whether a venue matches any excluded venue.
    ///
    /// Matching is case-insensitive and by substring, so "MGM Grand"
    /// also excludes "MGM Grand Conference Center". Blank entries never match.
    pub fn is_venue_excluded(&self, venue: &str) -> bool {
        let venue = venue.to_lowercase();
        self.excluded_venues
            .iter()
            .map(|excluded| excluded.trim().to_lowercase())
            .any(|excluded| !excluded.is_empty() && venue.contains(&excluded))
    }

    /// Defensive eligibility check: upstream flag, venue and score threshold.
    pub fn admits(&self, session: &Session) -> bool {
        session.eligible
            && !self.is_venue_excluded(&session.venue)
            && session.score >= self.min_score
    }
}

/// Load and validate configuration from a TOML file
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<PlannerConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from a TOML string
pub fn parse_config(content: &str) -> ConfigResult<PlannerConfig> {
    let raw: RawPlannerConfig = toml::from_str(content)?;
    PlannerConfig::from_raw(raw).map_err(|errors| ConfigError::ValidationFailed { errors })
}

/// Validate a raw configuration
pub fn validate_config(raw: &RawPlannerConfig) -> Vec<ConfigIssue> {
    let mut errors = Vec::new();

    if raw.conference_days.is_empty() {
        errors.push(ConfigIssue::NoConferenceDays);
    }

    let mut seen = HashSet::new();
    for value in &raw.conference_days {
        match parse_date(value) {
            Some(day) => {
                if !seen.insert(day) {
                    errors.push(ConfigIssue::DuplicateDay(value.clone()));
                }
            }
            None => errors.push(ConfigIssue::InvalidDate(value.clone())),
        }
    }

    let lunch_start = parse_clock(&raw.lunch_start);
    let lunch_end = parse_clock(&raw.lunch_end);
    if lunch_start.is_none() {
        errors.push(ConfigIssue::InvalidTime {
            field: "lunch_start",
            value: raw.lunch_start.clone(),
        });
    }
    if lunch_end.is_none() {
        errors.push(ConfigIssue::InvalidTime {
            field: "lunch_end",
            value: raw.lunch_end.clone(),
        });
    }
    if let (Some(start), Some(end)) = (lunch_start, lunch_end) {
        if start >= end {
            errors.push(ConfigIssue::EmptyLunchWindow {
                start: raw.lunch_start.clone(),
                end: raw.lunch_end.clone(),
            });
        }
    }

    if raw.max_sessions_per_day == 0 {
        errors.push(ConfigIssue::ZeroDailyCap);
    }

    if !raw.min_score.is_finite() {
        errors.push(ConfigIssue::NonFiniteMinScore);
    }

    for (index, venue) in raw.excluded_venues.iter().enumerate() {
        if venue.trim().is_empty() {
            errors.push(ConfigIssue::BlankExcludedVenue(index));
        }
    }

    errors
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = PlannerConfig::default();
        assert_eq!(config.conference_days.len(), 5);
        assert_eq!(config.buffer_minutes, 30);
        assert_eq!(config.lunch_window(), TimeWindow::new(660, 780));
        assert_eq!(config.min_backup_sessions, 2);
        assert_eq!(config.backup_target(), 3);
        assert_eq!(config.max_sessions_per_day, 8);
        assert!(config.is_venue_excluded("MGM Grand"));
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = parse_config("").unwrap();
        assert_eq!(config, PlannerConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"
            conference_days = ["2026-03-03", "2026-03-02"]
            lunch_start = "12:00"
            lunch_end = "13:30"
            buffer_minutes = 15
            min_backup_sessions = 1
            backup_pool_size = 0
            max_sessions_per_day = 4
            excluded_venues = ["Wynn"]
            min_score = 0.25
            tracked_keywords = ["Rust"]
            "#,
        )
        .unwrap();

        let mar2 = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        assert_eq!(config.conference_days[0], mar2);
        assert!(config.is_conference_day(&mar2));
        assert_eq!(config.lunch_start, hm(12, 0));
        assert_eq!(config.lunch_end, hm(13, 30));
        assert_eq!(config.buffer(), 15);
        assert_eq!(config.backup_target(), 1);
        assert_eq!(config.max_sessions_per_day, 4);
        assert!(!config.is_venue_excluded("MGM Grand"));
        assert_eq!(config.tracked_keywords, vec!["Rust".to_string()]);
    }

    #[test]
    fn test_reject_invalid_values() {
        let result = parse_config(
            r#"
            conference_days = ["2025-12-01", "2025-12-01", "tomorrow"]
            lunch_start = "13:00"
            lunch_end = "11:00"
            max_sessions_per_day = 0
            "#,
        );
        let Err(ConfigError::ValidationFailed { errors }) = result else {
            panic!("expected validation failure");
        };
        assert!(errors.contains(&ConfigIssue::DuplicateDay("2025-12-01".into())));
        assert!(errors.contains(&ConfigIssue::InvalidDate("tomorrow".into())));
        assert!(errors.contains(&ConfigIssue::ZeroDailyCap));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigIssue::EmptyLunchWindow { .. })));
    }

    #[test]
    fn test_reject_bad_time_and_empty_days() {
        let raw = RawPlannerConfig {
            conference_days: Vec::new(),
            lunch_start: "noon".into(),
            ..RawPlannerConfig::default()
        };
        let errors = validate_config(&raw);
        assert!(errors.contains(&ConfigIssue::NoConferenceDays));
        assert!(errors.contains(&ConfigIssue::InvalidTime {
            field: "lunch_start",
            value: "noon".into()
        }));
    }

    #[test]
    fn test_reject_toml_type_error() {
        let result = parse_config("buffer_minutes = \"thirty\"");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_venue_matching() {
        let config = PlannerConfig::default().with_excluded_venues(["MGM Grand"]);
        assert!(config.is_venue_excluded("mgm grand conference center"));
        assert!(!config.is_venue_excluded("Venetian"));
    }

    #[test]
    fn test_reject_blank_excluded_venue() {
        let result = parse_config(r#"excluded_venues = ["MGM Grand", "  "]"#);
        let Err(ConfigError::ValidationFailed { errors }) = result else {
            panic!("expected validation failure");
        };
        assert_eq!(errors, vec![ConfigIssue::BlankExcludedVenue(1)]);
    }

    #[test]
    fn test_blank_excluded_venue_matches_nothing() {
        let day = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        let config = PlannerConfig::default().with_excluded_venues(["MGM Grand", ""]);
        assert!(!config.is_venue_excluded("Venetian"));
        assert!(config.is_venue_excluded("MGM Grand"));

        let session = Session::new("A", day).with_venue("Venetian").with_score(0.9);
        assert!(config.admits(&session));
    }

    #[test]
    fn test_admits() {
        let day = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        let config = PlannerConfig::default().with_min_score(0.3);
        let ok = Session::new("A", day).with_venue("Wynn").with_score(0.5);
        assert!(config.admits(&ok));
        assert!(!config.admits(&ok.clone().with_eligible(false)));
        assert!(!config.admits(&ok.clone().with_venue("Mandalay Bay South")));
        assert!(!config.admits(&ok.with_score(0.1)));
    }

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "buffer_minutes = 10").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.buffer_minutes, 10);

        let missing = load_config("/nonexistent/u-agenda.toml");
        assert!(matches!(missing, Err(ConfigError::ReadError(_))));
    }
}
