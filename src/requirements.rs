//! Requirement checks over a finished schedule.
//!
//! Produces a read-only [`RequirementReport`]:
//! - Travel buffer honored between every pair of same-day primaries
//! - Minimum backups per slot
//! - Lunch window untouched by primaries
//! - Excluded venues absent from primaries and backups
//! - Daily cap respected
//! - Keyword coverage (informational)
//! - Malformed inputs and empty days (informational)
//!
//! The validator never fails. Whether a failed requirement is fatal is
//! up to the caller.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::PlannerConfig;
use crate::conflict::{in_lunch_window, overlaps};
use crate::models::{Schedule, Session};

/// Outcome of one requirement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequirementCheck<T> {
    /// Whether the requirement holds.
    pub passed: bool,
    /// Offending items (empty when passed).
    pub violations: Vec<T>,
}

impl<T> RequirementCheck<T> {
    fn from_violations(violations: Vec<T>) -> Self {
        Self {
            passed: violations.is_empty(),
            violations,
        }
    }
}

/// Two same-day primaries closer than the travel buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BufferConflict {
    pub day: NaiveDate,
    pub first: String,
    pub second: String,
    /// Minutes between `first`'s end and `second`'s start (negative = overlap).
    pub gap_min: i64,
}

/// A slot with fewer backups than required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupShortfall {
    pub day: NaiveDate,
    pub primary: String,
    pub backups: usize,
    pub shortfall: usize,
}

/// A session referenced by day and ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionRef {
    pub day: NaiveDate,
    pub session_id: String,
}

/// Where an offending session sits in its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SlotRole {
    Primary,
    Backup,
}

/// A session scheduled at an excluded venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueViolation {
    pub day: NaiveDate,
    pub session_id: String,
    pub venue: String,
    pub role: SlotRole,
}

/// A day with more primaries than the cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapViolation {
    pub day: NaiveDate,
    pub sessions: usize,
    pub cap: usize,
}

/// Read-only summary of requirement checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequirementReport {
    /// Travel buffer between same-day primaries.
    pub buffer: RequirementCheck<BufferConflict>,
    /// Minimum backups per slot.
    pub backups: RequirementCheck<BackupShortfall>,
    /// Configured minimum backups.
    pub min_backups: usize,
    /// Slots meeting the backup minimum.
    pub slots_meeting_minimum: usize,
    /// Total slots checked.
    pub slot_count: usize,
    /// Primaries clear of the lunch window.
    pub lunch: RequirementCheck<SessionRef>,
    /// Excluded venues absent from primaries and backups.
    pub venues: RequirementCheck<VenueViolation>,
    /// Primaries per day within the cap.
    pub daily_cap: RequirementCheck<CapViolation>,
    /// Primaries per tracked keyword, in configured order.
    pub keyword_coverage: Vec<(String, usize)>,
    /// Input sessions skipped as malformed.
    pub malformed_sessions: Vec<String>,
    /// Conference days without any slot.
    pub empty_days: Vec<NaiveDate>,
}

impl RequirementReport {
    /// Whether every blocking requirement holds.
    ///
    /// Keyword coverage, malformed inputs and empty days are informational.
    pub fn all_passed(&self) -> bool {
        self.failed_requirements().is_empty()
    }

    /// Names of the blocking requirements that failed.
    pub fn failed_requirements(&self) -> Vec<&'static str> {
        [
            ("buffer", self.buffer.passed),
            ("backups", self.backups.passed),
            ("lunch", self.lunch.passed),
            ("venues", self.venues.passed),
            ("daily_cap", self.daily_cap.passed),
        ]
        .into_iter()
        .filter(|(_, passed)| !passed)
        .map(|(name, _)| name)
        .collect()
    }

    /// Tracked keywords with no scheduled primary.
    pub fn missing_keywords(&self) -> Vec<&str> {
        self.keyword_coverage
            .iter()
            .filter(|(_, count)| *count == 0)
            .map(|(keyword, _)| keyword.as_str())
            .collect()
    }
}

/// Checks a finished schedule against the configured requirements.
#[derive(Debug, Clone, Copy)]
pub struct RequirementValidator<'a> {
    config: &'a PlannerConfig,
}

impl<'a> RequirementValidator<'a> {
    /// Creates a validator for the given configuration.
    pub fn new(config: &'a PlannerConfig) -> Self {
        Self { config }
    }

    /// Builds the requirement report. Pure; running it twice gives the same report.
    pub fn validate(&self, schedule: &Schedule) -> RequirementReport {
        let slot_count = schedule.slot_count();
        let backups = self.check_backups(schedule);
        let slots_meeting_minimum = slot_count - backups.violations.len();

        RequirementReport {
            buffer: self.check_buffer(schedule),
            backups,
            min_backups: self.config.min_backup_sessions,
            slots_meeting_minimum,
            slot_count,
            lunch: self.check_lunch(schedule),
            venues: self.check_venues(schedule),
            daily_cap: self.check_daily_cap(schedule),
            keyword_coverage: self.keyword_coverage(schedule),
            malformed_sessions: schedule
                .skipped
                .iter()
                .map(|issue| issue.session_id.clone())
                .collect(),
            empty_days: schedule
                .days
                .values()
                .filter(|d| d.is_empty())
                .map(|d| d.day)
                .collect(),
        }
    }

    fn check_buffer(&self, schedule: &Schedule) -> RequirementCheck<BufferConflict> {
        let mut conflicts = Vec::new();
        for day in schedule.days.values() {
            for (i, a) in day.slots.iter().enumerate() {
                for b in &day.slots[i + 1..] {
                    if overlaps(&a.primary, &b.primary, self.config.buffer_minutes) {
                        conflicts.push(BufferConflict {
                            day: day.day,
                            first: a.primary.id.clone(),
                            second: b.primary.id.clone(),
                            gap_min: a.window.gap_to(&b.window),
                        });
                    }
                }
            }
        }
        RequirementCheck::from_violations(conflicts)
    }

    fn check_backups(&self, schedule: &Schedule) -> RequirementCheck<BackupShortfall> {
        let minimum = self.config.min_backup_sessions;
        let shortfalls = schedule
            .slots()
            .filter(|slot| slot.backups.len() < minimum)
            .map(|slot| BackupShortfall {
                day: slot.day,
                primary: slot.primary.id.clone(),
                backups: slot.backups.len(),
                shortfall: minimum - slot.backups.len(),
            })
            .collect();
        RequirementCheck::from_violations(shortfalls)
    }

    fn check_lunch(&self, schedule: &Schedule) -> RequirementCheck<SessionRef> {
        let offenders = schedule
            .slots()
            .filter(|slot| {
                in_lunch_window(&slot.primary, self.config.lunch_start, self.config.lunch_end)
            })
            .map(|slot| SessionRef {
                day: slot.day,
                session_id: slot.primary.id.clone(),
            })
            .collect();
        RequirementCheck::from_violations(offenders)
    }

    fn check_venues(&self, schedule: &Schedule) -> RequirementCheck<VenueViolation> {
        let mut violations = Vec::new();
        for slot in schedule.slots() {
            let roles = std::iter::once((&slot.primary, SlotRole::Primary))
                .chain(slot.backups.iter().map(|b| (b, SlotRole::Backup)));
            for (session, role) in roles {
                if self.config.is_venue_excluded(&session.venue) {
                    violations.push(VenueViolation {
                        day: slot.day,
                        session_id: session.id.clone(),
                        venue: session.venue.clone(),
                        role,
                    });
                }
            }
        }
        RequirementCheck::from_violations(violations)
    }

    fn check_daily_cap(&self, schedule: &Schedule) -> RequirementCheck<CapViolation> {
        let cap = self.config.max_sessions_per_day;
        let violations = schedule
            .days
            .values()
            .filter(|d| d.slots.len() > cap)
            .map(|d| CapViolation {
                day: d.day,
                sessions: d.slots.len(),
                cap,
            })
            .collect();
        RequirementCheck::from_violations(violations)
    }

    fn keyword_coverage(&self, schedule: &Schedule) -> Vec<(String, usize)> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for slot in schedule.slots() {
            for keyword in lowercase_keywords(&slot.primary) {
                *counts.entry(keyword).or_insert(0) += 1;
            }
        }
        self.config
            .tracked_keywords
            .iter()
            .map(|k| {
                let count = counts.get(&k.to_lowercase()).copied().unwrap_or(0);
                (k.clone(), count)
            })
            .collect()
    }
}

fn lowercase_keywords(session: &Session) -> std::collections::BTreeSet<String> {
    session.keywords.iter().map(|k| k.to_lowercase()).collect()
}
