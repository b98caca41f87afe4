//! Schedule quality metrics (KPIs).
//!
//! Computes descriptive indicators from a finished schedule. None of
//! these gate validity; see `RequirementValidator` for pass/fail checks.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Scheduled sessions | Number of primaries |
//! | Backup sessions | Number of backups across slots |
//! | Avg score | Mean primary score |
//! | Sessions per day | Primaries / conference days |
//! | Sessions by day | Primaries on each conference day |
//! | Avg backups | Mean backups per slot |
//! | Slots meeting minimum | Slots without a backup shortfall |
//! | Venue transitions | Consecutive primaries at different venues |

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::Schedule;

/// Backups at or above this score count as high quality.
pub const HIGH_BACKUP_SCORE: f64 = 0.7;
/// Backups at or above this score (and below high) count as medium.
pub const MEDIUM_BACKUP_SCORE: f64 = 0.5;

/// Schedule performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleKpi {
    /// Conference days covered by the schedule.
    pub conference_days: usize,
    /// Number of primaries.
    pub scheduled_sessions: usize,
    /// Number of backups across all slots.
    pub backup_sessions: usize,
    /// Mean primary score (0.0 when nothing is scheduled).
    pub avg_score: f64,
    /// Primaries per conference day.
    pub sessions_per_day: f64,
    /// Primaries on each conference day.
    pub sessions_by_day: BTreeMap<NaiveDate, usize>,
    /// Mean backups per slot.
    pub avg_backups_per_slot: f64,
    /// Slots with no backup shortfall.
    pub slots_meeting_backup_minimum: usize,
    /// Primaries per venue.
    pub venue_distribution: BTreeMap<String, usize>,
    /// Primaries per matched keyword, keyed in lowercase.
    pub keyword_coverage: BTreeMap<String, usize>,
    /// Backup counts by score band.
    pub backup_scores: ScoreBands,
    /// Venue changes between consecutive primaries.
    pub venue_transitions: Vec<VenueTransition>,
}

/// Backup counts per score band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBands {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// A move between venues from one primary to the next on the same day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueTransition {
    pub day: NaiveDate,
    pub from_session: String,
    pub to_session: String,
    pub from_venue: String,
    pub to_venue: String,
    /// Minutes between the end of one primary and the start of the next.
    pub gap_min: i64,
}

impl ScheduleKpi {
    /// Computes KPIs from a schedule.
    pub fn calculate(schedule: &Schedule) -> Self {
        let conference_days = schedule.days.len();
        let scheduled_sessions = schedule.slot_count();
        let backup_sessions = schedule.backup_count();

        let mut venue_distribution: BTreeMap<String, usize> = BTreeMap::new();
        let mut keyword_coverage: BTreeMap<String, usize> = BTreeMap::new();
        let mut score_sum = 0.0;

        for slot in schedule.slots() {
            score_sum += slot.primary.score;
            *venue_distribution
                .entry(slot.primary.venue.clone())
                .or_insert(0) += 1;
            for keyword in &slot.primary.keywords {
                *keyword_coverage.entry(keyword.to_lowercase()).or_insert(0) += 1;
            }
        }

        let mut backup_scores = ScoreBands::default();
        for backup in schedule.slots().flat_map(|s| s.backups.iter()) {
            if backup.score >= HIGH_BACKUP_SCORE {
                backup_scores.high += 1;
            } else if backup.score >= MEDIUM_BACKUP_SCORE {
                backup_scores.medium += 1;
            } else {
                backup_scores.low += 1;
            }
        }

        Self {
            conference_days,
            scheduled_sessions,
            backup_sessions,
            avg_score: ratio(score_sum, scheduled_sessions),
            sessions_per_day: ratio(scheduled_sessions as f64, conference_days),
            sessions_by_day: schedule
                .days
                .values()
                .map(|d| (d.day, d.slots.len()))
                .collect(),
            avg_backups_per_slot: ratio(backup_sessions as f64, scheduled_sessions),
            slots_meeting_backup_minimum: schedule
                .slots()
                .filter(|s| !s.is_under_provisioned())
                .count(),
            venue_distribution,
            keyword_coverage,
            backup_scores,
            venue_transitions: venue_transitions(schedule),
        }
    }

    /// Venue transitions with less than `min_gap` minutes to travel.
    pub fn short_transitions(&self, min_gap: i64) -> Vec<&VenueTransition> {
        self.venue_transitions
            .iter()
            .filter(|t| t.gap_min < min_gap)
            .collect()
    }
}

fn ratio(total: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

fn venue_transitions(schedule: &Schedule) -> Vec<VenueTransition> {
    let mut transitions = Vec::new();
    for day in schedule.days.values() {
        for pair in day.slots.windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            if from.primary.venue != to.primary.venue {
                transitions.push(VenueTransition {
                    day: day.day,
                    from_session: from.primary.id.clone(),
                    to_session: to.primary.id.clone(),
                    from_venue: from.primary.venue.clone(),
                    to_venue: to.primary.venue.clone(),
                    gap_min: from.window.gap_to(&to.window),
                });
            }
        }
    }
    transitions
}
