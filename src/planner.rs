//! End-to-end planning pipeline.
//!
//! Runs allocation, backup filling and requirement validation in order
//! against one immutable configuration.

use serde::Serialize;
use tracing::{info, warn};

use crate::config::PlannerConfig;
use crate::models::{Schedule, Session};
use crate::requirements::{RequirementReport, RequirementValidator};
use crate::scheduler::{BackupGenerator, SlotAllocator};

/// Result of a planning run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanOutcome {
    pub schedule: Schedule,
    pub report: RequirementReport,
}

/// Planning pipeline over a fixed configuration.
///
/// # Example
///
/// ```
/// use chrono::{NaiveDate, NaiveTime};
/// use u_agenda::config::PlannerConfig;
/// use u_agenda::models::Session;
/// use u_agenda::planner::Planner;
///
/// let day = NaiveDate::from_ymd_opt(2025, 12, 2).unwrap();
/// let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
/// let sessions = vec![
///     Session::new("KEY", day).with_times(t(9, 0), t(10, 0)).with_score(0.9),
///     Session::new("ALT", day).with_times(t(9, 30), t(10, 30)).with_score(0.4),
/// ];
///
/// let config = PlannerConfig::default().with_min_backups(1);
/// let outcome = Planner::new(&config).plan(&sessions);
/// assert!(outcome.schedule.is_primary("KEY"));
/// assert!(outcome.report.all_passed());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Planner<'a> {
    config: &'a PlannerConfig,
}

impl<'a> Planner<'a> {
    pub fn new(config: &'a PlannerConfig) -> Self {
        Self { config }
    }

    /// Allocates primaries, fills backups and validates the result.
    pub fn plan(&self, candidates: &[Session]) -> PlanOutcome {
        info!(
            candidates = candidates.len(),
            days = self.config.conference_days.len(),
            buffer_min = self.config.buffer_minutes,
            "Planning schedule"
        );

        let schedule = SlotAllocator::new(self.config).allocate(candidates);
        let schedule = BackupGenerator::new(self.config).fill_backups(schedule, candidates);
        let report = RequirementValidator::new(self.config).validate(&schedule);

        if report.all_passed() {
            info!(slots = schedule.slot_count(), "All requirements passed");
        } else {
            warn!(failed = ?report.failed_requirements(), "Schedule failed requirements");
        }

        PlanOutcome { schedule, report }
    }
}
