//! Greedy slot allocation, backup generation and KPI evaluation.
//!
//! # Algorithm
//!
//! `SlotAllocator` places one primary per window with a greedy,
//! score-ordered, single-pass heuristic. It is not optimal, but it is
//! fast and fully deterministic. `BackupGenerator` then ranks the
//! remaining overlapping candidates for every slot.
//!
//! # KPI
//!
//! `ScheduleKpi` computes descriptive metrics: average score, venue and
//! keyword distributions, backup quality and venue transitions.
//!
//! # References
//!
//! - Kleinberg & Tardos (2005), "Algorithm Design", Ch. 4.1 and 6.1
//!   (interval scheduling, weighted interval scheduling)

mod allocator;
mod backup;
mod kpi;

pub use allocator::SlotAllocator;
pub use backup::BackupGenerator;
pub use kpi::{ScheduleKpi, ScoreBands, VenueTransition, HIGH_BACKUP_SCORE, MEDIUM_BACKUP_SCORE};
