//! Conference agenda planning.
//!
//! Assigns pre-scored, time-boxed candidate sessions to a fixed multi-day
//! calendar. Every chosen time window gets one primary session and a
//! ranked list of backups, subject to a travel buffer, a lunch block,
//! excluded venues and a daily cap.
//!
//! Planning is a pure, deterministic function from (candidates,
//! configuration) to (schedule, requirement report). Scraping, scoring
//! and rendering happen elsewhere.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Session`, `TimeWindow`, `Slot`,
//!   `DaySchedule`, `Schedule`
//! - **`config`**: Planner configuration, TOML loading and validation
//! - **`catalog`**: JSON session catalog loading
//! - **`validation`**: Input screening (missing times, duplicate IDs, unknown days)
//! - **`conflict`**: Buffer-aware overlap and lunch window predicates
//! - **`scheduler`**: Greedy slot allocation, backup generation, KPIs
//! - **`requirements`**: Pass/fail checks over a finished schedule
//! - **`planner`**: The end-to-end pipeline
//!
//! # References
//!
//! - Kleinberg & Tardos (2005), "Algorithm Design", Ch. 4 and 6
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod catalog;
pub mod config;
pub mod conflict;
pub mod models;
pub mod planner;
pub mod requirements;
pub mod scheduler;
pub mod validation;

pub use config::{load_config, parse_config, ConfigError, PlannerConfig};
pub use models::{Schedule, Session, Slot, TimeWindow};
pub use planner::{PlanOutcome, Planner};
pub use requirements::{RequirementReport, RequirementValidator};
