//! Agenda planning CLI tool
//!
//! Plans a personal agenda from a configuration file and a scored session
//! catalog, then prints the schedule, requirement report and KPIs as JSON.

use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use u_agenda::catalog::load_sessions;
use u_agenda::config::{load_config, ConfigError};
use u_agenda::models::Schedule;
use u_agenda::planner::Planner;
use u_agenda::requirements::RequirementReport;
use u_agenda::scheduler::ScheduleKpi;

#[derive(Serialize)]
struct PlanOutput<'a> {
    schedule: &'a Schedule,
    report: &'a RequirementReport,
    kpi: ScheduleKpi,
}

fn main() -> ExitCode {
    // Logs go to stderr so stdout stays valid JSON.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let (config_path, sessions_path) = match (args.get(1), args.get(2)) {
        (Some(config), Some(sessions)) => (PathBuf::from(config), PathBuf::from(sessions)),
        _ => {
            eprintln!("Usage: agenda-plan <config.toml> <sessions.json>");
            eprintln!();
            eprintln!("Plans a conference agenda and prints it as JSON.");
            eprintln!("Exits with status 1 if any requirement fails.");
            eprintln!();
            eprintln!("Example:");
            eprintln!("  agenda-plan planner.toml scored_sessions.json");
            return ExitCode::from(2);
        }
    };

    let config = match load_config(&config_path) {
        Ok(config) => config,
        Err(ConfigError::ValidationFailed { errors }) => {
            error!(path = %config_path.display(), "Configuration validation failed");
            for err in &errors {
                eprintln!("  - {}", err);
            }
            return ExitCode::from(1);
        }
        Err(e) => {
            error!(path = %config_path.display(), error = %e, "Failed to load configuration");
            return ExitCode::from(1);
        }
    };

    let sessions = match load_sessions(&sessions_path) {
        Ok(sessions) => sessions,
        Err(e) => {
            error!(path = %sessions_path.display(), error = %e, "Failed to load sessions");
            return ExitCode::from(1);
        }
    };
    info!(sessions = sessions.len(), "Loaded session catalog");

    let outcome = Planner::new(&config).plan(&sessions);
    let output = PlanOutput {
        schedule: &outcome.schedule,
        report: &outcome.report,
        kpi: ScheduleKpi::calculate(&outcome.schedule),
    };

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            error!(error = %e, "Failed to serialize plan");
            return ExitCode::from(1);
        }
    }

    if outcome.report.all_passed() {
        ExitCode::SUCCESS
    } else {
        error!(failed = ?outcome.report.failed_requirements(), "Schedule does not meet requirements");
        ExitCode::from(1)
    }
}
