//! staffing-runner: headless driver for the staffing analytics core.
//!
//! Usage:
//!   staffing-runner --seed 12345 --employees 60 --db staff.db
//!   staffing-runner --seed 12345 --ipc-mode
//!
//! IPC mode reads one JSON command per line on stdin and answers with one
//! JSON line on stdout.

use anyhow::Result;
use chrono::NaiveDate;
use serde_json::json;
use staffing_core::{
    analytics_service::{AnalysisRequest, AnalyticsService},
    clock::{Clock, SystemClock},
    config::StaffingConfig,
    profile_aggregator::ProfileAggregator,
    roster::RosterGenerator,
    store::{EmployeeStore, StaffStore},
    types::EmployeeId,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    AnalyzeTeam {
        request: AnalysisRequest,
    },
    CompareTeams {
        requests: Vec<AnalysisRequest>,
    },
    Match {
        #[serde(default)]
        skills: Vec<String>,
        #[serde(default)]
        technologies: Vec<String>,
    },
    TeamEffectiveness {
        employee_ids: Vec<EmployeeId>,
        #[serde(default)]
        requirements: String,
    },
    CapacityForecast {
        #[serde(default)]
        start: Option<NaiveDate>,
        #[serde(default)]
        end: Option<NaiveDate>,
    },
    SkillGaps,
    Dashboard,
    Health,
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let employees = parse_arg(&args, "--employees", 40usize);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or(":memory:");
    let data_dir = args
        .windows(2)
        .find(|w| w[0] == "--data-dir")
        .map(|w| w[1].as_str())
        .unwrap_or("./data");

    if !ipc_mode {
        println!("Staffing analytics: staffing-runner");
        println!("  seed:       {seed}");
        println!("  employees:  {employees}");
        println!("  db:         {db}");
        println!("  data_dir:   {data_dir}");
        println!();
    }

    let config = match StaffingConfig::load(data_dir) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Could not load config from {data_dir} ({e:#}), using built-in defaults");
            StaffingConfig::builtin()
        }
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store = StaffStore::open(db)?;
    store.migrate()?;
    if store.employee_count()? == 0 {
        for employee in RosterGenerator::generate(seed, employees, clock.today()) {
            store.insert_employee(&employee)?;
        }
        log::info!("Seeded {employees} employees from seed {seed}");
    }

    let service = AnalyticsService::new(store, config, clock);

    if ipc_mode {
        run_ipc_loop(&service)?;
    } else {
        print_summary(&service)?;
    }
    Ok(())
}

fn run_ipc_loop(service: &AnalyticsService<StaffStore>) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                writeln!(stdout, "{}", json!({ "error": e.to_string() }))?;
                stdout.flush()?;
                continue;
            }
        };
        if matches!(cmd, IpcCommand::Quit) {
            break;
        }

        let reply = match handle_command(service, cmd) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Command failed: {e:#}");
                json!({ "error": format!("{e:#}") })
            }
        };
        writeln!(stdout, "{reply}")?;
        stdout.flush()?;
    }
    Ok(())
}

fn handle_command(service: &AnalyticsService<StaffStore>, cmd: IpcCommand) -> Result<serde_json::Value> {
    let reply = match cmd {
        IpcCommand::AnalyzeTeam { request } => {
            let outcome = service.analyze_team(&request)?;
            json!({
                "analysis": outcome.analysis,
                "success": outcome.success,
                "warning": outcome.warning,
                "processingTimeMs": outcome.processing_time_ms,
                "dataSource": outcome.data_source,
            })
        }
        IpcCommand::CompareTeams { requests } => serde_json::to_value(service.compare_teams(&requests)?)?,
        IpcCommand::Match { skills, technologies } => {
            let matches = service.match_employees(&skills, &technologies)?;
            let profile = service.profile_for_matches(&matches);
            json!({ "matches": matches, "teamProfile": profile })
        }
        IpcCommand::TeamEffectiveness { employee_ids, requirements } => {
            serde_json::to_value(service.team_effectiveness(&employee_ids, &requirements)?)?
        }
        IpcCommand::CapacityForecast { start, end } => {
            serde_json::to_value(service.capacity_forecast(start, end)?)?
        }
        IpcCommand::SkillGaps => serde_json::to_value(service.skill_gaps()?)?,
        IpcCommand::Dashboard => serde_json::to_value(service.dashboard_metrics()?)?,
        IpcCommand::Health => serde_json::to_value(service.service_health())?,
        IpcCommand::Quit => serde_json::Value::Null,
    };
    Ok(reply)
}

fn print_summary(service: &AnalyticsService<StaffStore>) -> Result<()> {
    let roster = service.store().list_employees()?;
    let today = service.clock().today();
    let profile = ProfileAggregator::new(service.config()).aggregate(&roster, None, today);

    println!("=== ROSTER SUMMARY ===");
    println!("  employees:      {}", profile.total_members);
    println!("  available:      {}", profile.available_members);
    println!("  avg experience: {:.1} years", profile.avg_experience);
    for (dept, count) in &profile.departments {
        println!("  {dept:<15} {count}");
    }

    println!();
    println!("=== SKILLS BREAKDOWN ===");
    for (category, share) in &profile.skills_breakdown {
        println!("  {category:<12} {share:>5.1}%");
    }

    if profile.is_valid() {
        let outcome = service.analyze_team(&AnalysisRequest::new(profile))?;
        println!();
        println!("=== TEAM ANALYSIS ({}) ===", outcome.data_source);
        println!("  delivery risk:  {}", outcome.analysis.delivery_risk);
        println!("  suitability:    {}", outcome.analysis.project_suitability);
        for strength in &outcome.analysis.team_strengths {
            println!("  + {strength}");
        }
        for risk in &outcome.analysis.risk_factors {
            println!("  - {risk}");
        }
        if let Some(warning) = &outcome.warning {
            println!("  warning:        {warning}");
        }
    }

    println!();
    println!("=== CAPACITY (next 6 months) ===");
    let dashboard = service.dashboard_metrics()?;
    for sample in &dashboard.capacity_forecast.forecast_data {
        println!(
            "  {} | available: {:>3} | freeing up: {:>2} | utilization: {:.1}%",
            sample.date, sample.available_employees, sample.becoming_available, sample.utilization_rate
        );
    }

    println!();
    println!("=== TOP SKILL GAPS ===");
    for gap in dashboard.skill_gaps.iter().filter(|g| g.is_gap) {
        println!(
            "  {:<20} {:?} | {} of {} recommended ({:.1}%)",
            gap.skill_name, gap.priority, gap.current_count, gap.recommended_count, gap.coverage_percentage
        );
    }
    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
