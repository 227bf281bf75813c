//! AnalyticsService end to end: the soft-fail contract, team comparison,
//! and the store-backed entry points.

use chrono::NaiveDate;
use staffing_core::{
    analytics_service::{AnalysisRequest, AnalyticsService, FALLBACK_DATA_SOURCE, FALLBACK_WARNING},
    clock::{Clock, FixedClock},
    config::{FailurePolicy, StaffingConfig},
    employee::EmployeeRecord,
    error::{StaffError, StaffResult},
    roster::RosterGenerator,
    store::StaffStore,
    team_analysis::{AnalysisBuilder, AnalysisMode, RiskLevel},
    team_analyzer::{standard_rules, NamedRule, TeamAnalyzer},
    team_profile::TeamProfile,
};
use std::collections::BTreeMap;
use std::sync::Arc;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date")
}

fn clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock::on(today()))
}

fn employee(id: i64, role: &str, skills: &str, years: u32, end: Option<NaiveDate>) -> EmployeeRecord {
    EmployeeRecord {
        id,
        name: format!("Employee {id}"),
        email: None,
        role: role.into(),
        skills: skills.into(),
        technologies: String::new(),
        department: "Engineering".into(),
        experience_years: years,
        rating: Some(4.2),
        is_on_project: end.is_some(),
        current_project_name: end.map(|_| "Portal".into()),
        project_end_date: end,
        avatar_url: None,
    }
}

fn roster() -> Vec<EmployeeRecord> {
    vec![
        employee(1, "Frontend Developer", "React, TypeScript", 4, None),
        employee(2, "Backend Developer", "C#, SQL Server", 7, NaiveDate::from_ymd_opt(2025, 5, 15)),
        employee(3, "DevOps Engineer", "Azure, Docker", 5, None),
        employee(4, "Designer", "Figma, UI/UX Design", 3, NaiveDate::from_ymd_opt(2026, 1, 1)),
    ]
}

fn service() -> AnalyticsService<Vec<EmployeeRecord>> {
    let _ = env_logger::builder().is_test(true).try_init();
    AnalyticsService::new(roster(), StaffingConfig::builtin(), clock())
}

fn team(total: i32, available: i32) -> AnalysisRequest {
    AnalysisRequest::new(TeamProfile {
        total_members: total,
        available_members: available,
        skills_breakdown: BTreeMap::from([("Backend".to_string(), 50.0), ("Frontend".to_string(), 50.0)]),
        avg_experience: 5.0,
        departments: BTreeMap::new(),
        avg_match_score: 80.0,
    })
}

fn broken_rule(_: &TeamProfile, _: &mut AnalysisBuilder) -> StaffResult<()> {
    Err(StaffError::Processing { reason: "analysis engine offline".into() })
}

fn broken_analyzer() -> TeamAnalyzer {
    let mut rules = standard_rules();
    rules.push(NamedRule { name: "broken", apply: broken_rule });
    TeamAnalyzer::with_rules(rules, clock())
}

#[test]
fn successful_analysis_reports_full_source() {
    let outcome = service().analyze_team(&team(6, 3).with_context("Retail portal")).expect("analysis");
    assert!(outcome.success);
    assert!(outcome.warning.is_none());
    assert_eq!(outcome.data_source, "AI Analytics Engine");
    assert_eq!(outcome.analysis.project_context.as_deref(), Some("Retail portal"));
}

#[test]
fn failing_rich_path_soft_fails_to_fallback_report() {
    let service = service().with_analyzer(broken_analyzer());
    let outcome = service.analyze_team(&team(6, 4)).expect("soft fail, not an error");

    assert!(!outcome.success);
    assert_eq!(outcome.warning.as_deref(), Some(FALLBACK_WARNING));
    assert_eq!(outcome.data_source, FALLBACK_DATA_SOURCE);
    assert_eq!(outcome.analysis.mode, AnalysisMode::Fallback);
    assert_eq!(outcome.analysis.confidence_score, 60);
    assert!(outcome.analysis.is_complete());
}

#[test]
fn propagate_policy_returns_the_rich_path_error() {
    let mut config = StaffingConfig::builtin();
    config.analysis.failure_policy = FailurePolicy::Propagate;
    let service = AnalyticsService::new(roster(), config, clock()).with_analyzer(broken_analyzer());

    let err = service.analyze_team(&team(6, 4)).unwrap_err();
    assert!(matches!(err, StaffError::Processing { .. }), "Got {err:?}");
}

#[test]
fn invalid_profile_is_rejected_even_with_fallback() {
    let err = service().analyze_team(&team(0, 0)).unwrap_err();
    assert!(err.is_validation(), "Got {err:?}");
}

#[test]
fn detailed_insights_can_be_omitted() {
    let mut request = team(6, 3);
    request.include_detailed_insights = false;
    let outcome = service().analyze_team(&request).expect("analysis");
    assert!(outcome.analysis.key_insights.is_empty());
    assert!(outcome.analysis.is_complete());
}

#[test]
fn compare_teams_enforces_bounds() {
    let service = service();
    for n in [0usize, 1, 6] {
        let requests: Vec<AnalysisRequest> = (0..n).map(|_| team(6, 3)).collect();
        let err = service.compare_teams(&requests).unwrap_err();
        assert!(
            matches!(err, StaffError::ComparisonSize { min: 2, max: 5, actual } if actual == n),
            "{n} teams: {err:?}"
        );
    }
}

#[test]
fn compare_teams_summarizes_each_team_in_order() {
    let requests = vec![team(10, 1), team(10, 5), team(10, 9)];
    let comparison = service().compare_teams(&requests).expect("comparison");

    assert_eq!(comparison.team_count, 3);
    assert_eq!(comparison.overall_insights[0], "Analyzed 3 teams for comparative assessment");
    assert_eq!(comparison.overall_insights[1], "Risk levels: 1 low, 1 medium, 1 high");
    assert_eq!(comparison.overall_insights[2], "Average confidence score: 85.0%");

    let levels: Vec<RiskLevel> = comparison.teams.iter().map(|t| t.risk_level).collect();
    assert_eq!(levels, vec![RiskLevel::High, RiskLevel::Medium, RiskLevel::Low]);
    let indices: Vec<usize> = comparison.teams.iter().map(|t| t.team_index).collect();
    assert_eq!(indices, vec![1, 2, 3]);
}

#[test]
fn compare_teams_propagates_invalid_profiles() {
    let err = service().compare_teams(&[team(6, 3), team(3, 9)]).unwrap_err();
    assert!(err.is_validation(), "Got {err:?}");
}

#[test]
fn matches_feed_a_team_profile() {
    let service = service();
    let matches = service
        .match_employees(&["React".into(), "Azure".into()], &[])
        .expect("matches");
    assert_eq!(matches.len(), 4);
    assert_eq!(matches[0].match_score, 0.5);

    let top: Vec<_> = matches.iter().filter(|m| m.match_score > 0.0).cloned().collect();
    let profile = service.profile_for_matches(&top);
    assert_eq!(profile.total_members, 2);
    assert_eq!(profile.available_members, 2);
    assert!((profile.avg_match_score - 50.0).abs() < 1e-9);
}

#[test]
fn effectiveness_skips_unknown_ids() {
    let report = service().team_effectiveness(&[1, 3, 99], "React on Azure").expect("report");
    assert_eq!(report.team_members.len(), 2);
    assert_eq!(report.skills_coverage, 100.0);
}

#[test]
fn capacity_forecast_defaults_to_a_year_from_today() {
    let forecast = service().capacity_forecast(None, None).expect("forecast");
    assert_eq!(forecast.start_date, today());
    assert_eq!(forecast.end_date, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
    assert_eq!(forecast.forecast_data.len(), 13);
    assert_eq!(forecast.forecast_data[0].available_employees, 2);
    assert_eq!(forecast.forecast_data[3].available_employees, 3, "Employee 2 is free by June");
}

#[test]
fn dashboard_covers_six_months_and_top_ten_gaps() {
    let metrics = service().dashboard_metrics().expect("dashboard");
    assert_eq!(metrics.capacity_forecast.forecast_data.len(), 7);
    assert_eq!(metrics.skill_gaps.len(), 10);
}

#[test]
fn service_exposes_the_injected_clock() {
    let service = service();
    assert_eq!(service.clock().today(), today());
    assert_eq!(service.service_health().last_checked, service.clock().now());
}

#[test]
fn health_reports_crate_version() {
    let health = service().service_health();
    assert!(health.is_healthy);
    assert_eq!(health.status, "Operational");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(health.available_features.len(), 6);
}

#[test]
fn sqlite_store_backs_the_service() {
    let store = StaffStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    let people = RosterGenerator::generate(2024, 25, today());
    for person in &people {
        store.insert_employee(person).expect("insert");
    }
    assert_eq!(store.employee_count().expect("count"), 25);

    let service = AnalyticsService::new(store, StaffingConfig::builtin(), clock());
    let gaps = service.skill_gaps().expect("gaps");
    let in_memory = AnalyticsService::new(people, StaffingConfig::builtin(), clock())
        .skill_gaps()
        .expect("gaps");
    assert_eq!(gaps, in_memory, "SQLite round trip must not change the analytics");
}
