//! AnalyticsService: the entry points a host application calls.
//!
//! Wires the components together over one employee store:
//!   1. analyze_team        TeamAnalyzer, soft-failing to the fallback report
//!   2. compare_teams       analyze_team per team, one scoped thread each
//!   3. match_employees     MatchScorer over the full pool
//!   4. profile_for_matches ProfileAggregator over a match result
//!   5. team_effectiveness  EffectivenessCalculator over resolved ids
//!   6. capacity_forecast / skill_gaps / dashboard_metrics
//!   7. service_health
//!
//! RULES:
//!   - Every call reads a fresh snapshot from the store; nothing is cached.
//!   - The service never writes to the store.

use crate::{
    capacity::{CapacityForecast, CapacityForecaster},
    clock::Clock,
    config::{FailurePolicy, StaffingConfig},
    effectiveness::{EffectivenessCalculator, TeamEffectivenessReport},
    error::{StaffError, StaffResult},
    match_scorer::{MatchCandidate, MatchScorer, RemoteScorer},
    profile_aggregator::ProfileAggregator,
    skill_gap::{SkillGapAnalysis, SkillGapAnalyzer},
    store::EmployeeStore,
    team_analysis::{AITeamAnalysis, RiskLevel},
    team_analyzer::TeamAnalyzer,
    team_profile::TeamProfile,
    types::EmployeeId,
};
use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{sync::Arc, thread, time::Instant};

pub const FALLBACK_WARNING: &str = "AI analysis unavailable, using fallback analysis";
pub const FULL_DATA_SOURCE: &str = "AI Analytics Engine";
pub const FALLBACK_DATA_SOURCE: &str = "Fallback Analysis Engine";

const FORECAST_MONTHS: u32 = 12;
const DASHBOARD_FORECAST_MONTHS: u32 = 6;
const DASHBOARD_TOP_GAPS: usize = 10;

// ── Request / response types ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub team_profile: TeamProfile,
    #[serde(default)]
    pub project_context: Option<String>,
    #[serde(default = "default_detailed")]
    pub include_detailed_insights: bool,
}

fn default_detailed() -> bool {
    true
}

impl AnalysisRequest {
    pub fn new(team_profile: TeamProfile) -> Self {
        Self { team_profile, project_context: None, include_detailed_insights: true }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.project_context = Some(context.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutcome {
    pub analysis: AITeamAnalysis,
    /// false when the fallback report was substituted.
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub processing_time_ms: u64,
    pub data_source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamComparisonEntry {
    /// 1-based, in request order.
    pub team_index: usize,
    pub risk_level: RiskLevel,
    pub strength_count: usize,
    pub risk_count: usize,
    pub recommendation_count: usize,
    pub confidence_score: u8,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamComparison {
    pub team_count: usize,
    pub timestamp: DateTime<Utc>,
    pub overall_insights: Vec<String>,
    pub teams: Vec<TeamComparisonEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub capacity_forecast: CapacityForecast,
    pub skill_gaps: Vec<SkillGapAnalysis>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceHealthStatus {
    pub is_healthy: bool,
    pub status: String,
    pub last_checked: DateTime<Utc>,
    pub available_features: Vec<String>,
    pub version: String,
}

// ── Service ──────────────────────────────────────────────────────────────────

pub struct AnalyticsService<S: EmployeeStore> {
    store: S,
    config: StaffingConfig,
    clock: Arc<dyn Clock>,
    analyzer: TeamAnalyzer,
    scorer: MatchScorer,
    aggregator: ProfileAggregator,
    effectiveness: EffectivenessCalculator,
}

impl<S: EmployeeStore> AnalyticsService<S> {
    pub fn new(store: S, config: StaffingConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            analyzer: TeamAnalyzer::new(Arc::clone(&clock)),
            scorer: MatchScorer::new(config.matching.clone()),
            aggregator: ProfileAggregator::new(&config),
            effectiveness: EffectivenessCalculator::new(&config, Arc::clone(&clock)),
            store,
            config,
            clock,
        }
    }

    /// Route matching through `remote` instead of keyword overlap.
    pub fn with_remote_scorer(mut self, remote: Arc<dyn RemoteScorer>) -> Self {
        self.scorer = MatchScorer::new(self.config.matching.clone()).with_remote(remote);
        self
    }

    /// Swap the analyzer, e.g. for a custom rule battery.
    pub fn with_analyzer(mut self, analyzer: TeamAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &StaffingConfig {
        &self.config
    }

    /// The clock every report and default date range is taken from.
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    // ── Team analysis ────────────────────────────────────────────────────────

    pub fn analyze_team(&self, request: &AnalysisRequest) -> StaffResult<AnalysisOutcome> {
        run_analysis(&self.analyzer, self.config.analysis.failure_policy, request)
    }

    /// Analyze 2..=5 teams independently and summarize them side by side.
    pub fn compare_teams(&self, requests: &[AnalysisRequest]) -> StaffResult<TeamComparison> {
        let (min, max) = (self.config.analysis.min_compared_teams, self.config.analysis.max_compared_teams);
        if requests.len() < min || requests.len() > max {
            return Err(StaffError::ComparisonSize { min, max, actual: requests.len() });
        }

        let analyzer = &self.analyzer;
        let policy = self.config.analysis.failure_policy;
        let outcomes: Vec<StaffResult<AnalysisOutcome>> = thread::scope(|scope| {
            let handles: Vec<_> = requests
                .iter()
                .map(|request| scope.spawn(move || run_analysis(analyzer, policy, request)))
                .collect();
            handles
                .into_iter()
                .map(|handle| {
                    handle.join().unwrap_or_else(|_| {
                        Err(StaffError::Processing { reason: "team analysis thread panicked".into() })
                    })
                })
                .collect()
        });

        let analyses = outcomes
            .into_iter()
            .map(|outcome| outcome.map(|o| o.analysis))
            .collect::<StaffResult<Vec<_>>>()?;

        log::info!("Compared {} teams", analyses.len());
        Ok(build_comparison(&analyses, self.clock.now()))
    }

    // ── Matching ─────────────────────────────────────────────────────────────

    pub fn match_employees(
        &self,
        required_skills: &[String],
        required_technologies: &[String],
    ) -> StaffResult<Vec<MatchCandidate>> {
        let pool = self.store.list_employees()?;
        self.scorer.score(required_skills, required_technologies, &pool)
    }

    /// Profile of the matched employees, carrying their match scores.
    pub fn profile_for_matches(&self, matches: &[MatchCandidate]) -> TeamProfile {
        let employees: Vec<_> = matches.iter().map(|m| m.employee.clone()).collect();
        self.aggregator.aggregate(&employees, Some(matches), self.clock.today())
    }

    // ── Organisation analytics ───────────────────────────────────────────────

    /// Evaluate the employees behind `ids`. Unknown ids are skipped.
    pub fn team_effectiveness(
        &self,
        ids: &[EmployeeId],
        requirements: &str,
    ) -> StaffResult<TeamEffectivenessReport> {
        let mut members = Vec::with_capacity(ids.len());
        for &id in ids {
            match self.store.get_employee(id)? {
                Some(employee) => members.push(employee.to_member_summary()),
                None => log::warn!("Skipping unknown employee {id} in effectiveness request"),
            }
        }
        Ok(self.effectiveness.evaluate(&members, requirements))
    }

    /// Defaults: start today, end twelve months after start.
    pub fn capacity_forecast(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> StaffResult<CapacityForecast> {
        let start = start.unwrap_or_else(|| self.clock.today());
        let end = match end {
            Some(end) => end,
            None => months_after(start, FORECAST_MONTHS)?,
        };
        let employees = self.store.list_employees()?;
        CapacityForecaster::forecast(start, end, &employees)
    }

    pub fn skill_gaps(&self) -> StaffResult<Vec<SkillGapAnalysis>> {
        let employees = self.store.list_employees()?;
        Ok(SkillGapAnalyzer::new(&self.config.critical_skills).analyze(&employees))
    }

    pub fn dashboard_metrics(&self) -> StaffResult<DashboardMetrics> {
        let today = self.clock.today();
        let employees = self.store.list_employees()?;
        let capacity_forecast =
            CapacityForecaster::forecast(today, months_after(today, DASHBOARD_FORECAST_MONTHS)?, &employees)?;
        let mut skill_gaps = SkillGapAnalyzer::new(&self.config.critical_skills).analyze(&employees);
        skill_gaps.truncate(DASHBOARD_TOP_GAPS);
        Ok(DashboardMetrics { capacity_forecast, skill_gaps, generated_at: self.clock.now() })
    }

    pub fn service_health(&self) -> ServiceHealthStatus {
        ServiceHealthStatus {
            is_healthy: true,
            status: "Operational".into(),
            last_checked: self.clock.now(),
            available_features: [
                "Team Analysis",
                "Risk Assessment",
                "Skill Gap Analysis",
                "Project Suitability Assessment",
                "Team Dynamics Evaluation",
                "Strategic Recommendations",
            ]
            .iter()
            .map(|f| f.to_string())
            .collect(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

fn run_analysis(
    analyzer: &TeamAnalyzer,
    policy: FailurePolicy,
    request: &AnalysisRequest,
) -> StaffResult<AnalysisOutcome> {
    let started = Instant::now();
    let profile = &request.team_profile;
    profile.check()?;

    let (mut analysis, success, warning) =
        match analyzer.analyze(profile, request.project_context.as_deref()) {
            Ok(analysis) => (analysis, true, None),
            Err(e) if policy == FailurePolicy::Fallback => {
                log::warn!("Team analysis failed ({e}), using fallback analysis");
                let mut fallback = analyzer.fallback_analyze(profile);
                fallback.project_context = request.project_context.clone();
                (fallback, false, Some(FALLBACK_WARNING.to_string()))
            }
            Err(e) => return Err(e),
        };

    if !request.include_detailed_insights {
        analysis.key_insights.clear();
    }

    let processing_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    log::info!(
        "Team analysis completed in {processing_time_ms}ms with {} status",
        if success { "success" } else { "fallback" }
    );
    Ok(AnalysisOutcome {
        analysis,
        success,
        warning,
        processing_time_ms,
        data_source: if success { FULL_DATA_SOURCE } else { FALLBACK_DATA_SOURCE }.into(),
    })
}

fn build_comparison(analyses: &[AITeamAnalysis], timestamp: DateTime<Utc>) -> TeamComparison {
    let tally = |level: RiskLevel| analyses.iter().filter(|a| a.risk_level() == level).count();
    let avg_confidence = if analyses.is_empty() {
        0.0
    } else {
        analyses.iter().map(|a| a.confidence_score as f64).sum::<f64>() / analyses.len() as f64
    };

    TeamComparison {
        team_count: analyses.len(),
        timestamp,
        overall_insights: vec![
            format!("Analyzed {} teams for comparative assessment", analyses.len()),
            format!(
                "Risk levels: {} low, {} medium, {} high",
                tally(RiskLevel::Low),
                tally(RiskLevel::Medium),
                tally(RiskLevel::High)
            ),
            format!("Average confidence score: {avg_confidence:.1}%"),
        ],
        teams: analyses
            .iter()
            .enumerate()
            .map(|(i, a)| TeamComparisonEntry {
                team_index: i + 1,
                risk_level: a.risk_level(),
                strength_count: a.team_strengths.len(),
                risk_count: a.risk_factors.len(),
                recommendation_count: a.recommendations.len(),
                confidence_score: a.confidence_score,
                summary: a.project_suitability.clone(),
            })
            .collect(),
    }
}

fn months_after(date: NaiveDate, months: u32) -> StaffResult<NaiveDate> {
    date.checked_add_months(Months::new(months)).ok_or_else(|| StaffError::Processing {
        reason: format!("{date} + {months} months is out of range"),
    })
}
