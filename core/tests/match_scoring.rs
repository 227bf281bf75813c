//! MatchScorer: strategy selection, ordering, exclusion of unscored
//! candidates, and the failure policy around the remote scorer.

use staffing_core::{
    config::{FailurePolicy, MatchingConfig, StaffingConfig},
    employee::EmployeeRecord,
    error::{StaffError, StaffResult},
    match_scorer::{MatchScorer, RemoteScorer, ScoringRequest},
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

fn employee(id: i64, skills: &str, technologies: &str) -> EmployeeRecord {
    EmployeeRecord {
        id,
        name: format!("Employee {id}"),
        email: None,
        role: "Developer".into(),
        skills: skills.into(),
        technologies: technologies.into(),
        department: "Engineering".into(),
        experience_years: 3,
        rating: None,
        is_on_project: false,
        current_project_name: None,
        project_end_date: None,
        avatar_url: None,
    }
}

fn pool() -> Vec<EmployeeRecord> {
    vec![
        employee(1, "React, TypeScript", "Next.js"),
        employee(2, "C#, SQL Server", ".NET"),
        employee(3, "React, Node.js", "Docker"),
        employee(4, "Figma", "Sketch"),
    ]
}

fn matching(policy: FailurePolicy, timeout_ms: u64) -> MatchingConfig {
    MatchingConfig {
        failure_policy: policy,
        timeout_ms,
        ..StaffingConfig::builtin().matching
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Answers every request with the same text and records the prompts seen.
struct FixedScorer {
    reply: String,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl FixedScorer {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self { reply: reply.into(), calls: AtomicUsize::new(0), prompts: Mutex::new(Vec::new()) })
    }
}

impl RemoteScorer for FixedScorer {
    fn complete(&self, request: &ScoringRequest) -> StaffResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().expect("prompt log").push(request.prompt.clone());
        Ok(self.reply.clone())
    }
}

struct FailingScorer;

impl RemoteScorer for FailingScorer {
    fn complete(&self, _: &ScoringRequest) -> StaffResult<String> {
        Err(StaffError::UpstreamScoring("service returned 503".into()))
    }
}

struct SlowScorer;

impl RemoteScorer for SlowScorer {
    fn complete(&self, _: &ScoringRequest) -> StaffResult<String> {
        std::thread::sleep(Duration::from_millis(500));
        Ok("[]".into())
    }
}

#[test]
fn empty_requirements_return_no_matches_without_calling_remote() {
    let remote = FixedScorer::new("[{\"employeeId\": 1, \"matchScore\": 0.9}]");
    let scorer = MatchScorer::new(matching(FailurePolicy::Propagate, 1_000)).with_remote(remote.clone());

    let result = scorer.score(&[], &strings(&["  "]), &pool()).expect("score");
    assert!(result.is_empty(), "No requirements must mean no matches");
    assert_eq!(remote.calls.load(Ordering::SeqCst), 0, "Remote must not be called");
}

#[test]
fn empty_pool_returns_no_matches() {
    let scorer = MatchScorer::new(StaffingConfig::builtin().matching);
    let result = scorer.score(&strings(&["React"]), &[], &[]).expect("score");
    assert!(result.is_empty());
}

#[test]
fn remote_scores_are_sorted_descending_and_unscored_candidates_dropped() {
    let remote = FixedScorer::new(
        "Here are the scores:\n[\n  {\"employeeId\": 1, \"matchScore\": 0.6},\n  \
         {\"employeeId\": 3, \"matchScore\": 0.95},\n  {\"employeeId\": 4, \"matchScore\": 0.6}\n]\nHope this helps.",
    );
    let scorer = MatchScorer::new(matching(FailurePolicy::Propagate, 1_000)).with_remote(remote.clone());

    let result = scorer
        .score(&strings(&["React"]), &strings(&["Docker"]), &pool())
        .expect("score");
    let ids: Vec<i64> = result.iter().map(|m| m.employee.id).collect();
    assert_eq!(ids, vec![3, 1, 4], "Descending score; ties keep pool order; 2 was never scored");

    for pair in result.windows(2) {
        assert!(pair[0].match_score >= pair[1].match_score);
    }

    let prompts = remote.prompts.lock().expect("prompt log");
    assert!(prompts[0].contains("**Required Skills:** React"));
    assert!(prompts[0].contains("ID: 2, Name: Employee 2, Skills: C#, SQL Server, Technologies: .NET"));
}

#[test]
fn unparseable_remote_response_yields_no_matches() {
    let remote = FixedScorer::new("I could not score these employees.");
    let scorer = MatchScorer::new(matching(FailurePolicy::Propagate, 1_000)).with_remote(remote);
    let result = scorer.score(&strings(&["React"]), &[], &pool()).expect("parse failures are not errors");
    assert!(result.is_empty());
}

#[test]
fn remote_failure_propagates_by_default() {
    let scorer = MatchScorer::new(StaffingConfig::builtin().matching).with_remote(Arc::new(FailingScorer));
    let err = scorer.score(&strings(&["React"]), &[], &pool()).unwrap_err();
    assert!(matches!(err, StaffError::UpstreamScoring(_)), "Got {err:?}");
}

#[test]
fn remote_failure_falls_back_to_keyword_overlap_when_configured() {
    let scorer =
        MatchScorer::new(matching(FailurePolicy::Fallback, 1_000)).with_remote(Arc::new(FailingScorer));
    let result = scorer
        .score(&strings(&["React"]), &strings(&["Docker"]), &pool())
        .expect("fallback scores");

    assert_eq!(result.len(), 4, "Keyword overlap scores every candidate");
    assert_eq!(result[0].employee.id, 3);
    assert_eq!(result[0].match_score, 1.0);
    assert_eq!(result[1].employee.id, 1);
    assert_eq!(result[1].match_score, 0.5);
}

#[test]
fn slow_remote_times_out() {
    let scorer = MatchScorer::new(matching(FailurePolicy::Propagate, 50)).with_remote(Arc::new(SlowScorer));
    let err = scorer.score(&strings(&["React"]), &[], &pool()).unwrap_err();
    assert!(matches!(err, StaffError::ScoringTimeout { timeout_ms: 50 }), "Got {err:?}");
}

#[test]
fn keyword_overlap_is_used_without_a_remote() {
    let scorer = MatchScorer::new(StaffingConfig::builtin().matching);
    assert!(!scorer.has_remote());

    let result = scorer
        .score(&strings(&["sql server", "C#"]), &strings(&[".NET"]), &pool())
        .expect("score");
    assert_eq!(result[0].employee.id, 2);
    assert_eq!(result[0].match_score, 1.0, "Matching is case-insensitive");
    assert!(result[1..].iter().all(|m| m.match_score == 0.0));
    let tail: Vec<i64> = result[1..].iter().map(|m| m.employee.id).collect();
    assert_eq!(tail, vec![1, 3, 4], "Zero scores keep pool order");
}
