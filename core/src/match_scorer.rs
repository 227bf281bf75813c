//! Candidate matching against required skills and technologies.
//!
//! Scoring strategies:
//!   - Remote: a RemoteScorer (typically a hosted language model) answers a
//!     prompt with free text that embeds a JSON array of scores.
//!   - Keyword overlap: deterministic local scoring, used when no remote
//!     scorer is configured, and after a remote failure when the matching
//!     failure policy is Fallback.
//!
//! RULE: parse problems in a remote response never escape
//! `parse_score_response`. They degrade to "no candidates scored".

use crate::{
    config::{FailurePolicy, MatchingConfig},
    employee::{loosely_matches, EmployeeRecord},
    error::{StaffError, StaffResult},
    types::EmployeeId,
};
use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    collections::{hash_map::Entry, HashMap},
    fmt,
    sync::{mpsc, Arc},
    thread,
    time::Duration,
};

pub type ScoreMap = HashMap<EmployeeId, f64>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchCandidate {
    pub employee: EmployeeRecord,
    /// 0.0..=1.0
    pub match_score: f64,
}

/// Compact view of a candidate sent to the remote scorer.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateListing {
    pub id: EmployeeId,
    pub name: String,
    pub skills: String,
    pub technologies: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoringRequest {
    pub system_instruction: String,
    pub required_skills: Vec<String>,
    pub required_technologies: Vec<String>,
    pub candidates: Vec<CandidateListing>,
    /// Fully rendered user prompt.
    pub prompt: String,
}

/// A remote scoring service. Returns the raw response text.
pub trait RemoteScorer: Send + Sync {
    fn complete(&self, request: &ScoringRequest) -> StaffResult<String>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseFailure {
    /// No `[` ... `]` span in the response.
    NoArray,
    InvalidJson(String),
    DuplicateId(EmployeeId),
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseFailure::NoArray => f.write_str("no JSON array found in response"),
            ParseFailure::InvalidJson(e) => write!(f, "invalid score array: {e}"),
            ParseFailure::DuplicateId(id) => write!(f, "employee {id} scored more than once"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScoreEntry {
    #[serde(rename = "employeeId")]
    employee_id: EmployeeId,
    #[serde(rename = "matchScore")]
    match_score: f64,
}

/// Extract the score array spanning the first `[` to the last `]`.
pub fn parse_score_response(text: &str) -> Result<ScoreMap, ParseFailure> {
    let (start, end) = match (text.find('['), text.rfind(']')) {
        (Some(start), Some(end)) if end > start => (start, end),
        _ => return Err(ParseFailure::NoArray),
    };
    let entries: Vec<ScoreEntry> = serde_json::from_str(&text[start..=end])
        .map_err(|e| ParseFailure::InvalidJson(e.to_string()))?;

    let mut scores = ScoreMap::with_capacity(entries.len());
    for entry in entries {
        match scores.entry(entry.employee_id) {
            Entry::Occupied(_) => return Err(ParseFailure::DuplicateId(entry.employee_id)),
            Entry::Vacant(slot) => {
                slot.insert(entry.match_score.clamp(0.0, 1.0));
            }
        }
    }
    Ok(scores)
}

/// Render the user prompt for the remote scorer.
pub fn build_prompt(
    required_skills: &[String],
    required_technologies: &[String],
    candidates: &[CandidateListing],
) -> String {
    let join_or_none = |items: &[String]| {
        if items.is_empty() { "None".to_string() } else { items.join(", ") }
    };
    let or_none = |s: &str| if s.trim().is_empty() { "None".to_string() } else { s.to_string() };
    let listing = candidates
        .iter()
        .map(|c| {
            format!(
                "ID: {}, Name: {}, Skills: {}, Technologies: {}",
                c.id,
                c.name,
                or_none(&c.skills),
                or_none(&c.technologies)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "I need to match employees for a project with the following requirements:\n\
         \n\
         **Required Skills:** {skills}\n\
         **Required Technologies:** {technologies}\n\
         \n\
         **Available Employees:**\n\
         {listing}\n\
         \n\
         IMPORTANT: You must respond with ONLY a valid JSON array in this exact format:\n\
         [\n  {{\"employeeId\": 1, \"matchScore\": 0.85}},\n  {{\"employeeId\": 2, \"matchScore\": 0.72}}\n]\n\
         \n\
         Match scoring criteria:\n\
         - Score each employee with a decimal between 0.0 and 1.0\n\
         - Consider both skills and technologies alignment with the requirements\n\
         - 0.7-1.0 for strong alignment, 0.4-0.6 for partial alignment, 0.1-0.3 for minimal alignment\n\
         - Include ALL employees, even those with low scores\n\
         - Use the field names employeeId and matchScore exactly\n\
         \n\
         Respond with ONLY the JSON array, no explanations or additional text.",
        skills = join_or_none(required_skills),
        technologies = join_or_none(required_technologies),
    )
}

/// Share of requirements met by any of the candidate's skill or technology
/// tokens. Every candidate gets a score.
pub fn keyword_overlap_scores(requirements: &[String], candidates: &[EmployeeRecord]) -> ScoreMap {
    candidates
        .iter()
        .map(|employee| {
            let tokens: Vec<&str> = employee
                .skill_tokens()
                .into_iter()
                .chain(employee.technology_tokens())
                .collect();
            let matched = requirements
                .iter()
                .filter(|req| tokens.iter().any(|t| loosely_matches(t, req)))
                .count();
            let score = if requirements.is_empty() {
                0.0
            } else {
                matched as f64 / requirements.len() as f64
            };
            (employee.id, score)
        })
        .collect()
}

pub struct MatchScorer {
    config: MatchingConfig,
    remote: Option<Arc<dyn RemoteScorer>>,
}

impl MatchScorer {
    /// A scorer with no remote strategy: keyword overlap only.
    pub fn new(config: MatchingConfig) -> Self {
        Self { config, remote: None }
    }

    pub fn with_remote(mut self, remote: Arc<dyn RemoteScorer>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Score `candidates`, best first.
    ///
    /// Candidates the remote scorer leaves out are dropped, not zeroed.
    pub fn score(
        &self,
        required_skills: &[String],
        required_technologies: &[String],
        candidates: &[EmployeeRecord],
    ) -> StaffResult<Vec<MatchCandidate>> {
        let skills = normalize_requirements(required_skills);
        let technologies = normalize_requirements(required_technologies);

        if skills.is_empty() && technologies.is_empty() {
            log::info!("No skills or technologies requested, returning no matches");
            return Ok(Vec::new());
        }
        if candidates.is_empty() {
            log::info!("Empty candidate pool, returning no matches");
            return Ok(Vec::new());
        }

        let scores = match &self.remote {
            Some(remote) => self.remote_scores(remote, &skills, &technologies, candidates)?,
            None => {
                let requirements: Vec<String> =
                    skills.iter().chain(technologies.iter()).cloned().collect();
                keyword_overlap_scores(&requirements, candidates)
            }
        };

        let mut results: Vec<MatchCandidate> = candidates
            .iter()
            .filter_map(|employee| {
                scores.get(&employee.id).map(|&match_score| MatchCandidate {
                    employee: employee.clone(),
                    match_score,
                })
            })
            .collect();
        // sort_by is stable: equal scores keep pool order.
        results.sort_by(|a, b| {
            b.match_score
                .partial_cmp(&a.match_score)
                .unwrap_or(Ordering::Equal)
        });

        log::info!(
            "Scored {} of {} candidates against {} skills / {} technologies",
            results.len(),
            candidates.len(),
            skills.len(),
            technologies.len()
        );
        Ok(results)
    }

    fn remote_scores(
        &self,
        remote: &Arc<dyn RemoteScorer>,
        skills: &[String],
        technologies: &[String],
        candidates: &[EmployeeRecord],
    ) -> StaffResult<ScoreMap> {
        let listing: Vec<CandidateListing> = candidates
            .iter()
            .map(|e| CandidateListing {
                id: e.id,
                name: e.name.clone(),
                skills: e.skills.clone(),
                technologies: e.technologies.clone(),
            })
            .collect();
        let request = ScoringRequest {
            system_instruction: self.config.system_instruction.clone(),
            prompt: build_prompt(skills, technologies, &listing),
            required_skills: skills.to_vec(),
            required_technologies: technologies.to_vec(),
            candidates: listing,
        };

        match self.call_remote(Arc::clone(remote), request) {
            Ok(text) => Ok(parse_score_response(&text).unwrap_or_else(|failure| {
                log::warn!("Discarding remote scores: {failure}");
                ScoreMap::new()
            })),
            Err(e) => match self.config.failure_policy {
                FailurePolicy::Propagate => Err(e),
                FailurePolicy::Fallback => {
                    log::warn!("Remote scoring failed ({e}), using keyword overlap");
                    let requirements: Vec<String> =
                        skills.iter().chain(technologies.iter()).cloned().collect();
                    Ok(keyword_overlap_scores(&requirements, candidates))
                }
            },
        }
    }

    /// Run the remote call on a worker thread bounded by the configured
    /// timeout. A timeout of 0 waits indefinitely. A timed-out worker is
    /// abandoned; its late answer is dropped.
    fn call_remote(
        &self,
        remote: Arc<dyn RemoteScorer>,
        request: ScoringRequest,
    ) -> StaffResult<String> {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("remote-scorer".into())
            .spawn(move || {
                let _ = tx.send(remote.complete(&request));
            })
            .map_err(|e| StaffError::UpstreamScoring(format!("cannot start scorer thread: {e}")))?;

        let timeout_ms = self.config.timeout_ms;
        let received = if timeout_ms == 0 {
            rx.recv().map_err(|_| disconnected())
        } else {
            rx.recv_timeout(Duration::from_millis(timeout_ms))
                .map_err(|e| match e {
                    mpsc::RecvTimeoutError::Timeout => StaffError::ScoringTimeout { timeout_ms },
                    mpsc::RecvTimeoutError::Disconnected => disconnected(),
                })
        };
        received?
    }
}

fn disconnected() -> StaffError {
    StaffError::UpstreamScoring("scorer exited without a response".into())
}

/// Trim, drop blanks, de-duplicate keeping the first occurrence.
fn normalize_requirements(items: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let item = item.trim();
        if !item.is_empty() && !out.iter().any(|seen| seen == item) {
            out.push(item.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parser_takes_first_open_and_last_close_bracket() {
        let text = "Sure! Here you go:\n[{\"employeeId\": 3, \"matchScore\": 0.5}]\nThanks.";
        let scores = parse_score_response(text).unwrap();
        assert_eq!(scores.get(&3), Some(&0.5));
    }

    #[test]
    fn parser_rejects_prose_and_duplicates() {
        assert_eq!(parse_score_response("no scores today"), Err(ParseFailure::NoArray));
        assert_eq!(parse_score_response("] backwards ["), Err(ParseFailure::NoArray));
        assert!(matches!(
            parse_score_response("[{\"employeeId\": \"x\"}]"),
            Err(ParseFailure::InvalidJson(_))
        ));
        assert_eq!(
            parse_score_response(
                "[{\"employeeId\": 1, \"matchScore\": 0.2}, {\"employeeId\": 1, \"matchScore\": 0.4}]"
            ),
            Err(ParseFailure::DuplicateId(1))
        );
    }

    #[test]
    fn out_of_range_scores_are_clamped() {
        let scores = parse_score_response(
            "[{\"employeeId\": 1, \"matchScore\": 1.7}, {\"employeeId\": 2, \"matchScore\": -0.3}]",
        )
        .unwrap();
        assert_eq!(scores[&1], 1.0);
        assert_eq!(scores[&2], 0.0);
    }

    #[test]
    fn requirements_are_deduplicated_in_order() {
        let raw = vec![" React".to_string(), "".into(), "Node.js".into(), "React".into()];
        assert_eq!(normalize_requirements(&raw), vec!["React", "Node.js"]);
    }
}
