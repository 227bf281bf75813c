//! Organisation-wide coverage of the tracked critical skills.
//!
//! A skill is a gap below 20% coverage. Priority:
//!   Critical  high-priority skill under 15%
//!   High      under 10%
//!   Medium    under 20%
//!   Low       otherwise
//! Output: priority descending, then coverage ascending.

use crate::{
    config::CriticalSkillsConfig,
    employee::EmployeeRecord,
    types::Percent,
};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, collections::HashMap};

/// Coverage every critical skill should reach.
pub const TARGET_COVERAGE: f64 = 0.20;
const CRITICAL_BELOW: Percent = 15.0;
const HIGH_BELOW: Percent = 10.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SkillPriority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkillGapAnalysis {
    pub skill_name: String,
    pub current_count: usize,
    pub recommended_count: usize,
    pub coverage_percentage: Percent,
    pub is_gap: bool,
    pub priority: SkillPriority,
}

pub struct SkillGapAnalyzer<'a> {
    config: &'a CriticalSkillsConfig,
}

impl<'a> SkillGapAnalyzer<'a> {
    pub fn new(config: &'a CriticalSkillsConfig) -> Self {
        Self { config }
    }

    pub fn analyze(&self, employees: &[EmployeeRecord]) -> Vec<SkillGapAnalysis> {
        // Exact, case-sensitive token match; each employee counted once.
        let mut holders: HashMap<&str, usize> = HashMap::new();
        for employee in employees {
            let mut own = employee.skill_tokens();
            own.sort_unstable();
            own.dedup();
            for skill in own {
                *holders.entry(skill).or_default() += 1;
            }
        }

        let total = employees.len();
        let target = (total as f64 * TARGET_COVERAGE).ceil() as usize;

        let mut gaps: Vec<SkillGapAnalysis> = self
            .config
            .skills
            .iter()
            .map(|skill| {
                let current = holders.get(skill.as_str()).copied().unwrap_or(0);
                let coverage = if total == 0 {
                    0.0
                } else {
                    current as f64 / total as f64 * 100.0
                };
                SkillGapAnalysis {
                    skill_name: skill.clone(),
                    current_count: current,
                    recommended_count: current.max(target),
                    coverage_percentage: coverage,
                    is_gap: coverage < TARGET_COVERAGE * 100.0,
                    priority: self.priority(skill, coverage),
                }
            })
            .collect();

        gaps.sort_by(|a, b| {
            b.priority.cmp(&a.priority).then(
                a.coverage_percentage
                    .partial_cmp(&b.coverage_percentage)
                    .unwrap_or(Ordering::Equal),
            )
        });
        gaps
    }

    fn priority(&self, skill: &str, coverage: Percent) -> SkillPriority {
        if coverage < CRITICAL_BELOW && self.config.high_priority.iter().any(|s| s == skill) {
            SkillPriority::Critical
        } else if coverage < HIGH_BELOW {
            SkillPriority::High
        } else if coverage < TARGET_COVERAGE * 100.0 {
            SkillPriority::Medium
        } else {
            SkillPriority::Low
        }
    }
}
