//! Reduces raw employee records into a TeamProfile.
//!
//! Skill tokens are bucketed into the first configured category with a
//! keyword that contains, or is contained in, the token (case-insensitive).
//! Tokens no category claims go to the fallback category.
//!
//! Pure: same records in the same order give the same profile.

use crate::{
    config::{SkillCategoryConfig, StaffingConfig},
    employee::{AvailabilityStatus, EmployeeRecord},
    match_scorer::MatchCandidate,
    team_profile::TeamProfile,
    types::EmployeeId,
};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

const UNKNOWN_DEPARTMENT: &str = "Unknown";

pub struct ProfileAggregator {
    categories: Vec<LoweredCategory>,
    fallback_category: String,
}

struct LoweredCategory {
    name: String,
    keywords: Vec<String>,
}

impl ProfileAggregator {
    pub fn new(config: &StaffingConfig) -> Self {
        Self::with_categories(&config.skill_categories, &config.fallback_category)
    }

    pub fn with_categories(categories: &[SkillCategoryConfig], fallback_category: &str) -> Self {
        Self {
            categories: categories
                .iter()
                .map(|c| LoweredCategory {
                    name: c.name.clone(),
                    keywords: c.keywords.iter().map(|k| k.to_lowercase()).collect(),
                })
                .collect(),
            fallback_category: fallback_category.to_string(),
        }
    }

    /// Category a single skill token falls into.
    pub fn categorize(&self, skill: &str) -> &str {
        let token = skill.trim().to_lowercase();
        if token.is_empty() {
            return &self.fallback_category;
        }
        self.categories
            .iter()
            .find(|c| {
                c.keywords
                    .iter()
                    .any(|k| token.contains(k.as_str()) || k.contains(token.as_str()))
            })
            .map(|c| c.name.as_str())
            .unwrap_or(&self.fallback_category)
    }

    /// Build a profile for `employees`.
    ///
    /// `matches` carries the outcome of a prior match pass; employees missing
    /// from it contribute a score of 0. Without a match pass the average is 0.
    pub fn aggregate(
        &self,
        employees: &[EmployeeRecord],
        matches: Option<&[MatchCandidate]>,
        today: NaiveDate,
    ) -> TeamProfile {
        let total = employees.len();
        let available = employees
            .iter()
            .filter(|e| e.availability_status(today) == AvailabilityStatus::Available)
            .count();

        let mut category_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut token_count = 0usize;
        for skill in employees.iter().flat_map(|e| e.skill_tokens()) {
            *category_counts.entry(self.categorize(skill).to_string()).or_default() += 1;
            token_count += 1;
        }
        let skills_breakdown = category_counts
            .into_iter()
            .map(|(name, count)| (name, count as f64 / token_count as f64 * 100.0))
            .collect();

        let mut departments: BTreeMap<String, u32> = BTreeMap::new();
        for employee in employees {
            let dept = employee.department.trim();
            let dept = if dept.is_empty() { UNKNOWN_DEPARTMENT } else { dept };
            *departments.entry(dept.to_string()).or_default() += 1;
        }

        let avg_experience = mean(employees.iter().map(|e| e.experience_years as f64), total);

        let avg_match_score = match matches {
            Some(matches) => {
                let scores: HashMap<EmployeeId, f64> = matches
                    .iter()
                    .map(|m| (m.employee.id, m.match_score))
                    .collect();
                let sum = employees
                    .iter()
                    .map(|e| scores.get(&e.id).copied().unwrap_or(0.0) * 100.0);
                mean(sum, total).clamp(0.0, 100.0)
            }
            None => 0.0,
        };

        TeamProfile {
            total_members: i32::try_from(total).unwrap_or(i32::MAX),
            available_members: i32::try_from(available).unwrap_or(i32::MAX),
            skills_breakdown,
            avg_experience,
            departments,
            avg_match_score,
        }
    }
}

fn mean(values: impl Iterator<Item = f64>, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    values.sum::<f64>() / count as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_category_matching_in_either_direction_wins() {
        let agg = ProfileAggregator::new(&StaffingConfig::builtin());
        // "JavaScript" (Frontend) contains "java" before Backend is checked.
        assert_eq!(agg.categorize("Java"), "Frontend");
        assert_eq!(agg.categorize("react hooks"), "Frontend");
        assert_eq!(agg.categorize("SQL Server"), "Database");
        assert_eq!(agg.categorize("Kubernetes"), "Cloud");
        assert_eq!(agg.categorize("Kube"), "Cloud");
        assert_eq!(agg.categorize("Basket Weaving"), "Other");
    }

    #[test]
    fn single_letter_data_keyword_claims_unmatched_tokens_with_an_r() {
        let agg = ProfileAggregator::new(&StaffingConfig::builtin());
        for skill in ["Rust", "Firebase", "Jira", "Ruby"] {
            assert_eq!(agg.categorize(skill), "Data", "{skill} should land in Data");
        }
        // Earlier categories still win over the Data "R".
        assert_eq!(agg.categorize("Terraform"), "Cloud");
    }
}
