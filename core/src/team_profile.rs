//! TeamProfile: the statistical summary every team analysis starts from.

use crate::error::{StaffError, StaffResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name reported as the dominant skill when the breakdown is empty.
pub const GENERAL_SKILL: &str = "General";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TeamProfile {
    pub total_members: i32,
    pub available_members: i32,
    /// Category name → percentage. Values need not sum to 100.
    #[serde(default)]
    pub skills_breakdown: BTreeMap<String, f64>,
    pub avg_experience: f64,
    #[serde(default)]
    pub departments: BTreeMap<String, u32>,
    /// 0..=100.
    pub avg_match_score: f64,
}

impl TeamProfile {
    /// available / total, or 0 for an empty team.
    pub fn availability_ratio(&self) -> f64 {
        if self.total_members > 0 {
            self.available_members as f64 / self.total_members as f64
        } else {
            0.0
        }
    }

    /// Category with the highest percentage. Ties go to the first key in
    /// map order.
    pub fn dominant_skill(&self) -> (&str, f64) {
        let mut best: Option<(&str, f64)> = None;
        for (name, &value) in &self.skills_breakdown {
            match best {
                Some((_, top)) if value <= top => {}
                _ => best = Some((name.as_str(), value)),
            }
        }
        best.unwrap_or((GENERAL_SKILL, 0.0))
    }

    pub fn skill_diversity(&self) -> usize {
        self.skills_breakdown.len()
    }

    /// Percentage for `category`, treating a missing entry as 0.
    pub fn skill_share(&self, category: &str) -> f64 {
        self.skills_breakdown.get(category).copied().unwrap_or(0.0)
    }

    pub fn is_valid(&self) -> bool {
        self.check().is_ok()
    }

    /// Reject profiles that cannot be analysed. Nothing is clamped.
    pub fn check(&self) -> StaffResult<()> {
        let reason = if self.total_members <= 0 {
            format!("total members must be positive, got {}", self.total_members)
        } else if self.available_members < 0 || self.available_members > self.total_members {
            format!(
                "available members must be within 0..={}, got {}",
                self.total_members, self.available_members
            )
        } else if !(self.avg_experience >= 0.0 && self.avg_experience.is_finite()) {
            format!("average experience must be a non-negative number, got {}", self.avg_experience)
        } else if !(0.0..=100.0).contains(&self.avg_match_score) {
            format!("average match score must be within 0..=100, got {}", self.avg_match_score)
        } else {
            return Ok(());
        };
        Err(StaffError::InvalidProfile { reason })
    }
}
