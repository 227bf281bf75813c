//! AITeamAnalysis: the narrative team report and its accumulator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const FULL_CONFIDENCE: u8 = 85;
pub const FALLBACK_CONFIDENCE: u8 = 60;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }

    /// Level named by the leading token of a legacy "LEVEL - text" string.
    /// Case-insensitive; anything unrecognized is Medium.
    pub fn from_prefix(text: &str) -> Self {
        let head = text.trim_start().as_bytes();
        let starts_with = |prefix: &str| {
            head.len() >= prefix.len() && head[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
        };
        if starts_with("LOW") {
            RiskLevel::Low
        } else if starts_with("HIGH") {
            RiskLevel::High
        } else {
            RiskLevel::Medium
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery risk as a level plus its explanation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeliveryRisk {
    pub level: RiskLevel,
    pub explanation: String,
}

impl DeliveryRisk {
    pub fn new(level: RiskLevel, explanation: impl Into<String>) -> Self {
        Self { level, explanation: explanation.into() }
    }

    /// Parse the legacy "LEVEL - explanation" encoding.
    pub fn parse(text: &str) -> Self {
        let level = RiskLevel::from_prefix(text);
        let explanation = match text.split_once(" - ") {
            Some((_, rest)) => rest.trim().to_string(),
            None => text.trim().to_string(),
        };
        Self { level, explanation }
    }
}

impl fmt::Display for DeliveryRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.level, self.explanation)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    Full,
    Fallback,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AITeamAnalysis {
    pub team_strengths: Vec<String>,
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
    pub project_suitability: String,
    pub skill_gaps: Vec<String>,
    pub team_dynamics: String,
    pub delivery_risk: DeliveryRisk,
    pub key_insights: Vec<String>,
    /// 0..=100
    pub confidence_score: u8,
    pub generated_at: DateTime<Utc>,
    pub mode: AnalysisMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_context: Option<String>,
}

impl AITeamAnalysis {
    pub fn risk_level(&self) -> RiskLevel {
        self.delivery_risk.level
    }

    pub fn is_complete(&self) -> bool {
        !self.team_strengths.is_empty()
            && !self.project_suitability.is_empty()
            && !self.team_dynamics.is_empty()
            && !self.delivery_risk.explanation.is_empty()
    }
}

/// Accumulator the analysis rules append to.
///
/// Delivery risk stays unset until a rule decides it; `finish` fills in the
/// placeholder used before any assessment ran.
#[derive(Debug, Clone, Default)]
pub struct AnalysisBuilder {
    pub strengths: Vec<String>,
    pub risks: Vec<String>,
    pub recommendations: Vec<String>,
    pub skill_gaps: Vec<String>,
    pub key_insights: Vec<String>,
    pub project_suitability: String,
    pub team_dynamics: String,
    pub delivery_risk: Option<DeliveryRisk>,
}

impl AnalysisBuilder {
    pub fn strength(&mut self, text: impl Into<String>) {
        self.strengths.push(text.into());
    }

    pub fn risk(&mut self, text: impl Into<String>) {
        self.risks.push(text.into());
    }

    pub fn recommend(&mut self, text: impl Into<String>) {
        self.recommendations.push(text.into());
    }

    pub fn gap(&mut self, text: impl Into<String>) {
        self.skill_gaps.push(text.into());
    }

    pub fn insight(&mut self, text: impl Into<String>) {
        self.key_insights.push(text.into());
    }

    pub fn set_delivery_risk(&mut self, level: RiskLevel, explanation: impl Into<String>) {
        self.delivery_risk = Some(DeliveryRisk::new(level, explanation));
    }

    pub fn finish(
        self,
        mode: AnalysisMode,
        confidence_score: u8,
        generated_at: DateTime<Utc>,
        project_context: Option<String>,
    ) -> AITeamAnalysis {
        AITeamAnalysis {
            team_strengths: self.strengths,
            risk_factors: self.risks,
            recommendations: self.recommendations,
            project_suitability: self.project_suitability,
            skill_gaps: self.skill_gaps,
            team_dynamics: self.team_dynamics,
            delivery_risk: self
                .delivery_risk
                .unwrap_or_else(|| DeliveryRisk::new(RiskLevel::Medium, "Assessment in progress")),
            key_insights: self.key_insights,
            confidence_score,
            generated_at,
            mode,
            project_context,
        }
    }
}
