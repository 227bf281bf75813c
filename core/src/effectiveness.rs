//! Team effectiveness for an explicit member list against free-text
//! project requirements.
//!
//! Scores (all 0..=100):
//!   coverage   required skills found in the text that some member covers
//!   balance    mean(100 - 10·σ(years), min(100, 10·mean(years)))
//!   synergy    mean(25·distinct roles, 20·mean rating, 100 - 50·var(rating))
//!   overall    mean of the three
//!
//! An empty member list yields an all-zero baseline report.

use crate::{
    clock::Clock,
    config::StaffingConfig,
    employee::{loosely_matches, MemberSummary},
    types::{Percent, ReportId},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};

const SINGLE_POINT_LIMIT: usize = 3;
const MISSING_SKILL_LIMIT: usize = 3;
const LOW_RATING: f64 = 3.5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamEffectivenessReport {
    pub team_id: ReportId,
    pub analysis_date: DateTime<Utc>,
    pub team_members: Vec<MemberSummary>,
    pub skills_coverage: Percent,
    pub experience_balance: f64,
    pub team_synergy: f64,
    pub overall_effectiveness: f64,
    pub insights: Vec<String>,
    pub risks: Vec<String>,
    pub recommendations: Vec<String>,
}

pub struct EffectivenessCalculator {
    vocabulary: Vec<String>,
    clock: Arc<dyn Clock>,
}

impl EffectivenessCalculator {
    pub fn new(config: &StaffingConfig, clock: Arc<dyn Clock>) -> Self {
        Self { vocabulary: config.requirement_vocabulary.clone(), clock }
    }

    /// Vocabulary entries mentioned anywhere in `requirements`.
    pub fn required_skills(&self, requirements: &str) -> Vec<&str> {
        let text = requirements.to_lowercase();
        self.vocabulary
            .iter()
            .filter(|skill| text.contains(&skill.to_lowercase()))
            .map(String::as_str)
            .collect()
    }

    pub fn evaluate(&self, members: &[MemberSummary], requirements: &str) -> TeamEffectivenessReport {
        let required = self.required_skills(requirements);
        let (covered, missing): (Vec<&str>, Vec<&str>) =
            required.iter().copied().partition(|skill| is_covered(members, skill));

        let (skills_coverage, experience_balance, team_synergy) = if members.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            let coverage = if required.is_empty() {
                100.0
            } else {
                covered.len() as f64 / required.len() as f64 * 100.0
            };
            (coverage, experience_balance(members), synergy(members))
        };
        let overall_effectiveness = (skills_coverage + experience_balance + team_synergy) / 3.0;

        log::debug!(
            "Effectiveness for {} members: coverage {skills_coverage:.1}, balance {experience_balance:.1}, synergy {team_synergy:.1}",
            members.len()
        );

        TeamEffectivenessReport {
            team_id: uuid::Uuid::new_v4().to_string(),
            analysis_date: self.clock.now(),
            team_members: members.to_vec(),
            skills_coverage,
            experience_balance,
            team_synergy,
            overall_effectiveness,
            insights: insights(skills_coverage, experience_balance, team_synergy),
            risks: risks(members),
            recommendations: recommendations(members, &missing),
        }
    }
}

fn is_covered(members: &[MemberSummary], skill: &str) -> bool {
    members
        .iter()
        .flat_map(|m| m.skills.iter())
        .any(|held| loosely_matches(held, skill))
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance.
fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

fn experience_balance(members: &[MemberSummary]) -> f64 {
    let years: Vec<f64> = members.iter().map(|m| m.experience_years as f64).collect();
    let balance = (100.0 - variance(&years).sqrt() * 10.0).max(0.0);
    let seniority = (mean(&years) * 10.0).min(100.0);
    (balance + seniority) / 2.0
}

fn synergy(members: &[MemberSummary]) -> f64 {
    let mut roles: Vec<&str> = members.iter().map(|m| m.role.as_str()).collect();
    roles.sort_unstable();
    roles.dedup();
    let ratings: Vec<f64> = members.iter().map(|m| m.rating).collect();

    let diversity = (roles.len() as f64 * 25.0).min(100.0);
    let quality = mean(&ratings) * 20.0;
    let consistency = (100.0 - variance(&ratings) * 50.0).max(0.0);
    (diversity + quality + consistency) / 3.0
}

fn insights(coverage: f64, balance: f64, synergy: f64) -> Vec<String> {
    let coverage = if coverage >= 90.0 {
        "🎯 Excellent skills coverage - all critical requirements are met"
    } else if coverage >= 70.0 {
        "⚠️ Good skills coverage with minor gaps to address"
    } else {
        "🚨 Significant skill gaps identified - consider additional team members"
    };
    let balance = if balance >= 80.0 {
        "👥 Well-balanced team with good mix of experience levels"
    } else if balance >= 60.0 {
        "📊 Moderate experience balance - some adjustment may be beneficial"
    } else {
        "⚖️ Experience imbalance - consider rebalancing senior/junior ratio"
    };
    let synergy = if synergy >= 85.0 {
        "✨ High team synergy expected - complementary skills and roles"
    } else if synergy >= 65.0 {
        "🤝 Good team compatibility with room for optimization"
    } else {
        "🔄 Team composition may benefit from restructuring"
    };
    vec![coverage.into(), balance.into(), synergy.into()]
}

/// Keys in first-seen order with how many members have them.
fn first_seen_counts<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<(&'a str, usize)> {
    let mut order: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for key in keys {
        match index.get(key) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(key, order.len());
                order.push((key, 1));
            }
        }
    }
    order
}

fn risks(members: &[MemberSummary]) -> Vec<String> {
    let mut risks = Vec::new();
    if members.is_empty() {
        return risks;
    }

    // Count each skill once per member.
    let held = members.iter().flat_map(|m| {
        let mut own: Vec<&str> = Vec::new();
        for s in &m.skills {
            if !own.contains(&s.as_str()) {
                own.push(s.as_str());
            }
        }
        own
    });
    let single_points: Vec<&str> = first_seen_counts(held)
        .into_iter()
        .filter(|&(_, n)| n == 1)
        .map(|(skill, _)| skill)
        .take(SINGLE_POINT_LIMIT)
        .collect();
    if !single_points.is_empty() {
        risks.push(format!("🎯 Single points of failure in: {}", single_points.join(", ")));
    }

    let years = members.iter().map(|m| m.experience_years);
    let (min, max) = (years.clone().min().unwrap_or(0), years.max().unwrap_or(0));
    if max - min > 8 {
        risks.push("📈 Large experience gap may affect team dynamics".into());
    }

    let crowded: Vec<&str> = first_seen_counts(members.iter().map(|m| m.role.as_str()))
        .into_iter()
        .filter(|&(_, n)| n > 2)
        .map(|(role, _)| role)
        .collect();
    if !crowded.is_empty() {
        risks.push(format!("👥 Potential role overlap in: {}", crowded.join(", ")));
    }
    risks
}

fn recommendations(members: &[MemberSummary], missing: &[&str]) -> Vec<String> {
    let mut recs = Vec::new();

    if !missing.is_empty() {
        let named: Vec<&str> = missing.iter().copied().take(MISSING_SKILL_LIMIT).collect();
        recs.push(format!("🔍 Consider adding team member(s) with: {}", named.join(", ")));
    }
    if members.is_empty() {
        return recs;
    }

    let years: Vec<f64> = members.iter().map(|m| m.experience_years as f64).collect();
    let avg = mean(&years);
    if avg < 3.0 {
        recs.push("🎓 Consider adding a senior team member for mentorship and guidance".into());
    } else if avg > 10.0 {
        recs.push("🌱 Consider adding junior members to balance cost and bring fresh perspectives".into());
    }

    let low: Vec<&str> = members
        .iter()
        .filter(|m| m.rating < LOW_RATING)
        .map(|m| m.name.as_str())
        .collect();
    if !low.is_empty() {
        recs.push(format!(
            "⚡ Consider additional support or training for team members with lower ratings: {}",
            low.join(", ")
        ));
    }
    recs
}
