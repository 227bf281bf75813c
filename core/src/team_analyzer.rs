//! Rule-based team analysis.
//!
//! RULE ORDER (fixed, tested, never reordered; output order is part of
//! the report contract):
//!   1. team_size
//!   2. availability     (sets delivery risk, exactly once)
//!   3. skills           (dominant skill, diversity, threshold gaps)
//!   4. experience
//!   5. match_score
//!   6. team_dynamics
//!   7. key_insights
//!   8. completeness     (guarantees AITeamAnalysis::is_complete)
//!
//! Each rule is a pure function over the profile that appends to an
//! AnalysisBuilder. A rule error aborts the rich path; callers decide
//! whether to substitute `fallback_analyze`.

use crate::{
    clock::Clock,
    error::{StaffError, StaffResult},
    team_analysis::{
        AITeamAnalysis, AnalysisBuilder, AnalysisMode, RiskLevel, FALLBACK_CONFIDENCE,
        FULL_CONFIDENCE,
    },
    team_profile::TeamProfile,
};
use std::sync::Arc;

pub type AnalysisRule = fn(&TeamProfile, &mut AnalysisBuilder) -> StaffResult<()>;

#[derive(Clone, Copy)]
pub struct NamedRule {
    pub name: &'static str,
    pub apply: AnalysisRule,
}

impl std::fmt::Debug for NamedRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamedRule").field("name", &self.name).finish()
    }
}

/// The standard battery, in execution order.
pub fn standard_rules() -> Vec<NamedRule> {
    vec![
        NamedRule { name: "team_size", apply: team_size_rule },
        NamedRule { name: "availability", apply: availability_rule },
        NamedRule { name: "skills", apply: skills_rule },
        NamedRule { name: "experience", apply: experience_rule },
        NamedRule { name: "match_score", apply: match_score_rule },
        NamedRule { name: "team_dynamics", apply: team_dynamics_rule },
        NamedRule { name: "key_insights", apply: key_insights_rule },
        NamedRule { name: "completeness", apply: completeness_rule },
    ]
}

pub struct TeamAnalyzer {
    rules: Vec<NamedRule>,
    clock: Arc<dyn Clock>,
}

impl TeamAnalyzer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_rules(standard_rules(), clock)
    }

    /// Analyzer running a custom battery, e.g. the standard list with a rule
    /// inserted.
    pub fn with_rules(rules: Vec<NamedRule>, clock: Arc<dyn Clock>) -> Self {
        Self { rules, clock }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name).collect()
    }

    /// Whether `profile` may be analysed.
    pub fn validate(&self, profile: &TeamProfile) -> bool {
        profile.is_valid()
    }

    /// Run the full rule battery.
    ///
    /// Invalid profiles are refused with `InvalidProfile`; a failing rule
    /// surfaces as that rule's error.
    pub fn analyze(&self, profile: &TeamProfile, context: Option<&str>) -> StaffResult<AITeamAnalysis> {
        profile.check()?;
        log::info!("Starting team analysis for {} members", profile.total_members);

        let mut builder = AnalysisBuilder::default();
        for rule in &self.rules {
            (rule.apply)(profile, &mut builder).map_err(|e| {
                log::warn!("Analysis rule '{}' failed: {e}", rule.name);
                e
            })?;
        }

        let analysis = builder.finish(
            AnalysisMode::Full,
            FULL_CONFIDENCE,
            self.clock.now(),
            context.map(str::to_string),
        );
        if !analysis.is_complete() {
            return Err(StaffError::Processing {
                reason: "rule battery produced an incomplete analysis".into(),
            });
        }

        log::info!(
            "Generated team analysis with {} strengths and {} risks",
            analysis.team_strengths.len(),
            analysis.risk_factors.len()
        );
        Ok(analysis)
    }

    /// Reduced-detail report used when the rich path is unavailable.
    /// Never fails and is always complete.
    pub fn fallback_analyze(&self, profile: &TeamProfile) -> AITeamAnalysis {
        let mut b = AnalysisBuilder::default();

        b.strength(format!(
            "Team of {} members with {:.1} years average experience",
            profile.total_members, profile.avg_experience
        ));
        b.strength(format!(
            "{} members available for immediate project assignment",
            profile.available_members
        ));

        if profile.skills_breakdown.is_empty() {
            b.project_suitability =
                "Suitable for standard software development projects".into();
        } else {
            let (top, _) = profile.dominant_skill();
            b.strength(format!("Strong {top} capabilities"));
            b.project_suitability =
                format!("Suitable for {}-focused development projects", top.to_lowercase());
        }

        if profile.availability_ratio() > 0.5 {
            b.set_delivery_risk(RiskLevel::Medium, "Standard delivery risks");
        } else {
            b.set_delivery_risk(RiskLevel::High, "Resource constraints present");
        }

        b.team_dynamics =
            "Team shows standard collaboration potential with balanced skill distribution".into();

        b.recommend("Continue monitoring team capacity and skill development");
        b.recommend("Implement regular team assessment and planning cycles");

        b.insight("Fallback analysis - limited AI insights available");

        b.finish(AnalysisMode::Fallback, FALLBACK_CONFIDENCE, self.clock.now(), None)
    }
}

// ── Rules ────────────────────────────────────────────────────────────────────

fn team_size_rule(p: &TeamProfile, b: &mut AnalysisBuilder) -> StaffResult<()> {
    if p.total_members < 4 {
        b.risk("Small team size may limit capability breadth and create single points of failure");
        b.recommend("Consider expanding team or partnering with other teams for complex projects");
        b.recommend("Implement cross-training to reduce dependency risks");
    } else if p.total_members > 12 {
        b.risk("Large team size requires strong coordination and may slow decision-making");
        b.recommend("Implement clear team structure with defined roles and communication protocols");
        b.recommend("Consider breaking into smaller sub-teams for complex projects");
    } else {
        b.strength(format!(
            "Optimal team size of {} members enables effective collaboration without coordination overhead",
            p.total_members
        ));
    }
    Ok(())
}

fn availability_rule(p: &TeamProfile, b: &mut AnalysisBuilder) -> StaffResult<()> {
    let ratio = p.availability_ratio();
    if ratio < 0.3 {
        b.risk(format!(
            "Low availability ({}/{}) creates significant resource constraints",
            p.available_members, p.total_members
        ));
        b.set_delivery_risk(
            RiskLevel::High,
            "Limited resource availability threatens project timelines and may require external support",
        );
        b.recommend("Prioritize project backlog and consider timeline extensions");
        b.recommend("Explore contractor or temporary resource options");
    } else if ratio > 0.7 {
        b.strength(format!(
            "Excellent availability ({}/{}) enables immediate project deployment and rapid iteration",
            p.available_members, p.total_members
        ));
        b.set_delivery_risk(
            RiskLevel::Low,
            "Strong resource availability supports reliable delivery with minimal scheduling risks",
        );
    } else {
        b.set_delivery_risk(
            RiskLevel::Medium,
            "Moderate availability requires careful resource planning and sprint capacity management",
        );
        b.recommend("Implement capacity planning tools and regular availability forecasting");
    }
    Ok(())
}

fn skills_rule(p: &TeamProfile, b: &mut AnalysisBuilder) -> StaffResult<()> {
    if let Some((name, value)) = p.skills_breakdown.iter().find(|(_, v)| !v.is_finite()) {
        return Err(StaffError::Processing {
            reason: format!("skills breakdown for '{name}' is not a number ({value})"),
        });
    }

    let (dominant, share) = p.dominant_skill();
    if share > 60.0 {
        b.strength(format!(
            "Strong {dominant} expertise ({share:.1}%) provides deep technical capability and specialization"
        ));
        b.project_suitability = format!(
            "Exceptional fit for {}-focused projects requiring deep technical expertise and specialized knowledge",
            dominant.to_lowercase()
        );
        b.risk(format!(
            "Heavy concentration in {dominant} may create dependency risks in other technical areas"
        ));
    } else {
        b.strength("Well-balanced skill distribution supports versatile full-stack development capabilities");
        b.project_suitability =
            "Versatile team suitable for diverse project types and full-stack development initiatives".into();
    }

    let diversity = p.skill_diversity();
    if diversity < 3 {
        b.risk("Limited skill diversity may create bottlenecks and single points of failure in complex projects");
        b.gap("Cross-training in complementary technologies and methodologies");
        b.recommend("Implement skill development program to broaden technical capabilities");
    } else if diversity > 6 {
        b.strength(format!(
            "Exceptional skill diversity across {diversity} areas enables comprehensive solution delivery"
        ));
    } else {
        b.strength(format!(
            "Good skill diversity across {diversity} technical areas supports varied project requirements"
        ));
    }

    threshold_gaps(p, b);
    Ok(())
}

/// Category shares below these marks are reported as gaps.
const GAP_THRESHOLDS: [(&str, f64, &str); 4] = [
    ("Backend", 20.0, "Backend Architecture and API Design expertise for scalable system development"),
    ("Frontend", 20.0, "Modern Frontend Frameworks and UI/UX Design for engaging user experiences"),
    ("Cloud", 15.0, "Cloud Infrastructure and DevOps Automation for scalable deployment"),
    ("Database", 15.0, "Database Design and Optimization for efficient data management"),
];

fn threshold_gaps(p: &TeamProfile, b: &mut AnalysisBuilder) {
    for (category, threshold, gap) in GAP_THRESHOLDS {
        if p.skill_share(category) < threshold {
            b.gap(gap);
        }
    }
    b.gap("Advanced Security and Compliance frameworks");
    b.gap("Performance Optimization and Scalability Planning");
}

fn experience_rule(p: &TeamProfile, b: &mut AnalysisBuilder) -> StaffResult<()> {
    let years = p.avg_experience;
    if years < 2.0 {
        b.risk("Junior-heavy team composition requires additional mentorship and may extend delivery timelines");
        b.recommend("Assign experienced technical lead or implement comprehensive pair programming practices");
        b.recommend("Establish structured code review processes and knowledge transfer protocols");
    } else if years > 8.0 {
        b.strength(format!(
            "High experience level ({years:.1} years avg) enables complex architectural decisions and advanced problem-solving"
        ));
        b.risk("Senior-heavy team may have higher costs and potential for over-engineering solutions");
        b.recommend("Balance technical excellence with pragmatic delivery timelines");
    } else {
        b.strength(format!(
            "Balanced experience level ({years:.1} years avg) combines innovation potential with proven stability"
        ));
    }
    Ok(())
}

fn match_score_rule(p: &TeamProfile, b: &mut AnalysisBuilder) -> StaffResult<()> {
    let score = p.avg_match_score;
    if score > 85.0 {
        b.strength(format!(
            "Exceptional project alignment ({score:.1}%) indicates optimal team selection for current requirements"
        ));
    } else if score > 70.0 {
        b.strength(format!(
            "Strong project alignment ({score:.1}%) suggests good team-requirement matching"
        ));
    } else if score < 60.0 {
        b.risk(format!(
            "Low project alignment ({score:.1}%) suggests significant skill-requirement mismatch"
        ));
        b.gap("Training in project-specific technologies and domain knowledge");
        b.recommend("Consider team augmentation or skill development before project start");
    }
    // 60..=70 intentionally adds nothing.
    Ok(())
}

fn team_dynamics_rule(p: &TeamProfile, b: &mut AnalysisBuilder) -> StaffResult<()> {
    let alignment = if p.avg_match_score > 80.0 {
        "excellent"
    } else if p.avg_match_score > 60.0 {
        "good"
    } else {
        "moderate"
    };
    let availability = if p.availability_ratio() > 0.6 {
        "high availability supports intensive collaboration and rapid iteration cycles"
    } else {
        "moderate availability requires structured communication and efficient coordination protocols"
    };
    let experience = if p.avg_experience > 5.0 {
        "senior expertise enables mentorship and technical leadership"
    } else {
        "balanced experience promotes knowledge sharing and collaborative learning"
    };

    b.team_dynamics = format!(
        "Team demonstrates {alignment} project alignment with strong collaborative potential. \
         With {experience}, the team is well-positioned for effective knowledge transfer. \
         Current {availability}."
    );
    Ok(())
}

fn key_insights_rule(p: &TeamProfile, b: &mut AnalysisBuilder) -> StaffResult<()> {
    let (dominant, share) = p.dominant_skill();
    b.insight(format!(
        "Skill concentration in {dominant} ({share:.1}%) creates both competitive advantage and potential dependency risk"
    ));
    b.insight(format!(
        "Current availability of {:.0}% directly impacts sprint capacity and delivery predictability",
        p.availability_ratio() * 100.0
    ));
    let suitability = if p.avg_experience > 5.0 {
        "high-complexity architectural"
    } else {
        "standard development"
    };
    b.insight(format!(
        "Team experience profile of {:.1} years suggests {suitability} project suitability",
        p.avg_experience
    ));

    let diversity = p.skill_diversity();
    if diversity > 5 {
        b.insight(format!(
            "Exceptional skill diversity ({diversity} areas) enables full-stack ownership and reduces external dependencies"
        ));
    }
    Ok(())
}

fn completeness_rule(_: &TeamProfile, b: &mut AnalysisBuilder) -> StaffResult<()> {
    if b.recommendations.is_empty() {
        b.recommend("Monitor team utilization metrics and implement regular capacity planning");
        b.recommend("Establish knowledge sharing sessions to reduce single points of failure");
        b.recommend("Consider strategic skill development in emerging technologies");
    }
    if b.project_suitability.is_empty() {
        b.project_suitability =
            "Team is well-suited for standard software development projects with balanced technical requirements".into();
    }
    if b.delivery_risk.is_none() {
        b.set_delivery_risk(RiskLevel::Medium, "Standard project risks apply, careful planning recommended");
    }
    Ok(())
}
