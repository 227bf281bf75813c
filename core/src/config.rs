//! Configuration for the analytics core.
//!
//! Keyword tables (skill categories, critical skills, the requirement
//! vocabulary) and the per-operation failure policies live as JSON under
//! `data/`. `StaffingConfig::builtin()` mirrors the shipped files so tests
//! and the runner work without a data directory.

use serde::{Deserialize, Serialize};

/// What an operation does when its primary path fails.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Return the error to the caller.
    Propagate,
    /// Substitute the operation's deterministic local result.
    Fallback,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillCategoryConfig {
    pub name: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CriticalSkillsConfig {
    /// Tracked skills, in report order before sorting.
    pub skills: Vec<String>,
    /// Subset that escalates to Critical below the critical coverage mark.
    pub high_priority: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchingConfig {
    pub failure_policy: FailurePolicy,
    pub timeout_ms: u64,
    pub system_instruction: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisConfig {
    pub failure_policy: FailurePolicy,
    pub min_compared_teams: usize,
    pub max_compared_teams: usize,
}

#[derive(Debug, Clone, Deserialize)]
struct SkillCategoriesFile {
    categories: Vec<SkillCategoryConfig>,
    fallback_category: String,
}

#[derive(Debug, Clone, Deserialize)]
struct RequirementVocabularyFile {
    skills: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct PoliciesFile {
    matching: MatchingConfig,
    analysis: AnalysisConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaffingConfig {
    /// Checked in order; the first matching category wins.
    pub skill_categories: Vec<SkillCategoryConfig>,
    pub fallback_category: String,
    /// Skill names looked for in free-text project requirements.
    pub requirement_vocabulary: Vec<String>,
    pub critical_skills: CriticalSkillsConfig,
    pub matching: MatchingConfig,
    pub analysis: AnalysisConfig,
}

impl StaffingConfig {
    /// Load from the data/ directory.
    /// In tests, use StaffingConfig::builtin().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let categories: SkillCategoriesFile =
            read_json(&format!("{data_dir}/skills/skill_categories.json"))?;
        let critical_skills: CriticalSkillsConfig =
            read_json(&format!("{data_dir}/skills/critical_skills.json"))?;
        let vocabulary: RequirementVocabularyFile =
            read_json(&format!("{data_dir}/skills/requirement_vocabulary.json"))?;
        let policies: PoliciesFile = read_json(&format!("{data_dir}/analysis/policies.json"))?;

        let config = Self {
            skill_categories: categories.categories,
            fallback_category: categories.fallback_category,
            requirement_vocabulary: vocabulary.skills,
            critical_skills,
            matching: policies.matching,
            analysis: policies.analysis,
        };
        config.check()?;
        log::debug!(
            "Loaded config from {data_dir}: {} categories, {} critical skills",
            config.skill_categories.len(),
            config.critical_skills.skills.len()
        );
        Ok(config)
    }

    fn check(&self) -> anyhow::Result<()> {
        if self.skill_categories.is_empty() {
            anyhow::bail!("skill_categories.json defines no categories");
        }
        if self.fallback_category.trim().is_empty() {
            anyhow::bail!("fallback_category must not be blank");
        }
        for skill in &self.critical_skills.high_priority {
            if !self.critical_skills.skills.contains(skill) {
                anyhow::bail!("high-priority skill '{skill}' is not a tracked critical skill");
            }
        }
        let a = &self.analysis;
        if a.min_compared_teams == 0 || a.min_compared_teams > a.max_compared_teams {
            anyhow::bail!(
                "invalid comparison bounds {}..={}",
                a.min_compared_teams,
                a.max_compared_teams
            );
        }
        Ok(())
    }

    /// Config with hardcoded defaults, identical to the shipped data/ files.
    pub fn builtin() -> Self {
        let category = |name: &str, keywords: &[&str]| SkillCategoryConfig {
            name: name.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        };
        Self {
            skill_categories: vec![
                category(
                    "Frontend",
                    &["React", "JavaScript", "TypeScript", "Vue.js", "Angular", "HTML", "CSS", "Redux", "Next.js"],
                ),
                category(
                    "Backend",
                    &["Node.js", "C#", "Python", "Java", ".NET", "Express.js", "Spring", "Django", "Flask"],
                ),
                category(
                    "Database",
                    &["SQL Server", "MongoDB", "PostgreSQL", "MySQL", "Redis", "Database Design", "SQL"],
                ),
                category(
                    "Cloud",
                    &["Azure", "AWS", "Docker", "Kubernetes", "DevOps", "CI/CD", "Terraform"],
                ),
                category(
                    "Mobile",
                    &["React Native", "iOS", "Android", "Flutter", "Swift", "Kotlin", "Xamarin"],
                ),
                category(
                    "Design",
                    &["UI/UX Design", "Figma", "Sketch", "Adobe", "Prototyping", "Design Systems"],
                ),
                category(
                    "Data",
                    &["Data Science", "Machine Learning", "Power BI", "Excel", "Analytics", "Python", "R"],
                ),
                category(
                    "Management",
                    &["Project Management", "Agile", "Scrum", "Leadership", "Team Management"],
                ),
            ],
            fallback_category: "Other".into(),
            requirement_vocabulary: [
                "JavaScript", "TypeScript", "React", "Node.js", "Python", "Java", "C#",
                "SQL", "Azure", "AWS", "Docker", "Kubernetes", "Git", "Figma", "Design",
                "Project Management", "Agile", "Scrum", "Testing", "DevOps",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            critical_skills: CriticalSkillsConfig {
                skills: [
                    "JavaScript", "TypeScript", "React", "Node.js", "Python", "Java", "C#",
                    "SQL Server", "Azure", "AWS", "DevOps", "Docker", "Kubernetes",
                    "Project Management", "Agile", "UI/UX Design", "Data Analysis",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
                high_priority: ["JavaScript", "React", "Node.js", "SQL Server", "Azure"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            },
            matching: MatchingConfig {
                failure_policy: FailurePolicy::Propagate,
                timeout_ms: 30_000,
                system_instruction: "You are an expert project staffing assistant. Given project \
                    requirements and a list of employees, return a JSON array of objects with \
                    employee IDs and their match scores."
                    .into(),
            },
            analysis: AnalysisConfig {
                failure_policy: FailurePolicy::Fallback,
                min_compared_teams: 2,
                max_compared_teams: 5,
            },
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let content =
        std::fs::read_to_string(path).map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
    serde_json::from_str(&content).map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))
}
