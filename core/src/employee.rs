//! Employee records as handed over by the upstream store.
//!
//! Skills and technologies arrive as free-text, comma-delimited lists.
//! Everything downstream works on the trimmed tokens.

use crate::types::EmployeeId;
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// How far ahead a project end date still counts as "available soon".
pub const AVAILABLE_SOON_WINDOW_MONTHS: u32 = 2;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    pub id: EmployeeId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: String,
    /// Comma-delimited free text.
    #[serde(default)]
    pub skills: String,
    /// Comma-delimited free text.
    #[serde(default)]
    pub technologies: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub experience_years: u32,
    /// 1.0..=5.0 when present.
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub is_on_project: bool,
    #[serde(default)]
    pub current_project_name: Option<String>,
    #[serde(default)]
    pub project_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AvailabilityStatus {
    #[serde(rename = "Available")]
    Available,
    #[serde(rename = "Available Soon")]
    AvailableSoon,
    #[serde(rename = "On Project")]
    OnProject,
}

impl AvailabilityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AvailabilityStatus::Available => "Available",
            AvailabilityStatus::AvailableSoon => "Available Soon",
            AvailabilityStatus::OnProject => "On Project",
        }
    }
}

impl EmployeeRecord {
    pub fn skill_tokens(&self) -> Vec<&str> {
        split_list(&self.skills).collect()
    }

    pub fn technology_tokens(&self) -> Vec<&str> {
        split_list(&self.technologies).collect()
    }

    /// Derive availability relative to `today`.
    ///
    /// An on-project employee without an end date is never "soon".
    pub fn availability_status(&self, today: NaiveDate) -> AvailabilityStatus {
        if !self.is_on_project {
            return AvailabilityStatus::Available;
        }
        let horizon = today
            .checked_add_months(Months::new(AVAILABLE_SOON_WINDOW_MONTHS))
            .unwrap_or(NaiveDate::MAX);
        match self.project_end_date {
            Some(end) if end <= horizon => AvailabilityStatus::AvailableSoon,
            _ => AvailabilityStatus::OnProject,
        }
    }

    /// True once the employee is free on `date`: off project, or their
    /// project has ended on or before it.
    pub fn is_free_on(&self, date: NaiveDate) -> bool {
        !self.is_on_project || self.project_end_date.is_some_and(|end| end <= date)
    }

    pub fn to_member_summary(&self) -> MemberSummary {
        MemberSummary {
            employee_id: self.id,
            name: self.name.clone(),
            role: self.role.clone(),
            skills: self.skill_tokens().into_iter().map(str::to_string).collect(),
            experience_years: self.experience_years,
            rating: self.rating.unwrap_or(0.0),
        }
    }
}

/// A team member as seen by the effectiveness calculator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
    pub employee_id: EmployeeId,
    pub name: String,
    pub role: String,
    pub skills: Vec<String>,
    pub experience_years: u32,
    /// 0.0 when the source record carried no rating.
    pub rating: f64,
}

/// Split a comma-delimited list into trimmed, non-empty tokens.
pub fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Case-insensitive containment in either direction.
pub fn loosely_matches(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    a.contains(&b) || b.contains(&a)
}
