//! SkillGapAnalyzer: coverage, recommended head-count, priority and
//! ordering.

use staffing_core::{
    config::{CriticalSkillsConfig, StaffingConfig},
    employee::EmployeeRecord,
    skill_gap::{SkillGapAnalyzer, SkillPriority},
};

fn employee(id: i64, skills: &str) -> EmployeeRecord {
    EmployeeRecord {
        id,
        name: format!("Employee {id}"),
        email: None,
        role: "Developer".into(),
        skills: skills.into(),
        technologies: String::new(),
        department: "Engineering".into(),
        experience_years: 3,
        rating: None,
        is_on_project: false,
        current_project_name: None,
        project_end_date: None,
        avatar_url: None,
    }
}

fn tracked(skills: &[&str], high_priority: &[&str]) -> CriticalSkillsConfig {
    CriticalSkillsConfig {
        skills: skills.iter().map(|s| s.to_string()).collect(),
        high_priority: high_priority.iter().map(|s| s.to_string()).collect(),
    }
}

#[test]
fn one_holder_in_ten_is_a_gap() {
    let mut staff: Vec<EmployeeRecord> = (1..=9).map(|id| employee(id, "Excel")).collect();
    staff.push(employee(10, "Rust"));

    let config = tracked(&["Rust"], &[]);
    let gaps = SkillGapAnalyzer::new(&config).analyze(&staff);

    assert_eq!(gaps.len(), 1);
    let rust = &gaps[0];
    assert_eq!(rust.current_count, 1);
    assert_eq!(rust.coverage_percentage, 10.0);
    assert!(rust.is_gap);
    assert_eq!(rust.recommended_count, 2);
    assert_eq!(rust.priority, SkillPriority::Medium, "10% is not below the High mark");
}

#[test]
fn high_priority_skills_escalate_to_critical() {
    let mut staff: Vec<EmployeeRecord> = (1..=9).map(|id| employee(id, "Excel")).collect();
    staff.push(employee(10, "React, Go"));

    let config = tracked(&["React", "Go", "Elm"], &["React"]);
    let gaps = SkillGapAnalyzer::new(&config).analyze(&staff);
    let order: Vec<(&str, SkillPriority)> =
        gaps.iter().map(|g| (g.skill_name.as_str(), g.priority)).collect();

    assert_eq!(
        order,
        vec![
            ("React", SkillPriority::Critical),
            ("Elm", SkillPriority::High),
            ("Go", SkillPriority::Medium),
        ]
    );
}

#[test]
fn matching_is_exact_and_counts_each_employee_once() {
    let staff = vec![
        employee(1, "React, React"),
        employee(2, "react"),
        employee(3, "React Native"),
        employee(4, " React "),
    ];
    let config = tracked(&["React"], &[]);
    let gaps = SkillGapAnalyzer::new(&config).analyze(&staff);
    assert_eq!(gaps[0].current_count, 2, "Only exact, trimmed tokens count");
    assert_eq!(gaps[0].coverage_percentage, 50.0);
    assert!(!gaps[0].is_gap);
    assert_eq!(gaps[0].priority, SkillPriority::Low);
    assert_eq!(gaps[0].recommended_count, 2);
}

#[test]
fn empty_population_has_zero_coverage() {
    let config = StaffingConfig::builtin();
    let gaps = SkillGapAnalyzer::new(&config.critical_skills).analyze(&[]);
    assert_eq!(gaps.len(), config.critical_skills.skills.len());
    assert!(gaps.iter().all(|g| g.coverage_percentage == 0.0 && g.is_gap && g.recommended_count == 0));
    assert!(
        gaps.windows(2).all(|w| w[0].priority >= w[1].priority),
        "Gaps must be ordered by priority"
    );
    assert_eq!(gaps[0].priority, SkillPriority::Critical);
}
