//! Deterministic demo roster generation from curated lists.
//!
//! Used by the runner to seed a store and by tests that need a realistic
//! population. Same seed, count and date always give the same roster.

use crate::{
    employee::EmployeeRecord,
    rng::{RosterRng, RosterStream},
};
use chrono::{Months, NaiveDate};

/// Share of generated employees currently staffed on a project.
const ON_PROJECT_SHARE: f64 = 0.55;
/// Share of staffed employees whose project has no planned end.
const OPEN_ENDED_SHARE: f64 = 0.1;
const UNRATED_SHARE: f64 = 0.1;

struct RoleTemplate {
    role: &'static str,
    department: &'static str,
    skills: &'static [&'static str],
    technologies: &'static [&'static str],
}

pub struct RosterGenerator;

impl RosterGenerator {
    pub fn generate(seed: u64, count: usize, today: NaiveDate) -> Vec<EmployeeRecord> {
        let mut identity = RosterRng::new(seed, RosterStream::Identity);
        let mut skills = RosterRng::new(seed, RosterStream::Skills);
        let mut assignment = RosterRng::new(seed, RosterStream::Assignment);

        let records: Vec<EmployeeRecord> = (0..count)
            .map(|i| {
                let id = i as i64 + 1;
                let template = &ROLES[skills.next_u64_below(ROLES.len() as u64) as usize];
                let name = Self::full_name(&mut identity);
                let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));

                let skill_count = skills.between(2, 4) as usize;
                let tech_count = skills.between(1, 3) as usize;

                let is_on_project = assignment.chance(ON_PROJECT_SHARE);
                let (current_project_name, project_end_date) = if is_on_project {
                    let project = assignment.pick(PROJECTS).map(|p| p.to_string());
                    let end = if assignment.chance(OPEN_ENDED_SHARE) {
                        None
                    } else {
                        today.checked_add_months(Months::new(assignment.between(0, 9)))
                    };
                    (project, end)
                } else {
                    (None, None)
                };

                let rating = if identity.chance(UNRATED_SHARE) {
                    None
                } else {
                    Some(f64::from(identity.between(30, 50)) / 10.0)
                };

                EmployeeRecord {
                    id,
                    name,
                    email: Some(email),
                    role: template.role.into(),
                    skills: sample(&mut skills, template.skills, skill_count).join(", "),
                    technologies: sample(&mut skills, template.technologies, tech_count).join(", "),
                    department: template.department.into(),
                    experience_years: identity.between(0, 15),
                    rating,
                    is_on_project,
                    current_project_name,
                    project_end_date,
                    avatar_url: None,
                }
            })
            .collect();

        log::debug!("Generated roster of {} employees from seed {seed}", records.len());
        records
    }

    pub fn full_name(rng: &mut RosterRng) -> String {
        let first = rng.pick(FIRST_NAMES).copied().unwrap_or("Alex");
        let last = rng.pick(LAST_NAMES).copied().unwrap_or("Smith");
        format!("{first} {last}")
    }
}

/// `n` distinct entries of `pool`, in pool order.
fn sample<'a>(rng: &mut RosterRng, pool: &[&'a str], n: usize) -> Vec<&'a str> {
    let mut chosen: Vec<usize> = Vec::with_capacity(n);
    while chosen.len() < n.min(pool.len()) {
        let i = rng.next_u64_below(pool.len() as u64) as usize;
        if !chosen.contains(&i) {
            chosen.push(i);
        }
    }
    chosen.sort_unstable();
    chosen.into_iter().map(|i| pool[i]).collect()
}

// ── Curated lists ────────────────────────────────────────────────────────────

const ROLES: &[RoleTemplate] = &[
    RoleTemplate {
        role: "Frontend Developer",
        department: "Engineering",
        skills: &["JavaScript", "TypeScript", "React", "CSS", "HTML", "Angular"],
        technologies: &["React", "Next.js", "Redux", "Vue.js"],
    },
    RoleTemplate {
        role: "Backend Developer",
        department: "Engineering",
        skills: &["C#", "Java", "Node.js", "Python", "SQL Server", "PostgreSQL"],
        technologies: &[".NET", "Spring", "Express.js", "Django"],
    },
    RoleTemplate {
        role: "Full Stack Developer",
        department: "Engineering",
        skills: &["JavaScript", "React", "Node.js", "C#", "SQL Server", "TypeScript"],
        technologies: &["React", ".NET", "Docker", "MongoDB"],
    },
    RoleTemplate {
        role: "DevOps Engineer",
        department: "Platform",
        skills: &["Azure", "AWS", "DevOps", "Docker", "Kubernetes", "Terraform"],
        technologies: &["Kubernetes", "Terraform", "CI/CD", "Docker"],
    },
    RoleTemplate {
        role: "Mobile Developer",
        department: "Engineering",
        skills: &["React Native", "Swift", "Kotlin", "Flutter", "iOS", "Android"],
        technologies: &["Xcode", "Android Studio", "Firebase"],
    },
    RoleTemplate {
        role: "UI/UX Designer",
        department: "Design",
        skills: &["UI/UX Design", "Figma", "Prototyping", "Design Systems", "Sketch"],
        technologies: &["Figma", "Adobe XD", "Sketch"],
    },
    RoleTemplate {
        role: "Data Analyst",
        department: "Data",
        skills: &["Data Analysis", "Power BI", "SQL", "Excel", "Machine Learning"],
        technologies: &["Power BI", "Databricks", "Azure"],
    },
    RoleTemplate {
        role: "Project Manager",
        department: "Delivery",
        skills: &["Project Management", "Agile", "Scrum", "Leadership", "Team Management"],
        technologies: &["Jira", "Azure DevOps", "Confluence"],
    },
];

const PROJECTS: &[&str] = &[
    "Customer Portal Revamp",
    "Claims Automation",
    "Mobile Banking App",
    "Data Platform Migration",
    "Inventory Insights",
    "Partner API Gateway",
    "Design System Rollout",
    "Cloud Cost Optimization",
];

const FIRST_NAMES: &[&str] = &[
    "James", "Maria", "Wei", "Aisha", "Lucas", "Priya", "Mateo", "Hannah", "Kenji", "Fatima",
    "Oliver", "Sofia", "Daniel", "Amara", "Ethan", "Leila", "Noah", "Chloe", "Arjun", "Elena",
    "Samuel", "Yuki", "Gabriel", "Zara", "Isaac", "Nadia", "Leo", "Grace", "Omar", "Ingrid",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Garcia", "Chen", "Okafor", "Muller", "Patel", "Rossi", "Kim", "Nguyen", "Silva",
    "Johansson", "Haddad", "Kowalski", "Tanaka", "Brown", "Fernandez", "Ibrahim", "Novak",
    "Murphy", "Singh", "Dubois", "Kaur", "Costa", "Andersen", "Lopez", "Walker",
];
