//! The shipped data/ files load, validate, and agree with the built-in
//! defaults the tests rely on.

use staffing_core::config::{FailurePolicy, StaffingConfig};

fn data_dir() -> String {
    format!("{}/../data", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn shipped_data_matches_builtin_config() {
    let loaded = StaffingConfig::load(&data_dir()).expect("load data/");
    assert_eq!(loaded, StaffingConfig::builtin());
}

#[test]
fn default_failure_policies() {
    let config = StaffingConfig::load(&data_dir()).expect("load data/");
    assert_eq!(config.matching.failure_policy, FailurePolicy::Propagate);
    assert_eq!(config.analysis.failure_policy, FailurePolicy::Fallback);
    assert_eq!(config.matching.timeout_ms, 30_000);
    assert_eq!((config.analysis.min_compared_teams, config.analysis.max_compared_teams), (2, 5));
}

#[test]
fn missing_directory_is_an_error() {
    let err = StaffingConfig::load("/nonexistent/staffing-data").unwrap_err();
    assert!(
        format!("{err:#}").contains("skill_categories.json"),
        "Error should name the file: {err:#}"
    );
}
