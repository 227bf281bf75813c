//! CapacityForecaster: monthly sampling, availability over time, and
//! date-range validation.

use chrono::NaiveDate;
use staffing_core::{capacity::CapacityForecaster, employee::EmployeeRecord, error::StaffError};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn employee(id: i64, project_end: Option<Option<NaiveDate>>) -> EmployeeRecord {
    EmployeeRecord {
        id,
        name: format!("Employee {id}"),
        email: None,
        role: "Developer".into(),
        skills: "React".into(),
        technologies: String::new(),
        department: "Engineering".into(),
        experience_years: 2,
        rating: Some(4.0),
        is_on_project: project_end.is_some(),
        current_project_name: project_end.map(|_| "Portal".to_string()),
        project_end_date: project_end.flatten(),
        avatar_url: None,
    }
}

#[test]
fn single_month_range_yields_one_sample() {
    let team = vec![employee(1, None), employee(2, Some(Some(date(2025, 1, 20))))];
    let forecast = CapacityForecaster::forecast(date(2025, 1, 1), date(2025, 1, 1), &team).expect("forecast");

    assert_eq!(forecast.forecast_data.len(), 1);
    let sample = &forecast.forecast_data[0];
    assert_eq!(sample.date, date(2025, 1, 1));
    assert_eq!(sample.available_employees, 1);
    assert_eq!(sample.becoming_available, 1, "Project ends within January");
    assert_eq!(sample.utilization_rate, 50.0);
}

#[test]
fn samples_step_by_calendar_month_without_drift() {
    let forecast = CapacityForecaster::forecast(date(2025, 1, 31), date(2025, 5, 31), &[]).expect("forecast");
    let dates: Vec<NaiveDate> = forecast.forecast_data.iter().map(|s| s.date).collect();
    assert_eq!(
        dates,
        vec![date(2025, 1, 31), date(2025, 2, 28), date(2025, 3, 31), date(2025, 4, 30), date(2025, 5, 31)]
    );
    assert!(
        forecast.forecast_data.iter().all(|s| s.utilization_rate == 0.0),
        "No employees means zero utilization"
    );
}

#[test]
fn employees_free_up_as_their_projects_end() {
    let team = vec![
        employee(1, Some(Some(date(2025, 2, 10)))),
        employee(2, Some(Some(date(2025, 4, 1)))),
        employee(3, Some(None)),
        employee(4, None),
    ];
    let forecast = CapacityForecaster::forecast(date(2025, 1, 1), date(2025, 4, 15), &team).expect("forecast");
    let available: Vec<usize> = forecast.forecast_data.iter().map(|s| s.available_employees).collect();
    let freeing: Vec<usize> = forecast.forecast_data.iter().map(|s| s.becoming_available).collect();

    assert_eq!(available, vec![1, 1, 2, 3]);
    assert_eq!(freeing, vec![0, 1, 0, 1]);
    assert_eq!(forecast.forecast_data[3].utilization_rate, 25.0);
    assert_eq!(forecast.total_employees, 4);
}

#[test]
fn end_before_start_is_rejected() {
    let err = CapacityForecaster::forecast(date(2025, 3, 1), date(2025, 2, 1), &[]).unwrap_err();
    assert!(matches!(err, StaffError::InvalidDateRange { .. }), "Got {err:?}");
}
