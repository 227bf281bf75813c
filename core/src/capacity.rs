//! Monthly capacity projection over a date range.
//!
//! Sample i is dated start + i months, always computed from `start` so a
//! range starting on the 31st does not drift to the 28th.

use crate::{
    employee::EmployeeRecord,
    error::{StaffError, StaffResult},
    types::Percent,
};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CapacitySample {
    pub date: NaiveDate,
    pub available_employees: usize,
    pub becoming_available: usize,
    pub utilization_rate: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CapacityForecast {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_employees: usize,
    pub forecast_data: Vec<CapacitySample>,
}

pub struct CapacityForecaster;

impl CapacityForecaster {
    pub fn forecast(
        start: NaiveDate,
        end: NaiveDate,
        employees: &[EmployeeRecord],
    ) -> StaffResult<CapacityForecast> {
        if end < start {
            return Err(StaffError::InvalidDateRange { start, end });
        }
        let total = employees.len();

        let mut forecast_data = Vec::new();
        for offset in 0u32.. {
            let Some(date) = start.checked_add_months(Months::new(offset)) else {
                break;
            };
            if date > end {
                break;
            }
            forecast_data.push(Self::sample(date, employees));
        }

        log::debug!(
            "Capacity forecast {start}..={end}: {} samples over {total} employees",
            forecast_data.len()
        );
        Ok(CapacityForecast {
            start_date: start,
            end_date: end,
            total_employees: total,
            forecast_data,
        })
    }

    fn sample(date: NaiveDate, employees: &[EmployeeRecord]) -> CapacitySample {
        let total = employees.len();
        let available = employees.iter().filter(|e| e.is_free_on(date)).count();
        let becoming = employees
            .iter()
            .filter(|e| e.is_on_project)
            .filter_map(|e| e.project_end_date)
            .filter(|end| end.year() == date.year() && end.month() == date.month())
            .count();
        let utilization_rate = if total == 0 {
            0.0
        } else {
            (total - available) as f64 / total as f64 * 100.0
        };
        CapacitySample {
            date,
            available_employees: available,
            becoming_available: becoming,
            utilization_rate,
        }
    }
}
