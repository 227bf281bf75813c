//! Shared primitive types used across the analytics core.

/// Identifier of an employee record in the upstream store.
pub type EmployeeId = i64;

/// Identifier attached to generated reports (UUID v4 text).
pub type ReportId = String;

/// Percentage in the 0..=100 range (not enforced by the type).
pub type Percent = f64;
