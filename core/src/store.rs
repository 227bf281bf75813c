//! Employee store boundary plus the SQLite reference store.
//!
//! RULE: The analytics core only reads through EmployeeStore.
//! Writes (seeding, uploads) belong to whoever owns the database;
//! `StaffStore::insert_employee` exists for that owner and for tests.

use crate::{
    employee::EmployeeRecord,
    error::StaffResult,
    types::EmployeeId,
};
use chrono::NaiveDate;
use rusqlite::{params, types::Type, Connection, OptionalExtension, Row};

/// Read access to the current employee snapshot.
pub trait EmployeeStore {
    fn list_employees(&self) -> StaffResult<Vec<EmployeeRecord>>;

    fn get_employee(&self, id: EmployeeId) -> StaffResult<Option<EmployeeRecord>>;
}

impl EmployeeStore for [EmployeeRecord] {
    fn list_employees(&self) -> StaffResult<Vec<EmployeeRecord>> {
        Ok(self.to_vec())
    }

    fn get_employee(&self, id: EmployeeId) -> StaffResult<Option<EmployeeRecord>> {
        Ok(self.iter().find(|e| e.id == id).cloned())
    }
}

impl EmployeeStore for Vec<EmployeeRecord> {
    fn list_employees(&self) -> StaffResult<Vec<EmployeeRecord>> {
        self.as_slice().list_employees()
    }

    fn get_employee(&self, id: EmployeeId) -> StaffResult<Option<EmployeeRecord>> {
        self.as_slice().get_employee(id)
    }
}

const EMPLOYEE_COLUMNS: &str = "id, name, email, role, skills, technologies, department, \
     experience_years, rating, is_on_project, current_project_name, project_end_date, avatar_url";

pub struct StaffStore {
    conn: Connection,
}

impl StaffStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &str) -> StaffResult<Self> {
        let conn = Connection::open(path)?;
        // WAL only matters for real files; :memory: ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> StaffResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> StaffResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_employees.sql"))?;
        Ok(())
    }

    pub fn insert_employee(&self, employee: &EmployeeRecord) -> StaffResult<()> {
        self.conn.execute(
            &format!(
                "INSERT INTO employee ({EMPLOYEE_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
            ),
            params![
                employee.id,
                employee.name,
                employee.email,
                employee.role,
                employee.skills,
                employee.technologies,
                employee.department,
                employee.experience_years,
                employee.rating,
                employee.is_on_project,
                employee.current_project_name,
                employee.project_end_date.map(|d| d.format("%Y-%m-%d").to_string()),
                employee.avatar_url,
            ],
        )?;
        Ok(())
    }

    pub fn employee_count(&self) -> StaffResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM employee", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl EmployeeStore for StaffStore {
    fn list_employees(&self) -> StaffResult<Vec<EmployeeRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {EMPLOYEE_COLUMNS} FROM employee ORDER BY id ASC"))?;
        let employees = stmt
            .query_map([], employee_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(employees)
    }

    fn get_employee(&self, id: EmployeeId) -> StaffResult<Option<EmployeeRecord>> {
        let employee = self
            .conn
            .query_row(
                &format!("SELECT {EMPLOYEE_COLUMNS} FROM employee WHERE id = ?1"),
                params![id],
                employee_from_row,
            )
            .optional()?;
        Ok(employee)
    }
}

fn employee_from_row(row: &Row<'_>) -> rusqlite::Result<EmployeeRecord> {
    let end_date: Option<String> = row.get(11)?;
    let project_end_date = end_date
        .map(|raw| {
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(11, Type::Text, Box::new(e))
            })
        })
        .transpose()?;

    Ok(EmployeeRecord {
        id:                   row.get(0)?,
        name:                 row.get(1)?,
        email:                row.get(2)?,
        role:                 row.get(3)?,
        skills:               row.get(4)?,
        technologies:         row.get(5)?,
        department:           row.get(6)?,
        experience_years:     row.get(7)?,
        rating:               row.get(8)?,
        is_on_project:        row.get(9)?,
        current_project_name: row.get(10)?,
        project_end_date,
        avatar_url:           row.get(12)?,
    })
}
