//! Seams to the external relational store.
//!
//! The engine never owns persistence. Salary structures and attendance come
//! in through [`SalaryStructureProvider`] and [`AttendanceSampler`]; finished
//! payroll leaves through [`PayrollSink`], one [`PayrollRecord`] per employee
//! so that each employee's writes land together or not at all.
//!
//! [`InMemoryStore`] implements all three for tests, benchmarks and demos.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{AttendancePeriod, PayPeriod, PayrollResult, SalaryHistory, SalaryStructure};

/// Supplies the salary structure in force for an employee.
pub trait SalaryStructureProvider {
    /// Returns the structure effective on `date`.
    fn salary_structure(&self, employee_id: &str, date: NaiveDate) -> EngineResult<SalaryStructure>;
}

/// Supplies attendance counts for an employee and pay period.
pub trait AttendanceSampler {
    /// Returns the attendance counts for `period`.
    fn attendance(&self, employee_id: &str, period: &PayPeriod) -> EngineResult<AttendancePeriod>;
}

/// Receives completed payroll records.
pub trait PayrollSink {
    /// Persists one employee's record atomically.
    ///
    /// Implementations must either write the whole record or nothing.
    fn commit(&mut self, record: PayrollRecord) -> EngineResult<()>;
}

/// Everything written for one employee in one payroll run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRecord {
    /// The pay period the run covers.
    pub pay_period: PayPeriod,
    /// The salary structure the payroll was calculated from.
    pub salary_structure: SalaryStructure,
    /// The attendance counts the payroll was calculated from.
    pub attendance: AttendancePeriod,
    /// The calculated payroll.
    pub payroll: PayrollResult,
}

impl PayrollRecord {
    /// The employee the record belongs to.
    pub fn employee_id(&self) -> &str {
        &self.payroll.employee_id
    }
}

/// An in-process store backed by hash maps.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    salaries: HashMap<String, SalaryHistory>,
    attendance: HashMap<(String, PayPeriod), AttendancePeriod>,
    payrolls: Vec<PayrollRecord>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a salary structure revision.
    pub fn insert_salary_structure(&mut self, structure: SalaryStructure) -> EngineResult<()> {
        self.salaries
            .entry(structure.employee_id.clone())
            .or_default()
            .revise(structure)
    }

    /// Records attendance counts for an employee and period.
    pub fn insert_attendance(
        &mut self,
        employee_id: impl Into<String>,
        period: PayPeriod,
        attendance: AttendancePeriod,
    ) -> EngineResult<()> {
        attendance.validate()?;
        self.attendance.insert((employee_id.into(), period), attendance);
        Ok(())
    }

    /// Every committed payroll record, in commit order.
    pub fn payrolls(&self) -> &[PayrollRecord] {
        &self.payrolls
    }

    /// The committed record for an employee and period, if any.
    pub fn payroll_for(&self, employee_id: &str, period: &PayPeriod) -> Option<&PayrollRecord> {
        self.payrolls
            .iter()
            .find(|r| r.employee_id() == employee_id && &r.pay_period == period)
    }

    fn has_revision(&self, structure: &SalaryStructure) -> bool {
        self.salaries
            .get(&structure.employee_id)
            .is_some_and(|h| h.revisions().contains(structure))
    }
}

impl SalaryStructureProvider for InMemoryStore {
    fn salary_structure(&self, employee_id: &str, date: NaiveDate) -> EngineResult<SalaryStructure> {
        self.salaries
            .get(employee_id)
            .ok_or_else(|| EngineError::SalaryStructureNotFound {
                employee_id: employee_id.to_string(),
                date,
            })?
            .effective_on(employee_id, date)
            .cloned()
    }
}

impl AttendanceSampler for InMemoryStore {
    fn attendance(&self, employee_id: &str, period: &PayPeriod) -> EngineResult<AttendancePeriod> {
        self.attendance
            .get(&(employee_id.to_string(), *period))
            .copied()
            .ok_or_else(|| EngineError::AttendanceNotFound {
                employee_id: employee_id.to_string(),
                start_date: period.start_date,
                end_date: period.end_date,
            })
    }
}

impl PayrollSink for InMemoryStore {
    fn commit(&mut self, record: PayrollRecord) -> EngineResult<()> {
        if self.payroll_for(record.employee_id(), &record.pay_period).is_some() {
            return Err(EngineError::StoreError {
                message: format!(
                    "payroll for '{}' from {} to {} already committed",
                    record.employee_id(),
                    record.pay_period.start_date,
                    record.pay_period.end_date
                ),
            });
        }

        // Stage the salary history change so a rejected revision leaves the store untouched.
        let staged_history = if self.has_revision(&record.salary_structure) {
            None
        } else {
            let mut history = self
                .salaries
                .get(&record.salary_structure.employee_id)
                .cloned()
                .unwrap_or_default();
            history
                .revise(record.salary_structure.clone())
                .map_err(|e| EngineError::StoreError {
                    message: e.to_string(),
                })?;
            Some(history)
        };

        if let Some(history) = staged_history {
            self.salaries
                .insert(record.salary_structure.employee_id.clone(), history);
        }
        self.attendance.insert(
            (record.employee_id().to_string(), record.pay_period),
            record.attendance,
        );
        self.payrolls.push(record);
        Ok(())
    }
}
