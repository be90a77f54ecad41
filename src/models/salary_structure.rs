//! Salary structure model and its revision history.
//!
//! A [`SalaryStructure`] is the fixed monthly compensation breakdown for an
//! employee. Structures are never edited in place: a revision is a new
//! structure with a later `effective_from`, held in a [`SalaryHistory`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Largest monthly amount accepted for a salary component or adjustment (10^15).
pub const MAX_COMPONENT_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Monthly compensation breakdown for an employee.
///
/// # Example
///
/// ```
/// use hrms_engine::models::SalaryStructure;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let structure = SalaryStructure {
///     employee_id: "emp_001".to_string(),
///     effective_from: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
///     basic_salary: Decimal::new(30_000, 0),
///     hra: Decimal::new(12_000, 0),
///     special_allowance: Decimal::new(9_000, 0),
///     transport_allowance: Decimal::new(3_000, 0),
///     medical_allowance: Decimal::new(2_000, 0),
///     other_allowances: Decimal::new(1_000, 0),
/// };
/// assert_eq!(structure.gross(), Decimal::new(57_000, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryStructure {
    /// The employee this structure belongs to.
    pub employee_id: String,
    /// The first date on which this structure applies.
    pub effective_from: NaiveDate,
    /// Basic salary, prorated by attendance.
    pub basic_salary: Decimal,
    /// House rent allowance, prorated by attendance.
    pub hra: Decimal,
    /// Special allowance, prorated by attendance.
    pub special_allowance: Decimal,
    /// Transport allowance, paid in full above the attendance threshold.
    pub transport_allowance: Decimal,
    /// Medical allowance, never prorated.
    pub medical_allowance: Decimal,
    /// Other fixed allowances, never prorated.
    pub other_allowances: Decimal,
}

impl SalaryStructure {
    /// Sum of all components at full attendance.
    pub fn gross(&self) -> Decimal {
        self.basic_salary
            + self.hra
            + self.special_allowance
            + self.transport_allowance
            + self.medical_allowance
            + self.other_allowances
    }

    /// Checks that every component lies within `0..=MAX_COMPONENT_AMOUNT`.
    pub fn validate(&self) -> EngineResult<()> {
        let components = [
            ("basic_salary", self.basic_salary),
            ("hra", self.hra),
            ("special_allowance", self.special_allowance),
            ("transport_allowance", self.transport_allowance),
            ("medical_allowance", self.medical_allowance),
            ("other_allowances", self.other_allowances),
        ];
        for (field, amount) in components {
            if amount < Decimal::ZERO {
                return Err(EngineError::invalid_field(
                    field,
                    format!("must not be negative, got {}", amount),
                ));
            }
            if amount > MAX_COMPONENT_AMOUNT {
                return Err(EngineError::invalid_field(
                    field,
                    format!("exceeds the maximum of {}, got {}", MAX_COMPONENT_AMOUNT, amount),
                ));
            }
        }
        Ok(())
    }
}

/// A salary structure row as read from the external store.
///
/// Every numeric column is optional so that missing values surface as a
/// [`EngineError::MissingField`] naming the column instead of a zero or NaN.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalaryStructureRow {
    /// The employee this row belongs to.
    pub employee_id: Option<String>,
    /// The first date on which this row applies.
    pub effective_from: Option<NaiveDate>,
    /// `basic_salary` column.
    pub basic_salary: Option<Decimal>,
    /// `hra` column.
    pub hra: Option<Decimal>,
    /// `special_allowance` column.
    pub special_allowance: Option<Decimal>,
    /// `transport_allowance` column.
    pub transport_allowance: Option<Decimal>,
    /// `medical_allowance` column.
    pub medical_allowance: Option<Decimal>,
    /// `other_allowances` column.
    pub other_allowances: Option<Decimal>,
}

fn required<T>(value: Option<T>, field: &str) -> EngineResult<T> {
    value.ok_or_else(|| EngineError::missing_field(field))
}

impl TryFrom<SalaryStructureRow> for SalaryStructure {
    type Error = EngineError;

    fn try_from(row: SalaryStructureRow) -> EngineResult<Self> {
        let structure = SalaryStructure {
            employee_id: required(row.employee_id, "employee_id")?,
            effective_from: required(row.effective_from, "effective_from")?,
            basic_salary: required(row.basic_salary, "basic_salary")?,
            hra: required(row.hra, "hra")?,
            special_allowance: required(row.special_allowance, "special_allowance")?,
            transport_allowance: required(row.transport_allowance, "transport_allowance")?,
            medical_allowance: required(row.medical_allowance, "medical_allowance")?,
            other_allowances: required(row.other_allowances, "other_allowances")?,
        };
        structure.validate()?;
        Ok(structure)
    }
}

/// All salary structure revisions for one employee, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SalaryHistory {
    revisions: Vec<SalaryStructure>,
}

impl SalaryHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a revision.
    ///
    /// The revision must belong to the same employee as earlier revisions and
    /// take effect strictly after the latest one; existing revisions are never
    /// replaced.
    pub fn revise(&mut self, structure: SalaryStructure) -> EngineResult<()> {
        structure.validate()?;
        if let Some(latest) = self.revisions.last() {
            if latest.employee_id != structure.employee_id {
                return Err(EngineError::invalid_field(
                    "employee_id",
                    format!(
                        "revision for '{}' cannot be added to history of '{}'",
                        structure.employee_id, latest.employee_id
                    ),
                ));
            }
            if structure.effective_from <= latest.effective_from {
                return Err(EngineError::invalid_field(
                    "effective_from",
                    format!(
                        "{} must be after the current revision effective {}",
                        structure.effective_from, latest.effective_from
                    ),
                ));
            }
        }
        self.revisions.push(structure);
        Ok(())
    }

    /// Returns the revision in force on `date`.
    pub fn effective_on(&self, employee_id: &str, date: NaiveDate) -> EngineResult<&SalaryStructure> {
        self.revisions
            .iter()
            .rev()
            .find(|s| s.effective_from <= date)
            .ok_or_else(|| EngineError::SalaryStructureNotFound {
                employee_id: employee_id.to_string(),
                date,
            })
    }

    /// Returns every revision, oldest first.
    pub fn revisions(&self) -> &[SalaryStructure] {
        &self.revisions
    }
}
