//! Attendance models.
//!
//! [`AttendancePeriod`] holds the day counts the payroll calculator consumes.
//! [`AttendanceDay`] is a single daily record, folded into a period by
//! [`crate::calculation::summarize_attendance`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Working, present and loss-of-pay day counts for one pay period.
///
/// Days that are neither present nor LOP are paid leave, so
/// `working_days = present_days + lop_days + leave_days`.
///
/// # Example
///
/// ```
/// use hrms_engine::models::AttendancePeriod;
///
/// let period = AttendancePeriod::new(22, 20, 2).unwrap();
/// assert_eq!(period.leave_days(), 0);
/// assert!(AttendancePeriod::new(22, 23, 0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendancePeriod {
    /// Working days in the period.
    pub working_days: u32,
    /// Days the employee was present.
    pub present_days: u32,
    /// Unpaid absence days.
    pub lop_days: u32,
}

impl AttendancePeriod {
    /// Creates a validated attendance period.
    pub fn new(working_days: u32, present_days: u32, lop_days: u32) -> EngineResult<Self> {
        let period = Self {
            working_days,
            present_days,
            lop_days,
        };
        period.validate()?;
        Ok(period)
    }

    /// Checks the day counts are mutually consistent.
    pub fn validate(&self) -> EngineResult<()> {
        if self.present_days > self.working_days {
            return Err(EngineError::invalid_field(
                "present_days",
                format!(
                    "{} exceeds working_days {}",
                    self.present_days, self.working_days
                ),
            ));
        }
        let accounted = self.present_days.checked_add(self.lop_days);
        if accounted.is_none_or(|days| days > self.working_days) {
            return Err(EngineError::invalid_field(
                "lop_days",
                format!(
                    "present_days {} + lop_days {} exceeds working_days {}",
                    self.present_days, self.lop_days, self.working_days
                ),
            ));
        }
        Ok(())
    }

    /// Paid leave days in the period.
    pub fn leave_days(&self) -> u32 {
        self.working_days
            .saturating_sub(self.present_days)
            .saturating_sub(self.lop_days)
    }
}

/// An attendance row as read from the external store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRow {
    /// `working_days` column.
    pub working_days: Option<i64>,
    /// `present_days` column.
    pub present_days: Option<i64>,
    /// `lop_days` column.
    pub lop_days: Option<i64>,
}

fn day_count(value: Option<i64>, field: &str) -> EngineResult<u32> {
    let value = value.ok_or_else(|| EngineError::missing_field(field))?;
    u32::try_from(value).map_err(|_| {
        EngineError::invalid_field(field, format!("must be a non-negative day count, got {}", value))
    })
}

impl TryFrom<AttendanceRow> for AttendancePeriod {
    type Error = EngineError;

    fn try_from(row: AttendanceRow) -> EngineResult<Self> {
        AttendancePeriod::new(
            day_count(row.working_days, "working_days")?,
            day_count(row.present_days, "present_days")?,
            day_count(row.lop_days, "lop_days")?,
        )
    }
}

/// The recorded status of a single working day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// Present for the full day.
    Present,
    /// Present for half the day; the other half is unpaid.
    HalfDay,
    /// Approved paid leave.
    Leave,
    /// Approved unpaid leave.
    Lop,
    /// Unapproved absence, treated as unpaid.
    Absent,
}

/// How a check-in was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureMethod {
    /// Fingerprint or face scan at a terminal.
    Biometric,
    /// Location-verified mobile check-in.
    Geolocation,
    /// Entered by hand, e.g. by a manager.
    Manual,
}

/// A single daily attendance record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceDay {
    /// The calendar date.
    pub date: NaiveDate,
    /// What happened on the day.
    pub status: DayStatus,
    /// How the check-in was captured, if there was one.
    #[serde(default)]
    pub capture_method: Option<CaptureMethod>,
}

/// The result of folding daily records into a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    /// The derived day counts.
    pub period: AttendancePeriod,
    /// Present days whose check-in did not satisfy the configured capture mode.
    pub unverified_days: u32,
}
