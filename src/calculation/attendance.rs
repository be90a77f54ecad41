//! Daily attendance summarisation.
//!
//! Folds a pay period's daily records into the [`AttendancePeriod`] counts
//! the payroll calculator consumes. The accepted check-in capture mode is an
//! explicit policy value rather than ambient client state.

use std::collections::HashSet;

use tracing::debug;

use crate::config::{AttendancePolicy, CaptureMode};
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceDay, AttendancePeriod, AttendanceSummary, CaptureMethod, DayStatus};

fn capture_verified(mode: CaptureMode, method: Option<CaptureMethod>) -> bool {
    matches!(
        (mode, method),
        (CaptureMode::Biometric, Some(CaptureMethod::Biometric))
            | (CaptureMode::Geolocation, Some(CaptureMethod::Geolocation))
            | (
                CaptureMode::Either,
                Some(CaptureMethod::Biometric | CaptureMethod::Geolocation)
            )
    )
}

/// Summarises daily attendance records into period counts.
///
/// Every record is one working day. Present days count as present, half days
/// count half present and half LOP (presence rounded down, LOP rounded up),
/// LOP and absent days count as LOP, and leave days count as paid leave.
///
/// Present and half days whose capture method does not satisfy
/// `policy.capture_mode` still count as present but are reported in
/// `unverified_days`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidField`] if two records share a date.
///
/// # Examples
///
/// ```
/// use hrms_engine::calculation::summarize_attendance;
/// use hrms_engine::config::AttendancePolicy;
/// use hrms_engine::models::{AttendanceDay, CaptureMethod, DayStatus};
/// use chrono::NaiveDate;
///
/// let day = |d, status| AttendanceDay {
///     date: NaiveDate::from_ymd_opt(2025, 6, d).unwrap(),
///     status,
///     capture_method: Some(CaptureMethod::Biometric),
/// };
/// let days = vec![day(2, DayStatus::Present), day(3, DayStatus::Lop), day(4, DayStatus::Leave)];
///
/// let summary = summarize_attendance(&days, &AttendancePolicy::default()).unwrap();
/// assert_eq!(summary.period.working_days, 3);
/// assert_eq!(summary.period.present_days, 1);
/// assert_eq!(summary.period.lop_days, 1);
/// ```
pub fn summarize_attendance(
    days: &[AttendanceDay],
    policy: &AttendancePolicy,
) -> EngineResult<AttendanceSummary> {
    let mut seen = HashSet::with_capacity(days.len());
    let mut full_days: u32 = 0;
    let mut half_days: u32 = 0;
    let mut lop_days: u32 = 0;
    let mut unverified_days: u32 = 0;

    for day in days {
        if !seen.insert(day.date) {
            return Err(EngineError::invalid_field(
                "date",
                format!("duplicate attendance record for {}", day.date),
            ));
        }

        match day.status {
            DayStatus::Present => full_days += 1,
            DayStatus::HalfDay => half_days += 1,
            DayStatus::Lop | DayStatus::Absent => lop_days += 1,
            DayStatus::Leave => {}
        }

        let attended = matches!(day.status, DayStatus::Present | DayStatus::HalfDay);
        if attended && !capture_verified(policy.capture_mode, day.capture_method) {
            unverified_days += 1;
        }
    }

    let working_days = days.len() as u32;
    let present_days = full_days + half_days / 2;
    let lop_days = lop_days + half_days.div_ceil(2);

    let period = AttendancePeriod::new(working_days, present_days, lop_days)?;

    debug!(
        working_days,
        present_days,
        lop_days,
        unverified_days,
        capture_mode = ?policy.capture_mode,
        "Attendance summarised"
    );

    Ok(AttendanceSummary {
        period,
        unverified_days,
    })
}
