//! Request types for the HRMS Engine API.
//!
//! Bodies carry the store's row shapes ([`SalaryStructureRow`],
//! [`AttendanceRow`], [`MetricRow`], [`FeedbackRow`]) and are converted into
//! typed models before any arithmetic, so a missing or malformed column is
//! reported by name.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceDay, AttendancePeriod, AttendanceRow, FeedbackRecord, FeedbackRow, MetricRecord,
    MetricRow, MetricSeries, PayrollAdjustments, SalaryStructureRow,
};

/// Request body for `POST /payroll/calculate`.
///
/// Attendance is given either as period counts or as daily records, which
/// are summarised with the configured capture mode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayrollRequest {
    /// The salary structure in force for the period.
    pub salary_structure: SalaryStructureRow,
    /// Attendance counts for the period.
    #[serde(default)]
    pub attendance: Option<AttendanceRow>,
    /// Daily attendance records, used when `attendance` is absent.
    #[serde(default)]
    pub attendance_days: Option<Vec<AttendanceDay>>,
    /// Bonus and manual deductions.
    #[serde(default)]
    pub adjustments: PayrollAdjustments,
}

/// Request body for `POST /analytics/anomalies`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnomalyRequest {
    /// Metric rows, possibly for several subjects and metric types.
    pub metrics: Vec<MetricRow>,
    /// Overrides the configured z-score threshold.
    #[serde(default)]
    pub threshold: Option<f64>,
}

/// Request body for `POST /analytics/trends`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrendRequest {
    /// The subject the data belongs to.
    pub subject_id: String,
    /// The subject's metric rows. Rows without a subject are assigned to
    /// `subject_id`.
    #[serde(default)]
    pub metrics: Vec<MetricRow>,
    /// Attendance counts per pay period, oldest first.
    #[serde(default)]
    pub attendance: Vec<AttendanceRow>,
}

/// Request body for `POST /analytics/feedback`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackRequest {
    /// Feedback rows to analyse together.
    pub feedback: Vec<FeedbackRow>,
}

/// Request body for `POST /analytics/insights`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsightRequest {
    /// The subject the data belongs to.
    pub subject_id: String,
    /// The subject's metric rows.
    #[serde(default)]
    pub metrics: Vec<MetricRow>,
    /// Attendance counts per pay period, oldest first.
    #[serde(default)]
    pub attendance: Vec<AttendanceRow>,
    /// Feedback rows for the subject.
    #[serde(default)]
    pub feedback: Vec<FeedbackRow>,
}

/// Converts metric rows into series for one subject.
pub(crate) fn subject_series(subject_id: &str, rows: Vec<MetricRow>) -> EngineResult<Vec<MetricSeries>> {
    let records = rows
        .into_iter()
        .map(|mut row| {
            match row.subject_id.as_deref() {
                None => row.subject_id = Some(subject_id.to_string()),
                Some(id) if id != subject_id => {
                    return Err(EngineError::invalid_field(
                        "subject_id",
                        format!("metric row for '{}' in a request for '{}'", id, subject_id),
                    ));
                }
                Some(_) => {}
            }
            MetricRecord::try_from(row)
        })
        .collect::<EngineResult<Vec<_>>>()?;
    Ok(MetricSeries::group(&records))
}

/// Converts every row, failing on the first bad one.
pub(crate) fn convert_rows<R, T>(rows: Vec<R>) -> EngineResult<Vec<T>>
where
    T: TryFrom<R, Error = EngineError>,
{
    rows.into_iter().map(T::try_from).collect()
}

/// Converts attendance rows in order.
pub(crate) fn attendance_periods(rows: Vec<AttendanceRow>) -> EngineResult<Vec<AttendancePeriod>> {
    convert_rows(rows)
}

/// Converts feedback rows in order.
pub(crate) fn feedback_records(rows: Vec<FeedbackRow>) -> EngineResult<Vec<FeedbackRecord>> {
    convert_rows(rows)
}
