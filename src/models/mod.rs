//! Core data models for the HRMS Engine.
//!
//! This module contains all the domain models used throughout the engine,
//! including the row types that validate data at the ingestion boundary.

mod anomaly;
mod attendance;
mod feedback;
mod insight;
mod metric;
mod pay_period;
mod payroll_result;
mod salary_structure;

pub use anomaly::{Anomaly, Severity};
pub use attendance::{
    AttendanceDay, AttendancePeriod, AttendanceRow, AttendanceSummary, CaptureMethod, DayStatus,
};
pub use feedback::{FeedbackRecord, FeedbackRow};
pub use insight::{Insight, InsightType};
pub use metric::{MetricRecord, MetricRow, MetricSample, MetricSeries};
pub use pay_period::PayPeriod;
pub use payroll_result::{
    AuditStep, AuditTrace, AuditWarning, PayrollAdjustments, PayrollCalculation, PayrollResult,
};
pub use salary_structure::{
    MAX_COMPONENT_AMOUNT, SalaryHistory, SalaryStructure, SalaryStructureRow,
};
