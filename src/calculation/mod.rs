//! Payroll calculation logic.
//!
//! This module contains the attendance-based proration of salary components,
//! the transport allowance rule, the statutory deductions (provident fund,
//! tax and employee state insurance), loss-of-pay, the full payroll pipeline,
//! daily attendance summarisation and the multi-employee batch runner.

mod attendance;
mod batch;
mod deductions;
mod payroll;
mod proration;
mod transport_allowance;

pub use attendance::summarize_attendance;
pub use batch::{BatchFailure, BatchSummary, run_payroll_batch};
pub use deductions::{
    DeductionResult, calculate_esi, calculate_lop_deduction, calculate_provident_fund,
    calculate_tax,
};
pub use payroll::{NEGATIVE_NET_PAY_WARNING, calculate_payroll};
pub use proration::{
    AttendanceRatioResult, ProrationResult, attendance_ratio, prorate_component, round_currency,
};
pub use transport_allowance::{TransportAllowanceResult, calculate_transport_allowance};
