//! Attendance ratio and proration.
//!
//! Basic salary, HRA and special allowance are paid in proportion to the
//! days present. Prorated amounts are rounded to the nearest whole currency
//! unit, with halves rounded up.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};
use crate::models::{AttendancePeriod, AuditStep};

/// Rounds to the nearest whole currency unit, halves away from zero.
///
/// # Examples
///
/// ```
/// use hrms_engine::calculation::round_currency;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_currency(Decimal::from_str("27272.73").unwrap()), Decimal::from(27273));
/// assert_eq!(round_currency(Decimal::from_str("112.5").unwrap()), Decimal::from(113));
/// ```
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// The attendance ratio for a period, including the audit step.
#[derive(Debug, Clone)]
pub struct AttendanceRatioResult {
    /// `present_days / working_days`.
    pub ratio: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes `present_days / working_days`.
///
/// # Errors
///
/// Returns [`EngineError::DivisionByZero`] when `working_days` is zero.
///
/// # Examples
///
/// ```
/// use hrms_engine::calculation::attendance_ratio;
/// use hrms_engine::models::AttendancePeriod;
/// use rust_decimal::Decimal;
///
/// let period = AttendancePeriod::new(20, 15, 5).unwrap();
/// let result = attendance_ratio(&period, 1).unwrap();
/// assert_eq!(result.ratio, Decimal::new(75, 2));
///
/// let empty = AttendancePeriod::new(0, 0, 0).unwrap();
/// assert!(attendance_ratio(&empty, 1).is_err());
/// ```
pub fn attendance_ratio(period: &AttendancePeriod, step_number: u32) -> EngineResult<AttendanceRatioResult> {
    if period.working_days == 0 {
        return Err(EngineError::DivisionByZero {
            field: "working_days".to_string(),
        });
    }

    let ratio = Decimal::from(period.present_days) / Decimal::from(period.working_days);

    let audit_step = AuditStep {
        step_number,
        rule_id: "attendance_ratio".to_string(),
        rule_name: "Attendance Ratio".to_string(),
        input: serde_json::json!({
            "working_days": period.working_days,
            "present_days": period.present_days,
            "lop_days": period.lop_days
        }),
        output: serde_json::json!({
            "ratio": ratio.round_dp(4).normalize().to_string()
        }),
        reasoning: format!(
            "{} present of {} working days",
            period.present_days, period.working_days
        ),
    };

    Ok(AttendanceRatioResult { ratio, audit_step })
}

/// A prorated salary component, including the audit step.
#[derive(Debug, Clone)]
pub struct ProrationResult {
    /// The prorated, rounded amount.
    pub amount: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Prorates `full_amount` by days present.
///
/// The amount is computed as `full_amount × present_days / working_days` so
/// that full attendance returns `full_amount` exactly.
///
/// # Errors
///
/// Returns [`EngineError::DivisionByZero`] when `working_days` is zero.
pub fn prorate_component(
    component: &str,
    full_amount: Decimal,
    period: &AttendancePeriod,
    step_number: u32,
) -> EngineResult<ProrationResult> {
    if period.working_days == 0 {
        return Err(EngineError::DivisionByZero {
            field: "working_days".to_string(),
        });
    }

    let exact =
        full_amount * Decimal::from(period.present_days) / Decimal::from(period.working_days);
    let amount = round_currency(exact);

    let audit_step = AuditStep {
        step_number,
        rule_id: format!("prorate_{}", component),
        rule_name: format!("Prorate {}", component),
        input: serde_json::json!({
            "component": component,
            "full_amount": full_amount.normalize().to_string(),
            "present_days": period.present_days,
            "working_days": period.working_days
        }),
        output: serde_json::json!({
            "amount": amount.normalize().to_string()
        }),
        reasoning: format!(
            "{} × {}/{} = {} (rounded to {})",
            full_amount.normalize(),
            period.present_days,
            period.working_days,
            exact.round_dp(4).normalize(),
            amount.normalize()
        ),
    };

    Ok(ProrationResult { amount, audit_step })
}
