//! Transport allowance calculation.
//!
//! Transport allowance follows a step policy rather than smooth proration:
//! it is paid in full when the employee was present on more than the
//! configured number of days, and prorated by attendance otherwise.

use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::{AttendancePeriod, AuditStep};

use super::proration::prorate_component;

/// The transport allowance for a period, including the audit step.
#[derive(Debug, Clone)]
pub struct TransportAllowanceResult {
    /// The allowance paid.
    pub amount: Decimal,
    /// Whether the full amount was paid.
    pub paid_in_full: bool,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the transport allowance.
///
/// # Arguments
///
/// * `full_amount` - The monthly transport allowance from the salary structure
/// * `period` - Attendance counts for the pay period
/// * `full_days` - Present days above which the full amount is paid
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use hrms_engine::calculation::calculate_transport_allowance;
/// use hrms_engine::models::AttendancePeriod;
/// use rust_decimal::Decimal;
///
/// let period = AttendancePeriod::new(22, 16, 6).unwrap();
/// let result = calculate_transport_allowance(Decimal::from(3000), &period, 15, 1).unwrap();
/// assert!(result.paid_in_full);
/// assert_eq!(result.amount, Decimal::from(3000));
/// ```
pub fn calculate_transport_allowance(
    full_amount: Decimal,
    period: &AttendancePeriod,
    full_days: u32,
    step_number: u32,
) -> EngineResult<TransportAllowanceResult> {
    let paid_in_full = period.present_days > full_days;

    let amount = if paid_in_full {
        full_amount
    } else {
        prorate_component("transport_allowance", full_amount, period, step_number)?.amount
    };

    let reasoning = if paid_in_full {
        format!(
            "{} present days > {}: full allowance {}",
            period.present_days,
            full_days,
            amount.normalize()
        )
    } else {
        format!(
            "{} present days <= {}: prorated {} × {}/{} = {}",
            period.present_days,
            full_days,
            full_amount.normalize(),
            period.present_days,
            period.working_days,
            amount.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "transport_allowance".to_string(),
        rule_name: "Transport Allowance".to_string(),
        input: serde_json::json!({
            "full_amount": full_amount.normalize().to_string(),
            "present_days": period.present_days,
            "working_days": period.working_days,
            "full_days": full_days
        }),
        output: serde_json::json!({
            "amount": amount.normalize().to_string(),
            "paid_in_full": paid_in_full
        }),
        reasoning,
    };

    Ok(TransportAllowanceResult {
        amount,
        paid_in_full,
        audit_step,
    })
}
