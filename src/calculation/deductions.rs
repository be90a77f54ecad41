//! Statutory deduction calculations.
//!
//! This module provides the provident fund, tax deducted at source, employee
//! state insurance and loss-of-pay deductions. Every amount is rounded to the
//! nearest whole currency unit.

use rust_decimal::Decimal;

use crate::config::PayrollPolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendancePeriod, AuditStep};

use super::proration::round_currency;

/// A single deduction, including the audit step.
#[derive(Debug, Clone)]
pub struct DeductionResult {
    /// The amount deducted.
    pub amount: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Provident fund: `round(basic_salary × pf_rate)`.
///
/// `basic_salary` is the prorated basic paid for the period.
///
/// # Examples
///
/// ```
/// use hrms_engine::calculation::calculate_provident_fund;
/// use hrms_engine::config::PayrollPolicy;
/// use rust_decimal::Decimal;
///
/// let result = calculate_provident_fund(Decimal::from(30000), &PayrollPolicy::default(), 1);
/// assert_eq!(result.amount, Decimal::from(3600));
/// ```
pub fn calculate_provident_fund(
    basic_salary: Decimal,
    policy: &PayrollPolicy,
    step_number: u32,
) -> DeductionResult {
    let amount = round_currency(basic_salary * policy.pf_rate);

    DeductionResult {
        amount,
        audit_step: AuditStep {
            step_number,
            rule_id: "provident_fund".to_string(),
            rule_name: "Provident Fund".to_string(),
            input: serde_json::json!({
                "basic_salary": basic_salary.normalize().to_string(),
                "pf_rate": policy.pf_rate.normalize().to_string()
            }),
            output: serde_json::json!({
                "amount": amount.normalize().to_string()
            }),
            reasoning: format!(
                "{} × {} = {}",
                basic_salary.normalize(),
                policy.pf_rate.normalize(),
                amount.normalize()
            ),
        },
    }
}

/// Tax deducted at source: `round(total_earnings × tax_rate)` when total
/// earnings exceed the tax threshold, otherwise zero.
pub fn calculate_tax(
    total_earnings: Decimal,
    policy: &PayrollPolicy,
    step_number: u32,
) -> DeductionResult {
    let applies = total_earnings > policy.tax_threshold;
    let amount = if applies {
        round_currency(total_earnings * policy.tax_rate)
    } else {
        Decimal::ZERO
    };

    let reasoning = if applies {
        format!(
            "{} > threshold {}: {} × {} = {}",
            total_earnings.normalize(),
            policy.tax_threshold.normalize(),
            total_earnings.normalize(),
            policy.tax_rate.normalize(),
            amount.normalize()
        )
    } else {
        format!(
            "{} <= threshold {}: no tax deducted",
            total_earnings.normalize(),
            policy.tax_threshold.normalize()
        )
    };

    DeductionResult {
        amount,
        audit_step: AuditStep {
            step_number,
            rule_id: "tax_deducted_at_source".to_string(),
            rule_name: "Tax Deducted at Source".to_string(),
            input: serde_json::json!({
                "total_earnings": total_earnings.normalize().to_string(),
                "tax_threshold": policy.tax_threshold.normalize().to_string(),
                "tax_rate": policy.tax_rate.normalize().to_string()
            }),
            output: serde_json::json!({
                "applies": applies,
                "amount": amount.normalize().to_string()
            }),
            reasoning,
        },
    }
}

/// Employee state insurance: `round(total_earnings × esi_rate)` when total
/// earnings are below the ESI threshold, otherwise zero.
pub fn calculate_esi(
    total_earnings: Decimal,
    policy: &PayrollPolicy,
    step_number: u32,
) -> DeductionResult {
    let applies = total_earnings < policy.esi_threshold;
    let amount = if applies {
        round_currency(total_earnings * policy.esi_rate)
    } else {
        Decimal::ZERO
    };

    let reasoning = if applies {
        format!(
            "{} < threshold {}: {} × {} = {}",
            total_earnings.normalize(),
            policy.esi_threshold.normalize(),
            total_earnings.normalize(),
            policy.esi_rate.normalize(),
            amount.normalize()
        )
    } else {
        format!(
            "{} >= threshold {}: not covered by ESI",
            total_earnings.normalize(),
            policy.esi_threshold.normalize()
        )
    };

    DeductionResult {
        amount,
        audit_step: AuditStep {
            step_number,
            rule_id: "employee_state_insurance".to_string(),
            rule_name: "Employee State Insurance".to_string(),
            input: serde_json::json!({
                "total_earnings": total_earnings.normalize().to_string(),
                "esi_threshold": policy.esi_threshold.normalize().to_string(),
                "esi_rate": policy.esi_rate.normalize().to_string()
            }),
            output: serde_json::json!({
                "applies": applies,
                "amount": amount.normalize().to_string()
            }),
            reasoning,
        },
    }
}

/// Loss-of-pay deduction: `round(full_basic_salary / working_days × lop_days)`.
///
/// This is computed against the unprorated basic salary, independently of
/// the proration already applied to earnings.
///
/// # Errors
///
/// Returns [`EngineError::DivisionByZero`] when `working_days` is zero.
pub fn calculate_lop_deduction(
    full_basic_salary: Decimal,
    period: &AttendancePeriod,
    step_number: u32,
) -> EngineResult<DeductionResult> {
    if period.working_days == 0 {
        return Err(EngineError::DivisionByZero {
            field: "working_days".to_string(),
        });
    }

    let daily_rate = full_basic_salary / Decimal::from(period.working_days);
    let amount = round_currency(daily_rate * Decimal::from(period.lop_days));

    Ok(DeductionResult {
        amount,
        audit_step: AuditStep {
            step_number,
            rule_id: "lop_deduction".to_string(),
            rule_name: "Loss of Pay Deduction".to_string(),
            input: serde_json::json!({
                "full_basic_salary": full_basic_salary.normalize().to_string(),
                "working_days": period.working_days,
                "lop_days": period.lop_days
            }),
            output: serde_json::json!({
                "daily_rate": daily_rate.round_dp(2).normalize().to_string(),
                "amount": amount.normalize().to_string()
            }),
            reasoning: format!(
                "{} / {} × {} LOP days = {}",
                full_basic_salary.normalize(),
                period.working_days,
                period.lop_days,
                amount.normalize()
            ),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_provident_fund_rounds() {
        // 27273 × 0.12 = 3272.76
        let result = calculate_provident_fund(dec("27273"), &PayrollPolicy::default(), 1);
        assert_eq!(result.amount, dec("3273"));
    }

    #[test]
    fn test_tax_above_threshold() {
        let result = calculate_tax(dec("57000"), &PayrollPolicy::default(), 1);
        assert_eq!(result.amount, dec("5700"));
        assert!(result.audit_step.output["applies"].as_bool().unwrap());
    }

    #[test]
    fn test_tax_at_threshold_is_zero() {
        let result = calculate_tax(dec("50000"), &PayrollPolicy::default(), 1);
        assert_eq!(result.amount, Decimal::ZERO);
        assert!(result.audit_step.reasoning.contains("no tax"));
    }

    #[test]
    fn test_tax_uses_configured_rate() {
        let policy = PayrollPolicy {
            tax_threshold: dec("10000"),
            tax_rate: dec("0.2"),
            ..PayrollPolicy::default()
        };
        let result = calculate_tax(dec("20000"), &policy, 1);
        assert_eq!(result.amount, dec("4000"));
    }

    #[test]
    fn test_esi_below_threshold() {
        // 20000 × 0.0075 = 150
        let result = calculate_esi(dec("20000"), &PayrollPolicy::default(), 1);
        assert_eq!(result.amount, dec("150"));
    }

    #[test]
    fn test_esi_rounds_half_up() {
        // 18100 × 0.0075 = 135.75
        let result = calculate_esi(dec("18100"), &PayrollPolicy::default(), 1);
        assert_eq!(result.amount, dec("136"));
    }

    #[test]
    fn test_esi_at_threshold_is_zero() {
        let result = calculate_esi(dec("25000"), &PayrollPolicy::default(), 1);
        assert_eq!(result.amount, Decimal::ZERO);
    }

    #[test]
    fn test_lop_deduction_uses_full_basic() {
        // 30000 / 22 × 2 = 2727.27...
        let period = AttendancePeriod::new(22, 20, 2).unwrap();
        let result = calculate_lop_deduction(dec("30000"), &period, 1).unwrap();
        assert_eq!(result.amount, dec("2727"));
    }

    #[test]
    fn test_no_lop_days_no_deduction() {
        let period = AttendancePeriod::new(22, 22, 0).unwrap();
        let result = calculate_lop_deduction(dec("30000"), &period, 1).unwrap();
        assert_eq!(result.amount, Decimal::ZERO);
    }

    #[test]
    fn test_lop_deduction_zero_working_days() {
        let period = AttendancePeriod::new(0, 0, 0).unwrap();
        assert!(matches!(
            calculate_lop_deduction(dec("30000"), &period, 1),
            Err(EngineError::DivisionByZero { .. })
        ));
    }
}
