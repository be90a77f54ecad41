//! The payroll pipeline.
//!
//! Combines proration, the transport allowance rule and the statutory
//! deductions into an itemized [`PayrollResult`]. The calculation is pure:
//! the same inputs always produce the same result.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::PayrollPolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendancePeriod, AuditStep, AuditTrace, AuditWarning, MAX_COMPONENT_AMOUNT, PayrollAdjustments,
    PayrollResult, SalaryStructure,
};

use super::deductions::{calculate_esi, calculate_lop_deduction, calculate_provident_fund, calculate_tax};
use super::proration::{attendance_ratio, prorate_component};
use super::transport_allowance::calculate_transport_allowance;

/// Warning code raised when deductions exceed earnings.
pub const NEGATIVE_NET_PAY_WARNING: &str = "NEGATIVE_NET_PAY";

fn validate_adjustments(adjustments: &PayrollAdjustments) -> EngineResult<()> {
    for (field, amount) in [
        ("bonus", adjustments.bonus),
        ("manual_deductions", adjustments.manual_deductions),
    ] {
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

/// Calculates itemized payroll for one employee and one pay period.
///
/// Steps, in order:
/// 1. attendance ratio (`present_days / working_days`)
/// 2. basic salary, HRA and special allowance prorated by attendance
/// 3. transport allowance (full above `transport_full_days`, else prorated)
/// 4. medical and other allowances paid in full, bonus added
/// 5. provident fund on the prorated basic salary
/// 6. tax and ESI on total earnings
/// 7. loss-of-pay on the unprorated basic salary
/// 8. manual deductions
///
/// A negative net pay is reported as a `NEGATIVE_NET_PAY` warning in the
/// audit trace; it is neither clamped nor rejected.
///
/// # Errors
///
/// * [`EngineError::InvalidField`] for salary components or adjustments that
///   are negative or above [`MAX_COMPONENT_AMOUNT`], rates above 1, or
///   inconsistent attendance counts
/// * [`EngineError::DivisionByZero`] when `working_days` is zero
///
/// # Examples
///
/// ```
/// use hrms_engine::calculation::calculate_payroll;
/// use hrms_engine::config::PayrollPolicy;
/// use hrms_engine::models::{AttendancePeriod, PayrollAdjustments, SalaryStructure};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let structure = SalaryStructure {
///     employee_id: "emp_001".to_string(),
///     effective_from: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
///     basic_salary: Decimal::from(30000),
///     hra: Decimal::from(12000),
///     special_allowance: Decimal::from(9000),
///     transport_allowance: Decimal::from(3000),
///     medical_allowance: Decimal::from(2000),
///     other_allowances: Decimal::from(1000),
/// };
/// let attendance = AttendancePeriod::new(22, 22, 0).unwrap();
///
/// let result = calculate_payroll(
///     &structure,
///     &attendance,
///     &PayrollAdjustments::default(),
///     &PayrollPolicy::default(),
/// ).unwrap();
///
/// assert_eq!(result.total_earnings, Decimal::from(57000));
/// assert_eq!(result.total_deductions, Decimal::from(9300));
/// assert_eq!(result.net_pay, Decimal::from(47700));
/// ```
pub fn calculate_payroll(
    structure: &SalaryStructure,
    attendance: &AttendancePeriod,
    adjustments: &PayrollAdjustments,
    policy: &PayrollPolicy,
) -> EngineResult<PayrollResult> {
    policy.validate()?;
    structure.validate()?;
    attendance.validate()?;
    validate_adjustments(adjustments)?;

    let mut steps: Vec<AuditStep> = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();
    let mut step_number: u32 = 1;

    // Earnings
    let ratio = attendance_ratio(attendance, step_number)?;
    steps.push(ratio.audit_step);
    step_number += 1;

    let mut prorate = |component: &str, amount: Decimal| -> EngineResult<Decimal> {
        let result = prorate_component(component, amount, attendance, step_number)?;
        steps.push(result.audit_step);
        step_number += 1;
        Ok(result.amount)
    };
    let basic_salary = prorate("basic_salary", structure.basic_salary)?;
    let hra = prorate("hra", structure.hra)?;
    let special_allowance = prorate("special_allowance", structure.special_allowance)?;

    let transport = calculate_transport_allowance(
        structure.transport_allowance,
        attendance,
        policy.transport_full_days,
        step_number,
    )?;
    steps.push(transport.audit_step);
    step_number += 1;

    let medical_allowance = structure.medical_allowance;
    let other_allowances = structure.other_allowances;
    let bonus = adjustments.bonus;

    let total_earnings = basic_salary
        + hra
        + special_allowance
        + transport.amount
        + medical_allowance
        + other_allowances
        + bonus;

    steps.push(AuditStep {
        step_number,
        rule_id: "total_earnings".to_string(),
        rule_name: "Total Earnings".to_string(),
        input: serde_json::json!({
            "basic_salary": basic_salary.normalize().to_string(),
            "hra": hra.normalize().to_string(),
            "special_allowance": special_allowance.normalize().to_string(),
            "transport_allowance": transport.amount.normalize().to_string(),
            "medical_allowance": medical_allowance.normalize().to_string(),
            "other_allowances": other_allowances.normalize().to_string(),
            "bonus": bonus.normalize().to_string()
        }),
        output: serde_json::json!({
            "total_earnings": total_earnings.normalize().to_string()
        }),
        reasoning: "Medical and other allowances are fixed benefits and are not prorated"
            .to_string(),
    });
    step_number += 1;

    // Deductions
    let provident_fund = calculate_provident_fund(basic_salary, policy, step_number);
    steps.push(provident_fund.audit_step);
    step_number += 1;

    let tax = calculate_tax(total_earnings, policy, step_number);
    steps.push(tax.audit_step);
    step_number += 1;

    let esi = calculate_esi(total_earnings, policy, step_number);
    steps.push(esi.audit_step);
    step_number += 1;

    let lop = calculate_lop_deduction(structure.basic_salary, attendance, step_number)?;
    steps.push(lop.audit_step);
    step_number += 1;

    let manual_deductions = adjustments.manual_deductions;
    let total_deductions =
        provident_fund.amount + tax.amount + esi.amount + lop.amount + manual_deductions;
    let net_pay = total_earnings - total_deductions;

    steps.push(AuditStep {
        step_number,
        rule_id: "net_pay".to_string(),
        rule_name: "Net Pay".to_string(),
        input: serde_json::json!({
            "total_earnings": total_earnings.normalize().to_string(),
            "total_deductions": total_deductions.normalize().to_string(),
            "manual_deductions": manual_deductions.normalize().to_string()
        }),
        output: serde_json::json!({
            "net_pay": net_pay.normalize().to_string()
        }),
        reasoning: format!(
            "{} - {} = {}",
            total_earnings.normalize(),
            total_deductions.normalize(),
            net_pay.normalize()
        ),
    });

    if net_pay < Decimal::ZERO {
        warnings.push(AuditWarning {
            code: NEGATIVE_NET_PAY_WARNING.to_string(),
            message: format!(
                "Deductions {} exceed earnings {}",
                total_deductions.normalize(),
                total_earnings.normalize()
            ),
            severity: "high".to_string(),
        });
    }

    debug!(
        employee_id = %structure.employee_id,
        total_earnings = %total_earnings,
        total_deductions = %total_deductions,
        net_pay = %net_pay,
        "Payroll calculated"
    );

    Ok(PayrollResult {
        employee_id: structure.employee_id.clone(),
        attendance_ratio: ratio.ratio,
        basic_salary,
        hra,
        special_allowance,
        transport_allowance: transport.amount,
        medical_allowance,
        other_allowances,
        bonus,
        total_earnings,
        provident_fund: provident_fund.amount,
        tax: tax.amount,
        employee_state_insurance: esi.amount,
        lop_deduction: lop.amount,
        manual_deductions,
        total_deductions,
        net_pay,
        audit_trace: AuditTrace { steps, warnings },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn reference_structure() -> SalaryStructure {
        SalaryStructure {
            employee_id: "emp_001".to_string(),
            effective_from: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            basic_salary: dec("30000"),
            hra: dec("12000"),
            special_allowance: dec("9000"),
            transport_allowance: dec("3000"),
            medical_allowance: dec("2000"),
            other_allowances: dec("1000"),
        }
    }

    fn calculate(attendance: AttendancePeriod, adjustments: PayrollAdjustments) -> PayrollResult {
        calculate_payroll(
            &reference_structure(),
            &attendance,
            &adjustments,
            &PayrollPolicy::default(),
        )
        .unwrap()
    }

    /// Full attendance reference scenario.
    #[test]
    fn test_full_attendance_reference_scenario() {
        let result = calculate(
            AttendancePeriod::new(22, 22, 0).unwrap(),
            PayrollAdjustments::default(),
        );

        assert_eq!(result.attendance_ratio, dec("1"));
        assert_eq!(result.basic_salary, dec("30000"));
        assert_eq!(result.hra, dec("12000"));
        assert_eq!(result.special_allowance, dec("9000"));
        assert_eq!(result.transport_allowance, dec("3000"));
        assert_eq!(result.medical_allowance, dec("2000"));
        assert_eq!(result.other_allowances, dec("1000"));
        assert_eq!(result.bonus, dec("0"));
        assert_eq!(result.total_earnings, dec("57000"));
        assert_eq!(result.provident_fund, dec("3600"));
        assert_eq!(result.tax, dec("5700"));
        assert_eq!(result.employee_state_insurance, dec("0"));
        assert_eq!(result.lop_deduction, dec("0"));
        assert_eq!(result.total_deductions, dec("9300"));
        assert_eq!(result.net_pay, dec("47700"));
        assert!(result.audit_trace.warnings.is_empty());
    }

    #[test]
    fn test_partial_attendance_with_lop() {
        // 20 of 22 days present, 2 LOP.
        let result = calculate(
            AttendancePeriod::new(22, 20, 2).unwrap(),
            PayrollAdjustments::default(),
        );

        assert_eq!(result.basic_salary, dec("27273")); // 27272.73
        assert_eq!(result.hra, dec("10909")); // 10909.09
        assert_eq!(result.special_allowance, dec("8182")); // 8181.82
        assert_eq!(result.transport_allowance, dec("3000")); // 20 > 15
        assert_eq!(result.total_earnings, dec("52364"));
        assert_eq!(result.provident_fund, dec("3273")); // 3272.76
        assert_eq!(result.tax, dec("5236")); // 5236.4
        assert_eq!(result.employee_state_insurance, dec("0"));
        assert_eq!(result.lop_deduction, dec("2727")); // 2727.27
        assert_eq!(result.total_deductions, dec("11236"));
        assert_eq!(result.net_pay, dec("41128"));
    }

    #[test]
    fn test_low_attendance_prorates_transport_and_triggers_esi() {
        // 10 of 22 days: earnings fall below the tax threshold and under ESI.
        let result = calculate(
            AttendancePeriod::new(22, 10, 12).unwrap(),
            PayrollAdjustments::default(),
        );

        assert_eq!(result.basic_salary, dec("13636")); // 13636.36
        assert_eq!(result.hra, dec("5455")); // 5454.55
        assert_eq!(result.special_allowance, dec("4091")); // 4090.91
        assert_eq!(result.transport_allowance, dec("1364")); // 1363.64
        assert_eq!(result.total_earnings, dec("27546"));
        assert_eq!(result.tax, dec("0"));
        assert_eq!(result.employee_state_insurance, dec("0")); // 27546 >= 25000
        assert_eq!(result.lop_deduction, dec("16364")); // 16363.64
    }

    #[test]
    fn test_bonus_is_added_to_earnings_and_taxed() {
        let result = calculate(
            AttendancePeriod::new(22, 22, 0).unwrap(),
            PayrollAdjustments {
                bonus: dec("5000"),
                manual_deductions: Decimal::ZERO,
            },
        );
        assert_eq!(result.total_earnings, dec("62000"));
        assert_eq!(result.tax, dec("6200"));
        assert_eq!(result.net_pay, dec("62000") - dec("3600") - dec("6200"));
    }

    #[test]
    fn test_manual_deductions_can_drive_net_pay_negative() {
        let result = calculate(
            AttendancePeriod::new(22, 22, 0).unwrap(),
            PayrollAdjustments {
                bonus: Decimal::ZERO,
                manual_deductions: dec("60000"),
            },
        );

        assert_eq!(result.total_deductions, dec("69300"));
        assert_eq!(result.net_pay, dec("-12300"));
        assert_eq!(result.audit_trace.warnings.len(), 1);
        assert_eq!(result.audit_trace.warnings[0].code, NEGATIVE_NET_PAY_WARNING);
    }

    #[test]
    fn test_negative_adjustment_rejected() {
        let result = calculate_payroll(
            &reference_structure(),
            &AttendancePeriod::new(22, 22, 0).unwrap(),
            &PayrollAdjustments {
                bonus: dec("-1"),
                manual_deductions: Decimal::ZERO,
            },
            &PayrollPolicy::default(),
        );
        assert!(matches!(result, Err(EngineError::InvalidField { field, .. }) if field == "bonus"));
    }

    #[test]
    fn test_oversized_inputs_rejected_before_arithmetic() {
        let attendance = AttendancePeriod::new(22, 20, 2).unwrap();

        let mut structure = reference_structure();
        structure.basic_salary = Decimal::MAX;
        let result = calculate_payroll(
            &structure,
            &attendance,
            &PayrollAdjustments::default(),
            &PayrollPolicy::default(),
        );
        assert!(matches!(result, Err(EngineError::InvalidField { field, .. }) if field == "basic_salary"));

        let result = calculate_payroll(
            &reference_structure(),
            &attendance,
            &PayrollAdjustments {
                bonus: Decimal::ZERO,
                manual_deductions: Decimal::MAX,
            },
            &PayrollPolicy::default(),
        );
        assert!(matches!(result, Err(EngineError::InvalidField { field, .. }) if field == "manual_deductions"));
    }

    #[test]
    fn test_largest_inputs_calculate_without_overflow() {
        let structure = SalaryStructure {
            basic_salary: MAX_COMPONENT_AMOUNT,
            hra: MAX_COMPONENT_AMOUNT,
            special_allowance: MAX_COMPONENT_AMOUNT,
            transport_allowance: MAX_COMPONENT_AMOUNT,
            medical_allowance: MAX_COMPONENT_AMOUNT,
            other_allowances: MAX_COMPONENT_AMOUNT,
            ..reference_structure()
        };
        let adjustments = PayrollAdjustments {
            bonus: MAX_COMPONENT_AMOUNT,
            manual_deductions: MAX_COMPONENT_AMOUNT,
        };
        let policy = PayrollPolicy {
            pf_rate: Decimal::ONE,
            tax_rate: Decimal::ONE,
            ..PayrollPolicy::default()
        };

        let result = calculate_payroll(
            &structure,
            &AttendancePeriod::new(u32::MAX, u32::MAX - 1, 1).unwrap(),
            &adjustments,
            &policy,
        )
        .unwrap();
        assert_eq!(result.net_pay, result.total_earnings - result.total_deductions);
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let policy = PayrollPolicy {
            tax_rate: dec("10"),
            ..PayrollPolicy::default()
        };
        let result = calculate_payroll(
            &reference_structure(),
            &AttendancePeriod::new(22, 22, 0).unwrap(),
            &PayrollAdjustments::default(),
            &policy,
        );
        assert!(matches!(result, Err(EngineError::InvalidField { field, .. }) if field == "tax_rate"));
    }

    #[test]
    fn test_zero_working_days_returns_division_error() {
        let result = calculate_payroll(
            &reference_structure(),
            &AttendancePeriod::new(0, 0, 0).unwrap(),
            &PayrollAdjustments::default(),
            &PayrollPolicy::default(),
        );
        assert!(matches!(
            result,
            Err(EngineError::DivisionByZero { field }) if field == "working_days"
        ));
    }

    #[test]
    fn test_inconsistent_attendance_rejected_before_arithmetic() {
        let attendance = AttendancePeriod {
            working_days: 20,
            present_days: 25,
            lop_days: 0,
        };
        let result = calculate_payroll(
            &reference_structure(),
            &attendance,
            &PayrollAdjustments::default(),
            &PayrollPolicy::default(),
        );
        assert!(matches!(result, Err(EngineError::InvalidField { field, .. }) if field == "present_days"));
    }

    #[test]
    fn test_audit_steps_sequential() {
        let result = calculate(
            AttendancePeriod::new(22, 22, 0).unwrap(),
            PayrollAdjustments::default(),
        );

        let step_numbers: Vec<u32> = result
            .audit_trace
            .steps
            .iter()
            .map(|s| s.step_number)
            .collect();
        let expected: Vec<u32> = (1..=step_numbers.len() as u32).collect();
        assert_eq!(step_numbers, expected);

        let rule_ids: Vec<&str> = result
            .audit_trace
            .steps
            .iter()
            .map(|s| s.rule_id.as_str())
            .collect();
        assert_eq!(
            rule_ids,
            vec![
                "attendance_ratio",
                "prorate_basic_salary",
                "prorate_hra",
                "prorate_special_allowance",
                "transport_allowance",
                "total_earnings",
                "provident_fund",
                "tax_deducted_at_source",
                "employee_state_insurance",
                "lop_deduction",
                "net_pay",
            ]
        );
    }

    #[test]
    fn test_calculation_is_deterministic() {
        let attendance = AttendancePeriod::new(22, 18, 3).unwrap();
        let first = calculate(attendance, PayrollAdjustments::default());
        let second = calculate(attendance, PayrollAdjustments::default());
        assert_eq!(first, second);
    }
}
