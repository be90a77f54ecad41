//! Payroll result models for the HRMS Engine.
//!
//! This module contains the [`PayrollResult`] type and its associated structures
//! that capture all outputs of a payroll calculation: itemized earnings and
//! deductions, totals, and an audit trace of every rule applied.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Manual, per-run adjustments entered by payroll staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollAdjustments {
    /// One-off bonus added to earnings.
    pub bonus: Decimal,
    /// One-off deductions added to the deduction total.
    pub manual_deductions: Decimal,
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate potential issues that don't prevent calculation
/// but may require attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// Itemized payroll for one employee and one pay period.
///
/// Field names follow the store's column naming so the result can be
/// persisted as-is. Invariants:
/// `total_earnings` is the sum of the earnings fields,
/// `total_deductions` is the sum of the deduction fields, and
/// `net_pay = total_earnings - total_deductions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollResult {
    /// The employee the payroll is for.
    pub employee_id: String,
    /// `present_days / working_days`.
    pub attendance_ratio: Decimal,
    /// Prorated basic salary.
    pub basic_salary: Decimal,
    /// Prorated house rent allowance.
    pub hra: Decimal,
    /// Prorated special allowance.
    pub special_allowance: Decimal,
    /// Transport allowance after the attendance threshold rule.
    pub transport_allowance: Decimal,
    /// Medical allowance, paid in full.
    pub medical_allowance: Decimal,
    /// Other allowances, paid in full.
    pub other_allowances: Decimal,
    /// Manual bonus.
    pub bonus: Decimal,
    /// Sum of all earnings fields.
    pub total_earnings: Decimal,
    /// Provident fund contribution.
    pub provident_fund: Decimal,
    /// Tax deducted at source.
    pub tax: Decimal,
    /// Employee state insurance contribution.
    pub employee_state_insurance: Decimal,
    /// Loss-of-pay deduction.
    pub lop_deduction: Decimal,
    /// Manual deductions.
    pub manual_deductions: Decimal,
    /// Sum of all deduction fields.
    pub total_deductions: Decimal,
    /// `total_earnings - total_deductions`; may be negative, see warnings.
    pub net_pay: Decimal,
    /// Every rule applied, in order.
    pub audit_trace: AuditTrace,
}

impl PayrollResult {
    /// Sum of the itemized earnings fields.
    pub fn sum_of_earnings(&self) -> Decimal {
        self.basic_salary
            + self.hra
            + self.special_allowance
            + self.transport_allowance
            + self.medical_allowance
            + self.other_allowances
            + self.bonus
    }

    /// Sum of the itemized deduction fields.
    pub fn sum_of_deductions(&self) -> Decimal {
        self.provident_fund
            + self.tax
            + self.employee_state_insurance
            + self.lop_deduction
            + self.manual_deductions
    }
}

/// A payroll result stamped with calculation metadata.
///
/// This is what the API returns; [`PayrollResult`] itself stays deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollCalculation {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
    /// The calculated payroll.
    pub payroll: PayrollResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample_result() -> PayrollResult {
        PayrollResult {
            employee_id: "emp_001".to_string(),
            attendance_ratio: dec("1"),
            basic_salary: dec("30000"),
            hra: dec("12000"),
            special_allowance: dec("9000"),
            transport_allowance: dec("3000"),
            medical_allowance: dec("2000"),
            other_allowances: dec("1000"),
            bonus: dec("0"),
            total_earnings: dec("57000"),
            provident_fund: dec("3600"),
            tax: dec("5700"),
            employee_state_insurance: dec("0"),
            lop_deduction: dec("0"),
            manual_deductions: dec("0"),
            total_deductions: dec("9300"),
            net_pay: dec("47700"),
            audit_trace: AuditTrace::default(),
        }
    }

    #[test]
    fn test_sums_match_totals() {
        let result = sample_result();
        assert_eq!(result.sum_of_earnings(), result.total_earnings);
        assert_eq!(result.sum_of_deductions(), result.total_deductions);
        assert_eq!(result.total_earnings - result.total_deductions, result.net_pay);
    }

    #[test]
    fn test_payroll_result_uses_store_column_names() {
        let json = serde_json::to_string(&sample_result()).unwrap();
        assert!(json.contains("\"basic_salary\":\"30000\""));
        assert!(json.contains("\"provident_fund\":\"3600\""));
        assert!(json.contains("\"employee_state_insurance\":\"0\""));
        assert!(json.contains("\"net_pay\":\"47700\""));
        assert!(json.contains("\"audit_trace\":{"));
    }

    #[test]
    fn test_adjustments_default_to_zero() {
        let adjustments: PayrollAdjustments = serde_json::from_str("{}").unwrap();
        assert_eq!(adjustments.bonus, Decimal::ZERO);
        assert_eq!(adjustments.manual_deductions, Decimal::ZERO);

        let adjustments: PayrollAdjustments = serde_json::from_str(r#"{"bonus": "2500"}"#).unwrap();
        assert_eq!(adjustments.bonus, dec("2500"));
    }

    #[test]
    fn test_calculation_envelope_serialization() {
        let calculation = PayrollCalculation {
            calculation_id: Uuid::nil(),
            timestamp: DateTime::parse_from_rfc3339("2025-06-30T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            engine_version: "0.1.0".to_string(),
            duration_us: 42,
            payroll: sample_result(),
        };

        let json = serde_json::to_string(&calculation).unwrap();
        assert!(json.contains("\"calculation_id\":\"00000000-0000-0000-0000-000000000000\""));
        assert!(json.contains("\"engine_version\":\"0.1.0\""));
        assert!(json.contains("\"payroll\":{"));
    }

    #[test]
    fn test_audit_warning_serialization() {
        let warning = AuditWarning {
            code: "NEGATIVE_NET_PAY".to_string(),
            message: "Deductions exceed earnings".to_string(),
            severity: "high".to_string(),
        };

        let json = serde_json::to_string(&warning).unwrap();
        assert!(json.contains("\"code\":\"NEGATIVE_NET_PAY\""));
        assert!(json.contains("\"severity\":\"high\""));
    }
}
