//! Property tests for the payroll and analytics invariants.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use hrms_engine::analytics::{Trend, classify_trend, detect_zscore_anomalies, population_std_dev};
use hrms_engine::calculation::calculate_payroll;
use hrms_engine::config::PayrollPolicy;
use hrms_engine::models::{AttendancePeriod, PayrollAdjustments, SalaryStructure};

fn amount() -> impl Strategy<Value = Decimal> {
    (0u32..=500_000).prop_map(Decimal::from)
}

fn salary_structure() -> impl Strategy<Value = SalaryStructure> {
    (amount(), amount(), amount(), amount(), amount(), amount()).prop_map(
        |(basic, hra, special, transport, medical, other)| SalaryStructure {
            employee_id: "emp_prop".to_string(),
            effective_from: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            basic_salary: basic,
            hra,
            special_allowance: special,
            transport_allowance: transport,
            medical_allowance: medical,
            other_allowances: other,
        },
    )
}

fn attendance() -> impl Strategy<Value = AttendancePeriod> {
    (1u32..=31)
        .prop_flat_map(|working| (Just(working), 0..=working))
        .prop_flat_map(|(working, present)| (Just(working), Just(present), 0..=working - present))
        .prop_map(|(working, present, lop)| AttendancePeriod::new(working, present, lop).unwrap())
}

fn adjustments() -> impl Strategy<Value = PayrollAdjustments> {
    ((0u32..=50_000), (0u32..=50_000)).prop_map(|(bonus, manual)| PayrollAdjustments {
        bonus: Decimal::from(bonus),
        manual_deductions: Decimal::from(manual),
    })
}

proptest! {
    #[test]
    fn net_pay_is_earnings_minus_deductions(
        structure in salary_structure(),
        attendance in attendance(),
        adjustments in adjustments(),
    ) {
        let result = calculate_payroll(&structure, &attendance, &adjustments, &PayrollPolicy::default()).unwrap();

        prop_assert_eq!(result.net_pay, result.total_earnings - result.total_deductions);
        prop_assert_eq!(result.total_earnings, result.sum_of_earnings());
        prop_assert_eq!(result.total_deductions, result.sum_of_deductions());
        prop_assert_eq!(result.medical_allowance, structure.medical_allowance);
        prop_assert_eq!(result.other_allowances, structure.other_allowances);
    }

    #[test]
    fn full_attendance_pays_every_component_in_full(
        structure in salary_structure(),
        working in 1u32..=31,
    ) {
        let attendance = AttendancePeriod::new(working, working, 0).unwrap();
        let result = calculate_payroll(&structure, &attendance, &PayrollAdjustments::default(), &PayrollPolicy::default()).unwrap();

        prop_assert_eq!(result.basic_salary, structure.basic_salary);
        prop_assert_eq!(result.hra, structure.hra);
        prop_assert_eq!(result.special_allowance, structure.special_allowance);
        prop_assert_eq!(result.transport_allowance, structure.transport_allowance);
        prop_assert_eq!(result.lop_deduction, Decimal::ZERO);
    }

    #[test]
    fn calculation_is_deterministic(
        structure in salary_structure(),
        attendance in attendance(),
        adjustments in adjustments(),
    ) {
        let policy = PayrollPolicy::default();
        let first = calculate_payroll(&structure, &attendance, &adjustments, &policy).unwrap();
        let second = calculate_payroll(&structure, &attendance, &adjustments, &policy).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn constant_series_has_no_anomalies(
        value in -1.0e6f64..1.0e6,
        len in 0usize..50,
        threshold in 0.0f64..10.0,
    ) {
        let values = vec![value; len];
        let records = vec![(); len];
        prop_assert!(detect_zscore_anomalies(&values, &records, threshold).unwrap().is_empty());
    }

    #[test]
    fn fewer_than_three_samples_have_no_anomalies(
        values in prop::collection::vec(-1.0e6f64..1.0e6, 0..3),
        threshold in 0.0f64..10.0,
    ) {
        let records = vec![(); values.len()];
        prop_assert!(detect_zscore_anomalies(&values, &records, threshold).unwrap().is_empty());
    }

    #[test]
    fn flagged_values_exceed_threshold(
        values in prop::collection::vec(-1.0e3f64..1.0e3, 3..40),
        threshold in 0.5f64..4.0,
    ) {
        let records: Vec<usize> = (0..values.len()).collect();
        let flagged = detect_zscore_anomalies(&values, &records, threshold).unwrap();
        for hit in &flagged {
            prop_assert!(hit.z_score > threshold);
            prop_assert_eq!(values[*hit.record], hit.value);
        }
        if let Some(sd) = population_std_dev(&values) {
            prop_assert!(flagged.iter().all(|hit| (hit.std_dev - sd).abs() < 1e-9));
        }
    }

    #[test]
    fn small_moves_are_stable(
        previous in 1.0f64..1.0e6,
        pct in -4.9f64..4.9,
    ) {
        let current = previous * (1.0 + pct / 100.0);
        prop_assert_eq!(classify_trend(previous, current, 5.0).trend, Trend::Stable);
    }
}
