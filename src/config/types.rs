//! Configuration types for payroll and analytics policy.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Every policy falls back
//! to the statutory/product defaults when constructed with `Default`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Statutory rates and thresholds used by the payroll calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollPolicy {
    /// Provident fund contribution rate applied to basic salary.
    pub pf_rate: Decimal,
    /// Total earnings above which tax is deducted at source.
    pub tax_threshold: Decimal,
    /// Flat tax rate applied to total earnings above the threshold.
    pub tax_rate: Decimal,
    /// Total earnings below which ESI is deducted.
    pub esi_threshold: Decimal,
    /// ESI contribution rate.
    pub esi_rate: Decimal,
    /// Present days above which the transport allowance is paid in full.
    pub transport_full_days: u32,
}

impl Default for PayrollPolicy {
    fn default() -> Self {
        Self {
            pf_rate: Decimal::new(12, 2),
            tax_threshold: Decimal::new(50_000, 0),
            tax_rate: Decimal::new(10, 2),
            esi_threshold: Decimal::new(25_000, 0),
            esi_rate: Decimal::new(75, 4),
            transport_full_days: 15,
        }
    }
}

impl PayrollPolicy {
    /// Rejects negative rates and thresholds, and rates above 1.
    pub fn validate(&self) -> EngineResult<()> {
        let checks = [
            ("pf_rate", self.pf_rate),
            ("tax_threshold", self.tax_threshold),
            ("tax_rate", self.tax_rate),
            ("esi_threshold", self.esi_threshold),
            ("esi_rate", self.esi_rate),
        ];
        for (field, value) in checks {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(EngineError::invalid_field(
                    field,
                    format!("must not be negative, got {}", value),
                ));
            }
        }
        for (field, rate) in [
            ("pf_rate", self.pf_rate),
            ("tax_rate", self.tax_rate),
            ("esi_rate", self.esi_rate),
        ] {
            if rate > Decimal::ONE {
                return Err(EngineError::invalid_field(
                    field,
                    format!("must be a fraction no greater than 1, got {}", rate),
                ));
            }
        }
        Ok(())
    }
}

/// Thresholds for anomaly detection and trend analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsPolicy {
    /// Z-score above which a value is flagged as anomalous.
    pub zscore_threshold: f64,
    /// Percent change below which a metric trend is stable.
    pub metric_trend_threshold: f64,
    /// Percent change below which the attendance-rate trend is stable.
    pub attendance_trend_threshold: f64,
    /// Coefficient of variation below which a series counts as consistent.
    pub consistency_cv_threshold: f64,
    /// Samples a series needs before it counts towards consistency.
    pub min_consistency_samples: usize,
}

impl Default for AnalyticsPolicy {
    fn default() -> Self {
        Self {
            zscore_threshold: 2.5,
            metric_trend_threshold: 5.0,
            attendance_trend_threshold: 2.0,
            consistency_cv_threshold: 0.2,
            min_consistency_samples: 3,
        }
    }
}

impl AnalyticsPolicy {
    /// Rejects non-finite or non-positive thresholds.
    pub fn validate(&self) -> EngineResult<()> {
        let checks = [
            ("zscore_threshold", self.zscore_threshold),
            ("metric_trend_threshold", self.metric_trend_threshold),
            ("attendance_trend_threshold", self.attendance_trend_threshold),
            ("consistency_cv_threshold", self.consistency_cv_threshold),
        ];
        for (field, value) in checks {
            if !value.is_finite() || value <= 0.0 {
                return Err(EngineError::invalid_field(
                    field,
                    format!("must be a positive number, got {}", value),
                ));
            }
        }
        if self.min_consistency_samples < 2 {
            return Err(EngineError::invalid_field(
                "min_consistency_samples",
                "must be at least 2",
            ));
        }
        Ok(())
    }
}

/// How attendance check-ins are expected to be captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureMode {
    /// Only biometric check-ins are verified.
    Biometric,
    /// Only geolocation check-ins are verified.
    Geolocation,
    /// Either method is accepted.
    #[default]
    Either,
}

/// Attendance capture policy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AttendancePolicy {
    /// The accepted check-in capture mode.
    pub capture_mode: CaptureMode,
}

/// The complete engine configuration loaded from YAML files.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineConfig {
    payroll: PayrollPolicy,
    analytics: AnalyticsPolicy,
    attendance: AttendancePolicy,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts, validating each policy.
    pub fn new(
        payroll: PayrollPolicy,
        analytics: AnalyticsPolicy,
        attendance: AttendancePolicy,
    ) -> EngineResult<Self> {
        payroll.validate()?;
        analytics.validate()?;
        Ok(Self {
            payroll,
            analytics,
            attendance,
        })
    }

    /// Returns the payroll policy.
    pub fn payroll(&self) -> &PayrollPolicy {
        &self.payroll
    }

    /// Returns the analytics policy.
    pub fn analytics(&self) -> &AnalyticsPolicy {
        &self.analytics
    }

    /// Returns the attendance policy.
    pub fn attendance(&self) -> &AttendancePolicy {
        &self.attendance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_payroll_policy_defaults() {
        let policy = PayrollPolicy::default();
        assert_eq!(policy.pf_rate, dec("0.12"));
        assert_eq!(policy.tax_threshold, dec("50000"));
        assert_eq!(policy.tax_rate, dec("0.10"));
        assert_eq!(policy.esi_threshold, dec("25000"));
        assert_eq!(policy.esi_rate, dec("0.0075"));
        assert_eq!(policy.transport_full_days, 15);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let policy: PayrollPolicy = serde_yaml::from_str("tax_rate: \"0.2\"\n").unwrap();
        assert_eq!(policy.tax_rate, dec("0.2"));
        assert_eq!(policy.pf_rate, dec("0.12"));
    }

    #[test]
    fn test_negative_rate_rejected() {
        let policy = PayrollPolicy {
            esi_rate: dec("-0.01"),
            ..PayrollPolicy::default()
        };
        match policy.validate() {
            Err(EngineError::InvalidField { field, .. }) => assert_eq!(field, "esi_rate"),
            other => panic!("Expected InvalidField, got {:?}", other),
        }
    }

    #[test]
    fn test_rate_above_one_rejected() {
        let policy = PayrollPolicy {
            pf_rate: dec("12"),
            ..PayrollPolicy::default()
        };
        match policy.validate() {
            Err(EngineError::InvalidField { field, .. }) => assert_eq!(field, "pf_rate"),
            other => panic!("Expected InvalidField, got {:?}", other),
        }
        assert!(PayrollPolicy { tax_rate: Decimal::ONE, ..PayrollPolicy::default() }.validate().is_ok());
    }

    #[test]
    fn test_zero_zscore_threshold_rejected() {
        let policy = AnalyticsPolicy {
            zscore_threshold: 0.0,
            ..AnalyticsPolicy::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_capture_mode_deserialization() {
        let policy: AttendancePolicy = serde_yaml::from_str("capture_mode: biometric\n").unwrap();
        assert_eq!(policy.capture_mode, CaptureMode::Biometric);
        assert_eq!(AttendancePolicy::default().capture_mode, CaptureMode::Either);
    }
}
