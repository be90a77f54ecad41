//! Anomaly models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How far outside the norm an anomalous value lies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// z-score at or below 2.5.
    Low,
    /// z-score above 2.5 and at or below 3.
    Medium,
    /// z-score above 3.
    High,
}

impl Severity {
    /// Buckets a z-score.
    ///
    /// The bands are fixed and independent of the detection threshold, so with
    /// the default threshold of 2.5 every flagged value is at least `Medium`
    /// and `Low` is only reachable when detection runs with a lower threshold.
    ///
    /// # Example
    ///
    /// ```
    /// use hrms_engine::models::Severity;
    ///
    /// assert_eq!(Severity::from_z_score(3.2), Severity::High);
    /// assert_eq!(Severity::from_z_score(2.8), Severity::Medium);
    /// assert_eq!(Severity::from_z_score(2.5), Severity::Low);
    /// ```
    pub fn from_z_score(z_score: f64) -> Self {
        if z_score > 3.0 {
            Severity::High
        } else if z_score > 2.5 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

/// A metric value flagged as a statistical outlier.
///
/// Derived on every run; never the source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    /// The subject the value belongs to.
    pub subject_id: String,
    /// The metric type of the series.
    pub metric_type: String,
    /// When the value was measured.
    pub measurement_date: NaiveDate,
    /// The flagged value.
    pub value: f64,
    /// `|value - mean| / std_dev`.
    pub z_score: f64,
    /// Mean of the series.
    pub mean: f64,
    /// Population standard deviation of the series.
    pub std_dev: f64,
    /// Severity bucket of `z_score`.
    pub severity: Severity,
}
