//! Metric samples and series.
//!
//! A [`MetricSeries`] is the date-ordered sequence of values of one metric type
//! for one subject (usually an employee). It is the input to both anomaly
//! detection and trend analysis.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A single dated measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    /// When the value was measured.
    pub measurement_date: NaiveDate,
    /// The measured value.
    pub metric_value: f64,
}

impl MetricSample {
    /// Creates a sample, rejecting NaN and infinite values.
    pub fn new(measurement_date: NaiveDate, metric_value: f64) -> EngineResult<Self> {
        if !metric_value.is_finite() {
            return Err(EngineError::invalid_field(
                "metric_value",
                format!("must be a finite number, got {}", metric_value),
            ));
        }
        Ok(Self {
            measurement_date,
            metric_value,
        })
    }
}

/// A validated metric measurement for a subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// The subject the measurement belongs to.
    pub subject_id: String,
    /// The kind of metric, e.g. `"productivity"`.
    pub metric_type: String,
    /// The dated value.
    #[serde(flatten)]
    pub sample: MetricSample,
}

/// A metric row as read from the external store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    /// `employee_id` column.
    #[serde(alias = "employee_id")]
    pub subject_id: Option<String>,
    /// `metric_type` column.
    pub metric_type: Option<String>,
    /// `metric_value` column.
    pub metric_value: Option<f64>,
    /// `measurement_date` column.
    pub measurement_date: Option<NaiveDate>,
}

impl TryFrom<MetricRow> for MetricRecord {
    type Error = EngineError;

    fn try_from(row: MetricRow) -> EngineResult<Self> {
        let subject_id = row
            .subject_id
            .ok_or_else(|| EngineError::missing_field("subject_id"))?;
        let metric_type = row
            .metric_type
            .ok_or_else(|| EngineError::missing_field("metric_type"))?;
        let metric_value = row
            .metric_value
            .ok_or_else(|| EngineError::missing_field("metric_value"))?;
        let measurement_date = row
            .measurement_date
            .ok_or_else(|| EngineError::missing_field("measurement_date"))?;

        Ok(Self {
            subject_id,
            metric_type,
            sample: MetricSample::new(measurement_date, metric_value)?,
        })
    }
}

/// Date-ordered samples of one metric type for one subject.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSeries {
    /// The subject the series belongs to.
    pub subject_id: String,
    /// The metric type shared by every sample.
    pub metric_type: String,
    samples: Vec<MetricSample>,
}

impl MetricSeries {
    /// Creates a series, ordering samples by measurement date.
    ///
    /// Samples on the same date keep their input order.
    pub fn new(
        subject_id: impl Into<String>,
        metric_type: impl Into<String>,
        mut samples: Vec<MetricSample>,
    ) -> Self {
        samples.sort_by_key(|s| s.measurement_date);
        Self {
            subject_id: subject_id.into(),
            metric_type: metric_type.into(),
            samples,
        }
    }

    /// The samples, oldest first.
    pub fn samples(&self) -> &[MetricSample] {
        &self.samples
    }

    /// The sample values, oldest first.
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.metric_value).collect()
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the series has no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Groups records into one series per (subject, metric type), in key order.
    pub fn group(records: &[MetricRecord]) -> Vec<MetricSeries> {
        let mut groups: BTreeMap<(&str, &str), Vec<MetricSample>> = BTreeMap::new();
        for record in records {
            groups
                .entry((record.subject_id.as_str(), record.metric_type.as_str()))
                .or_default()
                .push(record.sample);
        }
        groups
            .into_iter()
            .map(|((subject, metric), samples)| MetricSeries::new(subject, metric, samples))
            .collect()
    }
}
