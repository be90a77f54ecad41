//! Z-score anomaly detection.
//!
//! A value is anomalous when its distance from the series mean, measured in
//! population standard deviations, exceeds a threshold. Series with fewer
//! than [`MIN_ANOMALY_SAMPLES`] values, or with no spread at all, never
//! produce anomalies.

use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{Anomaly, MetricRecord, MetricSample, MetricSeries, Severity};

use super::statistics::{is_constant, mean, population_std_dev};

/// Fewest values a series needs before anything can be flagged.
pub const MIN_ANOMALY_SAMPLES: usize = 3;

/// A value that exceeded the z-score threshold, with its source record.
#[derive(Debug, Clone, PartialEq)]
pub struct FlaggedValue<'a, T> {
    /// Position of the value in the input.
    pub index: usize,
    /// The record at the same position.
    pub record: &'a T,
    /// The flagged value.
    pub value: f64,
    /// `|value - mean| / std_dev`.
    pub z_score: f64,
    /// Mean of all values.
    pub mean: f64,
    /// Population standard deviation of all values.
    pub std_dev: f64,
    /// Severity bucket of `z_score`.
    pub severity: Severity,
}

struct Scan {
    mean: f64,
    std_dev: f64,
    hits: Vec<(usize, f64)>,
}

fn scan(values: &[f64], threshold: f64) -> Option<Scan> {
    if values.len() < MIN_ANOMALY_SAMPLES || is_constant(values) {
        return None;
    }
    let mean = mean(values)?;
    let std_dev = population_std_dev(values)?;
    if std_dev == 0.0 {
        return None;
    }

    let hits = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| {
            let z = (v - mean).abs() / std_dev;
            (z > threshold).then_some((i, z))
        })
        .collect();

    Some(Scan {
        mean,
        std_dev,
        hits,
    })
}

/// Returns the records whose index-aligned values exceed `threshold`.
///
/// `values[i]` belongs to `records[i]`. Fewer than three values, or a
/// constant series, yield an empty result rather than an error.
///
/// # Errors
///
/// * [`EngineError::LengthMismatch`] if the slices differ in length
/// * [`EngineError::InvalidField`] if any value is NaN or infinite
///
/// # Examples
///
/// ```
/// use hrms_engine::analytics::detect_zscore_anomalies;
///
/// let values = [10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 120.0];
/// let names: Vec<String> = (0..values.len()).map(|i| format!("row_{i}")).collect();
///
/// let flagged = detect_zscore_anomalies(&values, &names, 2.5).unwrap();
/// assert_eq!(flagged.len(), 1);
/// assert_eq!(flagged[0].record, "row_10");
/// ```
pub fn detect_zscore_anomalies<'a, T>(
    values: &[f64],
    records: &'a [T],
    threshold: f64,
) -> EngineResult<Vec<FlaggedValue<'a, T>>> {
    if values.len() != records.len() {
        return Err(EngineError::LengthMismatch {
            values: values.len(),
            records: records.len(),
        });
    }
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(EngineError::invalid_field(
            "values",
            format!("must be finite numbers, got {}", bad),
        ));
    }

    let Some(scan) = scan(values, threshold) else {
        return Ok(Vec::new());
    };

    Ok(scan
        .hits
        .into_iter()
        .map(|(index, z_score)| FlaggedValue {
            index,
            record: &records[index],
            value: values[index],
            z_score,
            mean: scan.mean,
            std_dev: scan.std_dev,
            severity: Severity::from_z_score(z_score),
        })
        .collect())
}

/// Flags outliers within one metric series, in date order.
pub fn detect_series_anomalies(series: &MetricSeries, threshold: f64) -> Vec<Anomaly> {
    let values = series.values();
    let Some(scan) = scan(&values, threshold) else {
        return Vec::new();
    };

    let samples: &[MetricSample] = series.samples();
    scan.hits
        .into_iter()
        .map(|(index, z_score)| Anomaly {
            subject_id: series.subject_id.clone(),
            metric_type: series.metric_type.clone(),
            measurement_date: samples[index].measurement_date,
            value: values[index],
            z_score,
            mean: scan.mean,
            std_dev: scan.std_dev,
            severity: Severity::from_z_score(z_score),
        })
        .collect()
}

/// Groups records by subject and metric type, then flags outliers per group.
///
/// Groups are visited in `(subject_id, metric_type)` order so the output is
/// deterministic regardless of input order.
pub fn detect_anomalies(records: &[MetricRecord], threshold: f64) -> Vec<Anomaly> {
    let anomalies: Vec<Anomaly> = MetricSeries::group(records)
        .iter()
        .flat_map(|series| detect_series_anomalies(series, threshold))
        .collect();

    debug!(
        records = records.len(),
        anomalies = anomalies.len(),
        threshold,
        "Anomaly detection completed"
    );

    anomalies
}
