//! Trend classification and consistency scoring.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AnalyticsPolicy;
use crate::models::{AttendancePeriod, MetricSeries};

use super::statistics::{coefficient_of_variation, mean, population_std_dev};

/// Name used for the attendance-rate series in reports.
pub const ATTENDANCE_RATE_SERIES: &str = "attendance_rate";

/// Direction of a series between its last two points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Rose by at least the threshold.
    Improving,
    /// Fell by at least the threshold.
    Declining,
    /// Moved by less than the threshold.
    Stable,
}

/// Result of comparing two consecutive points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendClassification {
    /// The classified direction.
    pub trend: Trend,
    /// Percentage change from previous to current.
    pub change: f64,
}

/// Classifies the move from `previous` to `current`.
///
/// `change = (current - previous) / previous * 100`. A change whose magnitude
/// is below `threshold` percent is stable. A zero `previous` has no defined
/// percentage change and is reported as stable with a change of zero.
///
/// # Examples
///
/// ```
/// use hrms_engine::analytics::{Trend, classify_trend};
///
/// let up = classify_trend(100.0, 120.0, 5.0);
/// assert_eq!(up.trend, Trend::Improving);
/// assert_eq!(up.change, 20.0);
///
/// assert_eq!(classify_trend(100.0, 100.0, 5.0).trend, Trend::Stable);
/// assert_eq!(classify_trend(0.0, 50.0, 5.0).change, 0.0);
/// ```
pub fn classify_trend(previous: f64, current: f64, threshold: f64) -> TrendClassification {
    if previous == 0.0 {
        return TrendClassification {
            trend: Trend::Stable,
            change: 0.0,
        };
    }

    let change = (current - previous) / previous * 100.0;
    let trend = if change.abs() < threshold {
        Trend::Stable
    } else if change > 0.0 {
        Trend::Improving
    } else {
        Trend::Declining
    };

    TrendClassification { trend, change }
}

/// Trend of one named series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesTrend {
    /// Metric type, or [`ATTENDANCE_RATE_SERIES`].
    pub series: String,
    /// Second-to-last value.
    pub previous: f64,
    /// Last value.
    pub current: f64,
    /// Classified direction.
    pub trend: Trend,
    /// Percentage change from previous to current.
    pub change: f64,
    /// Number of points in the series.
    pub sample_count: usize,
}

/// Everything the trend analyser derives for one subject.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrendReport {
    /// One entry per metric series with at least two points.
    pub metric_trends: Vec<SeriesTrend>,
    /// Attendance-rate trend, when there are at least two usable periods.
    pub attendance_trend: Option<SeriesTrend>,
    /// Percentage of qualifying series whose variation is below the policy
    /// limit, or `None` when no series has enough samples.
    pub consistency_score: Option<f64>,
    /// Mean value per metric type.
    pub metric_averages: BTreeMap<String, f64>,
    /// Mean attendance rate across usable periods.
    pub average_attendance_rate: Option<f64>,
}

fn series_trend(name: &str, values: &[f64], threshold: f64) -> Option<SeriesTrend> {
    let [.., previous, current] = values else {
        return None;
    };
    let TrendClassification { trend, change } = classify_trend(*previous, *current, threshold);
    Some(SeriesTrend {
        series: name.to_string(),
        previous: *previous,
        current: *current,
        trend,
        change,
        sample_count: values.len(),
    })
}

/// Attendance rate per period as a percentage, skipping periods with no
/// working days.
pub fn attendance_rates(periods: &[AttendancePeriod]) -> Vec<f64> {
    periods
        .iter()
        .filter(|p| p.working_days > 0)
        .map(|p| f64::from(p.present_days) / f64::from(p.working_days) * 100.0)
        .collect()
}

fn is_consistent(values: &[f64], cv_threshold: f64) -> bool {
    match coefficient_of_variation(values) {
        Some(cv) => cv < cv_threshold,
        // Zero mean: only a flat series is consistent.
        None => population_std_dev(values) == Some(0.0),
    }
}

/// Percentage of series whose coefficient of variation is below
/// `policy.consistency_cv_threshold`.
///
/// Series with fewer than `policy.min_consistency_samples` points are left out
/// of both numerator and denominator. Returns `None` when nothing qualifies.
pub fn consistency_score<'a, I>(series: I, policy: &AnalyticsPolicy) -> Option<f64>
where
    I: IntoIterator<Item = &'a [f64]>,
{
    let mut counted = 0usize;
    let mut consistent = 0usize;

    for values in series {
        if values.len() < policy.min_consistency_samples {
            continue;
        }
        counted += 1;
        if is_consistent(values, policy.consistency_cv_threshold) {
            consistent += 1;
        }
    }

    (counted > 0).then(|| consistent as f64 / counted as f64 * 100.0)
}

/// Builds the trend report for one subject.
///
/// `metrics` should hold that subject's series; `attendance` its pay periods
/// oldest first. Metric trends use `policy.metric_trend_threshold`, the
/// attendance trend uses `policy.attendance_trend_threshold`.
pub fn analyze_trends(
    metrics: &[MetricSeries],
    attendance: &[AttendancePeriod],
    policy: &AnalyticsPolicy,
) -> TrendReport {
    let metric_values: Vec<(&str, Vec<f64>)> = metrics
        .iter()
        .map(|s| (s.metric_type.as_str(), s.values()))
        .collect();
    let rates = attendance_rates(attendance);

    let metric_trends: Vec<SeriesTrend> = metric_values
        .iter()
        .filter_map(|(name, values)| series_trend(name, values, policy.metric_trend_threshold))
        .collect();
    let attendance_trend =
        series_trend(ATTENDANCE_RATE_SERIES, &rates, policy.attendance_trend_threshold);

    let consistency_score = consistency_score(
        metric_values
            .iter()
            .map(|(_, values)| values.as_slice())
            .chain(std::iter::once(rates.as_slice())),
        policy,
    );

    let metric_averages = metric_values
        .iter()
        .filter_map(|(name, values)| mean(values).map(|m| (name.to_string(), m)))
        .collect();

    debug!(
        series = metric_values.len(),
        trends = metric_trends.len(),
        attendance_periods = rates.len(),
        consistency_score = ?consistency_score,
        "Trend analysis completed"
    );

    TrendReport {
        metric_trends,
        attendance_trend,
        consistency_score,
        metric_averages,
        average_attendance_rate: mean(&rates),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MetricSample;
    use chrono::NaiveDate;

    fn series(metric: &str, values: &[f64]) -> MetricSeries {
        let samples = values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                MetricSample::new(NaiveDate::from_ymd_opt(2025, 1 + i as u32, 1).unwrap(), *v)
                    .unwrap()
            })
            .collect();
        MetricSeries::new("emp_001", metric, samples)
    }

    fn period(working: u32, present: u32) -> AttendancePeriod {
        AttendancePeriod::new(working, present, working - present).unwrap()
    }

    #[test]
    fn test_unchanged_is_stable() {
        let result = classify_trend(100.0, 100.0, 5.0);
        assert_eq!(result.trend, Trend::Stable);
        assert_eq!(result.change, 0.0);
    }

    #[test]
    fn test_twenty_percent_rise_is_improving() {
        let result = classify_trend(100.0, 120.0, 5.0);
        assert_eq!(result.trend, Trend::Improving);
        assert_eq!(result.change, 20.0);
    }

    #[test]
    fn test_drop_is_declining() {
        let result = classify_trend(100.0, 90.0, 5.0);
        assert_eq!(result.trend, Trend::Declining);
        assert_eq!(result.change, -10.0);
    }

    #[test]
    fn test_change_inside_band_is_stable() {
        assert_eq!(classify_trend(100.0, 104.0, 5.0).trend, Trend::Stable);
        assert_eq!(classify_trend(100.0, 103.0, 2.0).trend, Trend::Improving);
    }

    #[test]
    fn test_threshold_is_exclusive_for_stable() {
        assert_eq!(classify_trend(100.0, 105.0, 5.0).trend, Trend::Improving);
    }

    #[test]
    fn test_zero_previous_is_stable() {
        let result = classify_trend(0.0, 80.0, 5.0);
        assert_eq!(result.trend, Trend::Stable);
        assert_eq!(result.change, 0.0);
    }

    #[test]
    fn test_report_uses_last_two_points() {
        let metrics = vec![series("productivity", &[50.0, 100.0, 120.0]), series("quality", &[80.0])];
        let report = analyze_trends(&metrics, &[], &AnalyticsPolicy::default());

        assert_eq!(report.metric_trends.len(), 1);
        let trend = &report.metric_trends[0];
        assert_eq!(trend.series, "productivity");
        assert_eq!(trend.previous, 100.0);
        assert_eq!(trend.current, 120.0);
        assert_eq!(trend.trend, Trend::Improving);
        assert_eq!(trend.sample_count, 3);

        assert_eq!(report.metric_averages["quality"], 80.0);
        assert!((report.metric_averages["productivity"] - 90.0).abs() < 1e-12);
        assert!(report.attendance_trend.is_none());
    }

    #[test]
    fn test_attendance_trend_uses_tighter_threshold() {
        // 20/20 = 100% then 19/20 = 95%: a 5% drop.
        let attendance = vec![period(20, 20), period(20, 19)];
        let report = analyze_trends(&[], &attendance, &AnalyticsPolicy::default());

        let trend = report.attendance_trend.unwrap();
        assert_eq!(trend.series, ATTENDANCE_RATE_SERIES);
        assert_eq!(trend.trend, Trend::Declining);
        assert!((trend.change + 5.0).abs() < 1e-9);
        assert_eq!(report.average_attendance_rate, Some(97.5));
    }

    #[test]
    fn test_zero_working_day_periods_skipped() {
        let attendance = vec![period(20, 20), period(0, 0), period(20, 20)];
        assert_eq!(attendance_rates(&attendance), vec![100.0, 100.0]);
    }

    #[test]
    fn test_consistency_score_excludes_short_series() {
        let metrics = vec![
            series("productivity", &[100.0, 102.0, 98.0]),
            series("quality", &[10.0, 50.0, 90.0]),
            series("initiative", &[1.0, 100.0]),
        ];
        let attendance = vec![period(20, 20), period(20, 19), period(20, 20)];

        let report = analyze_trends(&metrics, &attendance, &AnalyticsPolicy::default());
        // productivity and attendance consistent, quality not, initiative excluded.
        let score = report.consistency_score.unwrap();
        assert!((score - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_consistency_score_undefined_without_samples() {
        let metrics = vec![series("productivity", &[1.0, 2.0])];
        let report = analyze_trends(&metrics, &[], &AnalyticsPolicy::default());
        assert_eq!(report.consistency_score, None);
    }

    #[test]
    fn test_zero_mean_series_consistency() {
        let policy = AnalyticsPolicy::default();
        let flat: &[f64] = &[0.0, 0.0, 0.0];
        let balanced: &[f64] = &[-1.0, 0.0, 1.0];
        assert_eq!(consistency_score([flat], &policy), Some(100.0));
        assert_eq!(consistency_score([balanced], &policy), Some(0.0));
    }
}
