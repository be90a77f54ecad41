//! Workforce analytics.
//!
//! Statistics primitives, z-score anomaly detection over metric series,
//! trend classification with a consistency score, keyword-based feedback
//! sentiment, and insight generation from the resulting reports. Everything
//! here is a pure function of in-memory values.

mod anomaly;
mod insight;
mod sentiment;
mod statistics;
mod trend;

pub use anomaly::{
    FlaggedValue, MIN_ANOMALY_SAMPLES, detect_anomalies, detect_series_anomalies,
    detect_zscore_anomalies,
};
pub use insight::generate_insights;
pub use sentiment::{MAX_THEMES, Sentiment, SentimentReport, ThemeMention, analyze_feedback};
pub use statistics::{coefficient_of_variation, mean, population_std_dev};
pub use trend::{
    ATTENDANCE_RATE_SERIES, SeriesTrend, Trend, TrendClassification, TrendReport,
    analyze_trends, attendance_rates, classify_trend, consistency_score,
};
