//! Insight models.

use serde::{Deserialize, Serialize};

/// What an insight is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    /// A performance metric moved beyond its stable band.
    PerformanceTrend,
    /// The attendance rate moved beyond its stable band.
    AttendanceTrend,
    /// How steady the tracked metrics are.
    Consistency,
    /// The tone of review feedback.
    FeedbackSentiment,
}

/// A generated, human-readable finding. Insights are append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    /// What the insight is about.
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    /// Short headline.
    pub title: String,
    /// One or two sentences of explanation.
    pub summary: String,
    /// The figures the insight was derived from.
    pub supporting_data: serde_json::Value,
    /// Confidence in the finding, between 0 and 1.
    pub confidence_score: f64,
}
