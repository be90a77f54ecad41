//! Insight generation from trend and sentiment reports.

use serde_json::json;

use crate::models::{Insight, InsightType};

use super::sentiment::{Sentiment, SentimentReport};
use super::trend::{SeriesTrend, Trend, TrendReport};

/// Trend confidence when the series has at least this many points.
const WELL_SAMPLED_SERIES: usize = 3;

fn trend_confidence(trend: &SeriesTrend) -> f64 {
    if trend.sample_count >= WELL_SAMPLED_SERIES {
        0.8
    } else {
        0.6
    }
}

fn humanize(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn direction(trend: Trend) -> &'static str {
    match trend {
        Trend::Improving => "improving",
        Trend::Declining => "declining",
        Trend::Stable => "stable",
    }
}

fn trend_insight(subject_id: &str, insight_type: InsightType, trend: &SeriesTrend) -> Insight {
    let label = humanize(&trend.series);
    Insight {
        insight_type,
        title: format!("{} {}", label, direction(trend.trend)),
        summary: format!(
            "{} moved from {:.2} to {:.2} ({:+.1}%) over the last two periods.",
            label, trend.previous, trend.current, trend.change
        ),
        supporting_data: json!({
            "subject_id": subject_id,
            "series": trend.series,
            "previous": trend.previous,
            "current": trend.current,
            "change": trend.change,
            "trend": trend.trend,
            "sample_count": trend.sample_count,
        }),
        confidence_score: trend_confidence(trend),
    }
}

/// Derives insights for one subject.
///
/// Produces, in order: one insight per non-stable metric trend, one for a
/// non-stable attendance trend, one for the consistency score when it is
/// defined, and one for overall sentiment when any feedback was analysed.
///
/// Confidence is 0.8 for trends backed by at least three points and 0.6
/// otherwise, 0.7 for consistency, and `min(0.9, 0.5 + 0.1 * feedback_count)`
/// for sentiment.
pub fn generate_insights(
    subject_id: &str,
    trends: &TrendReport,
    sentiment: &SentimentReport,
) -> Vec<Insight> {
    let mut insights: Vec<Insight> = trends
        .metric_trends
        .iter()
        .filter(|t| t.trend != Trend::Stable)
        .map(|t| trend_insight(subject_id, InsightType::PerformanceTrend, t))
        .collect();

    if let Some(attendance) = trends
        .attendance_trend
        .as_ref()
        .filter(|t| t.trend != Trend::Stable)
    {
        insights.push(trend_insight(subject_id, InsightType::AttendanceTrend, attendance));
    }

    if let Some(score) = trends.consistency_score {
        insights.push(Insight {
            insight_type: InsightType::Consistency,
            title: "Performance consistency".to_string(),
            summary: format!(
                "{:.0}% of tracked metrics held steady across the review window.",
                score
            ),
            supporting_data: json!({
                "subject_id": subject_id,
                "consistency_score": score,
                "metric_averages": trends.metric_averages,
                "average_attendance_rate": trends.average_attendance_rate,
            }),
            confidence_score: 0.7,
        });
    }

    if sentiment.feedback_count > 0 {
        let tone = match sentiment.overall_sentiment {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        };
        let themes: Vec<&str> = sentiment.themes.iter().map(|t| t.theme.as_str()).collect();
        insights.push(Insight {
            insight_type: InsightType::FeedbackSentiment,
            title: format!("Feedback is {}", tone),
            summary: format!(
                "{} feedback entries scored {:.1}.",
                sentiment.feedback_count, sentiment.score
            ),
            supporting_data: json!({
                "subject_id": subject_id,
                "score": sentiment.score,
                "overall_sentiment": sentiment.overall_sentiment,
                "themes": themes,
                "strengths": sentiment.strengths,
                "improvement_areas": sentiment.improvement_areas,
                "average_rating": sentiment.average_rating,
            }),
            confidence_score: (0.5 + 0.1 * sentiment.feedback_count as f64).min(0.9),
        });
    }

    insights
}
