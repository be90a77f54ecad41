//! Performance feedback records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Free-text feedback from a performance review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// The reviewer's comments.
    pub feedback_text: String,
    /// Optional numeric rating given alongside the text.
    #[serde(default)]
    pub rating: Option<f64>,
    /// First day of the review period.
    #[serde(default)]
    pub review_period_start: Option<NaiveDate>,
    /// Last day of the review period.
    #[serde(default)]
    pub review_period_end: Option<NaiveDate>,
}

impl FeedbackRecord {
    /// Creates a record with text only.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            feedback_text: text.into(),
            rating: None,
            review_period_start: None,
            review_period_end: None,
        }
    }
}

/// A feedback row as read from the external store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRow {
    /// `feedback_text` column.
    pub feedback_text: Option<String>,
    /// `rating` column.
    pub rating: Option<f64>,
    /// `review_period_start` column.
    pub review_period_start: Option<NaiveDate>,
    /// `review_period_end` column.
    pub review_period_end: Option<NaiveDate>,
}

impl TryFrom<FeedbackRow> for FeedbackRecord {
    type Error = EngineError;

    fn try_from(row: FeedbackRow) -> EngineResult<Self> {
        let feedback_text = row
            .feedback_text
            .ok_or_else(|| EngineError::missing_field("feedback_text"))?;

        if let Some(rating) = row.rating {
            if !rating.is_finite() {
                return Err(EngineError::invalid_field(
                    "rating",
                    format!("must be a finite number, got {}", rating),
                ));
            }
        }

        if let (Some(start), Some(end)) = (row.review_period_start, row.review_period_end) {
            if end < start {
                return Err(EngineError::invalid_field(
                    "review_period_end",
                    format!("{} is before review_period_start {}", end, start),
                ));
            }
        }

        Ok(Self {
            feedback_text,
            rating: row.rating,
            review_period_start: row.review_period_start,
            review_period_end: row.review_period_end,
        })
    }
}
