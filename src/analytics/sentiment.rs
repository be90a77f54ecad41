//! Keyword-based feedback sentiment.
//!
//! This is a heuristic over fixed keyword lists, not a language model. Words
//! are matched by substring, so "excellently" counts as "excellent" and
//! "unhelpful" counts as "helpful". Misclassifications are expected.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::FeedbackRecord;

const POSITIVE_KEYWORDS: &[&str] = &[
    "excellent",
    "outstanding",
    "great",
    "good",
    "strong",
    "effective",
    "helpful",
    "proactive",
    "dedicated",
    "innovative",
    "exceed",
    "impressive",
    "improved",
    "collaborative",
    "positive",
];

const NEGATIVE_KEYWORDS: &[&str] = &[
    "poor",
    "bad",
    "weak",
    "late",
    "missed",
    "slow",
    "lack",
    "inconsistent",
    "careless",
    "negative",
    "difficult",
    "fail",
    "unprofessional",
    "delay",
];

/// Theme name and the keywords that mention it, in reporting order.
const THEMES: &[(&str, &[&str])] = &[
    ("communication", &["communicat", "listen", "presentation", "articulate"]),
    ("teamwork", &["team", "collaborat", "cooperat"]),
    ("leadership", &["lead", "mentor", "initiative"]),
    ("technical_skills", &["technical", "coding", "skill", "expertise"]),
    ("time_management", &["deadline", "punctual", "on time", "time management"]),
    ("problem_solving", &["problem", "solution", "analytical"]),
    ("quality", &["quality", "accura", "detail"]),
];

/// Most themes a report lists.
pub const MAX_THEMES: usize = 5;

/// Captures must be shorter than this many characters to be kept.
const MAX_CAPTURE_CHARS: usize = 50;

const STRENGTH_PATTERNS: &[&str] = &[
    r"excellent (.+?)[.,]",
    r"outstanding (.+?)[.,]",
    r"great (.+?)[.,]",
    r"strong (.+?)[.,]",
    r"good at (.+?)[.,]",
];

const IMPROVEMENT_PATTERNS: &[&str] = &[
    r"needs? to improve (.+?)[.,]",
    r"could improve (.+?)[.,]",
    r"should work on (.+?)[.,]",
    r"needs? more (.+?)[.,]",
    r"lacks (.+?)[.,]",
];

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().filter_map(|p| Regex::new(p).ok()).collect()
}

static STRENGTH_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(STRENGTH_PATTERNS));
static IMPROVEMENT_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(IMPROVEMENT_PATTERNS));

/// Overall classification of a body of feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    /// Score above 5.
    Positive,
    /// Score below -5.
    Negative,
    /// Anything in between.
    Neutral,
}

impl Sentiment {
    /// Classifies a sentiment score.
    pub fn from_score(score: f64) -> Self {
        if score > 5.0 {
            Sentiment::Positive
        } else if score < -5.0 {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

/// A theme and how often its keywords appear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeMention {
    /// The theme name.
    pub theme: String,
    /// Total keyword occurrences across all feedback.
    pub mentions: usize,
}

/// Aggregate sentiment of a set of feedback texts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentReport {
    /// Classification of `score`.
    pub overall_sentiment: Sentiment,
    /// `(positive_count - negative_count) / total_words * 100`.
    pub score: f64,
    /// Words containing a positive keyword.
    pub positive_count: usize,
    /// Words containing a negative keyword.
    pub negative_count: usize,
    /// Whitespace-separated words across all feedback.
    pub total_words: usize,
    /// Mentioned themes, at most [`MAX_THEMES`], in fixed theme order.
    pub themes: Vec<ThemeMention>,
    /// Phrases following praise templates, first seen first.
    pub strengths: Vec<String>,
    /// Phrases following improvement templates, first seen first.
    pub improvement_areas: Vec<String>,
    /// Mean of the ratings that were given.
    pub average_rating: Option<f64>,
    /// Number of feedback records analysed.
    pub feedback_count: usize,
}

fn contains_any(word: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| word.contains(k))
}

fn extract_phrases(texts: &[String], patterns: &[Regex]) -> Vec<String> {
    let mut phrases: Vec<String> = Vec::new();
    for text in texts {
        for re in patterns {
            for caps in re.captures_iter(text) {
                let Some(phrase) = caps.get(1).map(|m| m.as_str().trim()) else {
                    continue;
                };
                if phrase.is_empty() || phrase.chars().count() >= MAX_CAPTURE_CHARS {
                    continue;
                }
                if !phrases.iter().any(|p| p == phrase) {
                    phrases.push(phrase.to_string());
                }
            }
        }
    }
    phrases
}

/// Scores and summarises feedback texts.
///
/// Each whitespace-separated word counts once as positive if it contains any
/// positive keyword and once as negative if it contains any negative keyword.
/// Matching is case-insensitive. No feedback, or feedback with no words,
/// scores 0 and is neutral.
///
/// # Examples
///
/// ```
/// use hrms_engine::analytics::{Sentiment, analyze_feedback};
/// use hrms_engine::models::FeedbackRecord;
///
/// let feedback = vec![
///     FeedbackRecord::from_text("Excellent communication with the team."),
///     FeedbackRecord::from_text("Needs to improve documentation, often late."),
/// ];
/// let report = analyze_feedback(&feedback);
///
/// assert_eq!(report.positive_count, 1);
/// assert_eq!(report.negative_count, 1);
/// assert_eq!(report.overall_sentiment, Sentiment::Neutral);
/// assert_eq!(report.strengths, vec!["communication with the team"]);
/// assert_eq!(report.improvement_areas, vec!["documentation"]);
/// ```
pub fn analyze_feedback(feedback: &[FeedbackRecord]) -> SentimentReport {
    let texts: Vec<String> = feedback
        .iter()
        .map(|f| f.feedback_text.to_lowercase())
        .collect();

    let mut positive_count = 0;
    let mut negative_count = 0;
    let mut total_words = 0;
    for word in texts.iter().flat_map(|t| t.split_whitespace()) {
        total_words += 1;
        if contains_any(word, POSITIVE_KEYWORDS) {
            positive_count += 1;
        }
        if contains_any(word, NEGATIVE_KEYWORDS) {
            negative_count += 1;
        }
    }

    let score = if total_words == 0 {
        0.0
    } else {
        (positive_count as f64 - negative_count as f64) / total_words as f64 * 100.0
    };

    let themes = THEMES
        .iter()
        .filter_map(|(theme, keywords)| {
            let mentions: usize = keywords
                .iter()
                .map(|k| texts.iter().map(|t| t.matches(k).count()).sum::<usize>())
                .sum();
            (mentions > 0).then(|| ThemeMention {
                theme: theme.to_string(),
                mentions,
            })
        })
        .take(MAX_THEMES)
        .collect();

    let ratings: Vec<f64> = feedback.iter().filter_map(|f| f.rating).collect();
    let average_rating = super::statistics::mean(&ratings);

    let report = SentimentReport {
        overall_sentiment: Sentiment::from_score(score),
        score,
        positive_count,
        negative_count,
        total_words,
        themes,
        strengths: extract_phrases(&texts, &STRENGTH_RES),
        improvement_areas: extract_phrases(&texts, &IMPROVEMENT_RES),
        average_rating,
        feedback_count: feedback.len(),
    };

    debug!(
        feedback_count = report.feedback_count,
        total_words,
        score,
        sentiment = ?report.overall_sentiment,
        "Feedback analysed"
    );

    report
}
