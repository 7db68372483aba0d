use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The three classes produced by the sentiment model
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SentimentClass {
    Positive,
    Negative,
    Neutral,
}

impl FromStr for SentimentClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(SentimentClass::Positive),
            "negative" => Ok(SentimentClass::Negative),
            "neutral" => Ok(SentimentClass::Neutral),
            other => Err(format!("unknown sentiment label: {}", other)),
        }
    }
}

impl std::fmt::Display for SentimentClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentClass::Positive => write!(f, "positive"),
            SentimentClass::Negative => write!(f, "negative"),
            SentimentClass::Neutral => write!(f, "neutral"),
        }
    }
}

/// One row of classifier output
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LabelScore {
    pub label: SentimentClass,
    pub probability: f64,
}

impl LabelScore {
    pub fn new(label: SentimentClass, probability: f64) -> Self {
        Self { label, probability }
    }
}

/// Per-class probabilities for one text.
///
/// The all-zero value is the "no signal" sentinel returned when the model is
/// unavailable or classification failed. A genuine reading sums to roughly 1.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct SentimentScores {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl SentimentScores {
    pub fn no_signal() -> Self {
        Self::default()
    }

    pub fn is_no_signal(&self) -> bool {
        self.positive == 0.0 && self.negative == 0.0 && self.neutral == 0.0
    }

    /// Later rows for the same class overwrite earlier ones
    pub fn from_label_scores(rows: &[LabelScore]) -> Self {
        let mut scores = Self::default();
        for row in rows {
            match row.label {
                SentimentClass::Positive => scores.positive = row.probability,
                SentimentClass::Negative => scores.negative = row.probability,
                SentimentClass::Neutral => scores.neutral = row.probability,
            }
        }
        scores
    }
}

/// Directional label derived from an aggregate score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SentimentLabel {
    Bullish,
    Neutral,
    Bearish,
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentLabel::Bullish => write!(f, "Bullish"),
            SentimentLabel::Neutral => write!(f, "Neutral"),
            SentimentLabel::Bearish => write!(f, "Bearish"),
        }
    }
}

/// Aggregated sentiment over a set of news items
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AggregateResult {
    pub score: f64,        // -1.0 to +1.0
    pub label: SentimentLabel,
    pub sample_count: usize, // items that contributed a score
}

impl AggregateResult {
    pub fn no_data() -> Self {
        Self {
            score: 0.0,
            label: SentimentLabel::Neutral,
            sample_count: 0,
        }
    }
}

/// Which part of a news item gets scored
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScoringText {
    #[default]
    Title,
    TitleAndDescription,
}

impl FromStr for ScoringText {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(ScoringText::Title),
            "title_and_description" | "full" => Ok(ScoringText::TitleAndDescription),
            other => Err(format!("unknown scoring text field: {}", other)),
        }
    }
}

/// Body of `POST /api/sentiment`
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreTextRequest {
    pub text: String,
}

/// Body of `POST /api/sentiment/aggregate`
#[derive(Debug, Clone, Deserialize)]
pub struct AverageScoresRequest {
    pub items: Vec<crate::models::NewsItem>,
}
