use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::models::{AggregateResult, NewsItem, ScoringText, SentimentLabel, SentimentScores};
use crate::services::sentiment_service::{signed_score, SentimentScorer};

/// Mean scores strictly above this are Bullish
pub const BULLISH_THRESHOLD: f64 = 0.3;
/// Mean scores strictly below this are Bearish
pub const BEARISH_THRESHOLD: f64 = -0.3;

/// Map an aggregate score to its label; the thresholds themselves are Neutral
pub fn label_for_score(score: f64) -> SentimentLabel {
    if score > BULLISH_THRESHOLD {
        SentimentLabel::Bullish
    } else if score < BEARISH_THRESHOLD {
        SentimentLabel::Bearish
    } else {
        SentimentLabel::Neutral
    }
}

/// Reduces per-item sentiment into one directional signal.
///
/// Stateless between calls: every aggregate is recomputed from the items it
/// is given.
pub struct AggregationEngine {
    scorer: Arc<SentimentScorer>,
    scoring_text: ScoringText,
}

impl AggregationEngine {
    pub fn new(scorer: Arc<SentimentScorer>, scoring_text: ScoringText) -> Self {
        Self {
            scorer,
            scoring_text,
        }
    }

    fn text_for(&self, item: &NewsItem) -> String {
        match self.scoring_text {
            ScoringText::Title => item.title.clone(),
            ScoringText::TitleAndDescription => item.full_text(),
        }
    }

    /// Mean signed score over the items that produced one, with its label.
    ///
    /// Items whose classification fails or comes back empty are skipped. No
    /// items, no model, or no contributing items all yield the neutral
    /// default with `sample_count == 0`.
    pub async fn aggregate(&self, items: &[NewsItem]) -> AggregateResult {
        if items.is_empty() {
            return AggregateResult::no_data();
        }

        if self.scorer.runtime().await.is_none() {
            warn!("Sentiment model unavailable; returning neutral sentiment");
            return AggregateResult::no_data();
        }

        let mut total = 0.0;
        let mut count = 0usize;

        for item in items {
            let text = self.text_for(item);
            match self.scorer.classify(&text).await {
                Ok(rows) => match signed_score(&rows) {
                    Some(score) => {
                        total += score;
                        count += 1;
                    }
                    None => debug!("No classifier output for '{}', skipping", item.title),
                },
                Err(e) => warn!("Failed to score news item '{}': {}", item.title, e),
            }
        }

        if count == 0 {
            return AggregateResult::no_data();
        }

        let score = (total / count as f64).clamp(-1.0, 1.0);
        let label = label_for_score(score);

        info!(
            "Aggregated sentiment over {}/{} items: {:.3} ({})",
            count,
            items.len(),
            score,
            label
        );

        AggregateResult {
            score,
            label,
            sample_count: count,
        }
    }

    /// Average full probability distributions of title and description.
    ///
    /// Items that only yield the no-signal sentinel are left out of the
    /// average. `None` when nothing could be scored.
    pub async fn average_scores(&self, items: &[NewsItem]) -> Option<SentimentScores> {
        let mut total = SentimentScores::default();
        let mut count = 0usize;

        for item in items {
            let scores = self.scorer.score(&item.full_text()).await;
            if scores.is_no_signal() {
                continue;
            }
            total.positive += scores.positive;
            total.negative += scores.negative;
            total.neutral += scores.neutral;
            count += 1;
        }

        if count == 0 {
            return None;
        }

        let n = count as f64;
        Some(SentimentScores {
            positive: total.positive / n,
            negative: total.negative / n,
            neutral: total.neutral / n,
        })
    }
}
