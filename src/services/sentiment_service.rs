use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{error, warn};

use crate::errors::SentimentError;
use crate::external::huggingface::DEFAULT_MODEL_URL;
use crate::external::sentiment_model::{SentimentModelLoader, SentimentModelRuntime};
use crate::models::{LabelScore, ScoringText, SentimentClass, SentimentScores};

/// Characters of input the classifier sees; FinBERT tops out around 512 tokens
pub const DEFAULT_MAX_CHARS: usize = 1000;

/// Configuration for sentiment scoring
#[derive(Debug, Clone)]
pub struct SentimentConfig {
    pub model_url: String,
    pub api_token: Option<String>,
    pub max_chars: usize,
    pub scoring_text: ScoringText,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            model_url: DEFAULT_MODEL_URL.to_string(),
            api_token: None,
            max_chars: DEFAULT_MAX_CHARS,
            scoring_text: ScoringText::Title,
        }
    }
}

impl SentimentConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            model_url: std::env::var("SENTIMENT_MODEL_URL").unwrap_or(defaults.model_url),
            api_token: std::env::var("HF_API_TOKEN").ok().filter(|t| !t.is_empty()),
            max_chars: std::env::var("SENTIMENT_MAX_CHARS")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_chars),
            scoring_text: std::env::var("SENTIMENT_SCORING_TEXT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.scoring_text),
        }
    }
}

/// Scores text with a lazily loaded three-class classifier.
///
/// The model is loaded on first use and shared by every later call.
/// Concurrent first callers wait on the same load; a failed load leaves the
/// scorer empty so the next call tries again.
pub struct SentimentScorer {
    loader: Arc<dyn SentimentModelLoader>,
    runtime: OnceCell<Arc<dyn SentimentModelRuntime>>,
    max_chars: usize,
}

impl SentimentScorer {
    pub fn new(loader: Arc<dyn SentimentModelLoader>, max_chars: usize) -> Self {
        Self {
            loader,
            runtime: OnceCell::new(),
            max_chars,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.runtime.initialized()
    }

    /// The loaded model, or `None` if it can't be loaded
    pub async fn runtime(&self) -> Option<Arc<dyn SentimentModelRuntime>> {
        match self.runtime.get_or_try_init(|| self.loader.load()).await {
            Ok(runtime) => Some(Arc::clone(runtime)),
            Err(e) => {
                error!("Error loading sentiment model: {}", e);
                None
            }
        }
    }

    pub async fn classify(&self, text: &str) -> Result<Vec<LabelScore>, SentimentError> {
        let runtime = self
            .runtime()
            .await
            .ok_or_else(|| SentimentError::Unavailable("model not loaded".to_string()))?;

        runtime.classify(truncate_chars(text, self.max_chars)).await
    }

    /// Per-class probabilities, or the all-zero sentinel on any failure
    pub async fn score(&self, text: &str) -> SentimentScores {
        match self.classify(text).await {
            Ok(rows) => SentimentScores::from_label_scores(&rows),
            Err(e) => {
                warn!("Sentiment analysis error: {}", e);
                SentimentScores::no_signal()
            }
        }
    }
}

/// Prefix of at most `max_chars` characters, never splitting a code point
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Collapse classifier output to one directional value in [-1, 1].
///
/// Takes the most probable class: positive maps to p, negative to -p and
/// neutral to 0. `None` when there is nothing to score.
pub fn signed_score(rows: &[LabelScore]) -> Option<f64> {
    let top = rows
        .iter()
        .filter(|r| r.probability.is_finite())
        .max_by(|a, b| a.probability.total_cmp(&b.probability))?;

    let p = top.probability.clamp(0.0, 1.0);
    Some(match top.label {
        SentimentClass::Positive => p,
        SentimentClass::Negative => -p,
        SentimentClass::Neutral => 0.0,
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Returns canned rows keyed by exact input text
    #[derive(Default)]
    pub struct ScriptedRuntime {
        pub responses: HashMap<String, Vec<LabelScore>>,
        pub failing: Vec<String>,
        pub seen: std::sync::Mutex<Vec<String>>,
    }

    impl ScriptedRuntime {
        pub fn with(mut self, text: &str, label: SentimentClass, p: f64) -> Self {
            self.responses
                .entry(text.to_string())
                .or_default()
                .push(LabelScore::new(label, p));
            self
        }

        pub fn failing_on(mut self, text: &str) -> Self {
            self.failing.push(text.to_string());
            self
        }
    }

    #[async_trait]
    impl SentimentModelRuntime for ScriptedRuntime {
        async fn classify(&self, text: &str) -> Result<Vec<LabelScore>, SentimentError> {
            self.seen.lock().unwrap().push(text.to_string());
            if self.failing.iter().any(|t| t == text) {
                return Err(SentimentError::BadResponse("boom".to_string()));
            }
            Ok(self.responses.get(text).cloned().unwrap_or_default())
        }
    }

    /// Hands out one shared runtime and counts loads
    pub struct CountingLoader {
        pub runtime: Option<Arc<ScriptedRuntime>>,
        pub loads: AtomicUsize,
        pub delay: Duration,
    }

    impl CountingLoader {
        pub fn new(runtime: ScriptedRuntime) -> Self {
            Self {
                runtime: Some(Arc::new(runtime)),
                loads: AtomicUsize::new(0),
                delay: Duration::ZERO,
            }
        }

        pub fn unavailable() -> Self {
            Self {
                runtime: None,
                loads: AtomicUsize::new(0),
                delay: Duration::ZERO,
            }
        }

        pub fn load_count(&self) -> usize {
            self.loads.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SentimentModelLoader for CountingLoader {
        async fn load(&self) -> Result<Arc<dyn SentimentModelRuntime>, SentimentError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match &self.runtime {
                Some(runtime) => Ok(runtime.clone() as Arc<dyn SentimentModelRuntime>),
                None => Err(SentimentError::Unavailable("no model".to_string())),
            }
        }
    }
}
