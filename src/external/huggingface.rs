use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::errors::SentimentError;
use crate::external::sentiment_model::{SentimentModelLoader, SentimentModelRuntime};
use crate::models::{LabelScore, SentimentClass};

pub const DEFAULT_MODEL_URL: &str =
    "https://api-inference.huggingface.co/models/ProsusAI/finbert";

/// Loads FinBERT behind the Hugging Face inference API
pub struct HuggingFaceLoader {
    model_url: String,
    api_token: Option<String>,
}

impl HuggingFaceLoader {
    pub fn new(model_url: String, api_token: Option<String>) -> Self {
        Self { model_url, api_token }
    }
}

#[async_trait]
impl SentimentModelLoader for HuggingFaceLoader {
    async fn load(&self) -> Result<Arc<dyn SentimentModelRuntime>, SentimentError> {
        let api_token = self
            .api_token
            .clone()
            .ok_or_else(|| SentimentError::Unavailable("HF_API_TOKEN not set".to_string()))?;

        info!("Loading sentiment model from {}... this may take a while", self.model_url);

        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| SentimentError::Network(e.to_string()))?;

        let runtime = HuggingFaceRuntime {
            model_url: self.model_url.clone(),
            api_token,
            client,
        };

        // Blocks until the hosted model is warm, so later calls don't hit 503s
        runtime.request("Markets opened flat today.", true).await?;

        info!("Sentiment model loaded successfully");
        Ok(Arc::new(runtime))
    }
}

pub struct HuggingFaceRuntime {
    model_url: String,
    api_token: String,
    client: Client,
}

impl HuggingFaceRuntime {
    async fn request(
        &self,
        text: &str,
        wait_for_model: bool,
    ) -> Result<Vec<LabelScore>, SentimentError> {
        let body = serde_json::json!({
            "inputs": text,
            "options": { "wait_for_model": wait_for_model },
        });

        let response = self
            .client
            .post(&self.model_url)
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| SentimentError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::SERVICE_UNAVAILABLE {
            return Err(SentimentError::Unavailable("model is loading".to_string()));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SentimentError::BadResponse(format!("HTTP {}: {}", status, error_text)));
        }

        let parsed: InferenceResponse = response
            .json()
            .await
            .map_err(|e| SentimentError::Parse(e.to_string()))?;

        Ok(parsed.into_label_scores())
    }
}

#[async_trait]
impl SentimentModelRuntime for HuggingFaceRuntime {
    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>, SentimentError> {
        self.request(text, false).await
    }
}

#[derive(Debug, Deserialize)]
struct InferenceRow {
    label: String,
    score: f64,
}

/// Text-classification output is nested one level per input
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Batched(Vec<Vec<InferenceRow>>),
    Flat(Vec<InferenceRow>),
}

impl InferenceResponse {
    fn into_label_scores(self) -> Vec<LabelScore> {
        let rows = match self {
            InferenceResponse::Batched(mut batches) => {
                if batches.is_empty() {
                    Vec::new()
                } else {
                    batches.swap_remove(0)
                }
            }
            InferenceResponse::Flat(rows) => rows,
        };

        rows.into_iter()
            .filter_map(|row| match row.label.parse::<SentimentClass>() {
                Ok(label) => Some(LabelScore::new(label, row.score)),
                Err(e) => {
                    warn!("Dropping classifier row: {}", e);
                    None
                }
            })
            .collect()
    }
}
