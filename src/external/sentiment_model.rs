use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::SentimentError;
use crate::models::LabelScore;

/// A loaded three-class text classifier.
///
/// Rows come back in no guaranteed order; callers pick the maximum.
#[async_trait]
pub trait SentimentModelRuntime: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>, SentimentError>;
}

/// Performs the one-time, expensive model load
#[async_trait]
pub trait SentimentModelLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn SentimentModelRuntime>, SentimentError>;
}
