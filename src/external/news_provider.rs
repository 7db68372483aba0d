use async_trait::async_trait;

use crate::models::NewsItem;

/// Source of recent news items.
///
/// `search` never fails: provider errors are logged by the implementation
/// and surface as an empty list.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    async fn search(&self, keywords: Option<&str>, limit: usize) -> Vec<NewsItem>;
}
