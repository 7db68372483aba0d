use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single news article as returned by the news provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsItem {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub source: String,
    pub url: String,
    pub image: Option<String>,
    pub published_at: DateTime<Utc>,
}

impl NewsItem {
    /// Title and description joined the way the full-text scorer reads them
    pub fn full_text(&self) -> String {
        format!("{}. {}", self.title, self.description)
    }
}

/// Query parameters for `GET /api/news`
#[derive(Debug, Clone, Deserialize)]
pub struct NewsQueryParams {
    /// Maximum number of items (default: 5)
    pub limit: Option<usize>,
    /// Keyword filter passed through to the provider
    pub keywords: Option<String>,
}
