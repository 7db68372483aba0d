use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::external::news_provider::NewsProvider;
use crate::models::NewsItem;

/// Configuration for the MediaStack news provider
#[derive(Debug, Clone)]
pub struct NewsConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl NewsConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("MEDIASTACK_API_KEY").ok().filter(|k| !k.is_empty()),
            base_url: std::env::var("NEWS_BASE_URL")
                .unwrap_or_else(|_| "http://api.mediastack.com/v1/news".to_string()),
        }
    }
}

/// MediaStack API provider (business and technology news, English only)
pub struct MediaStackProvider {
    config: NewsConfig,
    client: Client,
}

impl MediaStackProvider {
    pub fn new(config: NewsConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client for news: {}", e);
                Client::new()
            });

        if config.api_key.is_none() {
            warn!("MEDIASTACK_API_KEY not set; news searches will return no results");
        }

        Self { config, client }
    }

    async fn fetch(
        &self,
        api_key: &str,
        keywords: Option<&str>,
        limit: usize,
    ) -> Result<Vec<NewsItem>, AppError> {
        let limit = limit.to_string();
        let mut params: Vec<(&str, &str)> = vec![
            ("access_key", api_key),
            ("categories", "business,technology"),
            ("languages", "en"),
            ("limit", limit.as_str()),
            ("sort", "published_desc"),
        ];
        if let Some(keywords) = keywords.filter(|k| !k.trim().is_empty()) {
            params.push(("keywords", keywords));
        }

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                error!("MediaStack API request failed: {}", e);
                AppError::External(format!("News API error: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("MediaStack API error {}: {}", status, error_text);
            return Err(AppError::External(format!(
                "News API returned error {}: {}",
                status, error_text
            )));
        }

        let body: MediaStackResponse = response.json().await.map_err(|e| {
            error!("Failed to parse MediaStack response: {}", e);
            AppError::External(format!("Failed to parse news response: {}", e))
        })?;

        into_news_items(body)
    }
}

#[derive(Debug, Deserialize)]
struct MediaStackResponse {
    data: Option<Vec<MediaStackItem>>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct MediaStackItem {
    title: Option<String>,
    description: Option<String>,
    source: Option<String>,
    url: Option<String>,
    image: Option<String>,
    published_at: Option<String>,
}

fn into_news_items(body: MediaStackResponse) -> Result<Vec<NewsItem>, AppError> {
    let Some(data) = body.data else {
        let detail = body
            .error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "missing data".to_string());
        return Err(AppError::External(format!("MediaStack API error: {}", detail)));
    };

    let items = data
        .into_iter()
        .filter_map(|item| {
            let title = item.title?;
            Some(NewsItem {
                title,
                description: item.description.unwrap_or_default(),
                source: item.source.unwrap_or_default(),
                url: item.url.unwrap_or_default(),
                image: item.image.filter(|i| !i.is_empty()),
                published_at: parse_published_at(item.published_at.as_deref()),
            })
        })
        .collect();

    Ok(items)
}

/// MediaStack timestamps look like "2024-03-15T14:30:00+00:00"
fn parse_published_at(raw: Option<&str>) -> DateTime<Utc> {
    match raw.map(DateTime::parse_from_rfc3339) {
        Some(Ok(dt)) => dt.with_timezone(&Utc),
        _ => {
            warn!("Could not parse published_at {:?}, using current time", raw);
            Utc::now()
        }
    }
}

#[async_trait]
impl NewsProvider for MediaStackProvider {
    async fn search(&self, keywords: Option<&str>, limit: usize) -> Vec<NewsItem> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            warn!("MEDIASTACK_API_KEY not set; returning no news");
            return Vec::new();
        };

        info!("Fetching up to {} news items from MediaStack (keywords: {:?})", limit, keywords);

        match self.fetch(api_key, keywords, limit).await {
            Ok(items) => {
                info!("Fetched {} news items", items.len());
                items
            }
            Err(e) => {
                error!("Error fetching news: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_news_items() {
        let body: MediaStackResponse = serde_json::from_str(
            r#"{
                "pagination": {"limit": 2, "offset": 0, "count": 2, "total": 2},
                "data": [
                    {
                        "title": "Apple beats estimates",
                        "description": null,
                        "source": "Reuters",
                        "url": "https://example.com/a",
                        "image": null,
                        "published_at": "2024-03-15T14:30:00+00:00"
                    },
                    {
                        "title": null,
                        "description": "orphan",
                        "source": "Wire",
                        "url": "https://example.com/b",
                        "image": "https://example.com/b.png",
                        "published_at": "2024-03-15T10:00:00+00:00"
                    }
                ]
            }"#,
        )
        .unwrap();

        let items = into_news_items(body).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Apple beats estimates");
        assert_eq!(items[0].description, "");
        assert!(items[0].image.is_none());
        assert_eq!(items[0].published_at.to_rfc3339(), "2024-03-15T14:30:00+00:00");
    }

    #[test]
    fn test_error_body_is_reported() {
        let body: MediaStackResponse = serde_json::from_str(
            r#"{"error": {"code": "invalid_access_key", "message": "bad key"}}"#,
        )
        .unwrap();
        match into_news_items(body) {
            Err(AppError::External(msg)) => assert!(msg.contains("invalid_access_key")),
            other => panic!("expected External error, got {:?}", other),
        }
    }

    /// Serves a fixed 401 body on an ephemeral local port
    async fn rejecting_server() -> String {
        use axum::http::StatusCode;
        use axum::routing::get;
        use axum::{Json, Router};

        let app = Router::new().route(
            "/v1/news",
            get(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(serde_json::json!({
                        "error": {"code": "invalid_access_key", "message": "bad key"}
                    })),
                )
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/v1/news", addr)
    }

    #[tokio::test]
    async fn test_non_success_status_is_external_error() {
        let provider = MediaStackProvider::new(NewsConfig {
            api_key: Some("key".to_string()),
            base_url: rejecting_server().await,
        });

        match provider.fetch("key", Some("Apple"), 5).await {
            Err(AppError::External(msg)) => {
                assert!(msg.contains("401"));
                assert!(msg.contains("invalid_access_key"));
            }
            other => panic!("expected External error, got {:?}", other),
        }

        assert!(provider.search(Some("Apple"), 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_search_without_api_key_is_empty() {
        let provider = MediaStackProvider::new(NewsConfig {
            api_key: None,
            base_url: "http://127.0.0.1:9/v1/news".to_string(),
        });
        assert!(provider.search(Some("Apple"), 5).await.is_empty());
    }
}
