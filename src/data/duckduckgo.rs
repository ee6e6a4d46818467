//! News search through DuckDuckGo's news backend

use std::collections::HashSet;
use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::constants::news::{DUCKDUCKGO_NEWS_PATH, DUCKDUCKGO_URL, NO_RESULTS};
use crate::error::DataError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    /// Unix seconds
    #[serde(default)]
    pub date: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub source: String,
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    results: Vec<NewsArticle>,
}

#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn search_news(&self, query: &str, max_results: usize)
        -> Result<Vec<NewsArticle>, DataError>;
}

#[derive(Clone)]
pub struct DuckDuckGoNews {
    client: Client,
    base_url: String,
    region: String,
    safesearch: String,
}

impl DuckDuckGoNews {
    pub fn new(region: &str, safesearch: &str, timeout_secs: u64) -> Result<Self, DataError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent("Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0")
            .build()?;

        Ok(Self {
            client,
            base_url: DUCKDUCKGO_URL.to_string(),
            region: region.to_string(),
            safesearch: safesearch.to_string(),
        })
    }

    /// Point the client at another host (test servers, proxies)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn fetch_vqd(&self, query: &str) -> Result<String, DataError> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("q", query)])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(DataError::Http {
                status: status.as_u16(),
                body,
            });
        }

        extract_vqd(&body).ok_or_else(|| DataError::MissingSearchToken {
            query: query.to_string(),
        })
    }
}

/// Safesearch setting as the news endpoint's `p` parameter
pub fn safesearch_param(safesearch: &str) -> &'static str {
    match safesearch.to_lowercase().as_str() {
        "on" | "strict" => "1",
        "off" => "-2",
        _ => "-1",
    }
}

/// Pull the `vqd` search token out of a DuckDuckGo page.
pub fn extract_vqd(body: &str) -> Option<String> {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    let patterns = PATTERNS.get_or_init(|| {
        [r#"vqd="([^"]+)""#, r#"vqd='([^']+)'"#, r"vqd=([\d-]+)&"]
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect()
    });

    patterns.iter().find_map(|re| {
        re.captures(body)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    })
}

/// Decode a `news.js` payload, dropping URL duplicates and keeping at most `max_results`.
pub fn parse_news_response(body: &str, max_results: usize) -> Result<Vec<NewsArticle>, DataError> {
    let response: NewsResponse = serde_json::from_str(body)?;

    let mut seen = HashSet::new();
    Ok(response
        .results
        .into_iter()
        .filter(|a| !a.url.is_empty() && seen.insert(a.url.clone()))
        .take(max_results)
        .collect())
}

/// `[snippet: ..., title: ..., link: ..., date: ..., source: ...], ...`
pub fn format_news_results(articles: &[NewsArticle]) -> String {
    if articles.is_empty() {
        return NO_RESULTS.to_string();
    }

    articles
        .iter()
        .map(|a| {
            // 0 means the payload had no date
            let date = if a.date == 0 {
                String::new()
            } else {
                DateTime::from_timestamp(a.date, 0)
                    .map(|d| d.to_rfc3339())
                    .unwrap_or_default()
            };
            format!(
                "[snippet: {}, title: {}, link: {}, date: {}, source: {}]",
                a.excerpt, a.title, a.url, date, a.source
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[async_trait]
impl NewsSource for DuckDuckGoNews {
    async fn search_news(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<NewsArticle>, DataError> {
        info!("📰 [NEWS] Searching news for '{}' (max {})", query, max_results);

        let vqd = self.fetch_vqd(query).await?;

        let url = format!("{}{}", self.base_url, DUCKDUCKGO_NEWS_PATH);
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("l", self.region.as_str()),
                ("o", "json"),
                ("noamp", "1"),
                ("q", query),
                ("vqd", vqd.as_str()),
                ("p", safesearch_param(&self.safesearch)),
            ])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            warn!("📰 [NEWS] Search failed with HTTP {}", status);
            return Err(DataError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let articles = parse_news_response(&body, max_results)?;
        info!("📰 [NEWS] Found {} articles for '{}'", articles.len(), query);
        Ok(articles)
    }
}
