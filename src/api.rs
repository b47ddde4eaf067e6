use std::collections::HashMap;
use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::ApiConfig;

pub const UNKNOWN_VENDOR: &str = "未知来源";

/// Rank assumed for articles that carry none (or rank 0)
pub const DEFAULT_RANK: i64 = 999;

const SUMMARY_CHARS: usize = 120;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(StatusCode),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{0}")]
    Rejected(String),
    #[error("response carried no data")]
    MissingData,
    #[error("load task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Article {
    /// Either a string or a number depending on the backend
    pub id: Option<serde_json::Value>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub source: Option<String>,
    pub vendor_display: Option<String>,
    pub rank: Option<i64>,
    pub timestamp: Option<String>,
    pub publish_time: Option<String>,
    pub url: Option<String>,
    pub file_name: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

impl Article {
    pub fn id_string(&self) -> Option<String> {
        match &self.id {
            Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Vendor this article is grouped under
    pub fn vendor_key(&self) -> &str {
        present(&self.vendor_display)
            .or_else(|| present(&self.source))
            .unwrap_or(UNKNOWN_VENDOR)
    }

    /// Platform id for icon lookup; `vendor_display` is often a translated name
    pub fn platform_id(&self) -> &str {
        present(&self.source).unwrap_or_else(|| self.vendor_key())
    }

    /// Identifier used to open the article detail
    pub fn identifier(&self) -> Option<String> {
        present(&self.file_name)
            .map(str::to_string)
            .or_else(|| self.id_string())
    }

    /// Key used when merging result sets from several lookups
    pub fn dedup_key(&self) -> String {
        self.identifier().unwrap_or_else(|| {
            format!(
                "{}-{}",
                self.title.as_deref().unwrap_or_default(),
                self.publish_time.as_deref().unwrap_or_default()
            )
        })
    }

    pub fn sort_rank(&self) -> i64 {
        match self.rank {
            Some(rank) if rank != 0 => rank,
            _ => DEFAULT_RANK,
        }
    }

    /// Preferred timestamp for display
    pub fn when(&self) -> Option<&str> {
        present(&self.timestamp).or_else(|| present(&self.publish_time))
    }

    pub fn title_or_default(&self) -> &str {
        present(&self.title).unwrap_or("无标题")
    }

    pub fn has_summary(&self) -> bool {
        non_blank(&self.summary).is_some()
    }

    pub fn has_content(&self) -> bool {
        non_blank(&self.content).is_some()
    }

    pub fn external_url(&self) -> Option<&str> {
        non_blank(&self.url)
    }

    /// Summary, else a clipped prefix of the content, else `fallback`
    pub fn summary_or(&self, fallback: &str) -> String {
        if let Some(summary) = non_blank(&self.summary) {
            return summary.to_string();
        }
        match non_blank(&self.content) {
            Some(content) => {
                let clipped: String = content.chars().take(SUMMARY_CHARS).collect();
                format!("{}...", clipped)
            }
            None => fallback.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VendorStat {
    #[serde(default)]
    pub count: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewsPage {
    pub articles: Vec<Article>,
    pub vendors: Vec<String>,
    pub vendor_stats: HashMap<String, VendorStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub name: String,
    #[serde(default)]
    pub value: usize,
    #[serde(default)]
    pub frequency: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KeywordList {
    pub keywords: Vec<Keyword>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KeywordNews {
    pub articles: Vec<Article>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    message: Option<String>,
    error: Option<String>,
}

impl<T> Envelope<T> {
    fn into_result(self, default_message: &str) -> Result<T, ApiError> {
        if !self.success {
            let message = self
                .message
                .filter(|m| !m.is_empty())
                .or(self.error.filter(|e| !e.is_empty()))
                .unwrap_or_else(|| default_message.to_string());
            return Err(ApiError::Rejected(message));
        }
        self.data.ok_or(ApiError::MissingData)
    }
}

/// Filter parameters for `GET /api/news`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewsQuery {
    pub per_page: u32,
    pub source: String,
    pub search: String,
}

impl NewsQuery {
    pub fn all(per_page: u32) -> Self {
        Self {
            per_page,
            ..Default::default()
        }
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("per_page", self.per_page.to_string())];
        if !self.source.is_empty() {
            params.push(("source", self.source.clone()));
        }
        if !self.search.is_empty() {
            params.push(("search", self.search.clone()));
        }
        params
    }
}

/// Client for the news backend's REST API
#[derive(Clone)]
pub struct NewsApi {
    client: Client,
    base_url: Url,
}

impl NewsApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(config.base_url.clone()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("NewsDashboard/1.0")
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Append path segments to the base URL, percent-encoding each one
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
        default_message: &str,
    ) -> Result<T, ApiError> {
        debug!("GET {}", url);

        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        let envelope: Envelope<T> = match serde_json::from_slice(&bytes) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => return Err(ApiError::Status(status)),
            Err(e) => return Err(ApiError::Decode(e)),
        };

        envelope.into_result(default_message)
    }

    pub async fn list_news(&self, query: &NewsQuery) -> Result<NewsPage, ApiError> {
        let url = self.endpoint(&["api", "news"]);
        self.get(url, &query.params(), "获取新闻失败").await
    }

    pub async fn keywords(&self, limit: u32) -> Result<Vec<Keyword>, ApiError> {
        let url = self.endpoint(&["api", "analytics", "keywords"]);
        let list: KeywordList = self
            .get(url, &[("limit", limit.to_string())], "获取关键词数据失败")
            .await?;
        Ok(list.keywords)
    }

    pub async fn article(&self, file_name: &str) -> Result<Article, ApiError> {
        let url = self.endpoint(&["api", "news", file_name]);
        self.get(url, &[], "获取新闻详情失败").await
    }

    pub async fn by_keyword(&self, keyword: &str) -> Result<KeywordNews, ApiError> {
        let url = self.endpoint(&["api", "news", "by-keyword", keyword]);
        self.get(url, &[], "获取关键词新闻失败").await
    }
}
