//! Keyword lookups behind the search modal.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::api::{ApiError, Article, Keyword, NewsApi};
use crate::platform::PlatformNames;
use crate::timefmt::format_chinese_time;

const NO_DESCRIPTION: &str = "暂无详细描述";

/// An article found by a keyword lookup, with the keyword that found it
#[derive(Debug, Clone)]
pub struct MatchedArticle {
    pub article: Article,
    pub keyword: String,
}

/// Concatenate per-keyword results in keyword order, drop repeats (the first
/// occurrence keeps its keyword), then order by rank.
pub fn merge_keyword_results(results: Vec<(String, Vec<Article>)>) -> Vec<MatchedArticle> {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();

    for (keyword, articles) in results {
        for article in articles {
            if seen.insert(article.dedup_key()) {
                merged.push(MatchedArticle {
                    article,
                    keyword: keyword.clone(),
                });
            }
        }
    }

    merged.sort_by_key(|m| m.article.sort_rank());
    merged
}

#[derive(Debug, Clone)]
pub struct TopKeywordMatches {
    pub keywords: Vec<Keyword>,
    pub articles: Vec<MatchedArticle>,
}

/// Fetch the hottest `limit` keywords and every article mentioning any of them.
///
/// Lookups run concurrently. A keyword the backend refuses contributes
/// nothing; a transport failure fails the whole lookup.
pub async fn lookup_top_keywords(
    api: &NewsApi,
    limit: u32,
) -> Result<TopKeywordMatches, ApiError> {
    let keywords = api.keywords(limit).await?;
    info!("Looking up articles for {} hot keywords", keywords.len());

    let lookups = keywords.iter().map(|k| async move {
        let found = match api.by_keyword(&k.name).await {
            Ok(news) => news.articles,
            Err(ApiError::Rejected(message)) => {
                debug!("No articles for keyword '{}': {}", k.name, message);
                Vec::new()
            }
            Err(ApiError::MissingData) => Vec::new(),
            Err(e) => return Err(e),
        };
        Ok((k.name.clone(), found))
    });

    let results = join_all(lookups)
        .await
        .into_iter()
        .collect::<Result<Vec<_>, ApiError>>()
        .map_err(|e| {
            warn!("Hot keyword lookup failed: {}", e);
            e
        })?;

    Ok(TopKeywordMatches {
        keywords,
        articles: merge_keyword_results(results),
    })
}

/// One row in a keyword modal
#[derive(Debug, Clone)]
pub struct KeywordArticle {
    pub number: usize,
    pub file_id: String,
    pub title: String,
    pub vendor_name: String,
    pub rank: Option<i64>,
    pub time_label: String,
    pub summary: String,
    pub url: Option<String>,
    pub matched_keyword: Option<String>,
}

impl KeywordArticle {
    pub fn new(
        number: usize,
        article: &Article,
        matched_keyword: Option<&str>,
        platforms: &PlatformNames,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            number,
            file_id: article.identifier().unwrap_or_default(),
            title: article.title_or_default().to_string(),
            vendor_name: platforms.display_name(article.vendor_key()).to_string(),
            rank: article.rank,
            time_label: format_chinese_time(article.when(), now),
            summary: article.summary_or(NO_DESCRIPTION),
            url: article.external_url().map(str::to_string),
            matched_keyword: matched_keyword.map(str::to_string),
        }
    }

    /// Number rows from 1 in list order
    pub fn list(
        articles: &[Article],
        platforms: &PlatformNames,
        now: NaiveDateTime,
    ) -> Vec<Self> {
        articles
            .iter()
            .enumerate()
            .map(|(i, a)| Self::new(i + 1, a, None, platforms, now))
            .collect()
    }

    pub fn list_matched(
        matches: &[MatchedArticle],
        platforms: &PlatformNames,
        now: NaiveDateTime,
    ) -> Vec<Self> {
        matches
            .iter()
            .enumerate()
            .map(|(i, m)| Self::new(i + 1, &m.article, Some(&m.keyword), platforms, now))
            .collect()
    }
}

/// `name(value次)`
pub fn keyword_tag(keyword: &Keyword) -> String {
    format!("{}({}次)", keyword.name, keyword.value)
}
