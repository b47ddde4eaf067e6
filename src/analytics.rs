use std::collections::HashMap;

use tracing::info;

use crate::api::{ApiError, Article, Keyword, NewsApi, NewsPage, NewsQuery, VendorStat};
use crate::platform::PlatformNames;

const POSITIVE_WORDS: &[&str] = &[
    "成功", "增长", "上涨", "突破", "创新", "发展", "获得", "提升", "优秀", "领先",
];

const NEGATIVE_WORDS: &[&str] = &[
    "下跌", "失败", "问题", "危机", "风险", "下降", "困难", "挑战", "损失", "争议",
];

const HOT_KEYWORD_COUNT: usize = 5;
const TOP_VENDORS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "积极",
            Sentiment::Negative => "消极",
            Sentiment::Neutral => "中性",
        }
    }
}

/// Literal substring match against the fixed word lists. Titles hitting both
/// lists (or neither) are neutral.
pub fn classify(title: &str) -> Sentiment {
    let positive = POSITIVE_WORDS.iter().any(|w| title.contains(w));
    let negative = NEGATIVE_WORDS.iter().any(|w| title.contains(w));
    match (positive, negative) {
        (true, false) => Sentiment::Positive,
        (false, true) => Sentiment::Negative,
        _ => Sentiment::Neutral,
    }
}

fn percent(count: usize, total: usize) -> String {
    if total == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", count as f64 * 100.0 / total as f64)
}

#[derive(Debug, Clone)]
pub struct Share {
    pub label: String,
    pub count: usize,
    pub percent: String,
}

pub fn sentiment_breakdown(articles: &[Article]) -> Vec<Share> {
    let mut counts = [0usize; 3];
    for article in articles {
        let slot = match classify(article.title.as_deref().unwrap_or_default()) {
            Sentiment::Positive => 0,
            Sentiment::Negative => 1,
            Sentiment::Neutral => 2,
        };
        counts[slot] += 1;
    }

    [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral]
        .iter()
        .zip(counts)
        .map(|(sentiment, count)| Share {
            label: sentiment.label().to_string(),
            count,
            percent: percent(count, articles.len()),
        })
        .collect()
}

/// Top ten vendors by article count; percentages are of all vendors
pub fn vendor_distribution(
    stats: &HashMap<String, VendorStat>,
    platforms: &PlatformNames,
) -> Vec<Share> {
    let total: usize = stats.values().map(|s| s.count).sum();

    let mut ranked: Vec<(&String, usize)> = stats.iter().map(|(v, s)| (v, s.count)).collect();
    // Name as tiebreak so equal counts don't depend on map order
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    ranked
        .into_iter()
        .take(TOP_VENDORS)
        .map(|(vendor, count)| Share {
            label: platforms.display_name(vendor).to_string(),
            count,
            percent: percent(count, total),
        })
        .collect()
}

/// `AI、芯片、...` from the first five keywords, `暂无` when there are none
pub fn hot_keywords_label(keywords: &[Keyword]) -> String {
    if keywords.is_empty() {
        return "暂无".to_string();
    }
    keywords
        .iter()
        .take(HOT_KEYWORD_COUNT)
        .map(|k| k.name.as_str())
        .collect::<Vec<_>>()
        .join("、")
}

/// Keywords worth drawing in the cloud: single characters are noise
pub fn cloud_keywords(keywords: &[Keyword]) -> Vec<Keyword> {
    keywords
        .iter()
        .filter(|k| k.name.chars().count() >= 2)
        .cloned()
        .collect()
}

#[derive(Debug, Clone)]
pub struct AnalyticsView {
    pub total_articles: usize,
    pub vendor_count: usize,
    pub hot_keywords: String,
    pub cloud: Vec<Keyword>,
    pub sentiment: Vec<Share>,
    pub vendors: Vec<Share>,
}

impl AnalyticsView {
    pub fn new(page: &NewsPage, keywords: &[Keyword], platforms: &PlatformNames) -> Self {
        Self {
            total_articles: page.articles.len(),
            vendor_count: page.vendors.len(),
            hot_keywords: hot_keywords_label(keywords),
            cloud: cloud_keywords(keywords),
            sentiment: sentiment_breakdown(&page.articles),
            vendors: vendor_distribution(&page.vendor_stats, platforms),
        }
    }
}

/// Fetch the unfiltered news list and the keyword list together; both must succeed
pub async fn load(
    api: &NewsApi,
    per_page: u32,
    keyword_limit: u32,
) -> Result<(NewsPage, Vec<Keyword>), ApiError> {
    let query = NewsQuery::all(per_page);
    let (page, keywords) = tokio::try_join!(api.list_news(&query), api.keywords(keyword_limit))?;
    info!(
        "Analytics loaded: {} articles, {} keywords",
        page.articles.len(),
        keywords.len()
    );
    Ok((page, keywords))
}
