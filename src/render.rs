//! View models built from [`ViewState`]; templates only lay them out.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::api::Article;
use crate::platform::{slugify, PlatformNames};
use crate::state::ViewState;
use crate::timefmt::{format_chinese_time, format_time, format_time_ago};

const NO_CONTENT: &str = "暂无内容";

/// Articles sharing one vendor key, in the order they were fetched
#[derive(Debug)]
pub struct VendorGroup<'a> {
    pub vendor: &'a str,
    pub articles: Vec<&'a Article>,
}

/// Group by vendor key; groups ordered by descending size, ties by first appearance
pub fn group_by_vendor(articles: &[Article]) -> Vec<VendorGroup<'_>> {
    let mut groups: Vec<VendorGroup<'_>> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for article in articles {
        let vendor = article.vendor_key();
        match positions.get(vendor) {
            Some(&i) => groups[i].articles.push(article),
            None => {
                positions.insert(vendor, groups.len());
                groups.push(VendorGroup {
                    vendor,
                    articles: vec![article],
                });
            }
        }
    }

    // sort_by is stable, so equal counts keep first-seen order
    groups.sort_by(|a, b| b.articles.len().cmp(&a.articles.len()));
    groups
}

#[derive(Debug, Clone)]
pub struct ArticleCard {
    /// Empty when the article has no identifier to open
    pub file_id: String,
    pub title: String,
    pub vendor_name: String,
    pub time_label: String,
    pub summary: String,
    /// Rank badge, only set in the grouped view
    pub rank: Option<i64>,
}

impl ArticleCard {
    pub fn new(
        article: &Article,
        platforms: &PlatformNames,
        now: NaiveDateTime,
        show_rank: bool,
    ) -> Self {
        Self {
            file_id: article.identifier().unwrap_or_default(),
            title: article.title_or_default().to_string(),
            vendor_name: platforms.display_name(article.vendor_key()).to_string(),
            time_label: format_chinese_time(article.when(), now),
            summary: article.summary_or(NO_CONTENT),
            rank: if show_rank {
                article.rank.filter(|r| *r != 0)
            } else {
                None
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct VendorSection {
    pub display_name: String,
    pub slug: String,
    pub icon: &'static str,
    pub count: usize,
    pub cards: Vec<ArticleCard>,
}

#[derive(Debug, Clone)]
pub enum NewsListView {
    Error(String),
    Empty,
    Flat(Vec<ArticleCard>),
    Grouped(Vec<VendorSection>),
}

impl NewsListView {
    pub fn is_grouped(&self) -> bool {
        matches!(self, NewsListView::Grouped(_))
    }
}

#[derive(Debug, Clone)]
pub struct SidebarEntry {
    pub display_name: String,
    pub slug: String,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct VendorOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Shared inputs for every render
pub struct Renderer<'a> {
    pub platforms: &'a PlatformNames,
    pub group_preview: usize,
    pub now: NaiveDateTime,
}

impl<'a> Renderer<'a> {
    pub fn news_list(&self, state: &ViewState) -> NewsListView {
        if let Some(message) = &state.last_error {
            return NewsListView::Error(format!("加载新闻失败: {}", message));
        }
        if state.articles.is_empty() {
            return NewsListView::Empty;
        }
        if state.is_filtered() {
            let cards = state
                .articles
                .iter()
                .map(|a| ArticleCard::new(a, self.platforms, self.now, false))
                .collect();
            return NewsListView::Flat(cards);
        }
        NewsListView::Grouped(self.sections(&state.articles))
    }

    fn sections(&self, articles: &[Article]) -> Vec<VendorSection> {
        group_by_vendor(articles)
            .into_iter()
            .map(|group| {
                let mut ranked = group.articles.clone();
                ranked.sort_by_key(|a| a.sort_rank());

                VendorSection {
                    display_name: self.platforms.display_name(group.vendor).to_string(),
                    slug: slugify(group.vendor),
                    icon: self.platforms.icon(
                        group
                            .articles
                            .first()
                            .map_or(group.vendor, |a| a.platform_id()),
                    ),
                    count: group.articles.len(),
                    cards: ranked
                        .into_iter()
                        .take(self.group_preview)
                        .map(|a| ArticleCard::new(a, self.platforms, self.now, true))
                        .collect(),
                }
            })
            .collect()
    }

    /// Vendor navigation in the same order as the grouped sections
    pub fn sidebar(&self, state: &ViewState) -> Vec<SidebarEntry> {
        group_by_vendor(&state.articles)
            .into_iter()
            .map(|group| SidebarEntry {
                display_name: self.platforms.display_name(group.vendor).to_string(),
                slug: slugify(group.vendor),
                count: group.articles.len(),
            })
            .collect()
    }

    pub fn vendor_options(&self, state: &ViewState) -> Vec<VendorOption> {
        let mut options = vec![VendorOption {
            value: String::new(),
            label: "全部厂商".to_string(),
            selected: state.current_vendor.is_empty(),
        }];
        options.extend(state.vendors.iter().map(|vendor| VendorOption {
            value: vendor.clone(),
            label: self.platforms.display_name(vendor).to_string(),
            selected: *vendor == state.current_vendor,
        }));
        options
    }
}

#[derive(Debug, Clone)]
pub struct ArticleDetail {
    pub title: String,
    pub source: String,
    pub time_label: String,
    pub time_ago: String,
    pub rank: Option<i64>,
    pub summary: Option<String>,
    pub content_lines: Vec<String>,
    pub url: Option<String>,
}

impl ArticleDetail {
    pub fn new(article: &Article, now: NaiveDateTime) -> Self {
        Self {
            title: article
                .title
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "新闻详情".to_string()),
            source: article.vendor_key().to_string(),
            time_label: format_time(article.when()),
            time_ago: format_time_ago(article.when(), now),
            rank: article.rank.filter(|r| *r != 0),
            summary: if article.has_summary() {
                article.summary.clone()
            } else {
                None
            },
            content_lines: if article.has_content() {
                article
                    .content
                    .as_deref()
                    .unwrap_or_default()
                    .lines()
                    .map(str::to_string)
                    .collect()
            } else {
                Vec::new()
            },
            url: article.external_url().map(str::to_string),
        }
    }
}
