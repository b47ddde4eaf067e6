use std::sync::Arc;

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::analytics::{self, AnalyticsView};
use crate::api::NewsApi;
use crate::config::DashboardConfig;
use crate::keywords::{keyword_tag, lookup_top_keywords, KeywordArticle};
use crate::platform::PlatformNames;
use crate::render::{ArticleDetail, NewsListView, Renderer, SidebarEntry, VendorOption};
use crate::state::{NewsManager, ViewState};
use crate::timefmt::local_now;

const KEYWORD_LOAD_FAILED: &str = "加载失败，请稍后重试";

pub struct AppState {
    pub news: NewsManager,
    pub api: NewsApi,
    pub platforms: PlatformNames,
    pub settings: DashboardConfig,
}

impl AppState {
    pub fn new(api: NewsApi, platforms: PlatformNames, settings: DashboardConfig) -> Self {
        Self {
            news: NewsManager::new(api.clone(), settings.per_page),
            api,
            platforms,
            settings,
        }
    }

    fn renderer(&self) -> Renderer<'_> {
        Renderer {
            platforms: &self.platforms,
            group_preview: self.settings.group_preview,
            now: local_now(),
        }
    }
}

// Template structs
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub list: NewsListView,
    pub total: usize,
    pub sidebar: Vec<SidebarEntry>,
    pub vendor_options: Vec<VendorOption>,
    pub search_term: String,
    pub refreshing: bool,
}

#[derive(Template)]
#[template(path = "news_list.html")]
pub struct NewsListTemplate {
    pub list: NewsListView,
    pub total: usize,
}

impl NewsListTemplate {
    fn from_state(state: &AppState, view: &ViewState) -> Self {
        Self {
            list: state.renderer().news_list(view),
            total: view.articles.len(),
        }
    }
}

#[derive(Template)]
#[template(path = "refresh_button.html")]
pub struct RefreshButtonTemplate {
    pub refreshing: bool,
}

#[derive(Template)]
#[template(path = "article_detail.html")]
pub struct ArticleDetailTemplate {
    pub detail: Result<ArticleDetail, String>,
}

/// Rows of a keyword modal plus its header data
pub struct KeywordListing {
    pub tags: Vec<String>,
    pub total: usize,
    pub rows: Vec<KeywordArticle>,
}

#[derive(Template)]
#[template(path = "keyword_modal.html")]
pub struct KeywordModalTemplate {
    pub keyword: String,
    pub result: Result<KeywordListing, String>,
}

#[derive(Template)]
#[template(path = "top_keywords.html")]
pub struct TopKeywordsTemplate {
    pub result: Result<KeywordListing, String>,
}

#[derive(Template)]
#[template(path = "analytics.html")]
pub struct AnalyticsTemplate {
    pub view: Result<AnalyticsView, String>,
}

// Wrapper for HTML responses; render failures become an AppError
struct HtmlTemplate<T>(T);

impl<T: Template> IntoResponse for HtmlTemplate<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => {
                AppError::from(anyhow::Error::new(err).context("Failed to render template"))
                    .into_response()
            }
        }
    }
}

// Custom error type
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error: {:#}", self.0),
        )
            .into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        AppError(err.into())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub source: String,
}

/// Apply the filter and reload; a failed load is recorded in the state and
/// rendered inline, so it is not propagated here.
async fn load_filtered(state: &AppState, filter: &FilterQuery) -> ViewState {
    state.news.apply_filter(&filter.search, &filter.source).await;
    if let Err(e) = state.news.load_news().await {
        debug!("Rendering inline load error: {}", e);
    }
    state.news.snapshot().await
}

// Route handlers
pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<FilterQuery>,
) -> impl IntoResponse {
    let view = load_filtered(&state, &filter).await;
    let renderer = state.renderer();

    HtmlTemplate(IndexTemplate {
        list: renderer.news_list(&view),
        total: view.articles.len(),
        sidebar: renderer.sidebar(&view),
        vendor_options: renderer.vendor_options(&view),
        search_term: view.search_term.clone(),
        refreshing: view.is_loading,
    })
}

pub async fn news_list(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<FilterQuery>,
) -> impl IntoResponse {
    let view = load_filtered(&state, &filter).await;
    HtmlTemplate(NewsListTemplate::from_state(&state, &view))
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    if let Err(e) = state.news.refresh().await {
        debug!("Rendering inline refresh error: {}", e);
    }
    let view = state.news.snapshot().await;
    HtmlTemplate(NewsListTemplate::from_state(&state, &view))
}

pub async fn refresh_status(
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let refreshing = state.news.is_loading().await;
    HtmlTemplate(RefreshButtonTemplate { refreshing })
}

pub async fn article_detail(
    State(state): State<Arc<AppState>>,
    Path(file_name): Path<String>,
) -> impl IntoResponse {
    let detail = match state.api.article(&file_name).await {
        Ok(article) => Ok(ArticleDetail::new(&article, local_now())),
        Err(e) => {
            warn!("Failed to load article '{}': {}", file_name, e);
            Err(format!("加载新闻详情失败: {}", e))
        }
    };
    HtmlTemplate(ArticleDetailTemplate { detail })
}

pub async fn keyword_news(
    State(state): State<Arc<AppState>>,
    Path(keyword): Path<String>,
) -> impl IntoResponse {
    let result = match state.api.by_keyword(&keyword).await {
        Ok(found) => {
            let rows = KeywordArticle::list(&found.articles, &state.platforms, local_now());
            let total = if found.total > 0 { found.total } else { rows.len() };
            Ok(KeywordListing {
                tags: Vec::new(),
                total,
                rows,
            })
        }
        Err(e) => {
            warn!("Keyword lookup '{}' failed: {}", keyword, e);
            Err(KEYWORD_LOAD_FAILED.to_string())
        }
    };
    HtmlTemplate(KeywordModalTemplate { keyword, result })
}

pub async fn top_keywords(
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let result = match lookup_top_keywords(&state.api, state.settings.top_keywords).await {
        Ok(found) => Ok(KeywordListing {
            tags: found.keywords.iter().map(keyword_tag).collect(),
            total: found.articles.len(),
            rows: KeywordArticle::list_matched(&found.articles, &state.platforms, local_now()),
        }),
        Err(_) => Err(KEYWORD_LOAD_FAILED.to_string()),
    };
    HtmlTemplate(TopKeywordsTemplate { result })
}

pub async fn analytics_page(
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let settings = &state.settings;
    let view = match analytics::load(&state.api, settings.per_page, settings.keyword_limit).await {
        Ok((page, keywords)) => Ok(AnalyticsView::new(&page, &keywords, &state.platforms)),
        Err(e) => {
            warn!("Failed to load analytics: {}", e);
            Err(format!("加载分析数据失败: {}", e))
        }
    };
    HtmlTemplate(AnalyticsTemplate { view })
}

pub async fn health() -> impl IntoResponse {
    Html("OK")
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/news", get(news_list))
        .route("/refresh", post(refresh))
        .route("/refresh/status", get(refresh_status))
        .route("/articles/:file_name", get(article_detail))
        .route("/keywords-top", get(top_keywords))
        .route("/keywords/:keyword", get(keyword_news))
        .route("/analytics", get(analytics_page))
        .route("/health", get(health))
        .with_state(state)
}
