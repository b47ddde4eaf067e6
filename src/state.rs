use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::api::{ApiError, Article, NewsApi, NewsPage, NewsQuery, VendorStat};

/// Everything the dashboard renders from
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub articles: Vec<Article>,
    pub vendors: Vec<String>,
    pub vendor_stats: HashMap<String, VendorStat>,
    pub search_term: String,
    pub current_vendor: String,
    pub is_loading: bool,
    /// Message of the most recent failed load, cleared by the next success
    pub last_error: Option<String>,
    /// Ticket of the newest load started
    issued: u64,
    /// Ticket of the load whose data is currently shown
    applied: u64,
}

impl ViewState {
    pub fn is_filtered(&self) -> bool {
        !self.search_term.is_empty() || !self.current_vendor.is_empty()
    }

    fn query(&self, per_page: u32) -> NewsQuery {
        NewsQuery {
            per_page,
            source: self.current_vendor.clone(),
            search: self.search_term.clone(),
        }
    }

    /// Begin a load: returns its ticket and the query to send
    fn begin_load(&mut self, per_page: u32) -> (u64, NewsQuery) {
        self.issued += 1;
        self.is_loading = true;
        (self.issued, self.query(per_page))
    }

    /// Apply a finished load. Returns false when a newer load already landed.
    fn finish_load(
        &mut self,
        ticket: u64,
        result: &Result<NewsPage, ApiError>,
    ) -> bool {
        if ticket == self.issued {
            self.is_loading = false;
        }
        if ticket < self.applied {
            return false;
        }
        self.applied = ticket;

        match result {
            Ok(page) => {
                self.articles = page.articles.clone();
                self.vendors = page.vendors.clone();
                self.vendor_stats = page.vendor_stats.clone();
                self.last_error = None;
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
            }
        }
        true
    }
}

/// Page controller: owns the single ViewState and runs the fetch-and-filter cycle
pub struct NewsManager {
    api: NewsApi,
    per_page: u32,
    state: Arc<RwLock<ViewState>>,
}

impl NewsManager {
    pub fn new(api: NewsApi, per_page: u32) -> Self {
        Self {
            api,
            per_page,
            state: Arc::new(RwLock::new(ViewState::default())),
        }
    }

    pub async fn snapshot(&self) -> ViewState {
        self.state.read().await.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }

    pub async fn set_search(&self, term: &str) {
        self.state.write().await.search_term = term.trim().to_string();
    }

    pub async fn set_vendor(&self, vendor: &str) {
        self.state.write().await.current_vendor = vendor.trim().to_string();
    }

    pub async fn apply_filter(&self, search: &str, vendor: &str) {
        let mut state = self.state.write().await;
        state.search_term = search.trim().to_string();
        state.current_vendor = vendor.trim().to_string();
    }

    /// Fetch with the current filter and replace the article data.
    ///
    /// A failure keeps the previous articles and records the error for the
    /// renderer. The returned error is the fetch error, if any.
    ///
    /// The fetch runs on its own task, so the ticket is always finished even
    /// when the caller is dropped mid-request.
    pub async fn load_news(&self) -> Result<(), ApiError> {
        let (ticket, query) = self.state.write().await.begin_load(self.per_page);
        info!(
            "Loading news (search='{}', vendor='{}')",
            query.search, query.source
        );

        let api = self.api.clone();
        let state = Arc::clone(&self.state);
        let fetch = tokio::spawn(async move {
            let result = api.list_news(&query).await;
            if !state.write().await.finish_load(ticket, &result) {
                debug!("Discarding stale news response #{}", ticket);
            }
            result
        });

        match fetch.await? {
            Ok(page) => {
                info!(
                    "Loaded {} articles from {} vendors",
                    page.articles.len(),
                    page.vendors.len()
                );
                Ok(())
            }
            Err(e) => {
                warn!("Failed to load news: {}", e);
                Err(e)
            }
        }
    }

    /// Reload with whatever filter is active
    pub async fn refresh(&self) -> Result<(), ApiError> {
        info!("Manual refresh");
        self.load_news().await
    }
}
