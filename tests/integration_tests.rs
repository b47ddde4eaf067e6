//! Integration tests for the news dashboard
//!
//! These drive the public API against a mock news backend: configuration
//! loading, the fetch-and-filter cycle and the full HTTP surface.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common {
    use news_dashboard::api::NewsApi;
    use news_dashboard::config::ApiConfig;
    use serde_json::json;

    pub fn api_for(base_url: &str) -> NewsApi {
        NewsApi::new(&ApiConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
        })
        .expect("Failed to build API client")
    }

    /// `/api/news` payload with the given (title, vendor, rank) rows
    pub fn news_body(rows: &[(&str, &str, i64)]) -> serde_json::Value {
        let articles: Vec<_> = rows
            .iter()
            .map(|(title, vendor, rank)| {
                json!({
                    "title": title,
                    "vendor_display": vendor,
                    "rank": rank,
                    "file_name": format!("{}.txt", title)
                })
            })
            .collect();
        json!({"success": true, "data": {"articles": articles}})
    }
}

#[cfg(test)]
mod config_integration_tests {
    use super::*;
    use news_dashboard::config::Config;
    use news_dashboard::platform::PlatformNames;

    #[test]
    fn test_load_shipped_dashboard_config() {
        let config = Config::load("dashboard.toml");
        assert!(config.is_ok(), "Failed to load dashboard.toml: {:?}", config.err());

        let config = config.unwrap();
        assert!(!config.api.base_url.is_empty());
        assert!(config.api.timeout_secs > 0);
        assert!(config.dashboard.group_preview > 0);
    }

    #[test]
    fn test_platform_overrides_from_file() {
        let toml_content = r#"
            [api]
            base_url = "http://localhost:5000"

            [platforms]
            hn = "Hacker News"
            zhihu = "知乎热榜"
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        let platforms = PlatformNames::with_overrides(&config.platforms);

        assert_eq!(platforms.display_name("hn"), "Hacker News");
        assert_eq!(platforms.display_name("zhihu"), "知乎热榜");
        assert_eq!(platforms.display_name("weibo"), "微博");
    }
}

#[cfg(test)]
mod manager_integration_tests {
    use super::*;
    use news_dashboard::state::NewsManager;

    #[tokio::test]
    async fn test_newest_request_wins() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/news"))
            .and(query_param("search", "old"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(common::news_body(&[("stale", "zhihu", 1)]))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/news"))
            .and(query_param("search", "new"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(common::news_body(&[("fresh", "weibo", 1)])),
            )
            .mount(&server)
            .await;

        let manager = Arc::new(NewsManager::new(common::api_for(&server.uri()), 1000));

        manager.set_search("old").await;
        let slow = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.load_news().await })
        };
        // Let the slow request go out first
        tokio::time::sleep(Duration::from_millis(100)).await;

        manager.set_search("new").await;
        manager.load_news().await.unwrap();
        slow.await.unwrap().unwrap();

        let state = manager.snapshot().await;
        assert_eq!(state.articles.len(), 1);
        assert_eq!(state.articles[0].title_or_default(), "fresh");
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_recovery_after_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/news"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/news"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(common::news_body(&[("back", "zhihu", 1)])),
            )
            .mount(&server)
            .await;

        let manager = NewsManager::new(common::api_for(&server.uri()), 1000);

        assert!(manager.load_news().await.is_err());
        assert!(manager.snapshot().await.last_error.is_some());

        manager.refresh().await.unwrap();
        let state = manager.snapshot().await;
        assert!(state.last_error.is_none());
        assert_eq!(state.articles[0].title_or_default(), "back");
    }
}

#[cfg(test)]
mod end_to_end_tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use http_body_util::BodyExt;
    use news_dashboard::config::DashboardConfig;
    use news_dashboard::platform::PlatformNames;
    use news_dashboard::routes::{router, AppState};
    use tower::ServiceExt;

    fn app_for(server: &MockServer) -> Router {
        let state = Arc::new(AppState::new(
            common::api_for(&server.uri()),
            PlatformNames::default(),
            DashboardConfig::default(),
        ));
        router(state)
    }

    async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, String) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_filter_then_refresh_keeps_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/news"))
            .and(query_param("source", "weibo"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(common::news_body(&[("微博一", "weibo", 1)])),
            )
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/news"))
            .respond_with(ResponseTemplate::new(200).set_body_json(common::news_body(&[
                ("知乎一", "zhihu", 1),
                ("微博一", "weibo", 1),
            ])))
            .mount(&server)
            .await;

        let app = app_for(&server);

        let (status, body) = send(&app, "GET", "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("知乎一"));
        assert!(body.contains("vendor-section"));

        let (_, body) = send(&app, "GET", "/news?source=weibo").await;
        assert!(body.contains("微博一"));
        assert!(!body.contains("知乎一"));
        assert!(!body.contains("vendor-section"));

        // Refresh reuses the weibo filter
        let (status, body) = send(&app, "POST", "/refresh").await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body.contains("知乎一"));

        let (_, body) = send(&app, "GET", "/refresh/status").await;
        assert!(!body.contains("刷新中"));
    }

    #[tokio::test]
    async fn test_article_with_encoded_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/news/a%20b.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"title": "空格文件", "source": "zhihu"}
            })))
            .mount(&server)
            .await;

        let app = app_for(&server);
        let (status, body) = send(&app, "GET", "/articles/a%20b.txt").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("空格文件"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let server = MockServer::start().await;
        let app = app_for(&server);

        let (status, _) = send(&app, "GET", "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
