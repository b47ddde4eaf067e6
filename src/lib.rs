//! News Dashboard - a web front end for a news aggregation backend
//!
//! Fetches articles from the backend's REST API, groups them by source and
//! serves them as htmx-driven pages with keyword lookup and analytics.

pub mod analytics;
pub mod api;
pub mod config;
pub mod keywords;
pub mod platform;
pub mod render;
pub mod routes;
pub mod state;
pub mod timefmt;
