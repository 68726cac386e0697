use std::env;

use crate::extract::SeriesLayout;

pub const DEFAULT_API_BASE: &str = "https://ads.telegram.org";
// The console's own fallback hash, good enough for unauthenticated probes.
pub const DEFAULT_HASH: &str = "be173eed7f56db15b9";

/// Recognized limit options and their defaults.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    /// Maximum identifiers accepted per bulk-insert batch.
    pub max_insert_ids: usize,
    /// Maximum ads-list pages walked before giving up on pagination.
    pub max_list_pages: usize,
    /// Rows shown per page in the dashboard tables.
    pub items_per_page: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_insert_ids: 100,
            max_list_pages: 100,
            items_per_page: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub api_base: String,
    pub owner_id: Option<String>,
    pub hash: String,
    pub session_cookie: Option<String>,
    pub series_layout: SeriesLayout,
    pub limits: Limits,
}

pub fn from_env() -> Config {
    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let series_layout = match env::var("ADS_SERIES_LAYOUT").as_deref() {
        Ok("legacy") => SeriesLayout::legacy(),
        _ => SeriesLayout::standard(),
    };

    let mut limits = Limits::default();
    if let Some(value) = env_usize("ADS_MAX_INSERT_IDS") {
        limits.max_insert_ids = value;
    }
    if let Some(value) = env_usize("ADS_MAX_LIST_PAGES") {
        limits.max_list_pages = value;
    }
    if let Some(value) = env_usize("ADS_ITEMS_PER_PAGE") {
        limits.items_per_page = value;
    }

    Config {
        port,
        api_base: env::var("ADS_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
        owner_id: env::var("ADS_OWNER_ID").ok().filter(|v| !v.is_empty()),
        hash: env::var("ADS_HASH").unwrap_or_else(|_| DEFAULT_HASH.to_string()),
        session_cookie: env::var("ADS_SESSION_COOKIE").ok().filter(|v| !v.is_empty()),
        series_layout,
        limits,
    }
}

fn env_usize(name: &str) -> Option<usize> {
    env::var(name).ok().and_then(|value| value.parse().ok())
}
