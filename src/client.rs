//! HTTP client for the ads console. Two endpoints matter: the per-ad stats
//! page (a JSON envelope wrapping a raw JS blob) and the paginated
//! `getAdsList` API. Both payloads are probed defensively; the wire format
//! is dictated upstream.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, info};

use crate::aggregate::StatsSource;
use crate::config::Config;
use crate::errors::AppError;
use crate::extract::{SeriesLayout, extract_chart_data};
use crate::models::{AdRef, AdStatsResult};
use crate::stats::build_daily_stats;

const TITLE_SUFFIX: &str = " – Telegram Ads";

pub struct AdsClient {
    http: reqwest::Client,
    base: String,
    hash: String,
    owner_id: Option<String>,
    session_cookie: Option<String>,
    layout: SeriesLayout,
    max_list_pages: usize,
}

impl AdsClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: config.api_base.clone(),
            hash: config.hash.clone(),
            owner_id: config.owner_id.clone(),
            session_cookie: config.session_cookie.clone(),
            layout: config.series_layout.clone(),
            max_list_pages: config.limits.max_list_pages,
        }
    }

    fn decorate(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let req = req
            .header("accept", "application/json, text/javascript, */*; q=0.01")
            .header("x-requested-with", "XMLHttpRequest");
        match &self.session_cookie {
            Some(cookie) => req.header("cookie", cookie.clone()),
            None => req,
        }
    }

    /// Fetches one ad's stats page and runs the extraction pipeline over the
    /// embedded blob. An unparsable blob is not an error here; it shows up
    /// as an empty `daily_stats`.
    pub async fn fetch_ad_stats(&self, ad: &AdRef) -> Result<AdStatsResult, AppError> {
        let url = format!("{}/account/ad/{}/stats?period=day", self.base, ad.id);
        let resp = self.decorate(self.http.get(&url)).send().await?;
        if !resp.status().is_success() {
            return Err(AppError::upstream(format!(
                "stats fetch for ad {} failed: {}",
                ad.id,
                resp.status()
            )));
        }

        let envelope: Value = resp.json().await?;
        let blob = envelope.get("j").and_then(Value::as_str).unwrap_or("");
        let title = envelope
            .get("t")
            .and_then(Value::as_str)
            .map(|t| t.replace(TITLE_SUFFIX, ""))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| format!("Ad {}", ad.id));

        let daily_stats = extract_chart_data(blob, &self.layout)
            .map(|chart| build_daily_stats(&chart))
            .unwrap_or_default();
        debug!("ad {}: {} daily records", ad.id, daily_stats.len());

        Ok(AdStatsResult {
            ad_id: ad.id,
            title,
            daily_stats,
        })
    }

    /// Walks the paginated ads list, de-duplicating by id. Stops when the
    /// API repeats an offset, returns nothing new, or the page cap is hit.
    /// A missing owner id or an API-level error is fatal for the whole
    /// operation.
    pub async fn fetch_ads_list(&self) -> Result<Vec<Value>, AppError> {
        let owner_id = self.owner_id.as_deref().ok_or_else(|| {
            AppError::bad_request("no owner id configured; set ADS_OWNER_ID and retry")
        })?;
        let url = format!("{}/api?hash={}", self.base, self.hash);

        let mut all_ads = Vec::new();
        let mut seen = HashSet::new();
        let mut offset_id = String::new();

        for _ in 0..self.max_list_pages {
            let mut form = vec![
                ("owner_id", owner_id.to_string()),
                ("method", "getAdsList".to_string()),
            ];
            if !offset_id.is_empty() {
                form.push(("offset_id", offset_id.clone()));
            }

            let resp = self.decorate(self.http.post(&url).form(&form)).send().await?;
            if !resp.status().is_success() {
                return Err(AppError::upstream(format!(
                    "ads list fetch failed: {}",
                    resp.status()
                )));
            }

            let result: Value = resp.json().await?;
            if result.get("ok").and_then(Value::as_bool) == Some(false)
                || result.get("error").is_some()
            {
                let message = result
                    .get("error")
                    .and_then(Value::as_str)
                    .unwrap_or("api error")
                    .to_string();
                return Err(AppError::upstream(message));
            }

            let mut new_count = 0;
            for ad in ad_array(&result) {
                if let Some(ad_ref) = AdRef::from_value(ad) {
                    if seen.insert(ad_ref.id) {
                        all_ads.push(ad.clone());
                        new_count += 1;
                    }
                }
            }

            let next = ["next_offset_id", "offset_id", "next_offset"]
                .into_iter()
                .find_map(|key| result.get(key).and_then(Value::as_str))
                .unwrap_or("")
                .to_string();
            if !next.is_empty() && next != offset_id && new_count > 0 {
                offset_id = next;
            } else {
                break;
            }
        }

        info!("fetched {} ads from list", all_ads.len());
        Ok(all_ads)
    }
}

impl StatsSource for AdsClient {
    async fn ad_stats(&self, ad: &AdRef) -> Result<AdStatsResult, AppError> {
        self.fetch_ad_stats(ad).await
    }
}

/// The ad array moves around between console revisions; probe the known
/// homes in priority order and take the first array found.
fn ad_array(result: &Value) -> &[Value] {
    const PATHS: [&[&str]; 4] = [&["items"], &["ads"], &["data", "items"], &["data", "ads"]];
    for path in PATHS {
        let mut cursor = Some(result);
        for key in path {
            cursor = cursor.and_then(|v| v.get(key));
        }
        if let Some(array) = cursor.and_then(Value::as_array) {
            return array;
        }
    }
    result.as_array().map(Vec::as_slice).unwrap_or(&[])
}
