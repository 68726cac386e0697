use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Aligned time series pulled out of a stats page blob. All counter vectors
/// have the same length as `dates`; `spent` is re-derived by date lookup so
/// it stays safe when the budget section is missing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChartData {
    pub dates: Vec<String>,
    pub views: Vec<u64>,
    pub clicks: Vec<u64>,
    pub actions: Vec<u64>,
    pub spent: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyStat {
    pub date: String,
    pub views: u64,
    pub clicks: u64,
    pub actions: u64,
    pub spent: f64,
    pub cpa: f64,
    pub cpc: f64,
    pub ctr: f64,
    pub cvr: f64,
    pub cpm: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdStatsResult {
    pub ad_id: u64,
    pub title: String,
    pub daily_stats: Vec<DailyStat>,
}

/// Whole-period totals over a set of daily stats, ratios re-derived from the
/// summed counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatTotals {
    pub views: u64,
    pub clicks: u64,
    pub actions: u64,
    pub spent: f64,
    pub cpa: f64,
    pub cpc: f64,
    pub ctr: f64,
    pub cvr: f64,
    pub cpm: f64,
}

/// Identity of one ad as taken from the ads list payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdRef {
    pub id: u64,
    pub title: String,
}

impl AdRef {
    /// Pulls an id and title out of a loose list entry. The console returns
    /// `ad_id` or `id`, as a number or a numeric string; entries without a
    /// usable id are skipped by the caller.
    pub fn from_value(ad: &Value) -> Option<AdRef> {
        let id = ["ad_id", "id"]
            .into_iter()
            .find_map(|key| ad.get(key).and_then(value_as_id))?;
        let title = ["title", "name"]
            .into_iter()
            .find_map(|key| ad.get(key).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| format!("Ad {id}"));
        Some(AdRef { id, title })
    }
}

fn value_as_id(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

/// One ad's share of a single date, kept only when at least one counter is
/// nonzero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdContribution {
    pub ad_id: u64,
    pub title: String,
    pub views: u64,
    pub clicks: u64,
    pub actions: u64,
    pub spent: f64,
    pub cpa: f64,
    pub cpc: f64,
    pub ctr: f64,
    pub cvr: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateAggregate {
    pub date: String,
    pub views: u64,
    pub clicks: u64,
    pub actions: u64,
    pub spent: f64,
    pub cpa: f64,
    pub cpc: f64,
    pub ctr: f64,
    pub cvr: f64,
    pub cpm: f64,
    pub ads: Vec<AdContribution>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdAggregate {
    pub ad_id: u64,
    pub title: String,
    pub views: u64,
    pub clicks: u64,
    pub actions: u64,
    pub spent: f64,
    pub cpa: f64,
    pub cpc: f64,
    pub ctr: f64,
    pub cvr: f64,
    pub days: Vec<DailyStat>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregatedStats {
    pub by_date: Vec<DateAggregate>,
    pub by_ads: Vec<AdAggregate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusCounts {
    pub total: usize,
    pub active: usize,
    pub in_review: usize,
    pub on_hold: usize,
    pub declined: usize,
    pub stopped: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountSummary {
    pub total_spent: f64,
    pub total_views: u64,
    pub total_clicks: u64,
    pub total_actions: u64,
}

/// Account-page overview: per-status ad counts plus, when the list payload
/// carries any counters at all, a summed account summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub status_counts: StatusCounts,
    pub summary: Option<AccountSummary>,
}

#[derive(Debug, Deserialize)]
pub struct IdListRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct IdListResponse {
    pub ids: Vec<String>,
    pub count: usize,
}
