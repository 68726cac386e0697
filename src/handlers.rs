use axum::{
    extract::{Path, Query, State},
    http::header,
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::aggregate::{collect_stats, filter_by_date};
use crate::errors::AppError;
use crate::export::{by_ads_csv, by_date_csv};
use crate::inserter::parse_id_list;
use crate::models::{
    AdRef, AdStatsResult, AggregatedStats, DashboardMetrics, IdListRequest, IdListResponse,
    StatTotals,
};
use crate::state::AppState;
use crate::stats::{dashboard_metrics, totals};
use crate::ui;

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub view: Option<String>,
    pub page: Option<usize>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl StatsQuery {
    fn view(&self) -> &str {
        match self.view.as_deref() {
            Some("ads") => "ads",
            _ => "date",
        }
    }

    fn start(&self) -> Option<&str> {
        self.start.as_deref().filter(|s| !s.is_empty())
    }

    fn end(&self) -> Option<&str> {
        self.end.as_deref().filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Serialize)]
pub struct AdsResponse {
    pub ads: Vec<Value>,
    pub metrics: DashboardMetrics,
}

#[derive(Debug, Serialize)]
pub struct AdStatsResponse {
    #[serde(flatten)]
    pub stats: AdStatsResult,
    pub totals: StatTotals,
}

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let ads = state.client.fetch_ads_list().await?;
    let metrics = dashboard_metrics(&ads);
    Ok(Html(ui::render_dashboard(&metrics)))
}

pub async fn get_ads(State(state): State<AppState>) -> Result<Json<AdsResponse>, AppError> {
    let ads = state.client.fetch_ads_list().await?;
    let metrics = dashboard_metrics(&ads);
    Ok(Json(AdsResponse { ads, metrics }))
}

pub async fn get_ad_stats(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<AdStatsResponse>, AppError> {
    let ad = AdRef {
        id,
        title: format!("Ad {id}"),
    };
    let stats = state.client.fetch_ad_stats(&ad).await?;
    let totals = totals(&stats.daily_stats);
    Ok(Json(AdStatsResponse { stats, totals }))
}

pub async fn get_all_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<AggregatedStats>, AppError> {
    let stats = aggregate(&state, &query).await?;
    Ok(Json(stats))
}

pub async fn stats_page(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<Html<String>, AppError> {
    let stats = aggregate(&state, &query).await?;
    let page = query.page.unwrap_or(1).max(1);
    Ok(Html(ui::render_stats_page(
        query.view(),
        &stats,
        page,
        state.config.limits.items_per_page,
        query.start().unwrap_or(""),
        query.end().unwrap_or(""),
    )))
}

pub async fn export_csv(
    State(state): State<AppState>,
    Path(view): Path<String>,
    Query(query): Query<StatsQuery>,
) -> Result<([(header::HeaderName, String); 2], String), AppError> {
    let stats = aggregate(&state, &query).await?;
    let csv = match view.as_str() {
        "date" => by_date_csv(&stats.by_date),
        "ads" => by_ads_csv(&stats.by_ads),
        other => return Err(AppError::not_found(format!("unknown export view '{other}'"))),
    };

    let today = chrono::Utc::now().date_naive();
    let filename = format!("telegram-ads-by-{view}-{today}.csv");
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    ))
}

pub async fn post_id_list(
    State(state): State<AppState>,
    Json(payload): Json<IdListRequest>,
) -> Result<Json<IdListResponse>, AppError> {
    let ids = parse_id_list(&payload.text, state.config.limits.max_insert_ids)?;
    let count = ids.len();
    Ok(Json(IdListResponse { ids, count }))
}

/// Shared fetch-everything path: ad list, per-ad stats, date filter.
async fn aggregate(state: &AppState, query: &StatsQuery) -> Result<AggregatedStats, AppError> {
    let ads = state.client.fetch_ads_list().await?;
    let refs: Vec<AdRef> = ads.iter().filter_map(AdRef::from_value).collect();

    let stats = collect_stats(state.client.as_ref(), &refs, |done, total| {
        debug!("fetched ad stats {done}/{total}");
    })
    .await;

    Ok(filter_by_date(&stats, query.start(), query.end()))
}
