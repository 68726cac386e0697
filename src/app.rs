use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/stats", get(handlers::stats_page))
        .route("/api/ads", get(handlers::get_ads))
        .route("/api/ad/:id/stats", get(handlers::get_ad_stats))
        .route("/api/stats", get(handlers::get_all_stats))
        .route("/api/id-list", post(handlers::post_id_list))
        .route("/export/:view", get(handlers::export_csv))
        .with_state(state)
}
