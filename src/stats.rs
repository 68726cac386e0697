use serde_json::Value;

use crate::models::{
    AccountSummary, ChartData, DailyStat, DashboardMetrics, StatTotals, StatusCounts,
};

/// Derived metric set. Every division is guarded: a zero divisor yields 0
/// rather than NaN or infinity.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ratios {
    pub cpa: f64,
    pub cpc: f64,
    pub ctr: f64,
    pub cvr: f64,
    pub cpm: f64,
}

pub fn derive_ratios(views: u64, clicks: u64, actions: u64, spent: f64) -> Ratios {
    Ratios {
        cpa: if actions > 0 { spent / actions as f64 } else { 0.0 },
        cpc: if clicks > 0 { spent / clicks as f64 } else { 0.0 },
        ctr: if views > 0 { clicks as f64 / views as f64 * 100.0 } else { 0.0 },
        cvr: if clicks > 0 { actions as f64 / clicks as f64 * 100.0 } else { 0.0 },
        cpm: if views > 0 { spent / views as f64 * 1000.0 } else { 0.0 },
    }
}

/// Zips aligned chart series into one record per date, sorted descending by
/// date. Fixed-width `YYYY-MM-DD` keys make string order date order. Indices
/// missing from any series count as 0.
pub fn build_daily_stats(chart: &ChartData) -> Vec<DailyStat> {
    let mut days = Vec::with_capacity(chart.dates.len());
    for (i, date) in chart.dates.iter().enumerate() {
        let views = chart.views.get(i).copied().unwrap_or(0);
        let clicks = chart.clicks.get(i).copied().unwrap_or(0);
        let actions = chart.actions.get(i).copied().unwrap_or(0);
        let spent = chart.spent.get(i).copied().unwrap_or(0.0);
        let ratios = derive_ratios(views, clicks, actions, spent);
        days.push(DailyStat {
            date: date.clone(),
            views,
            clicks,
            actions,
            spent,
            cpa: ratios.cpa,
            cpc: ratios.cpc,
            ctr: ratios.ctr,
            cvr: ratios.cvr,
            cpm: ratios.cpm,
        });
    }
    days.sort_by(|a, b| b.date.cmp(&a.date));
    days
}

pub fn totals(days: &[DailyStat]) -> StatTotals {
    let mut sums = StatTotals::default();
    for day in days {
        sums.views = sums.views.saturating_add(day.views);
        sums.clicks = sums.clicks.saturating_add(day.clicks);
        sums.actions = sums.actions.saturating_add(day.actions);
        sums.spent += day.spent;
    }
    let ratios = derive_ratios(sums.views, sums.clicks, sums.actions, sums.spent);
    sums.cpa = ratios.cpa;
    sums.cpc = ratios.cpc;
    sums.ctr = ratios.ctr;
    sums.cvr = ratios.cvr;
    sums.cpm = ratios.cpm;
    sums
}

/// Account-page overview over raw list entries. Status text varies between
/// console revisions, so matching is by alias table first and substring
/// second; the summary is present only when the list carries any counters.
pub fn dashboard_metrics(ads: &[Value]) -> DashboardMetrics {
    let mut counts = StatusCounts {
        total: ads.len(),
        ..StatusCounts::default()
    };
    let mut summary = AccountSummary::default();

    for ad in ads {
        let raw_status = ["status_text", "status", "state_text", "state"]
            .into_iter()
            .find_map(|key| ad.get(key).and_then(Value::as_str))
            .unwrap_or("")
            .to_lowercase();
        match map_status(&raw_status) {
            Some(Status::Active) => counts.active += 1,
            Some(Status::InReview) => counts.in_review += 1,
            Some(Status::OnHold) => counts.on_hold += 1,
            Some(Status::Declined) => counts.declined += 1,
            Some(Status::Stopped) => counts.stopped += 1,
            None => {}
        }

        summary.total_spent += first_f64(ad, &["spent", "budget_spent"]);
        summary.total_views += first_u64(ad, &["views", "impressions"]);
        summary.total_clicks += first_u64(ad, &["clicks"]);
        summary.total_actions += first_u64(ad, &["actions", "conversions", "joins"]);
    }

    let has_data = summary.total_spent > 0.0
        || summary.total_views > 0
        || summary.total_clicks > 0
        || summary.total_actions > 0;

    DashboardMetrics {
        status_counts: counts,
        summary: has_data.then_some(summary),
    }
}

enum Status {
    Active,
    InReview,
    OnHold,
    Declined,
    Stopped,
}

fn map_status(raw: &str) -> Option<Status> {
    match raw {
        "active" | "running" | "live" => Some(Status::Active),
        "pending" => Some(Status::InReview),
        "paused" => Some(Status::OnHold),
        "declined" | "rejected" => Some(Status::Declined),
        "stopped" | "disabled" => Some(Status::Stopped),
        _ if raw.contains("review") => Some(Status::InReview),
        _ if raw.contains("hold") => Some(Status::OnHold),
        _ => None,
    }
}

fn first_f64(ad: &Value, keys: &[&str]) -> f64 {
    keys.iter()
        .find_map(|key| ad.get(key).and_then(Value::as_f64))
        .unwrap_or(0.0)
}

fn first_u64(ad: &Value, keys: &[&str]) -> u64 {
    keys.iter()
        .find_map(|key| ad.get(key).and_then(Value::as_u64))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn daily_stats_derive_ratios_per_day() {
        let chart = ChartData {
            dates: vec!["2024-01-01".into(), "2024-01-02".into()],
            views: vec![100, 0],
            clicks: vec![10, 0],
            actions: vec![1, 0],
            spent: vec![5.0, 0.0],
        };
        let days = build_daily_stats(&chart);
        assert_eq!(days.len(), 2);

        // Sorted descending, so the zero day comes first.
        assert_eq!(days[0].date, "2024-01-02");
        assert_eq!(days[0].cpa, 0.0);
        assert_eq!(days[0].cpc, 0.0);
        assert_eq!(days[0].ctr, 0.0);
        assert_eq!(days[0].cvr, 0.0);
        assert_eq!(days[0].cpm, 0.0);

        let day = &days[1];
        assert_eq!(day.date, "2024-01-01");
        assert_eq!(day.views, 100);
        assert_eq!(day.clicks, 10);
        assert_eq!(day.actions, 1);
        assert_eq!(day.spent, 5.0);
        assert_eq!(day.cpa, 5.0);
        assert_eq!(day.cpc, 0.5);
        assert_eq!(day.ctr, 10.0);
        assert_eq!(day.cvr, 10.0);
        assert_eq!(day.cpm, 50.0);
    }

    #[test]
    fn daily_stats_pad_short_series_with_zero() {
        let chart = ChartData {
            dates: vec!["2024-01-01".into(), "2024-01-02".into()],
            views: vec![5],
            clicks: vec![],
            actions: vec![],
            spent: vec![],
        };
        let days = build_daily_stats(&chart);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].views, 0);
        assert_eq!(days[1].views, 5);
    }

    #[test]
    fn totals_rederive_ratios_from_sums() {
        let chart = ChartData {
            dates: vec!["2024-01-01".into(), "2024-01-02".into()],
            views: vec![100, 100],
            clicks: vec![10, 30],
            actions: vec![1, 3],
            spent: vec![5.0, 3.0],
        };
        let sums = totals(&build_daily_stats(&chart));
        assert_eq!(sums.views, 200);
        assert_eq!(sums.clicks, 40);
        assert_eq!(sums.actions, 4);
        assert_eq!(sums.spent, 8.0);
        assert_eq!(sums.cpa, 2.0);
        assert_eq!(sums.cpc, 0.2);
        assert_eq!(sums.ctr, 20.0);
        assert_eq!(sums.cpm, 40.0);
    }

    #[test]
    fn dashboard_metrics_map_statuses_and_sum_counters() {
        let ads = vec![
            json!({ "status": "Active", "views": 100, "spent": 2.5 }),
            json!({ "status_text": "In Review", "impressions": 50 }),
            json!({ "state": "paused", "clicks": 3 }),
            json!({ "status": "unknowable" }),
        ];
        let metrics = dashboard_metrics(&ads);
        assert_eq!(metrics.status_counts.total, 4);
        assert_eq!(metrics.status_counts.active, 1);
        assert_eq!(metrics.status_counts.in_review, 1);
        assert_eq!(metrics.status_counts.on_hold, 1);
        let summary = metrics.summary.expect("summary");
        assert_eq!(summary.total_views, 150);
        assert_eq!(summary.total_clicks, 3);
        assert_eq!(summary.total_spent, 2.5);
    }

    #[test]
    fn dashboard_summary_absent_without_counters() {
        let ads = vec![json!({ "status": "active" })];
        assert!(dashboard_metrics(&ads).summary.is_none());
    }
}
