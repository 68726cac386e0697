//! Cross-ad aggregation: merges many per-ad daily stat sets into a by-date
//! view and a by-ad view, with ratios re-derived from the summed counters.

use std::collections::BTreeMap;

use tracing::warn;

use crate::errors::AppError;
use crate::models::{
    AdAggregate, AdContribution, AdRef, AdStatsResult, AggregatedStats, DailyStat, DateAggregate,
};
use crate::stats::derive_ratios;

/// Where per-ad stats come from. The live client implements this; tests
/// plug in canned data.
pub trait StatsSource {
    async fn ad_stats(&self, ad: &AdRef) -> Result<AdStatsResult, AppError>;
}

/// Fetches every ad's stats sequentially and folds them into the two
/// aggregate views. One ad failing drops only that ad's contribution.
/// `on_progress(completed, total)` fires once per ad either way.
pub async fn collect_stats<S: StatsSource>(
    source: &S,
    ads: &[AdRef],
    mut on_progress: impl FnMut(usize, usize),
) -> AggregatedStats {
    let mut acc = Accumulator::default();
    let total = ads.len();
    for (i, ad) in ads.iter().enumerate() {
        match source.ad_stats(ad).await {
            Ok(stats) => acc.add(ad.id, &ad.title, &stats.daily_stats),
            Err(err) => warn!("skipping ad {}: {}", ad.id, err.message),
        }
        on_progress(i + 1, total);
    }
    acc.finish()
}

#[derive(Default)]
struct DayAcc {
    views: u64,
    clicks: u64,
    actions: u64,
    spent: f64,
    ads: Vec<AdContribution>,
}

#[derive(Default)]
struct AdAcc {
    title: String,
    views: u64,
    clicks: u64,
    actions: u64,
    spent: f64,
    days: Vec<DailyStat>,
}

/// Order-insensitive running-sum merge keyed by date and by ad id.
#[derive(Default)]
pub struct Accumulator {
    by_date: BTreeMap<String, DayAcc>,
    by_ads: BTreeMap<u64, AdAcc>,
}

impl Accumulator {
    pub fn add(&mut self, ad_id: u64, title: &str, days: &[DailyStat]) {
        let ad_acc = self.by_ads.entry(ad_id).or_default();
        if ad_acc.title.is_empty() {
            ad_acc.title = title.to_string();
        }

        for day in days {
            let date_acc = self.by_date.entry(day.date.clone()).or_default();
            date_acc.views += day.views;
            date_acc.clicks += day.clicks;
            date_acc.actions += day.actions;
            date_acc.spent += day.spent;

            ad_acc.views += day.views;
            ad_acc.clicks += day.clicks;
            ad_acc.actions += day.actions;
            ad_acc.spent += day.spent;

            // Zero-activity rows stay out of the nested breakdowns.
            if day.views > 0 || day.clicks > 0 || day.actions > 0 || day.spent > 0.0 {
                date_acc.ads.push(AdContribution {
                    ad_id,
                    title: title.to_string(),
                    views: day.views,
                    clicks: day.clicks,
                    actions: day.actions,
                    spent: day.spent,
                    cpa: day.cpa,
                    cpc: day.cpc,
                    ctr: day.ctr,
                    cvr: day.cvr,
                });
                ad_acc.days.push(day.clone());
            }
        }
    }

    pub fn finish(self) -> AggregatedStats {
        let by_date = self
            .by_date
            .into_iter()
            .rev()
            .map(|(date, acc)| {
                let ratios = derive_ratios(acc.views, acc.clicks, acc.actions, acc.spent);
                DateAggregate {
                    date,
                    views: acc.views,
                    clicks: acc.clicks,
                    actions: acc.actions,
                    spent: acc.spent,
                    cpa: ratios.cpa,
                    cpc: ratios.cpc,
                    ctr: ratios.ctr,
                    cvr: ratios.cvr,
                    cpm: ratios.cpm,
                    ads: acc.ads,
                }
            })
            .collect();

        let mut by_ads: Vec<AdAggregate> = self
            .by_ads
            .into_iter()
            .filter(|(_, acc)| {
                acc.views > 0 || acc.clicks > 0 || acc.actions > 0 || acc.spent > 0.0
            })
            .map(|(ad_id, mut acc)| {
                acc.days.sort_by(|a, b| b.date.cmp(&a.date));
                let ratios = derive_ratios(acc.views, acc.clicks, acc.actions, acc.spent);
                AdAggregate {
                    ad_id,
                    title: acc.title,
                    views: acc.views,
                    clicks: acc.clicks,
                    actions: acc.actions,
                    spent: acc.spent,
                    cpa: ratios.cpa,
                    cpc: ratios.cpc,
                    ctr: ratios.ctr,
                    cvr: ratios.cvr,
                    days: acc.days,
                }
            })
            .collect();
        by_ads.sort_by(|a, b| b.spent.total_cmp(&a.spent));

        AggregatedStats { by_date, by_ads }
    }
}

/// Inclusive date-range filter over both views. Matches the console table's
/// From/To behavior: by-date rows outside the range are dropped, each ad's
/// nested days are filtered, and ads left with no days disappear while the
/// remaining ads keep their whole-period totals.
pub fn filter_by_date(
    stats: &AggregatedStats,
    start: Option<&str>,
    end: Option<&str>,
) -> AggregatedStats {
    let in_range = |date: &str| {
        start.is_none_or(|s| date >= s) && end.is_none_or(|e| date <= e)
    };

    let by_date = stats
        .by_date
        .iter()
        .filter(|row| in_range(&row.date))
        .cloned()
        .collect();

    let by_ads = stats
        .by_ads
        .iter()
        .filter_map(|ad| {
            let days: Vec<_> = ad
                .days
                .iter()
                .filter(|day| in_range(&day.date))
                .cloned()
                .collect();
            if days.is_empty() {
                return None;
            }
            let mut ad = ad.clone();
            ad.days = days;
            Some(ad)
        })
        .collect();

    AggregatedStats { by_date, by_ads }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChartData;
    use crate::stats::build_daily_stats;

    fn days(rows: &[(&str, u64, u64, u64, f64)]) -> Vec<DailyStat> {
        let chart = ChartData {
            dates: rows.iter().map(|r| r.0.to_string()).collect(),
            views: rows.iter().map(|r| r.1).collect(),
            clicks: rows.iter().map(|r| r.2).collect(),
            actions: rows.iter().map(|r| r.3).collect(),
            spent: rows.iter().map(|r| r.4).collect(),
        };
        build_daily_stats(&chart)
    }

    #[test]
    fn single_ad_round_trips_exactly() {
        let source = days(&[
            ("2024-02-01", 50, 5, 1, 2.0),
            ("2024-02-02", 30, 3, 0, 1.0),
        ]);
        let mut acc = Accumulator::default();
        acc.add(1, "Only Ad", &source);
        let stats = acc.finish();

        assert_eq!(stats.by_date.len(), 2);
        assert_eq!(stats.by_date[0].date, "2024-02-02");
        assert_eq!(stats.by_date[1].date, "2024-02-01");
        for (row, day) in stats.by_date.iter().zip(&source) {
            assert_eq!(row.date, day.date);
            assert_eq!(row.views, day.views);
            assert_eq!(row.clicks, day.clicks);
            assert_eq!(row.actions, day.actions);
            assert_eq!(row.spent, day.spent);
            assert_eq!(row.cpa, day.cpa);
            assert_eq!(row.cpm, day.cpm);
        }

        assert_eq!(stats.by_ads.len(), 1);
        let ad = &stats.by_ads[0];
        assert_eq!(ad.ad_id, 1);
        assert_eq!(ad.title, "Only Ad");
        assert_eq!(ad.views, 80);
        assert_eq!(ad.clicks, 8);
        assert_eq!(ad.actions, 1);
        assert_eq!(ad.spent, 3.0);
        assert_eq!(ad.days.len(), 2);
    }

    #[test]
    fn date_row_lists_only_ads_with_activity() {
        let mut acc = Accumulator::default();
        acc.add(1, "Ad1", &days(&[("2024-02-01", 50, 0, 0, 0.0)]));
        acc.add(2, "Ad2", &days(&[("2024-02-01", 0, 0, 0, 0.0)]));
        let stats = acc.finish();

        assert_eq!(stats.by_date.len(), 1);
        let row = &stats.by_date[0];
        assert_eq!(row.views, 50);
        assert_eq!(row.ads.len(), 1);
        assert_eq!(row.ads[0].ad_id, 1);

        // Ad2 had no activity at all, so it drops out of the by-ad view too.
        assert_eq!(stats.by_ads.len(), 1);
        assert_eq!(stats.by_ads[0].ad_id, 1);
    }

    #[test]
    fn by_ads_sorted_by_spend_descending() {
        let mut acc = Accumulator::default();
        acc.add(1, "Cheap", &days(&[("2024-02-01", 10, 1, 0, 1.0)]));
        acc.add(2, "Expensive", &days(&[("2024-02-01", 10, 1, 0, 9.0)]));
        let stats = acc.finish();
        assert_eq!(stats.by_ads[0].ad_id, 2);
        assert_eq!(stats.by_ads[1].ad_id, 1);
    }

    #[test]
    fn accumulation_is_commutative() {
        let a = days(&[("2024-02-01", 10, 2, 1, 1.0)]);
        let b = days(&[("2024-02-01", 20, 4, 2, 2.0), ("2024-02-02", 5, 1, 0, 0.5)]);

        let mut forward = Accumulator::default();
        forward.add(1, "A", &a);
        forward.add(2, "B", &b);
        let mut reverse = Accumulator::default();
        reverse.add(2, "B", &b);
        reverse.add(1, "A", &a);

        let forward = forward.finish();
        let reverse = reverse.finish();
        for (x, y) in forward.by_date.iter().zip(&reverse.by_date) {
            assert_eq!(x.date, y.date);
            assert_eq!(x.views, y.views);
            assert_eq!(x.spent, y.spent);
        }
    }

    #[test]
    fn filter_by_date_is_inclusive_and_drops_empty_ads() {
        let mut acc = Accumulator::default();
        acc.add(1, "A", &days(&[("2024-02-01", 10, 1, 0, 1.0)]));
        acc.add(2, "B", &days(&[("2024-02-03", 20, 2, 0, 2.0)]));
        let stats = acc.finish();

        let filtered = filter_by_date(&stats, Some("2024-02-02"), Some("2024-02-03"));
        assert_eq!(filtered.by_date.len(), 1);
        assert_eq!(filtered.by_date[0].date, "2024-02-03");
        assert_eq!(filtered.by_ads.len(), 1);
        assert_eq!(filtered.by_ads[0].ad_id, 2);

        let open_ended = filter_by_date(&stats, None, None);
        assert_eq!(open_ended.by_date.len(), 2);
        assert_eq!(open_ended.by_ads.len(), 2);
    }

    struct CannedSource {
        good: Vec<AdStatsResult>,
    }

    impl StatsSource for CannedSource {
        async fn ad_stats(&self, ad: &AdRef) -> Result<AdStatsResult, AppError> {
            self.good
                .iter()
                .find(|stats| stats.ad_id == ad.id)
                .cloned()
                .ok_or_else(|| AppError::upstream("no stats"))
        }
    }

    #[tokio::test]
    async fn collect_isolates_failures_and_reports_progress() {
        let source = CannedSource {
            good: vec![AdStatsResult {
                ad_id: 1,
                title: "A".into(),
                daily_stats: days(&[("2024-02-01", 10, 1, 0, 1.0)]),
            }],
        };
        let ads = vec![
            AdRef { id: 1, title: "A".into() },
            AdRef { id: 2, title: "B".into() },
        ];

        let mut progress = Vec::new();
        let stats = collect_stats(&source, &ads, |done, total| progress.push((done, total))).await;

        assert_eq!(progress, vec![(1, 2), (2, 2)]);
        assert_eq!(stats.by_date.len(), 1);
        assert_eq!(stats.by_ads.len(), 1);
        assert_eq!(stats.by_ads[0].ad_id, 1);
    }
}
