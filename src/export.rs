//! CSV serialization of the two aggregate views. Counters render as
//! integers, spend and ratios with two decimals, matching the console
//! widget's export format.

use std::fmt::Write;

use crate::models::{AdAggregate, DateAggregate};

pub const BY_DATE_HEADER: &str = "Date,Views,Clicks,Actions,Spent,CPA,CPC,CTR,CVR,CPM";
pub const BY_ADS_HEADER: &str = "Ad Title,Views,Clicks,Actions,Spent,CPA,CPC,CTR,CVR";

pub fn by_date_csv(rows: &[DateAggregate]) -> String {
    let mut csv = String::from(BY_DATE_HEADER);
    for row in rows {
        let _ = write!(
            csv,
            "\n{},{},{},{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
            row.date,
            row.views,
            row.clicks,
            row.actions,
            row.spent,
            row.cpa,
            row.cpc,
            row.ctr,
            row.cvr,
            row.cpm,
        );
    }
    csv
}

pub fn by_ads_csv(rows: &[AdAggregate]) -> String {
    let mut csv = String::from(BY_ADS_HEADER);
    for row in rows {
        let _ = write!(
            csv,
            "\n{},{},{},{},{:.2},{:.2},{:.2},{:.2},{:.2}",
            quote(&row.title),
            row.views,
            row.clicks,
            row.actions,
            row.spent,
            row.cpa,
            row.cpc,
            row.ctr,
            row.cvr,
        );
    }
    csv
}

/// Standard CSV quoting: wrap in double quotes, double embedded quotes.
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
