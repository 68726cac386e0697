//! Best-effort extraction of chart series from the stats page's embedded
//! JavaScript. The console inlines chart configs as near-JSON (trailing
//! commas included) next to well-known wrapper element names; everything
//! here degrades to the empty shape instead of erroring, since the format
//! is undocumented and changes without notice.

use std::collections::BTreeMap;

use chrono::DateTime;
use serde_json::Value;

use crate::models::ChartData;

pub const COUNT_MARKER: &str = "chart_count_stats_wrap";
pub const BUDGET_MARKER: &str = "chart_budget_stats_wrap";

const MICRO_TON: f64 = 1_000_000.0;

/// Positional fallback ids for the count section, used when the blob carries
/// no usable legend. Two layouts have been observed in the wild; which one a
/// given console revision serves is not detectable up front, so the mapping
/// is configuration rather than code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesLayout {
    pub views: String,
    pub clicks: String,
    pub actions: String,
}

impl SeriesLayout {
    /// Layout served by current console revisions.
    pub fn standard() -> Self {
        Self {
            views: "y0".into(),
            clicks: "y1".into(),
            actions: "y2".into(),
        }
    }

    /// Older revisions put a second hidden series before clicks.
    pub fn legacy() -> Self {
        Self {
            views: "y0".into(),
            clicks: "y2".into(),
            actions: "y3".into(),
        }
    }
}

impl Default for SeriesLayout {
    fn default() -> Self {
        Self::standard()
    }
}

/// Extracts the count and budget sections from a raw blob and aligns them
/// into one `ChartData`. A missing count marker, malformed literal or parse
/// error yields `None` — never an error — so callers must handle the
/// no-data case explicitly.
pub fn extract_chart_data(blob: &str, layout: &SeriesLayout) -> Option<ChartData> {
    let mut chart = ChartData::default();

    let count = parse_section(blob, COUNT_MARKER)?;

    let views_id = resolve_series_id(&count.names, &["view"], &layout.views);
    let clicks_id = resolve_series_id(&count.names, &["click"], &layout.clicks);
    let actions_id =
        resolve_series_id(&count.names, &["action", "conversion", "sub"], &layout.actions);

    for (i, &ms) in count.x.iter().enumerate() {
        // A bogus timestamp means the whole section is suspect.
        let date = day_key(ms)?;
        chart.dates.push(date);
        chart.views.push(series_value(&count.series, &views_id, i) as u64);
        chart.clicks.push(series_value(&count.series, &clicks_id, i) as u64);
        chart.actions.push(series_value(&count.series, &actions_id, i) as u64);
    }

    chart.spent = match parse_section(blob, BUDGET_MARKER) {
        Some(budget) => {
            let mut spend_by_date: BTreeMap<String, f64> = BTreeMap::new();
            if let Some(values) = budget
                .series
                .iter()
                .find(|(id, _)| id.starts_with('y'))
                .map(|(_, values)| values)
            {
                for (i, &ms) in budget.x.iter().enumerate() {
                    if let Some(date) = day_key(ms) {
                        let micro = values.get(i).copied().unwrap_or(0.0);
                        spend_by_date.insert(date, micro / MICRO_TON);
                    }
                }
            }
            chart
                .dates
                .iter()
                .map(|date| spend_by_date.get(date).copied().unwrap_or(0.0))
                .collect()
        }
        None => vec![0.0; chart.dates.len()],
    };

    Some(chart)
}

struct Section {
    x: Vec<i64>,
    series: BTreeMap<String, Vec<f64>>,
    names: BTreeMap<String, String>,
}

/// Finds the first `"columns"` array after `marker` and splits it into the
/// time axis and an id-to-values map. The optional `"names"` legend in the
/// same region is kept for label-based series resolution.
fn parse_section(blob: &str, marker: &str) -> Option<Section> {
    let start = blob.find(marker)?;
    let scope = &blob[start..];

    let columns_at = scope.find("\"columns\"")?;
    let after = &scope[columns_at + "\"columns\"".len()..];
    let literal = balanced_literal(after, '[', ']')?;
    let columns: Value = serde_json::from_str(&repair_trailing_commas(literal)).ok()?;
    let columns = columns.as_array()?;

    let mut x = Vec::new();
    let mut series = BTreeMap::new();
    for column in columns {
        let Some(column) = column.as_array() else {
            continue;
        };
        if column.len() < 2 {
            continue;
        }
        let Some(id) = column[0].as_str() else {
            continue;
        };
        if id == "x" {
            x = column[1..]
                .iter()
                .map(|v| v.as_f64().unwrap_or(0.0) as i64)
                .collect();
        } else {
            let values = column[1..]
                .iter()
                .map(|v| v.as_f64().unwrap_or(0.0))
                .collect();
            series.insert(id.to_string(), values);
        }
    }

    if x.is_empty() {
        return None;
    }

    Some(Section {
        x,
        series,
        names: parse_names(scope),
    })
}

fn parse_names(scope: &str) -> BTreeMap<String, String> {
    let mut names = BTreeMap::new();
    let Some(at) = scope.find("\"names\"") else {
        return names;
    };
    let after = &scope[at + "\"names\"".len()..];
    let Some(literal) = balanced_literal(after, '{', '}') else {
        return names;
    };
    if let Ok(Value::Object(map)) = serde_json::from_str(&repair_trailing_commas(literal)) {
        for (id, label) in map {
            if let Some(label) = label.as_str() {
                names.insert(id, label.to_string());
            }
        }
    }
    names
}

/// Matches legend labels case-insensitively against the given substrings;
/// falls back to the configured positional id when no label matches.
fn resolve_series_id(
    names: &BTreeMap<String, String>,
    needles: &[&str],
    fallback: &str,
) -> String {
    for (id, label) in names {
        let label = label.to_lowercase();
        if needles.iter().any(|needle| label.contains(needle)) {
            return id.clone();
        }
    }
    fallback.to_string()
}

fn series_value(series: &BTreeMap<String, Vec<f64>>, id: &str, index: usize) -> f64 {
    series
        .get(id)
        .and_then(|values| values.get(index))
        .copied()
        .unwrap_or(0.0)
}

fn day_key(epoch_ms: i64) -> Option<String> {
    // UTC truncation keeps keys stable across viewer timezones.
    DateTime::from_timestamp_millis(epoch_ms).map(|dt| dt.date_naive().to_string())
}

/// Returns the slice spanning a balanced bracketed literal, starting at the
/// first `open` found. Quote- and escape-aware so brackets inside string
/// values do not throw off the depth count.
fn balanced_literal(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        if ch == '"' {
            in_string = true;
        } else if ch == open {
            depth += 1;
        } else if ch == close {
            depth -= 1;
            if depth == 0 {
                return Some(&text[start..start + i + ch.len_utf8()]);
            }
        }
    }
    None
}

/// Drops commas that directly precede a closing bracket or brace, the one
/// malformation the console is known to emit.
fn repair_trailing_commas(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut chars = raw.char_indices();
    while let Some((i, ch)) = chars.next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            out.push(ch);
            continue;
        }
        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
            }
            ',' => {
                let rest = raw[i + 1..].trim_start();
                if !rest.starts_with(']') && !rest.starts_with('}') {
                    out.push(ch);
                }
            }
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-01-01 and 2024-01-02, UTC midnight.
    const DAY1_MS: i64 = 1_704_067_200_000;
    const DAY2_MS: i64 = 1_704_153_600_000;

    fn sample_blob() -> String {
        format!(
            concat!(
                "initChart(\"chart_count_stats_wrap\", {{\"columns\": ",
                "[[\"x\", {d1}, {d2}], [\"y0\", 100, 0], [\"y1\", 10, 0], [\"y2\", 1, 0],]}});\n",
                "initChart(\"chart_budget_stats_wrap\", {{\"columns\": ",
                "[[\"x\", {d1}], [\"y0\", 5000000]]}});"
            ),
            d1 = DAY1_MS,
            d2 = DAY2_MS,
        )
    }

    #[test]
    fn extracts_count_and_budget_sections() {
        let chart = extract_chart_data(&sample_blob(), &SeriesLayout::default()).unwrap();
        assert_eq!(chart.dates, vec!["2024-01-01", "2024-01-02"]);
        assert_eq!(chart.views, vec![100, 0]);
        assert_eq!(chart.clicks, vec![10, 0]);
        assert_eq!(chart.actions, vec![1, 0]);
        assert_eq!(chart.spent, vec![5.0, 0.0]);
    }

    #[test]
    fn missing_marker_yields_none() {
        assert!(extract_chart_data("nothing to see here", &SeriesLayout::default()).is_none());
    }

    #[test]
    fn malformed_columns_yield_none() {
        let blob = "chart_count_stats_wrap \"columns\": [[\"x\", 17";
        assert!(extract_chart_data(blob, &SeriesLayout::default()).is_none());
    }

    #[test]
    fn missing_budget_section_gives_zero_spend() {
        let blob = format!(
            "chart_count_stats_wrap {{\"columns\": [[\"x\", {DAY1_MS}], [\"y0\", 7]]}}"
        );
        let chart = extract_chart_data(&blob, &SeriesLayout::default()).unwrap();
        assert_eq!(chart.dates.len(), 1);
        assert_eq!(chart.spent, vec![0.0]);
    }

    #[test]
    fn legend_overrides_positional_ids() {
        let blob = format!(
            concat!(
                "chart_count_stats_wrap {{\"names\": ",
                "{{\"y0\": \"Views\", \"y5\": \"Link clicks\", \"y6\": \"Subscribers\"}}, ",
                "\"columns\": [[\"x\", {d1}], [\"y0\", 100], [\"y5\", 8], [\"y6\", 3]]}}"
            ),
            d1 = DAY1_MS,
        );
        let chart = extract_chart_data(&blob, &SeriesLayout::default()).unwrap();
        assert_eq!(chart.views, vec![100]);
        assert_eq!(chart.clicks, vec![8]);
        assert_eq!(chart.actions, vec![3]);
    }

    #[test]
    fn legacy_layout_reads_alternate_ids() {
        let blob = format!(
            concat!(
                "chart_count_stats_wrap {{\"columns\": ",
                "[[\"x\", {d1}], [\"y0\", 100], [\"y2\", 9], [\"y3\", 2]]}}"
            ),
            d1 = DAY1_MS,
        );
        let chart = extract_chart_data(&blob, &SeriesLayout::legacy()).unwrap();
        assert_eq!(chart.views, vec![100]);
        assert_eq!(chart.clicks, vec![9]);
        assert_eq!(chart.actions, vec![2]);
    }

    #[test]
    fn missing_series_default_to_zero() {
        let blob = format!(
            "chart_count_stats_wrap {{\"columns\": [[\"x\", {DAY1_MS}], [\"y0\", 50]]}}"
        );
        let chart = extract_chart_data(&blob, &SeriesLayout::default()).unwrap();
        assert_eq!(chart.views, vec![50]);
        assert_eq!(chart.clicks, vec![0]);
        assert_eq!(chart.actions, vec![0]);
    }

    #[test]
    fn repair_strips_trailing_commas_outside_strings() {
        assert_eq!(repair_trailing_commas("[1, 2, ]"), "[1, 2 ]");
        assert_eq!(repair_trailing_commas("{\"a\": 1,}"), "{\"a\": 1}");
        assert_eq!(repair_trailing_commas("[\"a,]\", 2]"), "[\"a,]\", 2]");
    }

    #[test]
    fn balanced_literal_respects_nested_strings() {
        let text = "x [[\"a]\", 1], [\"b\", 2]] tail";
        assert_eq!(balanced_literal(text, '[', ']'), Some("[[\"a]\", 1], [\"b\", 2]]"));
    }
}
