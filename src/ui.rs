use std::fmt::Write;

use crate::models::{AggregatedStats, DashboardMetrics};
use crate::paging::{page, page_count, page_numbers, PageLabel};

pub fn render_dashboard(metrics: &DashboardMetrics) -> String {
    let counts = &metrics.status_counts;
    let (spent, views, clicks, actions) = match &metrics.summary {
        Some(summary) => (
            format!("{:.2} TON", summary.total_spent),
            summary.total_views.to_string(),
            summary.total_clicks.to_string(),
            summary.total_actions.to_string(),
        ),
        None => ("—".into(), "—".into(), "—".into(), "—".into()),
    };

    DASHBOARD_HTML
        .replace("{{SPENT}}", &spent)
        .replace("{{VIEWS}}", &views)
        .replace("{{CLICKS}}", &clicks)
        .replace("{{ACTIONS}}", &actions)
        .replace("{{TOTAL}}", &counts.total.to_string())
        .replace("{{ACTIVE}}", &counts.active.to_string())
        .replace("{{IN_REVIEW}}", &counts.in_review.to_string())
        .replace("{{ON_HOLD}}", &counts.on_hold.to_string())
        .replace("{{DECLINED}}", &counts.declined.to_string())
        .replace("{{STOPPED}}", &counts.stopped.to_string())
}

pub fn render_stats_page(
    view: &str,
    stats: &AggregatedStats,
    current_page: usize,
    per_page: usize,
    start: &str,
    end: &str,
) -> String {
    let (first_column, title, row_count) = if view == "ads" {
        ("Ad", format!("By Ads ({} ads)", stats.by_ads.len()), stats.by_ads.len())
    } else {
        ("Date", format!("By Date ({} days)", stats.by_date.len()), stats.by_date.len())
    };

    let mut rows = String::new();
    if view == "ads" {
        for ad in page(&stats.by_ads, current_page, per_page) {
            let _ = write!(
                rows,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.2} TON</td>\
                 <td>{:.2} TON</td><td>{:.2} TON</td><td>{:.2}%</td><td>{:.2}%</td></tr>",
                escape_html(&ad.title),
                ad.views,
                ad.clicks,
                ad.actions,
                ad.spent,
                ad.cpa,
                ad.cpc,
                ad.ctr,
                ad.cvr,
            );
        }
    } else {
        for row in page(&stats.by_date, current_page, per_page) {
            let _ = write!(
                rows,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.2} TON</td>\
                 <td>{:.2} TON</td><td>{:.2} TON</td><td>{:.2}%</td><td>{:.2}%</td></tr>",
                row.date, row.views, row.clicks, row.actions, row.spent, row.cpa, row.cpc,
                row.ctr, row.cvr,
            );
        }
    }
    if rows.is_empty() {
        rows.push_str("<tr><td colspan=\"9\" class=\"no-data\">No data available</td></tr>");
    }

    let total_pages = page_count(row_count, per_page);
    let mut pagination = String::new();
    if total_pages > 1 {
        for label in page_numbers(current_page, total_pages) {
            match label {
                PageLabel::Num(n) if n == current_page => {
                    let _ = write!(pagination, "<span class=\"page current\">{n}</span>");
                }
                PageLabel::Num(n) => {
                    let _ = write!(
                        pagination,
                        "<a class=\"page\" href=\"/stats?view={view}&page={n}&start={start}&end={end}\">{n}</a>"
                    );
                }
                PageLabel::Gap => pagination.push_str("<span class=\"ellipsis\">...</span>"),
            }
        }
    }

    STATS_HTML
        .replace("{{TITLE}}", &title)
        .replace("{{FIRST_COLUMN}}", first_column)
        .replace("{{ROWS}}", &rows)
        .replace("{{PAGINATION}}", &pagination)
        .replace("{{VIEW}}", view)
        .replace("{{START}}", start)
        .replace("{{END}}", end)
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Ads Companion</title>
  <style>
    :root {
      --ink: #1f2933;
      --muted: #6b7280;
      --accent: #0088cc;
      --card: #ffffff;
      --bg: #f3f6f9;
    }
    * { box-sizing: border-box; }
    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Segoe UI", "Helvetica Neue", sans-serif;
      padding: 32px 18px;
    }
    .app { width: min(960px, 100%); margin: 0 auto; display: grid; gap: 24px; }
    h1 { margin: 0; font-size: 1.8rem; }
    .subtitle { margin: 4px 0 0; color: var(--muted); }
    .cards { display: grid; grid-template-columns: repeat(auto-fit, minmax(160px, 1fr)); gap: 14px; }
    .card {
      background: var(--card);
      border-radius: 12px;
      padding: 16px;
      border: 1px solid rgba(31, 41, 51, 0.08);
    }
    .card .label { font-size: 0.75rem; text-transform: uppercase; letter-spacing: 0.1em; color: var(--muted); }
    .card .value { font-size: 1.5rem; font-weight: 600; margin-top: 6px; }
    .links a {
      display: inline-block;
      background: var(--accent);
      color: white;
      text-decoration: none;
      border-radius: 10px;
      padding: 10px 18px;
      margin-right: 10px;
    }
  </style>
</head>
<body>
  <div class="app">
    <header>
      <h1>Ads Companion</h1>
      <p class="subtitle">Account overview, computed from the ads console</p>
    </header>
    <section class="cards">
      <div class="card"><span class="label">Total Spent</span><div class="value">{{SPENT}}</div></div>
      <div class="card"><span class="label">Total Views</span><div class="value">{{VIEWS}}</div></div>
      <div class="card"><span class="label">Total Clicks</span><div class="value">{{CLICKS}}</div></div>
      <div class="card"><span class="label">Total Actions</span><div class="value">{{ACTIONS}}</div></div>
    </section>
    <section class="cards">
      <div class="card"><span class="label">Total Ads</span><div class="value">{{TOTAL}}</div></div>
      <div class="card"><span class="label">Active</span><div class="value">{{ACTIVE}}</div></div>
      <div class="card"><span class="label">In Review</span><div class="value">{{IN_REVIEW}}</div></div>
      <div class="card"><span class="label">On Hold</span><div class="value">{{ON_HOLD}}</div></div>
      <div class="card"><span class="label">Declined</span><div class="value">{{DECLINED}}</div></div>
      <div class="card"><span class="label">Stopped</span><div class="value">{{STOPPED}}</div></div>
    </section>
    <section class="links">
      <a href="/stats?view=date">Daily breakdown</a>
      <a href="/stats?view=ads">Per-ad breakdown</a>
    </section>
  </div>
</body>
</html>
"#;

const STATS_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Daily Stats</title>
  <style>
    :root {
      --ink: #1f2933;
      --muted: #6b7280;
      --accent: #0088cc;
      --bg: #f3f6f9;
    }
    * { box-sizing: border-box; }
    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Segoe UI", "Helvetica Neue", sans-serif;
      padding: 32px 18px;
    }
    .app { width: min(1100px, 100%); margin: 0 auto; display: grid; gap: 18px; }
    h1 { margin: 0; font-size: 1.5rem; }
    .toolbar { display: flex; flex-wrap: wrap; gap: 10px; align-items: center; }
    .toolbar a, .toolbar button {
      background: white;
      border: 1px solid rgba(31, 41, 51, 0.15);
      border-radius: 8px;
      padding: 8px 14px;
      color: var(--ink);
      text-decoration: none;
      font-size: 0.9rem;
      cursor: pointer;
    }
    .toolbar a.active { background: var(--accent); color: white; border-color: var(--accent); }
    .toolbar form { display: flex; gap: 8px; align-items: center; }
    table { width: 100%; border-collapse: collapse; background: white; border-radius: 12px; overflow: hidden; }
    th, td { padding: 10px 12px; text-align: right; border-bottom: 1px solid rgba(31, 41, 51, 0.08); }
    th:first-child, td:first-child { text-align: left; }
    thead th { background: #eef3f7; font-size: 0.8rem; text-transform: uppercase; letter-spacing: 0.06em; }
    .no-data { text-align: center; color: var(--muted); }
    .pagination { display: flex; gap: 6px; justify-content: center; }
    .pagination .page, .pagination .ellipsis {
      padding: 6px 12px;
      border-radius: 8px;
      text-decoration: none;
      color: var(--ink);
      background: white;
      border: 1px solid rgba(31, 41, 51, 0.15);
    }
    .pagination .current { background: var(--accent); color: white; border-color: var(--accent); }
    .pagination .ellipsis { border: none; background: none; color: var(--muted); }
  </style>
</head>
<body>
  <div class="app">
    <h1>{{TITLE}}</h1>
    <div class="toolbar">
      <a href="/stats?view=date&start={{START}}&end={{END}}">By Date</a>
      <a href="/stats?view=ads&start={{START}}&end={{END}}">By Ads</a>
      <form method="get" action="/stats">
        <input type="hidden" name="view" value="{{VIEW}}" />
        <label>From <input type="date" name="start" value="{{START}}" /></label>
        <label>To <input type="date" name="end" value="{{END}}" /></label>
        <button type="submit">Apply</button>
      </form>
      <a href="/export/{{VIEW}}?start={{START}}&end={{END}}">Export CSV</a>
      <a href="/">Back</a>
    </div>
    <table>
      <thead>
        <tr>
          <th>{{FIRST_COLUMN}}</th><th>Views</th><th>Clicks</th><th>Actions</th>
          <th>Spent</th><th>CPA</th><th>CPC</th><th>CTR</th><th>CVR</th>
        </tr>
      </thead>
      <tbody>{{ROWS}}</tbody>
    </table>
    <div class="pagination">{{PAGINATION}}</div>
  </div>
</body>
</html>
"#;
