//! Self-contained HTML rendering of a [`ReportSummary`]. Styles are inlined
//! and the page loads no external resources.

use metrics_core::AggregateRow;

use super::ReportSummary;
use super::format::{escape_html, percent, rate_bar, thousands};

pub fn render_html(summary: &ReportSummary) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        {header}
        {totals}
        {adoption}
        {users}
        {languages}
        {features}
        {ides}
        {models}
    </div>
</body>
</html>"#,
        title = escape_html(&summary.title),
        css = inline_css(),
        header = render_header(summary),
        totals = render_totals(summary),
        adoption = render_adoption(summary),
        users = render_ranking("Top users", "User", &summary.top_users, true),
        languages = render_ranking("Top languages", "Language", &summary.top_languages, false),
        features = render_ranking("Features", "Feature", &summary.features, false),
        ides = render_ranking("IDEs", "IDE", &summary.ides, false),
        models = render_ranking("Models", "Model", &summary.models, false),
    )
}

fn render_header(summary: &ReportSummary) -> String {
    let period = match (summary.first_day, summary.last_day) {
        (Some(first), Some(last)) => format!("{} to {}", first, last),
        _ => "no activity".to_string(),
    };
    format!(
        r#"<header>
            <h1>{title}</h1>
            <p class="meta">Period: {period} &middot; Generated {generated}</p>
        </header>"#,
        title = escape_html(&summary.title),
        period = period,
        generated = summary.generated_at.format("%Y-%m-%d %H:%M UTC"),
    )
}

fn card(label: &str, value: &str) -> String {
    format!(
        r#"<div class="card"><div class="card-label">{}</div><div class="card-value">{}</div></div>"#,
        escape_html(label),
        value
    )
}

fn render_totals(summary: &ReportSummary) -> String {
    let totals = &summary.totals;
    let cards = [
        card("Users", &thousands(summary.user_count as u64)),
        card("Interactions", &thousands(totals.user_initiated_interaction_count)),
        card("Generations", &thousands(totals.code_generation_activity_count)),
        card("Acceptances", &thousands(totals.code_acceptance_activity_count)),
        card("Acceptance rate", &percent(summary.acceptance_rate)),
        card("Lines suggested", &thousands(totals.loc_suggested_to_add_sum)),
        card("Lines added", &thousands(totals.loc_added_sum)),
    ];
    format!(
        r#"<section>
            <h2>Summary</h2>
            <div class="cards">{}</div>
        </section>"#,
        cards.join("")
    )
}

fn render_adoption(summary: &ReportSummary) -> String {
    let adoption = summary.adoption;
    let cards = [
        card("Agent users", &thousands(adoption.agent_users as u64)),
        card("Chat users", &thousands(adoption.chat_users as u64)),
        card("Agent and chat", &thousands(adoption.both_users as u64)),
        card("Completion only", &thousands(adoption.completion_only_users as u64)),
    ];
    format!(
        r#"<section>
            <h2>Feature adoption</h2>
            <div class="cards">{}</div>
        </section>"#,
        cards.join("")
    )
}

fn rank_cell(position: usize) -> String {
    if position <= 3 {
        format!(r#"<span class="badge badge-{0}">{0}</span>"#, position)
    } else {
        position.to_string()
    }
}

fn render_ranking(heading: &str, label: &str, rows: &[AggregateRow], with_days: bool) -> String {
    if rows.is_empty() {
        return format!(
            r#"<section><h2>{}</h2><p class="empty">No activity.</p></section>"#,
            escape_html(heading)
        );
    }

    let days_header = if with_days { "<th>Active days</th>" } else { "" };
    let body: String = rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let position = index + 1;
            let class = if position <= 3 {
                format!(r#" class="top-rank rank-{}""#, position)
            } else {
                String::new()
            };
            let days = if with_days {
                format!(r#"<td class="num">{}</td>"#, row.active_days)
            } else {
                String::new()
            };
            format!(
                r#"<tr{class}><td>{rank}</td><td>{name}</td>{days}<td class="num">{generations}</td><td class="num">{acceptances}</td><td>{rate}</td><td class="num">{loc}</td></tr>"#,
                class = class,
                rank = rank_cell(position),
                name = escape_html(&row.key.label()),
                days = days,
                generations = thousands(row.generations()),
                acceptances = thousands(row.counters.code_acceptance_activity_count),
                rate = rate_bar(row.acceptance_rate()),
                loc = thousands(row.counters.loc_added_sum),
            )
        })
        .collect();

    format!(
        r#"<section>
            <h2>{heading}</h2>
            <table>
                <thead><tr><th>#</th><th>{label}</th>{days_header}<th>Generations</th><th>Acceptances</th><th>Acceptance rate</th><th>Lines added</th></tr></thead>
                <tbody>{body}</tbody>
            </table>
        </section>"#,
        heading = escape_html(heading),
        label = escape_html(label),
        days_header = days_header,
        body = body,
    )
}

fn inline_css() -> &'static str {
    r#"
* { box-sizing: border-box; }
body { margin: 0; font-family: -apple-system, "Segoe UI", Roboto, sans-serif; background: #f6f8fa; color: #1f2328; }
.container { max-width: 1100px; margin: 0 auto; padding: 24px; }
header h1 { margin: 0 0 4px; font-size: 26px; }
.meta { margin: 0 0 24px; color: #656d76; font-size: 14px; }
section { background: #fff; border: 1px solid #d0d7de; border-radius: 8px; padding: 16px 20px; margin-bottom: 20px; }
h2 { margin: 0 0 12px; font-size: 18px; }
.cards { display: flex; flex-wrap: wrap; gap: 12px; }
.card { flex: 1 1 140px; border: 1px solid #d0d7de; border-radius: 6px; padding: 12px; }
.card-label { color: #656d76; font-size: 12px; text-transform: uppercase; letter-spacing: 0.04em; }
.card-value { font-size: 22px; font-weight: 600; margin-top: 4px; }
table { width: 100%; border-collapse: collapse; font-size: 14px; }
th, td { padding: 6px 8px; border-bottom: 1px solid #eaeef2; text-align: left; }
th { background: #f6f8fa; font-weight: 600; }
td.num { text-align: right; font-variant-numeric: tabular-nums; }
tr.top-rank td { font-weight: 600; }
tr.rank-1 { background: #fff8c5; }
tr.rank-2 { background: #f3f4f6; }
tr.rank-3 { background: #fbefe3; }
.badge { display: inline-block; min-width: 22px; padding: 2px 6px; border-radius: 11px; text-align: center; color: #fff; font-size: 12px; }
.badge-1 { background: #bf8700; }
.badge-2 { background: #6e7781; }
.badge-3 { background: #a0522d; }
.rate { display: flex; align-items: center; gap: 8px; }
.bar { width: 120px; height: 8px; background: #eaeef2; border-radius: 4px; overflow: hidden; }
.bar span { display: block; height: 100%; background: #2da44e; }
.rate-value { font-variant-numeric: tabular-nums; }
.empty { color: #656d76; }
"#
}
