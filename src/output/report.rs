use super::{ExportDocument, OutputRecord};
use crate::model::RankTier;

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn tier_class(rank: u32) -> &'static str {
    match RankTier::of(rank) {
        RankTier::First => "gold",
        RankTier::Second => "silver",
        RankTier::Third => "bronze",
        RankTier::TopTen => "top10",
        RankTier::TopHundred => "top100",
        RankTier::Other => "rest",
    }
}

fn render_row(r: &OutputRecord) -> String {
    format!(
        "      <tr><td class=\"rank {tier}\">#{rank}</td><td><div class=\"name\">{name}</div><div class=\"weapon\">{weapon}</div></td><td>{score}</td><td class=\"guild\">{guild}</td><td class=\"union\">{union}</td><td class=\"realm\">{realm}</td></tr>\n",
        tier = tier_class(r.rank),
        rank = r.rank,
        name = escape_html(&r.name),
        weapon = escape_html(&r.weapon),
        score = r.score,
        guild = escape_html(&r.guild),
        union = escape_html(&r.union),
        realm = escape_html(&r.realm),
    )
}

pub fn render_html(doc: &ExportDocument) -> Vec<u8> {
    let s = &doc.summary;
    let rows: String = doc.records.iter().map(render_row).collect();
    let updated = s
        .last_updated
        .as_deref()
        .map(|u| format!("<p class=\"updated\">Last updated: {}</p>", escape_html(u)))
        .unwrap_or_default();
    let average = if doc.top_n {
        format!(
            "<div class=\"stat\"><h3>Avg Growth Rate (Top 20)</h3><p>{:.2}%</p></div>",
            s.stats.average_score
        )
    } else {
        String::new()
    };

    let html = format!(
        r####"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>Player Rankings - {region}</title>
  <style>
    body {{ font-family: 'Inter', sans-serif; background: #0f172a; color: #e2e8f0; margin: 0; padding: 2rem; }}
    h1 {{ font-family: 'Montserrat', sans-serif; letter-spacing: -0.025em; margin-bottom: 0.25rem; }}
    .updated {{ color: #64748b; font-size: 0.85rem; }}
    .stats {{ display: flex; gap: 1.5rem; margin: 1.5rem 0; flex-wrap: wrap; }}
    .stat {{ border: 1px solid #6b21a8; border-radius: 0.5rem; padding: 1rem 1.5rem; min-width: 10rem; }}
    .stat h3 {{ font-size: 0.8rem; color: #c4b5fd; margin: 0; }}
    .stat p {{ font-size: 1.8rem; font-weight: 700; margin: 0.25rem 0 0; }}
    table {{ width: 100%; border-collapse: collapse; }}
    th {{ text-align: left; padding: 0.75rem 1rem; color: #ddd6fe; background: #0b1120; }}
    td {{ padding: 0.75rem 1rem; border-top: 1px solid #334155; }}
    .name {{ font-weight: 600; }}
    .weapon {{ font-size: 0.8rem; color: #94a3b8; }}
    .guild {{ color: #fde047; }} .union {{ color: #93c5fd; }} .realm {{ color: #86efac; }}
    .rank {{ font-weight: 700; }}
    .gold {{ color: #facc15; }} .silver {{ color: #d1d5db; }} .bronze {{ color: #ea580c; }}
    .top10 {{ color: #c084fc; }} .top100 {{ color: #60a5fa; }} .rest {{ color: #9ca3af; }}
  </style>
</head>
<body>
  <h1>Player Rankings</h1>
  <p>{region}</p>
  {updated}
  <div class="stats">
    <div class="stat"><h3>Total Players</h3><p>{total_unique}</p></div>
    <div class="stat"><h3>Active Search Results</h3><p>{total}</p></div>
    <div class="stat"><h3>Total Guilds</h3><p>{guilds}</p></div>
    <div class="stat"><h3>Total Realms</h3><p>{realms}</p></div>
    {average}
  </div>
  <table>
    <thead>
      <tr><th>Rank</th><th>Player</th><th>Growth Rate</th><th>Guild</th><th>Union</th><th>Realm</th></tr>
    </thead>
    <tbody>
{rows}    </tbody>
  </table>
</body>
</html>
"####,
        region = escape_html(&doc.region),
        updated = updated,
        total_unique = s.total_unique,
        total = s.stats.total,
        guilds = s.stats.distinct_guilds,
        realms = s.stats.distinct_realms,
        average = average,
        rows = rows,
    );
    html.into_bytes()
}
