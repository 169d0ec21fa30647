pub mod report;
pub mod terminal;

use serde::Serialize;

use crate::controller::Summary;
use crate::model::Record;
use crate::ranking::{FilterCriteria, SortSpec};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Xml,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".xml") {
        return Some(OutputFormat::Xml);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

// one exported row, in view order
#[derive(Clone, Debug, Serialize)]
pub struct OutputRecord {
    pub position: usize,
    pub rank: u32,
    pub delta_rank: i64,
    pub name: String,
    pub weapon: String,
    pub score: f64,
    pub guild: String,
    pub union: String,
    pub realm: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ExportDocument {
    pub region: String,
    pub summary: Summary,
    pub sort: SortSpec,
    pub criteria: FilterCriteria,
    pub top_n: bool,
    pub records: Vec<OutputRecord>,
}

pub fn build_records(view: &[Record]) -> Vec<OutputRecord> {
    view.iter()
        .enumerate()
        .map(|(i, r)| OutputRecord {
            position: i + 1,
            rank: r.rank,
            delta_rank: r.delta_rank,
            name: r.name.clone(),
            weapon: r.weapon_label().to_string(),
            score: r.score,
            guild: r.guild.clone(),
            union: r.union.clone(),
            realm: r.realm_key(),
        })
        .collect()
}

pub fn render(format: OutputFormat, doc: &ExportDocument) -> Vec<u8> {
    match format {
        OutputFormat::Text => render_text(doc),
        OutputFormat::Json => render_json(doc),
        OutputFormat::Xml => render_xml(doc),
        OutputFormat::Html => report::render_html(doc),
    }
}

pub fn render_text(doc: &ExportDocument) -> Vec<u8> {
    let mut out = String::new();
    out.push_str(&format!("# region: {}\n", doc.region));
    out.push_str(&format!(
        "# players: {} shown, {} total, {} guilds, {} realms, avg score {:.2}\n",
        doc.summary.stats.total,
        doc.summary.total_unique,
        doc.summary.stats.distinct_guilds,
        doc.summary.stats.distinct_realms,
        doc.summary.stats.average_score,
    ));
    for r in &doc.records {
        out.push_str(&format!(
            "{}\t#{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
            r.position, r.rank, r.name, r.weapon, r.score, r.guild, r.union, r.realm
        ));
    }
    out.into_bytes()
}

pub fn render_json(doc: &ExportDocument) -> Vec<u8> {
    serde_json::to_vec_pretty(doc).unwrap_or_else(|_| b"{}\n".to_vec())
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

pub fn render_xml(doc: &ExportDocument) -> Vec<u8> {
    let s = &doc.summary;
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    out.push('\n');
    out.push_str(&format!(
        "<leaderboard region=\"{}\" sort=\"{}\" direction=\"{}\" top_n=\"{}\">\n",
        escape_xml(&doc.region),
        doc.sort.field,
        doc.sort.direction,
        doc.top_n
    ));
    out.push_str(&format!(
        "  <summary total=\"{}\" total_unique=\"{}\" guilds=\"{}\" realms=\"{}\" average_score=\"{:.2}\"/>\n",
        s.stats.total, s.total_unique, s.stats.distinct_guilds, s.stats.distinct_realms, s.stats.average_score
    ));
    for r in &doc.records {
        out.push_str(&format!(
            "  <player position=\"{}\" rank=\"{}\" delta_rank=\"{}\">\n",
            r.position, r.rank, r.delta_rank
        ));
        out.push_str(&format!("    <name>{}</name>\n", escape_xml(&r.name)));
        out.push_str(&format!("    <weapon>{}</weapon>\n", escape_xml(&r.weapon)));
        out.push_str(&format!("    <score>{}</score>\n", r.score));
        out.push_str(&format!("    <guild>{}</guild>\n", escape_xml(&r.guild)));
        out.push_str(&format!("    <union>{}</union>\n", escape_xml(&r.union)));
        out.push_str(&format!("    <realm>{}</realm>\n", escape_xml(&r.realm)));
        out.push_str("  </player>\n");
    }
    out.push_str("</leaderboard>\n");
    out.into_bytes()
}
