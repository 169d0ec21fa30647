use colored::{ColoredString, Colorize};

use crate::controller::Summary;
use crate::model::{weapon_glyph, RankTier, Record};
use crate::ranking::{Page, SortField, SortSpec};

const RANK_WIDTH: usize = 7;
const NAME_WIDTH: usize = 20;
const GUILD_WIDTH: usize = 16;
const UNION_WIDTH: usize = 16;

// Padding goes on before color so escape codes never count toward the width.
fn rank_colored(rank: u32, width: usize) -> ColoredString {
    let text = format!("{:>width$}", format!("#{rank}"));
    match RankTier::of(rank) {
        RankTier::First => text.yellow().bold(),
        RankTier::Second => text.white().bold(),
        RankTier::Third => text.red().bold(),
        RankTier::TopTen => text.magenta(),
        RankTier::TopHundred => text.blue(),
        RankTier::Other => text.dimmed(),
    }
}

fn clip(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('~');
    out
}

fn header_cell(label: &str, field: SortField, spec: SortSpec, width: usize) -> String {
    let marker = if spec.field == field {
        match spec.direction {
            crate::ranking::SortDirection::Asc => "^",
            crate::ranking::SortDirection::Desc => "v",
        }
    } else {
        ""
    };
    format!("{:<width$}", format!("{label}{marker}"), width = width)
}

pub fn render_summary(summary: &Summary, top_n: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        ":: {:<22}: {}\n",
        "Total Players",
        summary.total_unique.to_string().bold()
    ));
    out.push_str(&format!(
        ":: {:<22}: {}\n",
        "Active Search Results",
        summary.stats.total.to_string().bold()
    ));
    out.push_str(&format!(
        ":: {:<22}: {}\n",
        "Total Guilds", summary.stats.distinct_guilds
    ));
    out.push_str(&format!(
        ":: {:<22}: {}\n",
        "Total Realms", summary.stats.distinct_realms
    ));
    if top_n {
        out.push_str(&format!(
            ":: {:<22}: {}\n",
            "Avg Growth (Top 20)",
            format!("{:.2}%", summary.stats.average_score).green()
        ));
    }
    out
}

fn padded(value: &str, width: usize) -> String {
    format!("{:<width$}", clip(value, width))
}

fn render_row(r: &Record) -> String {
    format!(
        "{}  {}  {:<3} {:>10}  {}  {}  {}\n",
        rank_colored(r.rank, RANK_WIDTH),
        padded(&r.name, NAME_WIDTH),
        weapon_glyph(r.weapon_type),
        r.score,
        padded(&r.guild, GUILD_WIDTH).yellow(),
        padded(&r.union, UNION_WIDTH).cyan(),
        r.realm_key().green(),
    )
}

pub fn render_table(page: &Page<'_, Record>, spec: SortSpec) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>rank$}  {}  {:<3} {:>10}  {}  {}  {}\n",
        header_cell("Rank", SortField::Rank, spec, 0),
        header_cell("Player", SortField::Name, spec, NAME_WIDTH),
        "Wpn",
        header_cell("Growth", SortField::Score, spec, 0),
        header_cell("Guild", SortField::Guild, spec, GUILD_WIDTH),
        header_cell("Union", SortField::Union, spec, UNION_WIDTH),
        header_cell("Realm", SortField::Realm, spec, 0),
        rank = RANK_WIDTH,
    ));
    if page.items.is_empty() {
        out.push_str(&format!("{}\n", "  no players match the current filters".dimmed()));
    }
    for r in page.items {
        out.push_str(&render_row(r));
    }
    out.push_str(&render_footer(page));
    out
}

pub fn render_footer(page: &Page<'_, Record>) -> String {
    let (from, to) = page.display_bounds();
    format!(
        "Showing {} to {} of {} players :: Page {} of {}\n",
        from, to, page.total_items, page.page_number, page.total_pages
    )
}
