use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "crowrank",
    version,
    about = "terminal leaderboard viewer for regional growth rankings",
    long_about = "crowrank fetches a region's ranked character list and lets you search, filter, sort and page through it.\n\nExamples:\n  crowrank --api-base https://rankings.example.com/api -r 2020\n  crowrank -r 2020 -R SEA201 -s score --desc -t\n  crowrank -i ./snapshots -r 2020 -o top.html\n  crowrank -r 2020 --interactive\n\nTip: Use --init-config to write ~/.crowrank/config.yml and keep invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'c',
        long = "color",
        help_heading = "Output",
        help = "Force colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        long = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Export the current view to a file."
    )]
    pub output: Option<String>,

    #[arg(
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Export format: text, json, xml, html (inferred from --output when omitted)."
    )]
    pub output_format: Option<String>,

    #[arg(
        long = "api-base",
        value_name = "URL",
        help_heading = "Input",
        help = "Ranking API base URL (or set CROWRANK_API_BASE)."
    )]
    pub api_base: Option<String>,

    #[arg(
        short = 'i',
        long = "input",
        value_name = "PATH",
        help_heading = "Input",
        help = "Read snapshots from disk: a region JSON file, or a directory with metadata.json and <region>.json."
    )]
    pub input: Option<String>,

    #[arg(
        short = 'r',
        long = "region",
        value_name = "CODE",
        help_heading = "Input",
        help = "Region code to load (default 2020)."
    )]
    pub region: Option<i64>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.crowrank/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "init-config",
        help_heading = "Input",
        help = "Write a default config file if none exists, then exit."
    )]
    pub init_config: bool,

    #[arg(
        long = "list-regions",
        help_heading = "Input",
        help = "Print the selectable regions and exit."
    )]
    pub list_regions: bool,

    #[arg(
        short = 'I',
        long = "interactive",
        help_heading = "Input",
        help = "Start an interactive session after loading the region."
    )]
    pub interactive: bool,

    #[arg(
        short = 'n',
        long = "name",
        visible_alias = "search",
        value_name = "TEXT",
        help_heading = "Filters",
        help = "Case-insensitive player name substring."
    )]
    pub name: Option<String>,

    #[arg(
        short = 'g',
        long = "guild",
        value_name = "GUILD",
        help_heading = "Filters",
        help = "Exact guild name."
    )]
    pub guild: Option<String>,

    #[arg(
        short = 'U',
        long = "union",
        value_name = "UNION",
        help_heading = "Filters",
        help = "Exact union name."
    )]
    pub union: Option<String>,

    #[arg(
        short = 'R',
        long = "realm",
        value_name = "REALM",
        help_heading = "Filters",
        help = "Realm group (matches all its realms) or exact group/realm pair."
    )]
    pub realm: Option<String>,

    #[arg(
        long = "list-options",
        value_name = "KIND",
        help_heading = "Filters",
        help = "Print the values available for guild, union or realm and exit."
    )]
    pub list_options: Option<String>,

    #[arg(
        long = "option-search",
        value_name = "TEXT",
        help_heading = "Filters",
        help = "Narrow --list-options output."
    )]
    pub option_search: Option<String>,

    #[arg(
        short = 's',
        long = "sort",
        value_name = "FIELD",
        help_heading = "Sorting",
        help = "Sort field: rank, name, score, guild, union, realm, realm_group, weapon_type, delta_rank."
    )]
    pub sort: Option<String>,

    #[arg(
        long = "desc",
        help_heading = "Sorting",
        help = "Sort descending."
    )]
    pub desc: bool,

    #[arg(
        short = 't',
        long = "top20",
        visible_alias = "top",
        help_heading = "Sorting",
        help = "Only keep the first 20 players of the sorted view."
    )]
    pub top20: bool,

    #[arg(
        short = 'p',
        long = "page",
        value_name = "N",
        help_heading = "Sorting",
        help = "Page to show (50 players per page)."
    )]
    pub page: Option<usize>,

    #[arg(
        long = "timeout",
        value_name = "SECONDS",
        help_heading = "Network",
        help = "Request timeout in seconds."
    )]
    pub timeout: Option<u64>,

    #[arg(
        long = "proxy",
        value_name = "URL",
        help_heading = "Network",
        help = "HTTP proxy for API requests."
    )]
    pub proxy: Option<String>,

    #[arg(
        long = "discard-stale",
        help_heading = "Network",
        help = "Ignore responses to region requests that were superseded by a newer one."
    )]
    pub discard_stale: bool,
}
