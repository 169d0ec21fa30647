use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{error::ErrorKind, CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::api::{ApiClient, FetchError, Source};
use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::controller::ViewController;
use crate::model::{Metadata, RegionResponse};
use crate::output::{self, terminal, ExportDocument, OutputFormat};
use crate::ranking::{CriteriaPatch, OptionKind, SortDirection, SortField, SortSpec};
use crate::shell::{self, Shell};
use crate::store::{FetchTicket, ResolvePolicy};

pub const API_BASE_ENV: &str = "CROWRANK_API_BASE";
const DEFAULT_REGION: i64 = 2020;

fn print_banner() {
    println!(":: crowrank v{} ::", env!("CARGO_PKG_VERSION"));
    println!();
}

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("crowrank={level}")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn render_custom_help() -> String {
    let cmd = CliArgs::command();
    let mut out = format!(
        "{} {}\n",
        cmd.get_name(),
        cmd.get_version().unwrap_or_default()
    );
    if let Some(about) = cmd.get_about() {
        out.push_str(&format!("{about}\n"));
    }
    if let Some(long_about) = cmd.get_long_about() {
        out.push_str(&format!("\n{long_about}\n"));
    }
    out.push_str(&format!("\nUsage: {} [OPTIONS]\n\n", cmd.get_name()));

    // headings in first-seen order
    let mut sections: Vec<(&str, Vec<&clap::Arg>)> = Vec::new();
    for arg in cmd.get_arguments().filter(|a| !a.is_hide_set()) {
        let heading = arg.get_help_heading().unwrap_or("Options");
        match sections.iter_mut().find(|(h, _)| *h == heading) {
            Some((_, args)) => args.push(arg),
            None => sections.push((heading, vec![arg])),
        }
    }

    for (heading, args) in sections {
        out.push_str(&format!("{heading}:\n"));
        for arg in args {
            let mut flags: Vec<String> = Vec::new();
            if let Some(short) = arg.get_short() {
                flags.push(format!("-{short}"));
            }
            if let Some(long) = arg.get_long() {
                flags.push(format!("--{long}"));
            }
            for alias in arg.get_visible_aliases().unwrap_or_default() {
                flags.push(format!("--{alias}"));
            }
            let mut line = flags.join(", ");
            if arg.get_action().takes_values() {
                let value_name = arg
                    .get_value_names()
                    .and_then(|names| names.first())
                    .map(|name| name.as_str())
                    .unwrap_or("VALUE");
                line.push_str(&format!(" <{value_name}>"));
            }
            out.push_str(&format!("  {line}\n"));
            if let Some(help) = arg.get_help() {
                let help = help.to_string();
                if !help.trim().is_empty() {
                    out.push_str(&format!("          {}\n", help.trim()));
                }
            }
            out.push('\n');
        }
    }
    out
}

#[derive(Clone, Debug, PartialEq)]
enum SourceSpec {
    Input(PathBuf),
    Api(String),
}

#[derive(Clone, Debug)]
struct RunConfig {
    no_color: bool,
    force_color: bool,
    source: SourceSpec,
    region: i64,
    timeout: u64,
    proxy: Option<String>,
    policy: ResolvePolicy,
    criteria: CriteriaPatch,
    sort: SortSpec,
    top_n: bool,
    page: usize,
    output: Option<PathBuf>,
    output_format: OutputFormat,
    list_regions: bool,
    list_options: Option<(OptionKind, String)>,
    interactive: bool,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// CLI flags win over config values, which win over defaults.
fn build_run_config(
    args: CliArgs,
    cfg: ConfigFile,
    env_api_base: Option<String>,
) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };

    let source = if let Some(input) = non_empty(args.input) {
        SourceSpec::Input(config::expand_tilde(&input))
    } else if let Some(base) = non_empty(args.api_base) {
        SourceSpec::Api(base)
    } else if let Some(input) = non_empty(cfg.input) {
        SourceSpec::Input(config::expand_tilde(&input))
    } else if let Some(base) = non_empty(cfg.api_base).or(non_empty(env_api_base)) {
        SourceSpec::Api(base)
    } else {
        return Err(format!(
            "no data source: pass --api-base, --input, or set {API_BASE_ENV}"
        ));
    };

    let region = args.region.or(cfg.region).unwrap_or(DEFAULT_REGION);
    if region == crate::model::NO_REGION {
        return Err("region 0 is not a selectable region".to_string());
    }
    let timeout = args.timeout.or(cfg.timeout).unwrap_or(10).max(1);
    let proxy = non_empty(args.proxy.or(cfg.proxy));
    let policy = if args.discard_stale || cfg.discard_stale.unwrap_or(false) {
        ResolvePolicy::DiscardStale
    } else {
        ResolvePolicy::LastResolvedWins
    };

    let criteria = CriteriaPatch {
        name_query: Some(args.name.or(cfg.name).unwrap_or_default()),
        guild: Some(args.guild.or(cfg.guild).unwrap_or_default()),
        union: Some(args.union.or(cfg.union).unwrap_or_default()),
        realm: Some(args.realm.or(cfg.realm).unwrap_or_default()),
    };

    let field = match args.sort.or(cfg.sort_by) {
        Some(raw) => SortField::parse(&raw).ok_or_else(|| format!("invalid sort field '{raw}'"))?,
        None => SortField::Rank,
    };
    let direction = if args.desc {
        SortDirection::Desc
    } else {
        match cfg.sort_order {
            Some(raw) => SortDirection::parse(&raw)
                .ok_or_else(|| format!("invalid sort_order '{raw}', expected asc or desc"))?,
            None => SortDirection::Asc,
        }
    };

    let top_n = args.top20 || cfg.top20.unwrap_or(false);
    let page = args.page.or(cfg.page).unwrap_or(1).max(1);

    let output_path = non_empty(args.output.or(cfg.output));
    let output_format = match args.output_format.or(cfg.output_format) {
        Some(raw) => OutputFormat::parse(&raw)
            .ok_or_else(|| format!("invalid output format '{raw}'"))?,
        None => output_path
            .as_deref()
            .and_then(output::infer_format_from_path)
            .unwrap_or(OutputFormat::Text),
    };

    let list_options = match args.list_options {
        Some(raw) => {
            let kind = OptionKind::parse(&raw)
                .ok_or_else(|| format!("invalid --list-options '{raw}'"))?;
            Some((kind, args.option_search.unwrap_or_default()))
        }
        None => None,
    };

    Ok(RunConfig {
        no_color,
        force_color: args.color,
        source,
        region,
        timeout,
        proxy,
        policy,
        criteria,
        sort: SortSpec::new(field, direction),
        top_n,
        page,
        output: output_path.map(|p| config::expand_tilde(&p)),
        output_format,
        list_regions: args.list_regions,
        list_options,
        interactive: args.interactive,
    })
}

fn build_source(run: &RunConfig) -> Result<Source, String> {
    match &run.source {
        SourceSpec::Input(path) => Ok(Source::File(path.clone())),
        SourceSpec::Api(base) => ApiClient::new(base, run.timeout, run.proxy.as_deref())
            .map(Source::Http)
            .map_err(|e| e.to_string()),
    }
}

fn spinner(message: String) -> Result<ProgressBar, String> {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_style(
        ProgressStyle::with_template(":: {spinner} {msg} [{elapsed}]")
            .map_err(|e| format!("failed to build progress style: {e}"))?,
    );
    pb.set_message(message);
    Ok(pb)
}

fn export_document(controller: &ViewController, region: String) -> ExportDocument {
    ExportDocument {
        region,
        summary: controller.summary(),
        sort: controller.sort_spec(),
        criteria: controller.criteria().clone(),
        top_n: controller.top_n(),
        records: output::build_records(controller.view()),
    }
}

async fn write_export(
    path: &Path,
    format: OutputFormat,
    doc: &ExportDocument,
) -> Result<(), String> {
    let rendered = output::render(format, doc);
    let mut outfile = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .await
        .map_err(|e| format!("failed to open output file: {e}"))?;
    outfile
        .write_all(&rendered)
        .await
        .map_err(|e| format!("failed to write output file: {e}"))
}

/// Applies the startup fetch. A failure is fatal for one-shot runs; the shell
/// starts with an empty store instead so another region can be tried.
/// Returns whether records were loaded.
fn apply_first_fetch(
    controller: &mut ViewController,
    ticket: FetchTicket,
    outcome: Result<RegionResponse, FetchError>,
    interactive: bool,
) -> Result<bool, String> {
    match controller.resolve_fetch(ticket, outcome) {
        Ok(_) => Ok(true),
        Err(e) => {
            let message =
                format!("Failed to fetch player rankings. Please try again later. ({e})");
            if !interactive {
                return Err(message);
            }
            warn!(error = %e, region_code = ticket.region_code, "initial fetch failed");
            eprintln!("{message}");
            Ok(false)
        }
    }
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    } else if run.force_color {
        colored::control::set_override(true);
    }

    let source = build_source(&run)?;
    info!(source = %source.describe(), region = run.region, "starting");

    if run.list_regions {
        let metadata = source
            .fetch_metadata()
            .await
            .map_err(|e| format!("failed to load region list: {e}"))?;
        for region in metadata.selectable_regions() {
            println!("{:>6}  {}", region.code, region.name);
        }
        return Ok(());
    }

    let metadata: Option<Metadata> = match source.fetch_metadata().await {
        Ok(meta) => Some(meta),
        Err(e) => {
            warn!(error = %e, "metadata unavailable");
            None
        }
    };

    let mut controller = ViewController::new(run.policy);
    controller.set_last_updated(metadata.as_ref().map(|m| m.last_updated.clone()));
    controller.set_filter(run.criteria.clone());
    controller.set_sort(run.sort);
    controller.set_top_n(run.top_n);

    let region_label = shell::region_label(metadata.as_ref(), run.region);
    let ticket = controller.begin_fetch(run.region);
    let pb = if run.interactive {
        None
    } else {
        Some(spinner(format!("loading {region_label}"))?)
    };
    let outcome = source.fetch_region_records(run.region).await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    let loaded = apply_first_fetch(&mut controller, ticket, outcome, run.interactive)?;
    controller.set_page(run.page);

    if let Some((kind, search)) = run.list_options.as_ref() {
        let options = controller.options(*kind, search);
        if options.is_empty() {
            println!("No {} found.", kind.label().to_lowercase());
        }
        for option in options {
            println!("{option}");
        }
        return Ok(());
    }

    if let Some(path) = run.output.as_ref().filter(|_| loaded) {
        let doc = export_document(&controller, region_label.clone());
        write_export(path, run.output_format, &doc).await?;
        info!(path = %path.display(), records = doc.records.len(), "exported view");
    }

    if run.interactive {
        return Shell::new(controller, source, metadata).run().await;
    }

    print_banner();
    format_kv_line("Source", &source.describe());
    format_kv_line("Region", &region_label);
    format_kv_line(
        "Sort",
        &format!("{} {}", controller.sort_spec().field, controller.sort_spec().direction),
    );
    if let Some(path) = run.output.as_ref() {
        format_kv_line("Output", &path.display().to_string());
    }
    println!();
    print!(
        "{}",
        terminal::render_summary(&controller.summary(), controller.top_n())
    );
    println!();
    print!(
        "{}",
        terminal::render_table(&controller.page(), controller.sort_spec())
    );
    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                print!("{}", render_custom_help());
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                print!("{}", CliArgs::command().render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    init_logging(args.verbose);

    let user_config_path = args.config.clone().map(|p| config::expand_tilde(&p));

    if args.init_config {
        let path = user_config_path
            .or_else(config::default_config_path)
            .ok_or_else(|| "cannot determine home directory for config".to_string())?;
        if config::ensure_default_config_file(&path)? {
            println!("wrote {}", path.display());
        } else {
            println!("config already exists at {}", path.display());
        }
        return Ok(());
    }

    let cfg = match user_config_path.as_ref() {
        Some(path) => config::load_config(path, false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg, std::env::var(API_BASE_ENV).ok())?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))
}
