use futures::stream::FuturesUnordered;
use futures::StreamExt;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::warn;

use crate::api::{FetchError, Source};
use crate::controller::ViewController;
use crate::model::{Metadata, RegionResponse, NO_REGION};
use crate::output::terminal;
use crate::ranking::{CriteriaPatch, OptionKind, SortField};
use crate::store::{FetchTicket, Resolution};

const HELP: &str = "\
commands:
  sort <field>              sort by field; again on the same field flips direction
  name|guild|union|realm <value>
                            set a filter (realm: group or group/realm)
  clear [name|guild|union|realm]
                            clear one filter, or all of them
  top                       toggle the top 20 view
  page <n> | next | prev    move between pages
  region <code>             load another region
  regions                   list regions
  options <guild|union|realm> [search]
                            list filter values
  show                      redraw the table
  help                      this text
  quit                      leave
";

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Sort(SortField),
    Filter(CriteriaPatch),
    Top,
    Page(usize),
    Next,
    Prev,
    Region(i64),
    Regions,
    Options(OptionKind, String),
    Show,
    Help,
    Quit,
}

/// Parses one input line; blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    let cmd = match word.to_lowercase().as_str() {
        "sort" => {
            SortField::parse(rest)
                .map(Command::Sort)
                .ok_or_else(|| format!("unknown sort field '{rest}'"))?
        }
        "name" | "search" => Command::Filter(CriteriaPatch::name(rest)),
        "guild" => Command::Filter(CriteriaPatch::guild(rest)),
        "union" => Command::Filter(CriteriaPatch::union(rest)),
        "realm" => Command::Filter(CriteriaPatch::realm(rest)),
        "clear" => match rest.to_lowercase().as_str() {
            "" | "all" => Command::Filter(CriteriaPatch::clear_all()),
            "name" | "search" => Command::Filter(CriteriaPatch::name("")),
            "guild" => Command::Filter(CriteriaPatch::guild("")),
            "union" => Command::Filter(CriteriaPatch::union("")),
            "realm" => Command::Filter(CriteriaPatch::realm("")),
            other => return Err(format!("cannot clear '{other}'")),
        },
        "top" | "top20" => Command::Top,
        "page" => {
            let n: usize = rest
                .parse()
                .map_err(|_| format!("invalid page '{rest}'"))?;
            Command::Page(n)
        }
        "next" | "n" => Command::Next,
        "prev" | "p" => Command::Prev,
        "region" => {
            let code: i64 = rest
                .parse()
                .map_err(|_| format!("invalid region code '{rest}'"))?;
            if code == NO_REGION {
                return Err("region 0 is not a selectable region".to_string());
            }
            Command::Region(code)
        }
        "regions" => Command::Regions,
        "options" => {
            let (kind, search) = match rest.split_once(char::is_whitespace) {
                Some((k, s)) => (k, s.trim()),
                None => (rest, ""),
            };
            let kind = OptionKind::parse(kind)
                .ok_or_else(|| format!("unknown option list '{kind}'"))?;
            Command::Options(kind, search.to_string())
        }
        "show" | "ls" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command '{other}', try 'help'")),
    };
    Ok(Some(cmd))
}

/// What the loop should do after a command.
#[derive(Debug, PartialEq)]
pub enum Step {
    Print(String),
    Redraw,
    Fetch(FetchTicket),
    Quit,
}

pub struct Shell {
    controller: ViewController,
    source: Source,
    metadata: Option<Metadata>,
}

impl Shell {
    pub fn new(controller: ViewController, source: Source, metadata: Option<Metadata>) -> Self {
        Self {
            controller,
            source,
            metadata,
        }
    }

    pub fn controller(&self) -> &ViewController {
        &self.controller
    }

    pub fn dispatch(&mut self, cmd: Command) -> Step {
        match cmd {
            Command::Sort(field) => {
                self.controller.sort_column(field);
                Step::Redraw
            }
            Command::Filter(patch) => {
                self.controller.set_filter(patch);
                Step::Redraw
            }
            Command::Top => {
                self.controller.toggle_top_n();
                Step::Redraw
            }
            Command::Page(n) => {
                self.controller.set_page(n);
                Step::Redraw
            }
            Command::Next => {
                self.controller.next_page();
                Step::Redraw
            }
            Command::Prev => {
                self.controller.prev_page();
                Step::Redraw
            }
            Command::Region(code) => Step::Fetch(self.controller.begin_fetch(code)),
            Command::Regions => Step::Print(self.regions_text()),
            Command::Options(kind, search) => {
                let options = self.controller.options(kind, &search);
                if options.is_empty() {
                    Step::Print(format!("No {} found.\n", kind.label().to_lowercase()))
                } else {
                    Step::Print(options.join("\n") + "\n")
                }
            }
            Command::Show => Step::Redraw,
            Command::Help => Step::Print(HELP.to_string()),
            Command::Quit => Step::Quit,
        }
    }

    /// Applies a finished fetch and describes the outcome.
    pub fn on_fetched(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<RegionResponse, FetchError>,
    ) -> Step {
        match self.controller.resolve_fetch(ticket, outcome) {
            Ok(Resolution::Applied) => Step::Redraw,
            Ok(Resolution::DiscardedStale) => Step::Print(format!(
                "ignored late response for region {}\n",
                ticket.region_code
            )),
            Err(e) => {
                warn!(error = %e, region_code = ticket.region_code, "fetch failed");
                Step::Print(format!(
                    "Failed to fetch player rankings for region {}. Please try again later. ({e})\n",
                    ticket.region_code
                ))
            }
        }
    }

    fn regions_text(&self) -> String {
        match self.metadata.as_ref() {
            Some(meta) => meta
                .selectable_regions()
                .iter()
                .map(|r| format!("{:>6}  {}\n", r.code, r.name))
                .collect(),
            None => "region list unavailable\n".to_string(),
        }
    }

    pub fn render(&self) -> String {
        let region = self
            .controller
            .store()
            .region_code()
            .map(|code| region_label(self.metadata.as_ref(), code))
            .unwrap_or_else(|| "no region loaded".to_string());
        let mut out = format!(":: {region}\n");
        out.push_str(&terminal::render_summary(
            &self.controller.summary(),
            self.controller.top_n(),
        ));
        out.push('\n');
        let page = self.controller.page();
        out.push_str(&terminal::render_table(&page, self.controller.sort_spec()));
        let moves: Vec<&str> = [(page.has_prev(), "prev"), (page.has_next(), "next")]
            .into_iter()
            .filter_map(|(open, cmd)| open.then_some(cmd))
            .collect();
        if !moves.is_empty() {
            out.push_str(&format!("({})\n", moves.join(" | ")));
        }
        out
    }

    pub async fn run(mut self) -> Result<(), String> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();
        let mut in_flight = FuturesUnordered::new();

        write_out(&mut stdout, &self.render()).await?;
        write_out(&mut stdout, "> ").await?;
        loop {
            let step = tokio::select! {
                line = lines.next_line() => {
                    match line.map_err(|e| format!("failed to read input: {e}"))? {
                        None => break,
                        Some(line) => match parse_command(&line) {
                            Ok(Some(cmd)) => self.dispatch(cmd),
                            Ok(None) => Step::Print(String::new()),
                            Err(e) => Step::Print(format!("{e}\n")),
                        },
                    }
                }
                Some((ticket, outcome)) = in_flight.next(), if !in_flight.is_empty() => {
                    self.on_fetched(ticket, outcome)
                }
            };

            match step {
                Step::Quit => break,
                Step::Fetch(ticket) => {
                    write_out(
                        &mut stdout,
                        &format!("loading region {}...\n", ticket.region_code),
                    )
                    .await?;
                    in_flight.push(fetch_for(self.source.clone(), ticket));
                }
                Step::Redraw => write_out(&mut stdout, &self.render()).await?,
                Step::Print(text) => write_out(&mut stdout, &text).await?,
            }
            write_out(&mut stdout, "> ").await?;
        }
        Ok(())
    }
}

pub fn region_label(metadata: Option<&Metadata>, code: i64) -> String {
    match metadata.and_then(|m| m.region_name(code)) {
        Some(name) => format!("{name} ({code})"),
        None => format!("region {code}"),
    }
}

async fn fetch_for(
    source: Source,
    ticket: FetchTicket,
) -> (FetchTicket, Result<RegionResponse, FetchError>) {
    let outcome = source.fetch_region_records(ticket.region_code).await;
    (ticket, outcome)
}

async fn write_out(stdout: &mut tokio::io::Stdout, text: &str) -> Result<(), String> {
    stdout
        .write_all(text.as_bytes())
        .await
        .map_err(|e| format!("failed to write output: {e}"))?;
    stdout
        .flush()
        .await
        .map_err(|e| format!("failed to write output: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::SortDirection;
    use crate::tests::{numbered, snapshot};

    fn shell() -> Shell {
        let mut vc = ViewController::default();
        vc.replace_records(snapshot(numbered(73)));
        Shell::new(vc, Source::File("unused.json".into()), None)
    }

    #[test]
    fn parses_filters_and_clears() {
        assert_eq!(
            parse_command("realm SEA201/Knight").unwrap(),
            Some(Command::Filter(CriteriaPatch::realm("SEA201/Knight")))
        );
        assert_eq!(
            parse_command("guild Iron Wolves").unwrap(),
            Some(Command::Filter(CriteriaPatch::guild("Iron Wolves")))
        );
        assert_eq!(
            parse_command("clear").unwrap(),
            Some(Command::Filter(CriteriaPatch::clear_all()))
        );
        assert_eq!(parse_command("   ").unwrap(), None);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_command("sort level").is_err());
        assert!(parse_command("page x").is_err());
        assert!(parse_command("region 0").is_err());
        assert!(parse_command("dance").is_err());
    }

    #[test]
    fn dispatch_drives_the_controller() {
        let mut sh = shell();
        assert_eq!(sh.dispatch(Command::Next), Step::Redraw);
        assert_eq!(sh.controller().current_page(), 2);

        sh.dispatch(Command::Sort(SortField::Score));
        sh.dispatch(Command::Sort(SortField::Score));
        assert_eq!(sh.controller().sort_spec().direction, SortDirection::Desc);

        sh.dispatch(Command::Top);
        assert_eq!(sh.controller().view().len(), 20);
        assert_eq!(sh.dispatch(Command::Quit), Step::Quit);
    }

    #[test]
    fn render_hints_at_available_pages() {
        colored::control::set_override(false);
        let mut sh = shell();
        assert!(sh.render().ends_with("(next)\n"));
        sh.dispatch(Command::Next);
        assert!(sh.render().ends_with("(prev)\n"));
        sh.dispatch(Command::Top);
        assert!(!sh.render().contains("(prev"));
    }

    #[test]
    fn region_command_issues_a_ticket() {
        let mut sh = shell();
        match sh.dispatch(Command::Region(1010)) {
            Step::Fetch(ticket) => assert_eq!(ticket.region_code, 1010),
            other => panic!("unexpected step {other:?}"),
        }
    }

    #[test]
    fn failed_fetch_is_reported_and_view_survives() {
        let mut sh = shell();
        let ticket = sh.controller.begin_fetch(1010);
        let step = sh.on_fetched(
            ticket,
            Err(FetchError::Status {
                url: "http://example.com".to_string(),
                status: 502,
            }),
        );
        match step {
            Step::Print(text) => assert!(text.contains("try again")),
            other => panic!("unexpected step {other:?}"),
        }
        assert_eq!(sh.controller().view().len(), 73);
    }

    #[test]
    fn options_without_matches_say_so() {
        let mut sh = shell();
        let step = sh.dispatch(Command::Options(OptionKind::Guild, "zzz".to_string()));
        assert_eq!(step, Step::Print("No guild found.\n".to_string()));
    }
}
