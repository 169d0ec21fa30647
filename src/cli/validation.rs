use crate::cli::args::CliArgs;
use crate::model::NO_REGION;
use crate::output::OutputFormat;
use crate::ranking::{OptionKind, SortField};

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(raw) = args.sort.as_deref() {
        SortField::parse(raw).ok_or_else(|| format!("invalid --sort '{raw}'"))?;
    }
    if let Some(raw) = args.output_format.as_deref() {
        OutputFormat::parse(raw).ok_or_else(|| {
            format!("invalid --output-format '{raw}', expected text, json, xml or html")
        })?;
    }
    if let Some(raw) = args.list_options.as_deref() {
        OptionKind::parse(raw).ok_or_else(|| {
            format!("invalid --list-options '{raw}', expected guild, union or realm")
        })?;
    }
    if args.page == Some(0) {
        return Err("invalid page, expected positive integer".to_string());
    }
    if args.region == Some(NO_REGION) {
        return Err("region 0 is not a selectable region".to_string());
    }
    if args.timeout == Some(0) {
        return Err("invalid timeout, expected positive integer".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["crowrank"];
        argv.extend_from_slice(extra);
        CliArgs::parse_from(argv)
    }

    #[test]
    fn accepts_known_values() {
        let args = parse(&["-s", "growth", "--of", "html", "--list-options", "realm"]);
        assert!(validate(&args).is_ok());
    }

    #[test]
    fn rejects_unknown_sort_field() {
        let err = validate(&parse(&["-s", "level"])).unwrap_err();
        assert!(err.contains("--sort"));
    }

    #[test]
    fn rejects_sentinel_region_and_zero_page() {
        assert!(validate(&parse(&["-r", "0"])).is_err());
        assert!(validate(&parse(&["-p", "0"])).is_err());
    }
}
