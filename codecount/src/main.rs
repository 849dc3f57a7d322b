//! # codecount
//!
//! A CLI tool that counts total, non-empty and empty lines per file and per
//! directory, and shows the result as an indented tree.
//!
//! ## Overview
//!
//! codecount is built on top of codecountlib. Each path given on the command
//! line is scanned on its own; a failure on one path does not stop the others.
//!
//! ## Features
//!
//! - **Configurable types**: select file types by name with `--type`
//! - **Regex exclusions**: skip directories and files whose names match
//! - **Multiple output formats**: Table (default), JSON
//! - **Depth limit**: show only the top levels with `--depth`
//!
//! ## Usage
//!
//! ```bash
//! # Count lines under the current directory
//! codecount
//!
//! # Only Python and Rust files, two levels deep
//! codecount src --type Python,Rust --depth 2
//!
//! # Skip generated code and output as JSON
//! codecount . --exclude-dir generated --output json
//!
//! # Use a custom configuration
//! codecount . --config codecount.json
//! ```

mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use codecountlib::{scan, Config, ReportNode, ReportTable, ScanOptions, ScanSummary, TreeModel};
use rayon::prelude::*;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("codecount")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Count total, non-empty and empty lines per file and directory")
        .arg(
            Arg::new("paths")
                .help("Files or directories to analyze (defaults to current directory)")
                .value_parser(value_parser!(PathBuf))
                .num_args(0..)
                .default_value("."),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_parser(value_parser!(PathBuf))
                .help("Configuration file with file types and exclusion patterns"),
        )
        .arg(
            Arg::new("type")
                .short('t')
                .long("type")
                .action(ArgAction::Append)
                .value_delimiter(',')
                .help("File types to count, by configured name (comma-separated, repeatable)"),
        )
        .arg(
            Arg::new("exclude-dir")
                .long("exclude-dir")
                .action(ArgAction::Append)
                .help("Skip directories whose names match this regular expression"),
        )
        .arg(
            Arg::new("exclude-file")
                .long("exclude-file")
                .action(ArgAction::Append)
                .help("Skip files whose names match this regular expression"),
        )
        .arg(
            Arg::new("depth")
                .short('d')
                .long("depth")
                .value_parser(value_parser!(usize))
                .help("Show at most this many levels below each root"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(["table", "json"])
                .default_value("table")
                .help("Output format"),
        )
        .arg(
            Arg::new("no-follow")
                .long("no-follow")
                .action(ArgAction::SetTrue)
                .help("Do not follow symbolic links"),
        )
        .arg(
            Arg::new("list-types")
                .long("list-types")
                .action(ArgAction::SetTrue)
                .help("Print the configured file types and exit"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Log more detail to stderr (-v, -vv)"),
        )
}

/// Log to stderr. `RUST_LOG` wins over `-v`.
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Extract a list of string values from matches
fn extract_strings(matches: &ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .map(|v| v.cloned().collect())
        .unwrap_or_default()
}

/// Load the configuration and append command-line exclusions
fn load_config(matches: &ArgMatches) -> anyhow::Result<Config> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    config.filter.dir.extend(extract_strings(matches, "exclude-dir"));
    config.filter.file.extend(extract_strings(matches, "exclude-file"));
    config.validate()?;

    Ok(config)
}

/// Build scan options from the configuration and matches
fn build_options(matches: &ArgMatches, config: &Config) -> anyhow::Result<ScanOptions> {
    let types = extract_strings(matches, "type");
    let options = ScanOptions::from_config(config, types.as_slice())?;
    Ok(options.follow_links(!matches.get_flag("no-follow")))
}

/// Outcome of scanning one path
enum PathReport {
    Scanned {
        table: ReportTable,
        tree: ReportNode,
        summary: ScanSummary,
    },
    Failed(anyhow::Error),
}

/// JSON entry for one path
#[derive(Debug, Serialize)]
struct JsonEntry<'a> {
    path: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a ScanSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tree: Option<&'a ReportNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn scan_path(path: &Path, options: &ScanOptions, depth: Option<usize>) -> PathReport {
    match scan(path, options).with_context(|| format!("cannot scan '{}'", path.display())) {
        Ok(tree) => PathReport::Scanned {
            table: ReportTable::from_model(&TreeModel::new(&tree), depth),
            tree: ReportNode::from_tree(&tree),
            summary: tree.summary(),
        },
        Err(err) => {
            tracing::warn!(path = %path.display(), "scan failed: {err:#}");
            PathReport::Failed(err)
        }
    }
}

fn print_json(reports: &[(PathBuf, PathReport)]) -> anyhow::Result<()> {
    let entries: Vec<JsonEntry<'_>> = reports
        .iter()
        .map(|(path, report)| match report {
            PathReport::Scanned { tree, summary, .. } => JsonEntry {
                path,
                summary: Some(summary),
                tree: Some(tree),
                error: None,
            },
            PathReport::Failed(err) => JsonEntry {
                path,
                summary: None,
                tree: None,
                error: Some(format!("{err:#}")),
            },
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

fn print_tables(reports: &[(PathBuf, PathReport)]) {
    let mut first = true;
    for (_, report) in reports {
        if let PathReport::Scanned { table, .. } = report {
            if !first {
                println!();
            }
            first = false;
            print!("{}", render::render_table(table));
            eprint!("{}", render::render_errors(table));
        }
    }
}

fn run(matches: &ArgMatches) -> anyhow::Result<bool> {
    let config = load_config(matches)?;

    if matches.get_flag("list-types") {
        print!("{}", render::render_types(&config.types));
        return Ok(true);
    }

    let options = build_options(matches, &config)?;
    let depth = matches.get_one::<usize>("depth").copied();
    let paths: Vec<PathBuf> = matches
        .get_many::<PathBuf>("paths")
        .map(|v| v.cloned().collect())
        .unwrap_or_default();

    let reports: Vec<(PathBuf, PathReport)> = paths
        .into_par_iter()
        .map(|path| {
            let report = scan_path(&path, &options, depth);
            (path, report)
        })
        .collect();

    let json = matches
        .get_one::<String>("output")
        .is_some_and(|format| format == "json");
    if json {
        print_json(&reports)?;
    } else {
        print_tables(&reports);
    }

    let mut ok = true;
    for (_, report) in &reports {
        if let PathReport::Failed(err) = report {
            eprintln!("Error: {err:#}");
            ok = false;
        }
    }
    Ok(ok)
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_tracing(matches.get_count("verbose"));

    match run(&matches) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_valid() {
        build_command().debug_assert();
    }

    #[test]
    fn test_types_are_comma_separated_and_repeatable() {
        let matches = build_command()
            .try_get_matches_from(["codecount", "-t", "Python,Rust", "--type", "Go"])
            .unwrap();
        assert_eq!(extract_strings(&matches, "type"), vec!["Python", "Rust", "Go"]);
    }

    #[test]
    fn test_default_path_and_output() {
        let matches = build_command().try_get_matches_from(["codecount"]).unwrap();
        let paths: Vec<&PathBuf> = matches.get_many::<PathBuf>("paths").unwrap().collect();
        assert_eq!(paths, vec![&PathBuf::from(".")]);
        assert_eq!(matches.get_one::<String>("output").unwrap(), "table");
        assert_eq!(matches.get_count("verbose"), 0);
    }

    #[test]
    fn test_cli_exclusions_extend_config() {
        let matches = build_command()
            .try_get_matches_from(["codecount", "--exclude-dir", "generated"])
            .unwrap();
        let config = load_config(&matches).unwrap();
        assert_eq!(config.filter.dir.last().unwrap(), "generated");
        assert!(config.scan_filter().unwrap().check_dir("generated").is_err());
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let matches = build_command()
            .try_get_matches_from(["codecount", "--exclude-file", "("])
            .unwrap();
        assert!(load_config(&matches).is_err());
    }

    #[test]
    fn test_unknown_type_is_reported() {
        let matches = build_command()
            .try_get_matches_from(["codecount", "--type", "Cobol"])
            .unwrap();
        let config = load_config(&matches).unwrap();
        let err = build_options(&matches, &config).unwrap_err();
        assert!(err.to_string().contains("Cobol"));
    }

    #[test]
    fn test_rejects_unknown_output() {
        let result = build_command().try_get_matches_from(["codecount", "-o", "xml"]);
        assert!(result.is_err());
    }
}
