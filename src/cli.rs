//! Command-line interface module for sortium.
//!
//! This module handles all CLI-related functionality including:
//! - Argument definitions (clap derive)
//! - Configuration loading and merging with command-line flags
//! - Dispatch to the flatten and sort engines
//! - Reporting of non-fatal failures

use crate::config::Config;
use crate::file_utils::find_unique_extensions;
use crate::flatten::flatten;
use crate::output::OutputFormatter;
use crate::report::CollectingReporter;
use crate::sorter::{Dispatch, RuleSet, Sorter};
use crate::traversal::IgnoreSet;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "sortium")]
#[command(about = "Sort files into category and date folders, or flatten nested directories")]
#[command(version)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (default: ./.sortiumrc.toml, then ~/.config/sortium/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: SortCommand,
}

/// Represents a CLI command to execute.
#[derive(Debug, Clone, Subcommand)]
pub enum SortCommand {
    /// Move every file of a directory tree into one destination folder
    Flatten {
        /// Directory to flatten
        source: PathBuf,
        /// Folder receiving all files
        dest: PathBuf,
        /// Entry names to skip at every depth
        #[arg(short, long)]
        ignore: Vec<String>,
        /// Remove subdirectories once emptied
        #[arg(long)]
        remove_subdirs: bool,
    },
    /// Move files into category folders by extension
    SortType {
        /// Directory whose files are sorted
        folder: PathBuf,
        /// Entry names to skip
        #[arg(short, long)]
        ignore: Vec<String>,
        /// Run the moves on a thread pool
        #[arg(long)]
        parallel: bool,
    },
    /// Move files of category folders into modification-date subfolders
    SortDate {
        /// Directory holding the category folders
        folder: PathBuf,
        /// Category folder names to process
        #[arg(required = true)]
        categories: Vec<String>,
    },
    /// Move files matching regex rules into category folders, recursively
    SortRegex {
        /// Directory tree to scan
        folder: PathBuf,
        /// Base folder receiving the category folders
        dest: PathBuf,
        /// Rule as CATEGORY=PATTERN; overrides rules from the config file
        #[arg(short, long = "rule")]
        rules: Vec<String>,
    },
    /// List the distinct file extensions found under a directory
    Extensions {
        /// Directory tree to scan
        folder: PathBuf,
    },
}

/// Runs the CLI with configuration discovered from the usual locations.
///
/// # Examples
///
/// ```no_run
/// use sortium::cli::{run_cli, SortCommand};
/// use std::path::PathBuf;
///
/// let command = SortCommand::SortType {
///     folder: PathBuf::from("/path/to/downloads"),
///     ignore: vec![],
///     parallel: false,
/// };
/// if let Err(e) = run_cli(command) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(command: SortCommand) -> Result<(), String> {
    run_cli_with_config(command, None)
}

/// Runs the CLI with an optional configuration file.
///
/// Non-fatal failures are printed as a summary and do not make this function
/// fail; only fatal errors (missing root, bad configuration, a failed regex
/// sort) are returned.
pub fn run_cli_with_config(command: SortCommand, config_path: Option<&Path>) -> Result<(), String> {
    let config =
        Config::load(config_path).map_err(|e| format!("Error loading configuration: {}", e))?;
    let reporter = Arc::new(CollectingReporter::new());

    match command {
        SortCommand::Flatten {
            source,
            dest,
            ignore,
            remove_subdirs,
        } => {
            let ignore = merged_ignore(&config, ignore);
            let spinner = OutputFormatter::spinner(&format!("Flattening {}", source.display()));
            let result = flatten(&source, &dest, &ignore, remove_subdirs, reporter.as_ref());
            spinner.finish_and_clear();
            result.map_err(|e| e.to_string())?;
            finish(
                &reporter,
                &format!("Flattened {} into {}", source.display(), dest.display()),
            );
        }
        SortCommand::SortType {
            folder,
            ignore,
            parallel,
        } => {
            let ignore = merged_ignore(&config, ignore);
            let sorter = build_sorter(&config, &reporter)?;
            let dispatch = if parallel {
                Dispatch::Parallel
            } else {
                Dispatch::Sequential
            };
            let spinner = OutputFormatter::spinner(&format!("Sorting {} by type", folder.display()));
            let result = sorter.sort_by_type(&folder, &ignore, dispatch);
            spinner.finish_and_clear();
            result.map_err(|e| e.to_string())?;
            finish(&reporter, &format!("Sorted {} by type", folder.display()));
        }
        SortCommand::SortDate { folder, categories } => {
            let sorter = build_sorter(&config, &reporter)?;
            let spinner = OutputFormatter::spinner(&format!("Sorting {} by date", folder.display()));
            let result = sorter.sort_by_date(&folder, categories.as_slice());
            spinner.finish_and_clear();
            result.map_err(|e| e.to_string())?;
            finish(&reporter, &format!("Sorted {} by date", folder.display()));
        }
        SortCommand::SortRegex {
            folder,
            dest,
            rules,
        } => {
            let rules = if rules.is_empty() {
                config.rule_set().map_err(|e| e.to_string())?
            } else {
                parse_rules(&rules)?
            };
            if rules.is_empty() {
                return Err(
                    "No regex rules given: pass --rule CATEGORY=PATTERN or add [[rules]] to the configuration"
                        .to_string(),
                );
            }
            let sorter = build_sorter(&config, &reporter)?;
            let spinner = OutputFormatter::spinner(&format!("Sorting {} by regex", folder.display()));
            let result = sorter.sort_by_regex(&folder, &rules, &dest);
            spinner.finish_and_clear();
            result.map_err(|e| e.to_string())?;
            finish(&reporter, &format!("Sorted {} by regex", folder.display()));
        }
        SortCommand::Extensions { folder } => {
            let extensions = find_unique_extensions(&folder).map_err(|e| e.to_string())?;
            OutputFormatter::header(&format!("Extensions under {}", folder.display()));
            for ext in &extensions {
                OutputFormatter::plain(&format!("  {}", ext));
            }
            OutputFormatter::info(&format!("{} distinct extensions", extensions.len()));
        }
    }

    Ok(())
}

/// Parses `CATEGORY=PATTERN` arguments, keeping their order.
pub fn parse_rules(rules: &[String]) -> Result<RuleSet, String> {
    let pairs = rules
        .iter()
        .map(|rule| {
            rule.split_once('=')
                .ok_or_else(|| format!("Invalid rule '{}': expected CATEGORY=PATTERN", rule))
        })
        .collect::<Result<Vec<_>, _>>()?;

    RuleSet::new(pairs).map_err(|e| e.to_string())
}

fn merged_ignore(config: &Config, extra: Vec<String>) -> IgnoreSet {
    let mut ignore = config.ignore_set();
    for name in extra {
        ignore.insert(name);
    }
    ignore
}

fn build_sorter(config: &Config, reporter: &Arc<CollectingReporter>) -> Result<Sorter, String> {
    let table = config
        .category_table()
        .map_err(|e| format!("Error building category table: {}", e))?;
    Ok(Sorter::with_reporter(table, reporter.clone()))
}

fn finish(reporter: &CollectingReporter, message: &str) {
    let failures = reporter.take();
    if failures.is_empty() {
        OutputFormatter::success(message);
    } else {
        OutputFormatter::failure_summary(&failures);
        OutputFormatter::warning(&format!(
            "{} with {} item(s) left unprocessed",
            message,
            failures.len()
        ));
    }
}
