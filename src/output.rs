//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output, including colored output,
//! a spinner for long-running operations, and the failure summary table.

use crate::report::Failure;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::time::Duration;

/// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Spinners for running operations
/// - Summary tables of failures
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sortium::output::OutputFormatter;
    /// OutputFormatter::success("Files sorted successfully!");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates a ticking spinner showing `message`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sortium::output::OutputFormatter;
    /// let spinner = OutputFormatter::spinner("Sorting...");
    /// spinner.finish_and_clear();
    /// ```
    pub fn spinner(message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    /// Prints every failure followed by a per-kind count table.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sortium::output::OutputFormatter;
    /// use sortium::{Failure, FailureKind};
    ///
    /// let failures = vec![Failure::new(FailureKind::Move, "/tmp/a.txt", "permission denied")];
    /// OutputFormatter::failure_summary(&failures);
    /// ```
    pub fn failure_summary(failures: &[Failure]) {
        Self::header("FAILURES");

        for failure in failures {
            Self::error(&format!(
                "{}: {}",
                failure.path.display(),
                failure.message
            ));
        }

        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for failure in failures {
            *counts.entry(failure.kind.to_string()).or_insert(0) += 1;
        }

        let width = counts.keys().map(|k| k.len()).max().unwrap_or(0).max(4);

        println!();
        println!("{:<width$} | {}", "Kind".bold(), "Count".bold(), width = width);
        println!("{}", "-".repeat(width + 10));
        for (kind, count) in &counts {
            println!("{:<width$} | {}", kind, count.to_string().red(), width = width);
        }
        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {}",
            "Total".bold(),
            failures.len().to_string().red().bold(),
            width = width
        );
    }
}
