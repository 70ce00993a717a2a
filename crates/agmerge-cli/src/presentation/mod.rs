//! Rendering of a [`MergeOutcome`] for the terminal.
//!
//! Plain output is a single line; colour is applied only when the caller
//! says stdout is a terminal, so piped output stays byte-for-byte stable.

use agmerge_runtime::{MergeOutcome, MergeReport};
use owo_colors::OwoColorize;
use std::path::Path;

pub fn render_plain(outcome: &MergeOutcome, use_color: bool) -> String {
    match outcome {
        MergeOutcome::Skipped { files_found } => {
            format!("Found {} session file(s). No merge needed.", files_found)
        }
        MergeOutcome::Merged(report) if report.dry_run => {
            let name = file_name(&report.output_path);
            format!(
                "Would merge {} session file(s) ({} messages) into {}",
                report.fragments.len(),
                report.message_count,
                paint(&name, use_color, |s| s.yellow().bold().to_string())
            )
        }
        MergeOutcome::Merged(report) => {
            let name = file_name(&report.output_path);
            format!(
                "Created merged session file: {}",
                paint(&name, use_color, |s| s.green().bold().to_string())
            )
        }
    }
}

pub fn render_json(outcome: &MergeOutcome) -> serde_json::Result<String> {
    serde_json::to_string_pretty(outcome)
}

/// Summary line for a report, used in verbose logs.
pub fn describe_report(report: &MergeReport) -> String {
    format!(
        "{} fragment(s), {} message(s), {} raw companion(s) left untouched",
        report.fragments.len(),
        report.message_count,
        report.raw_companions.len()
    )
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn paint(text: &str, use_color: bool, style: impl Fn(&str) -> String) -> String {
    if use_color {
        style(text)
    } else {
        text.to_string()
    }
}
