//! Plain text output: the version line and a human-readable change summary.

use colored::Colorize;
use semtype_core::{ApiChange, ChangeKind, Classification, RunReport};

/// Text output formatter
pub struct TextOutput;

impl TextOutput {
    /// The next version, as printed on stdout.
    pub fn version_line(report: &RunReport) -> String {
        report.next.to_string()
    }

    /// Multi-line summary of what changed and why the version moved.
    pub fn summary(report: &RunReport) -> String {
        let mut out = String::new();

        let headline = format!(
            "{} -> {} ({})",
            report.previous, report.next, report.classification
        );
        let headline = match report.classification {
            Classification::Breaking => headline.red().bold(),
            Classification::Additive => headline.green().bold(),
            Classification::NoChange => headline.dimmed(),
        };
        out.push_str(&headline.to_string());
        out.push('\n');

        if report.changes.is_empty() {
            out.push_str(&"  no exported API changes".dimmed().to_string());
            out.push('\n');
        }
        for change in &report.changes {
            out.push_str(&Self::change_line(change));
            out.push('\n');
        }

        if !report.persisted {
            out.push_str(&"  (dry run, state not written)".dimmed().to_string());
            out.push('\n');
        }

        out
    }

    fn change_line(change: &ApiChange) -> String {
        let marker = match change.kind {
            ChangeKind::Added => "+".green(),
            ChangeKind::Removed => "-".red(),
            ChangeKind::Modified => "~".yellow(),
        };
        let label = format!("{} {}", change.partition.as_str(), change.name);

        match (&change.old_signature, &change.new_signature) {
            (Some(old), Some(new)) => format!(
                "  {} {}\n      {} {}\n      {} {}",
                marker,
                label.bold(),
                "was".dimmed(),
                old,
                "now".dimmed(),
                new
            ),
            (_, Some(sig)) | (Some(sig), None) => {
                format!("  {} {} {}", marker, label.bold(), sig.dimmed())
            }
            (None, None) => format!("  {} {}", marker, label.bold()),
        }
    }
}
