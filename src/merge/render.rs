//! Human-readable merge summary, split for size-limited transports.

use super::Phase;
use super::report::{MergeOutcome, MergeReport, Sample};
use crate::config::ReportConfig;
use std::fmt::Display;

const ELLIPSIS: char = '…';

#[derive(Debug, Clone, Copy)]
pub struct ReportBuilder {
    max_examples: usize,
    max_chunk_len: usize,
}

impl ReportBuilder {
    /// `max_chunk_len` is counted in characters and is at least 1.
    #[must_use]
    pub fn new(max_examples: usize, max_chunk_len: usize) -> Self {
        Self {
            max_examples,
            max_chunk_len: max_chunk_len.max(1),
        }
    }

    #[must_use]
    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(config.max_examples, config.max_chunk_len)
    }

    /// Renders the report and splits it into chunks of at most
    /// `max_chunk_len` characters. Chunks only break between lines.
    #[must_use]
    pub fn build(&self, report: &MergeReport) -> Vec<String> {
        paginate(&self.lines(report), self.max_chunk_len)
    }

    #[must_use]
    pub fn lines(&self, report: &MergeReport) -> Vec<String> {
        let mut lines = vec!["Merge results:".to_string()];

        for (phase, label) in [
            (Phase::Entries, "Entries"),
            (Phase::Episodes, "Episodes"),
            (Phase::Ongoing, "Ongoing"),
        ] {
            lines.push(format!(
                "• {label}: {} added, {} skipped",
                report.transferred.get(phase),
                report.skipped.get(phase)
            ));
        }
        lines.push(format!(
            "• Code conflicts resolved: {}",
            report.conflicts_resolved
        ));

        match &report.outcome {
            MergeOutcome::Completed => {}
            MergeOutcome::Cancelled { next_phase } => {
                lines.push(String::new());
                lines.push(format!(
                    "Merge cancelled before the {next_phase} phase; earlier phases were kept."
                ));
            }
            MergeOutcome::PartiallyApplied {
                failed_phase,
                reason,
            } => {
                lines.push(String::new());
                lines.push(format!(
                    "Merge stopped in the {failed_phase} phase: {reason}"
                ));
                lines.push("Earlier phases were kept; that phase was rolled back.".to_string());
            }
        }

        self.push_section(&mut lines, "New entries:", &report.added);
        self.push_section(&mut lines, "Entries with changed codes:", &report.renamed);

        lines
    }

    fn push_section<T: Display>(&self, lines: &mut Vec<String>, header: &str, sample: &Sample<T>) {
        if sample.is_empty() {
            return;
        }

        lines.push(String::new());
        lines.push(header.to_string());

        let shown: Vec<String> = sample
            .items()
            .iter()
            .take(self.max_examples)
            .map(ToString::to_string)
            .collect();
        let omitted = sample.total().saturating_sub(shown.len());

        lines.extend(shown);
        if omitted > 0 {
            lines.push(format!("+{omitted} more"));
        }
    }
}

/// Packs lines into chunks of at most `max_len` characters. A line longer
/// than `max_len` on its own is shortened with an ellipsis. Blank lines are
/// only emitted between two non-blank lines of the same chunk.
#[must_use]
pub fn paginate(lines: &[String], max_len: usize) -> Vec<String> {
    let max_len = max_len.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    let mut pending_blanks = 0;

    for line in lines {
        if line.is_empty() {
            if !current.is_empty() {
                pending_blanks += 1;
            }
            continue;
        }

        let line = fit_line(line, max_len);
        let line_len = line.chars().count();

        if !current.is_empty() {
            // Each pending blank adds one newline on top of the separator.
            let needed = current_len + 1 + pending_blanks + line_len;
            if needed > max_len {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            } else {
                for _ in 0..=pending_blanks {
                    current.push('\n');
                }
                current_len += 1 + pending_blanks;
            }
        }
        pending_blanks = 0;

        current.push_str(&line);
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

fn fit_line(line: &str, max_len: usize) -> String {
    if line.chars().count() <= max_len {
        return line.to_string();
    }

    let mut shortened: String = line.chars().take(max_len - 1).collect();
    shortened.push(ELLIPSIS);
    shortened
}
