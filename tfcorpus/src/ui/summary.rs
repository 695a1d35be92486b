// tfcorpus/src/ui/summary.rs
//! Renders the end-of-run statistics table.

use anyhow::Result;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use owo_colors::OwoColorize;
use std::io::Write;

use crate::commands::clean::CorpusReport;

/// Writes the cleaning statistics and output paths to `writer`.
pub fn print_summary<W: Write>(report: &CorpusReport, writer: &mut W, supports_color: bool) -> Result<()> {
    let stats = &report.stats;
    let rows: [(&str, u64); 8] = [
        ("Total files processed", stats.total),
        ("Successfully cleaned", stats.cleaned),
        ("Duplicates removed", stats.duplicate),
        ("Invalid syntax removed", stats.invalid_syntax),
        ("Too small", stats.too_small),
        ("Too large", stats.too_large),
        ("Too small after cleaning", stats.too_small_after_clean),
        ("Sensitive data sanitized", stats.sensitive_sanitized),
    ];

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Outcome", "Files"]);
    for (label, count) in rows {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(count).set_alignment(CellAlignment::Right),
        ]);
    }

    let title = "Cleaning stats";
    if supports_color {
        writeln!(writer, "\n{}", title.bold().cyan())?;
    } else {
        writeln!(writer, "\n{}", title)?;
    }
    writeln!(writer, "{}", table)?;

    let ready = format!("Training samples ready: {}", report.records.len());
    if supports_color {
        writeln!(writer, "{}", ready.green())?;
    } else {
        writeln!(writer, "{}", ready)?;
    }
    writeln!(writer, "JSONL path  : {}", report.jsonl_path.display())?;
    writeln!(writer, "JSON path   : {}", report.json_path.display())?;
    writeln!(writer, "Summary path: {}", report.summary_path.display())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tfcorpus_core::{CleaningOutcome, RejectReason, RunStatistics};

    #[test]
    fn plain_output_lists_every_counter() {
        let mut stats = RunStatistics::new();
        stats.record(&CleaningOutcome::Rejected(RejectReason::Duplicate));
        let report = CorpusReport {
            records: Vec::new(),
            stats,
            jsonl_path: PathBuf::from("out/training_dataset.jsonl"),
            json_path: PathBuf::from("out/training_dataset.json"),
            summary_path: PathBuf::from("out/cleaning_summary.json"),
        };

        let mut buf = Vec::new();
        print_summary(&report, &mut buf, false).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("Duplicates removed"));
        assert!(text.contains("Too small after cleaning"));
        assert!(text.contains("Training samples ready: 0"));
        assert!(text.contains("training_dataset.jsonl"));
        assert!(!text.contains('\u{1b}'));
    }
}
