//! The corpus cleaning run.
//!
//! Walks the scraped tree, pushes every file through the core pipeline with a
//! single run-wide seen set, mirrors accepted files into the output tree and
//! writes the datasets and summary.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::Serialize;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tfcorpus_core::{
    Cleaner, CleaningOutcome, RecordBuilder, RunStatistics, SeenFingerprints, TrainingRecord,
};

use crate::utils::discovery::{discover_tf_files, SourceFile};

pub const JSONL_FILE_NAME: &str = "training_dataset.jsonl";
pub const JSON_FILE_NAME: &str = "training_dataset.json";
pub const SUMMARY_FILE_NAME: &str = "cleaning_summary.json";

/// Number of records copied into the summary preview.
const PREVIEW_LEN: usize = 2;

/// Contents of `cleaning_summary.json`.
#[derive(Debug, Serialize)]
pub struct CleaningSummary<'a> {
    pub total_training_samples: usize,
    pub cleaning_stats: &'a RunStatistics,
    pub sample_preview: &'a [TrainingRecord],
}

/// What a run produced.
#[derive(Debug)]
pub struct CorpusReport {
    pub records: Vec<TrainingRecord>,
    pub stats: RunStatistics,
    pub jsonl_path: PathBuf,
    pub json_path: PathBuf,
    pub summary_path: PathBuf,
}

/// Cleans every file under `input_dir` and writes the corpus to `output_dir`.
///
/// Rejected files only show up in the statistics. The datasets and summary are
/// written even when nothing was accepted.
pub fn run_clean(
    cleaner: &Cleaner,
    record_builder: &RecordBuilder<'_>,
    input_dir: &Path,
    output_dir: &Path,
) -> Result<CorpusReport> {
    info!("Input : {}", input_dir.display());
    info!("Output: {}", output_dir.display());

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let files = discover_tf_files(input_dir)?;
    info!("Discovered {} .tf files.", files.len());

    let seen = SeenFingerprints::new();
    let mut stats = RunStatistics::new();
    let mut records = Vec::new();
    let mut current_provider: Option<&str> = None;

    for file in &files {
        if current_provider != Some(file.location.provider.as_str()) {
            info!("Provider: {}", file.location.provider);
            current_provider = Some(file.location.provider.as_str());
        }

        let Some(content) = read_lossy(file) else {
            continue;
        };

        let outcome = cleaner.clean_file(&content, &seen);
        stats.record(&outcome);

        match outcome {
            CleaningOutcome::Accepted { content, redacted_rules } => {
                if !redacted_rules.is_empty() {
                    info!(
                        "Redacted {} in {}",
                        redacted_rules.join(", "),
                        file.path.display()
                    );
                }
                write_cleaned_file(output_dir, file, &content)?;
                records.push(record_builder.build(&file.location, content)?);
            }
            CleaningOutcome::Rejected(reason) => {
                debug!("Skipped {} ({})", file.path.display(), reason);
            }
        }
    }

    let jsonl_path = output_dir.join(JSONL_FILE_NAME);
    let json_path = output_dir.join(JSON_FILE_NAME);
    let summary_path = output_dir.join(SUMMARY_FILE_NAME);

    write_jsonl(&jsonl_path, &records)?;
    write_pretty_json(&json_path, &records)?;
    let summary = CleaningSummary {
        total_training_samples: records.len(),
        cleaning_stats: &stats,
        sample_preview: &records[..records.len().min(PREVIEW_LEN)],
    };
    write_pretty_json(&summary_path, &summary)?;

    info!(
        "Cleaning complete: {} of {} files accepted, {} fingerprints seen.",
        stats.cleaned,
        stats.total,
        seen.len()
    );

    Ok(CorpusReport {
        records,
        stats,
        jsonl_path,
        json_path,
        summary_path,
    })
}

/// Reads a file, replacing invalid UTF-8 instead of failing. Unreadable files
/// are logged and skipped.
fn read_lossy(file: &SourceFile) -> Option<String> {
    match fs::read(&file.path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            warn!("Could not read {}: {}", file.path.display(), e);
            None
        }
    }
}

fn write_cleaned_file(output_dir: &Path, file: &SourceFile, content: &str) -> Result<()> {
    let location = &file.location;
    let dest_dir = output_dir
        .join(&location.provider)
        .join(&location.service)
        .join(&location.module);
    fs::create_dir_all(&dest_dir)
        .with_context(|| format!("Failed to create directory {}", dest_dir.display()))?;

    let dest = dest_dir.join(&location.file_name);
    fs::write(&dest, content)
        .with_context(|| format!("Failed to write cleaned file {}", dest.display()))
}

fn write_jsonl(path: &Path, records: &[TrainingRecord]) -> Result<()> {
    let file = fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn write_pretty_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tfcorpus_core::CleanerConfig;

    const MAIN_TF: &str = "resource \"aws_instance\" \"web\" {\n  ami = \"ami-123\"\n  instance_type = \"t3.micro\"\n}\n";

    fn clean_with_defaults(input: &Path, output: &Path) -> CorpusReport {
        let config = CleanerConfig::load_default_rules().unwrap();
        let cleaner = Cleaner::new(&config).unwrap();
        let builder = RecordBuilder::from_config(&config.records).unwrap();
        run_clean(&cleaner, &builder, input, output).unwrap()
    }

    #[test]
    fn accepted_files_are_mirrored_and_recorded() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        let module_dir = input.path().join("aws/ec2/web-module");
        fs::create_dir_all(&module_dir).unwrap();
        fs::write(module_dir.join("main.tf"), MAIN_TF).unwrap();
        fs::write(module_dir.join("copy.tf"), format!("# dup\n{}", MAIN_TF)).unwrap();

        let report = clean_with_defaults(input.path(), output.path());

        // copy.tf sorts first, so it is the one kept.
        assert_eq!(report.stats.total, 2);
        assert_eq!(report.stats.cleaned, 1);
        assert_eq!(report.stats.duplicate, 1);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].metadata.file, "copy.tf");
        assert!(output.path().join("aws/ec2/web-module/copy.tf").is_file());
        assert!(!output.path().join("aws/ec2/web-module/main.tf").exists());

        let jsonl = fs::read_to_string(&report.jsonl_path).unwrap();
        assert_eq!(jsonl.lines().count(), 1);
    }

    #[test]
    fn invalid_utf8_is_decoded_lossily() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        let module_dir = input.path().join("aws/s3/bucket");
        fs::create_dir_all(&module_dir).unwrap();
        let mut bytes = MAIN_TF.replace("t3.micro", "t3.micro\u{0}").into_bytes();
        bytes.extend_from_slice(b"# \xff\xfe trailing\n");
        fs::write(module_dir.join("main.tf"), bytes).unwrap();

        let report = clean_with_defaults(input.path(), output.path());
        assert_eq!(report.stats.cleaned, 1);
    }

    #[test]
    fn empty_input_still_writes_outputs() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        let report = clean_with_defaults(input.path(), output.path());

        assert_eq!(report.stats, RunStatistics::default());
        assert_eq!(fs::read_to_string(&report.jsonl_path).unwrap(), "");
        assert_eq!(fs::read_to_string(&report.json_path).unwrap(), "[]");
        let summary: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&report.summary_path).unwrap()).unwrap();
        assert_eq!(summary["total_training_samples"], 0);
        assert_eq!(summary["sample_preview"], serde_json::json!([]));
    }
}
