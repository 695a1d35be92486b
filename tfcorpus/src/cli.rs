//! Command-line interface of the `tfcorpus` binary.
//! License: MIT OR Apache-2.0

use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_INPUT_DIR: &str = "terraform_training_data";
pub const DEFAULT_OUTPUT_DIR: &str = "terraform_cleaned_data";

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "tfcorpus",
    version = env!("CARGO_PKG_VERSION"),
    about = "Clean, redact and deduplicate scraped Terraform files into a fine-tuning corpus",
    long_about = "Reads a <provider>/<service>/<module>/*.tf tree produced by the scraper, drops files that are too small, too large, duplicated or not plausibly Terraform, redacts secrets, strips comments and normalizes layout. Writes the cleaned tree plus JSONL/JSON training datasets and a cleaning summary to the output directory."
)]
pub struct Cli {
    /// Root of the scraped tree.
    #[arg(long = "input-dir", short = 'i', value_name = "DIR", default_value = DEFAULT_INPUT_DIR)]
    pub input_dir: PathBuf,

    /// Where the cleaned tree and datasets are written.
    #[arg(long = "output-dir", short = 'o', value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// YAML file merged over the built-in rules and limits.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Redaction rules to turn off (comma-separated).
    #[arg(long, short = 'x', value_delimiter = ',')]
    pub disable: Vec<String>,

    /// Suppress logging and the statistics table.
    #[arg(long, short = 'q', conflicts_with = "debug")]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long, short = 'd')]
    pub debug: bool,
}
