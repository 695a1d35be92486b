// tfcorpus/src/main.rs
//! tfcorpus entry point.
//!
//! Loads the cleaner configuration, runs the corpus build and prints the
//! statistics table.

use anyhow::{Context, Result};
use clap::Parser;
use is_terminal::IsTerminal;
use log::LevelFilter;
use std::io;

use tfcorpus::cli::Cli;
use tfcorpus::logger;
use tfcorpus::run_clean;
use tfcorpus::ui::summary::print_summary;
use tfcorpus_core::{merge_config, Cleaner, CleanerConfig, RecordBuilder};

fn main() -> Result<()> {
    let args = Cli::parse();

    if args.quiet {
        logger::init_logger(Some(LevelFilter::Off));
    } else if args.debug {
        logger::init_logger(Some(LevelFilter::Debug));
    } else {
        logger::init_logger(None);
    }

    // 1. Built-in rules, then the user's file on top.
    let default_config = CleanerConfig::load_default_rules()?;
    let user_config = match &args.config {
        Some(path) => Some(CleanerConfig::load_from_file(path)?),
        None => None,
    };
    let mut config = merge_config(default_config, user_config);
    config.disable_rules(&args.disable);

    // 2. Pipeline pieces.
    let cleaner = Cleaner::new(&config).context("Failed to build cleaner")?;
    let record_builder =
        RecordBuilder::from_config(&config.records).context("Invalid instruction template")?;

    // 3. Run.
    let report = run_clean(&cleaner, &record_builder, &args.input_dir, &args.output_dir)?;

    if !args.quiet {
        let stderr = io::stderr();
        let supports_color = stderr.is_terminal();
        print_summary(&report, &mut stderr.lock(), supports_color)?;
    }

    Ok(())
}
