// tfcorpus/src/lib.rs
//! # tfcorpus CLI
//!
//! Builds a fine-tuning corpus from a scraped Terraform tree using
//! `tfcorpus-core` for the per-file cleaning.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;
pub mod utils;

pub use commands::clean::{run_clean, CorpusReport};
