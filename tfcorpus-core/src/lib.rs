// tfcorpus-core/src/lib.rs
//! # tfcorpus Core Library
//!
//! `tfcorpus-core` turns raw Terraform files of unknown quality into cleaned,
//! deduplicated training samples. It is pure in-memory string processing; the
//! `tfcorpus` binary does the directory walking and writing.
//!
//! ## Modules
//!
//! * `fingerprint`: Normal-form hashing and the per-run seen set.
//! * `validators`: Structural plausibility checks.
//! * `config`: Redaction rules and pipeline settings (YAML).
//! * `sanitizers`: Rule compilation and caching.
//! * `redactor`: Sensitive-value redaction.
//! * `comments`: Comment stripping with string-literal awareness.
//! * `formatting`: Whitespace canonicalization and line splitting.
//! * `pipeline`: The per-file gate chain.
//! * `record`: Training record construction.
//! * `stats`: Run statistics.
//!
//! ## Usage Example
//!
//! ```rust
//! use tfcorpus_core::{CleanerConfig, Cleaner, SeenFingerprints, CleaningOutcome};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let config = CleanerConfig::load_default_rules()?;
//!     let cleaner = Cleaner::new(&config)?;
//!     let seen = SeenFingerprints::new();
//!
//!     let input = "resource \"aws_db_instance\" \"db\" {\n  engine   = \"postgres\"\n  password = \"hunter2\" # rotate me\n}\n";
//!     match cleaner.clean_file(input, &seen) {
//!         CleaningOutcome::Accepted { content, .. } => {
//!             assert!(content.contains("var.password"));
//!             assert!(!content.contains("hunter2"));
//!         }
//!         CleaningOutcome::Rejected(reason) => println!("rejected: {}", reason),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Per-file rejections are ordinary values (`CleaningOutcome::Rejected`).
//! Only setup can fail: config loading returns `anyhow::Error`, rule and
//! template problems surface as `CorpusError`.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod comments;
pub mod config;
pub mod errors;
pub mod fingerprint;
pub mod formatting;
pub mod pipeline;
pub mod record;
pub mod redactor;
pub mod sanitizers;
pub mod stats;
pub mod validators;

pub use comments::{strip_comments, strip_comments_with, QuoteTracking};
pub use config::{
    merge_config, CleanerConfig, RedactionRule, RuleShape, DEFAULT_MAX_CHARS, DEFAULT_MIN_CHARS,
    MAX_PATTERN_LENGTH,
};
pub use errors::CorpusError;
pub use fingerprint::{normalize_for_hash, Fingerprint, SeenFingerprints};
pub use formatting::{normalize_formatting, split_lines};
pub use pipeline::{Cleaner, CleaningOutcome, RejectReason};
pub use record::{cloud_label, FileLocation, RecordBuilder, RecordMetadata, TrainingRecord};
pub use redactor::{Redaction, Redactor};
pub use sanitizers::compiler::{compile_rules, CompiledRule, CompiledRules};
pub use stats::RunStatistics;
pub use validators::is_valid_terraform;
