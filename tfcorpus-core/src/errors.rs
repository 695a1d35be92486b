//! errors.rs - Custom error types for the tfcorpus-core library.
//!
//! Per-file cleaning decisions are never errors (see `pipeline::RejectReason`).
//! This enum only covers failures in setting up a run: loading and compiling
//! rules and rendering templates.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// All error types surfaced by `tfcorpus-core`.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CorpusError {
    #[error("Failed to compile redaction rule '{0}': {1}")]
    RuleCompilationError(String, regex::Error),

    #[error("Rule '{0}': pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    #[error("Rule '{0}': key_value rules need at least 2 capture groups, found {1}")]
    MissingCaptureGroups(String, usize),

    #[error("Failed to render instruction template: {0}")]
    Template(String),

    #[error("A fatal error occurred: {0}")]
    Fatal(String),
}
