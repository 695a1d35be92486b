// tfcorpus-core/src/pipeline.rs
//! Per-file cleaning pipeline.
//!
//! A file passes through a fixed chain of gates and transformations and ends
//! in exactly one [`CleaningOutcome`]:
//!
//! 1. raw size gate (`too_small` / `too_large`)
//! 2. fingerprint gate (`duplicate`); the fingerprint is recorded here, before
//!    the remaining gates run
//! 3. structural validity gate (`invalid_syntax`)
//! 4. redaction, comment stripping, formatting
//! 5. cleaned size gate (`too_small_after_clean`)
//!
//! The seen-fingerprint set is passed in by the caller and is the only state
//! shared between files.
//!
//! License: MIT OR APACHE 2.0

use anyhow::Result;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::comments::{strip_comments_with, QuoteTracking};
use crate::config::CleanerConfig;
use crate::fingerprint::{Fingerprint, SeenFingerprints};
use crate::formatting::normalize_formatting;
use crate::redactor::Redactor;
use crate::validators::is_valid_terraform;

/// Why a file was not accepted into the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    TooSmall,
    TooLarge,
    Duplicate,
    InvalidSyntax,
    TooSmallAfterClean,
}

impl RejectReason {
    pub const ALL: [RejectReason; 5] = [
        RejectReason::TooSmall,
        RejectReason::TooLarge,
        RejectReason::Duplicate,
        RejectReason::InvalidSyntax,
        RejectReason::TooSmallAfterClean,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::TooSmall => "too_small",
            RejectReason::TooLarge => "too_large",
            RejectReason::Duplicate => "duplicate",
            RejectReason::InvalidSyntax => "invalid_syntax",
            RejectReason::TooSmallAfterClean => "too_small_after_clean",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal result of cleaning one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleaningOutcome {
    Accepted {
        content: String,
        /// Redaction rules that fired on this file, in rule order.
        redacted_rules: Vec<String>,
    },
    Rejected(RejectReason),
}

impl CleaningOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, CleaningOutcome::Accepted { .. })
    }

    pub fn content(&self) -> Option<&str> {
        match self {
            CleaningOutcome::Accepted { content, .. } => Some(content),
            CleaningOutcome::Rejected(_) => None,
        }
    }

    pub fn reject_reason(&self) -> Option<RejectReason> {
        match self {
            CleaningOutcome::Accepted { .. } => None,
            CleaningOutcome::Rejected(reason) => Some(*reason),
        }
    }
}

/// Runs the gate chain over single files.
///
/// A `Cleaner` is immutable once built and can be shared between threads; all
/// cross-file state lives in the [`SeenFingerprints`] handed to
/// [`Cleaner::clean_file`].
#[derive(Debug, Clone)]
pub struct Cleaner {
    redactor: Redactor,
    min_chars: usize,
    max_chars: usize,
    quote_tracking: QuoteTracking,
}

impl Cleaner {
    pub fn new(config: &CleanerConfig) -> Result<Self> {
        Ok(Self {
            redactor: Redactor::new(config)?,
            min_chars: config.limits.min_chars(),
            max_chars: config.limits.max_chars(),
            quote_tracking: config.comments.quote_tracking(),
        })
    }

    pub fn min_chars(&self) -> usize {
        self.min_chars
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn clean_file(&self, content: &str, seen: &SeenFingerprints) -> CleaningOutcome {
        let raw_len = content.chars().count();
        if raw_len < self.min_chars {
            return reject(RejectReason::TooSmall, raw_len);
        }
        if raw_len > self.max_chars {
            return reject(RejectReason::TooLarge, raw_len);
        }

        let fingerprint = Fingerprint::of(content);
        if !seen.insert_if_new(fingerprint) {
            debug!("Fingerprint {:?} already seen.", fingerprint);
            return CleaningOutcome::Rejected(RejectReason::Duplicate);
        }

        if !is_valid_terraform(content) {
            return CleaningOutcome::Rejected(RejectReason::InvalidSyntax);
        }

        let redaction = self.redactor.redact(content);
        let stripped = strip_comments_with(&redaction.content, self.quote_tracking);
        let cleaned = normalize_formatting(&stripped);

        let cleaned_len = cleaned.chars().count();
        if cleaned_len < self.min_chars {
            return reject(RejectReason::TooSmallAfterClean, cleaned_len);
        }

        debug!(
            "Accepted file: {} -> {} chars, {} redaction rule(s) fired.",
            raw_len,
            cleaned_len,
            redaction.matched_rules.len()
        );
        CleaningOutcome::Accepted {
            content: cleaned,
            redacted_rules: redaction.matched_rules,
        }
    }
}

fn reject(reason: RejectReason, len: usize) -> CleaningOutcome {
    debug!("Rejected file as {} ({} chars).", reason, len);
    CleaningOutcome::Rejected(reason)
}
