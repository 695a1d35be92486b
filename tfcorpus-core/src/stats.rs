//! Aggregate counters for a cleaning run.

use serde::{Deserialize, Serialize};

use crate::pipeline::{CleaningOutcome, RejectReason};

/// Outcome counts of one run. Serializes as a flat map keyed by reason code.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub total: u64,
    pub cleaned: u64,
    pub duplicate: u64,
    pub too_small: u64,
    pub too_large: u64,
    pub invalid_syntax: u64,
    pub too_small_after_clean: u64,
    /// Accepted files in which at least one redaction rule fired.
    pub sensitive_sanitized: u64,
}

impl RunStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one processed file. Call exactly once per file.
    pub fn record(&mut self, outcome: &CleaningOutcome) {
        self.total += 1;
        match outcome {
            CleaningOutcome::Accepted { redacted_rules, .. } => {
                self.cleaned += 1;
                if !redacted_rules.is_empty() {
                    self.sensitive_sanitized += 1;
                }
            }
            CleaningOutcome::Rejected(reason) => *self.rejected_mut(*reason) += 1,
        }
    }

    pub fn rejected(&self, reason: RejectReason) -> u64 {
        match reason {
            RejectReason::TooSmall => self.too_small,
            RejectReason::TooLarge => self.too_large,
            RejectReason::Duplicate => self.duplicate,
            RejectReason::InvalidSyntax => self.invalid_syntax,
            RejectReason::TooSmallAfterClean => self.too_small_after_clean,
        }
    }

    fn rejected_mut(&mut self, reason: RejectReason) -> &mut u64 {
        match reason {
            RejectReason::TooSmall => &mut self.too_small,
            RejectReason::TooLarge => &mut self.too_large,
            RejectReason::Duplicate => &mut self.duplicate,
            RejectReason::InvalidSyntax => &mut self.invalid_syntax,
            RejectReason::TooSmallAfterClean => &mut self.too_small_after_clean,
        }
    }
}
