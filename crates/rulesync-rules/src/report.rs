//! Per-batch translation results.

use std::fmt;

/// Why a decoded legacy record produced no canonical rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidRule {
    /// None of the five system metric fields is non-negative.
    NoSystemThreshold,
    /// Circuit-breaking grade outside {0, 1, 2}.
    UnsupportedGrade {
        /// Grade found in the legacy record.
        grade: u32,
    },
}

impl fmt::Display for InvalidRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidRule::NoSystemThreshold => f.write_str("no system metric threshold is set"),
            InvalidRule::UnsupportedGrade { grade } => write!(f, "unsupported circuit breaking grade {grade}"),
        }
    }
}

/// A legacy record left out of a translated batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRule {
    /// Position of the record in the payload's `Data` array.
    pub index: usize,
    /// Resource the record was written for.
    pub resource: String,
    /// Why it was dropped.
    pub reason: InvalidRule,
}

/// Outcome of translating one batch.
///
/// `accepted` keeps payload order; it is what the rule engine receives.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationReport<R> {
    /// Canonical rules, in payload order.
    pub accepted: Vec<R>,
    /// Records that could not be translated.
    pub dropped: Vec<DroppedRule>,
}

impl<R> Default for TranslationReport<R> {
    fn default() -> Self {
        Self {
            accepted: Vec::new(),
            dropped: Vec::new(),
        }
    }
}

impl<R> TranslationReport<R> {
    /// Number of records seen in the batch.
    pub fn total(&self) -> usize {
        self.accepted.len() + self.dropped.len()
    }

    /// True when nothing was dropped.
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty()
    }

    /// Consume the report, keeping only the canonical rules.
    pub fn into_accepted(self) -> Vec<R> {
        self.accepted
    }
}
