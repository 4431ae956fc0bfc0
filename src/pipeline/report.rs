//! Per-code outcomes of a statistics run

use crate::{StatRun, StatSnapshot};

/// Result of processing one classification code
#[derive(Debug, Clone, PartialEq)]
pub enum CodeOutcome {
    /// Offers fetched and a snapshot recorded
    Success(StatSnapshot),
    /// Code skipped after a recoverable error
    Failure {
        /// Classification code
        code: String,
        /// Error message
        reason: String,
    },
}

impl CodeOutcome {
    /// Classification code this outcome refers to
    pub fn code(&self) -> &str {
        match self {
            Self::Success(snapshot) => &snapshot.code,
            Self::Failure { code, .. } => code,
        }
    }

    /// Whether a snapshot was recorded
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Metric label for this outcome
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::Failure { .. } => "failure",
        }
    }
}

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Finished run record
    pub run: StatRun,
    /// One outcome per classification code, in catalog order
    pub outcomes: Vec<CodeOutcome>,
}

impl RunReport {
    /// Number of codes with a recorded snapshot
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of skipped codes
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Snapshots recorded by this run
    pub fn snapshots(&self) -> impl Iterator<Item = &StatSnapshot> {
        self.outcomes.iter().filter_map(|o| match o {
            CodeOutcome::Success(snapshot) => Some(snapshot),
            CodeOutcome::Failure { .. } => None,
        })
    }

    /// Codes skipped with their error message
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|o| match o {
            CodeOutcome::Failure { code, reason } => Some((code.as_str(), reason.as_str())),
            CodeOutcome::Success(_) => None,
        })
    }
}
