//! Tagged outcome of a retrieval leg.

use std::fmt::Display;

/// Result of one retrieval leg.
///
/// Leg failures are soft: they are logged and recorded here instead of
/// aborting the query, so "the leg failed" stays distinguishable from
/// "the leg found nothing".
#[derive(Debug, Clone, PartialEq)]
pub enum LegOutcome<T> {
    Success(T),
    Failed { reason: String },
}

impl<T> LegOutcome<T> {
    pub fn failed(reason: impl Display) -> Self {
        LegOutcome::Failed {
            reason: reason.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, LegOutcome::Success(_))
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            LegOutcome::Success(value) => Some(value),
            LegOutcome::Failed { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            LegOutcome::Success(_) => None,
            LegOutcome::Failed { reason } => Some(reason),
        }
    }
}

impl<T, E: Display> From<Result<T, E>> for LegOutcome<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => LegOutcome::Success(value),
            Err(e) => LegOutcome::failed(e),
        }
    }
}
