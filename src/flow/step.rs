// SPDX-License-Identifier: MIT

//! Step identity and the step contract.

use crate::flow::state::SupportState;
use async_trait::async_trait;
use std::fmt;

/// Closed set of step names for the support workflow.
///
/// Representing step identity as an enum rather than raw strings makes a
/// typo'd or missing target a construction-time error instead of a runtime
/// surprise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StepId {
    Classify,
    Verify,
    Converse,
    EtaInfo,
    ComplaintLog,
    AmountCheck,
    Refund,
    ResolutionCheck,
    Escalate,
}

impl StepId {
    /// Every step the support workflow requires an implementation for.
    pub const ALL: [StepId; 9] = [
        StepId::Classify,
        StepId::Verify,
        StepId::Converse,
        StepId::EtaInfo,
        StepId::ComplaintLog,
        StepId::AmountCheck,
        StepId::Refund,
        StepId::ResolutionCheck,
        StepId::Escalate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StepId::Classify => "classify",
            StepId::Verify => "verify",
            StepId::Converse => "converse",
            StepId::EtaInfo => "eta-info",
            StepId::ComplaintLog => "complaint-log",
            StepId::AmountCheck => "amount-check",
            StepId::Refund => "refund",
            StepId::ResolutionCheck => "resolution-check",
            StepId::Escalate => "escalate",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named unit of workflow logic.
///
/// A step receives the run's state by value and returns the authoritative
/// state. It may block on an oracle call or interactive input, but any
/// internal failure must be absorbed into a safe-default mutation plus a
/// note in the conversation log - a step never aborts the run, which is why
/// the signature is infallible.
#[async_trait]
pub trait Step: Send + Sync {
    async fn run(&self, state: SupportState) -> SupportState;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_lists_every_step() {
        assert_eq!(StepId::ALL.len(), 9);
        assert!(StepId::ALL.contains(&StepId::Classify));
        assert!(StepId::ALL.contains(&StepId::Escalate));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(StepId::Classify.to_string(), "classify");
        assert_eq!(StepId::EtaInfo.to_string(), "eta-info");
        assert_eq!(StepId::AmountCheck.to_string(), "amount-check");
        assert_eq!(StepId::ResolutionCheck.to_string(), "resolution-check");
    }
}
