// SPDX-License-Identifier: MIT

//! Router identity and the conditional-dispatch contract.

use crate::flow::state::SupportState;
use crate::flow::step::StepId;
use async_trait::async_trait;
use std::fmt;

/// Closed set of router names for the support workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RouterId {
    RefundableCheck,
    VerifiedCheck,
    IntentRouter,
    SatisfiedCheck,
}

impl RouterId {
    /// Every router the support workflow requires an implementation for.
    pub const ALL: [RouterId; 4] = [
        RouterId::RefundableCheck,
        RouterId::VerifiedCheck,
        RouterId::IntentRouter,
        RouterId::SatisfiedCheck,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RouterId::RefundableCheck => "refundable-check",
            RouterId::VerifiedCheck => "verified-check",
            RouterId::IntentRouter => "intent-router",
            RouterId::SatisfiedCheck => "satisfied-check",
        }
    }
}

impl fmt::Display for RouterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a router sends the run next: a step, or the terminal marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Target {
    Step(StepId),
    /// The terminal marker; reaching it ends the run.
    End,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Step(id) => id.fmt(f),
            Target::End => f.write_str("end"),
        }
    }
}

/// A named unit of workflow logic that selects the next step.
///
/// Routers read state but never mutate it - the borrow enforces that here,
/// and the executor additionally rejects any returned target outside the
/// router's declared allowed set. An oracle-backed router must clamp
/// free-form oracle output to one of its allowed targets, falling back to a
/// designated default when nothing matches.
#[async_trait]
pub trait Router: Send + Sync {
    async fn route(&self, state: &SupportState) -> Target;
}
