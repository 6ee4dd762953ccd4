// SPDX-License-Identifier: MIT

//! Typed error handling for the workflow engine.
//!
//! Step-internal failures never appear here: the step contract requires
//! them to be absorbed into safe-default state mutations plus a note.

use crate::flow::router::{RouterId, Target};
use crate::flow::state::SupportState;
use crate::flow::step::StepId;
use std::fmt;
use thiserror::Error;

/// Fatal pre-run configuration errors. Surfaced at build time; the run
/// never starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more required step implementations are absent. Lists every
    /// missing name, not just the first.
    #[error("missing step implementations for: {}", join(.0))]
    MissingSteps(Vec<StepId>),

    /// One or more required router implementations are absent.
    #[error("missing router implementations for: {}", join(.0))]
    MissingRouters(Vec<RouterId>),

    /// No entry step was designated.
    #[error("no entry step designated")]
    NoEntry,

    /// The designated entry step was never added to the graph.
    #[error("entry step '{0}' is not part of the graph")]
    UnknownEntry(StepId),

    /// An edge or dispatch was declared for a step outside the graph.
    #[error("binding declared for unknown step '{0}'")]
    UnknownSource(StepId),

    /// A fixed edge targets a step outside the graph.
    #[error("edge from '{from}' targets unknown step '{to}'")]
    DanglingEdge { from: StepId, to: StepId },

    /// A router's declared allowed-next-set names a step outside the graph.
    #[error("router '{router}' on step '{step}' declares unknown target '{target}'")]
    UnknownAllowedTarget {
        step: StepId,
        router: RouterId,
        target: Target,
    },

    /// A step was given more than one outgoing binding.
    #[error("step '{0}' has more than one outgoing binding")]
    DuplicateBinding(StepId),

    /// A graph step has no implementation in the registry.
    #[error("step '{0}' is bound in the graph but has no implementation")]
    UnboundStep(StepId),

    /// A graph dispatch names a router with no implementation.
    #[error("router '{0}' is bound in the graph but has no implementation")]
    UnboundRouter(RouterId),
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Fatal mid-run error: a router returned a target outside its declared
/// allowed set. The state at the time of failure is preserved for
/// diagnostics.
#[derive(Debug, Error)]
#[error("router '{router}' on step '{step}' returned '{returned}', outside its declared allowed set")]
pub struct RoutingError {
    pub step: StepId,
    pub router: RouterId,
    pub returned: Target,
    pub state: Box<SupportState>,
}

/// Top-level error type for a workflow run.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Routing(#[from] RoutingError),

    /// The run exceeded the executor's transition limit.
    #[error("transition limit of {0} reached")]
    TransitionLimit(u32),
}
