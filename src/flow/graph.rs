// SPDX-License-Identifier: MIT

//! Graph topology: steps, fixed edges, conditional dispatches.
//!
//! The builder validates the whole topology before producing an immutable
//! [`Graph`], so a graph can never compile with dangling or
//! unreachable-by-contract transitions.

use crate::flow::error::ConfigError;
use crate::flow::router::{RouterId, Target};
use crate::flow::step::StepId;
use std::collections::{BTreeMap, BTreeSet};

/// Outgoing binding of a step.
#[derive(Debug, Clone)]
pub enum Edge {
    /// Unconditional transition to the next step.
    Fixed(StepId),
    /// Delegate the choice to a router, constrained to the declared
    /// allowed-next set.
    Conditional {
        router: RouterId,
        allowed: Vec<Target>,
    },
}

/// Immutable directed topology for one workflow.
///
/// A step with no outgoing binding is a dead end: reaching it ends the run,
/// the same as the terminal marker.
#[derive(Debug, Clone)]
pub struct Graph {
    entry: StepId,
    steps: BTreeSet<StepId>,
    edges: BTreeMap<StepId, Edge>,
}

impl Graph {
    pub fn builder() -> GraphBuilder {
        GraphBuilder::default()
    }

    pub fn entry(&self) -> StepId {
        self.entry
    }

    pub fn contains(&self, id: StepId) -> bool {
        self.steps.contains(&id)
    }

    pub fn steps(&self) -> impl Iterator<Item = StepId> + '_ {
        self.steps.iter().copied()
    }

    /// The outgoing binding of a step, if any.
    pub fn edge(&self, id: StepId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// Every router bound by a conditional dispatch.
    pub fn routers(&self) -> impl Iterator<Item = RouterId> + '_ {
        self.edges.values().filter_map(|edge| match edge {
            Edge::Conditional { router, .. } => Some(*router),
            Edge::Fixed(_) => None,
        })
    }
}

/// Assembles a [`Graph`], deferring validation to [`GraphBuilder::build`].
/// Pure: no side effects, no I/O.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    entry: Option<StepId>,
    steps: BTreeSet<StepId>,
    bindings: Vec<(StepId, Edge)>,
}

impl GraphBuilder {
    pub fn entry(mut self, id: StepId) -> Self {
        self.entry = Some(id);
        self
    }

    pub fn add_step(mut self, id: StepId) -> Self {
        self.steps.insert(id);
        self
    }

    pub fn add_edge(mut self, from: StepId, to: StepId) -> Self {
        self.bindings.push((from, Edge::Fixed(to)));
        self
    }

    pub fn add_conditional(
        mut self,
        from: StepId,
        router: RouterId,
        allowed: Vec<Target>,
    ) -> Self {
        self.bindings.push((from, Edge::Conditional { router, allowed }));
        self
    }

    /// Validate and freeze the topology.
    pub fn build(self) -> Result<Graph, ConfigError> {
        let entry = self.entry.ok_or(ConfigError::NoEntry)?;
        if !self.steps.contains(&entry) {
            return Err(ConfigError::UnknownEntry(entry));
        }

        let mut edges = BTreeMap::new();
        for (from, edge) in self.bindings {
            if !self.steps.contains(&from) {
                return Err(ConfigError::UnknownSource(from));
            }
            match &edge {
                Edge::Fixed(to) => {
                    if !self.steps.contains(to) {
                        return Err(ConfigError::DanglingEdge { from, to: *to });
                    }
                }
                Edge::Conditional { router, allowed } => {
                    for target in allowed {
                        if let Target::Step(to) = target {
                            if !self.steps.contains(to) {
                                return Err(ConfigError::UnknownAllowedTarget {
                                    step: from,
                                    router: *router,
                                    target: *target,
                                });
                            }
                        }
                    }
                }
            }
            if edges.insert(from, edge).is_some() {
                return Err(ConfigError::DuplicateBinding(from));
            }
        }

        Ok(Graph {
            entry,
            steps: self.steps,
            edges,
        })
    }
}
