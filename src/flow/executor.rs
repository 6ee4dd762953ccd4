// SPDX-License-Identifier: MIT

//! Workflow executor.
//!
//! Walks the graph from the entry step to the terminal marker, invoking
//! steps and routers strictly sequentially - one call in flight at a time,
//! each treated as an atomic, synchronous unit. The executor has no timeout
//! or cancellation policy of its own.

use crate::flow::error::{ConfigError, FlowError, RoutingError};
use crate::flow::graph::{Edge, Graph};
use crate::flow::registry::{RouterRegistry, StepRegistry};
use crate::flow::router::Target;
use crate::flow::state::SupportState;

const DEFAULT_TRANSITION_LIMIT: u32 = 128;

/// Executes one workflow run at a time against an immutable graph.
///
/// The graph and registries are read-only after construction, so one
/// executor may serve any number of consecutive runs; each run gets its own
/// independently constructed [`SupportState`].
pub struct Executor {
    graph: Graph,
    steps: StepRegistry,
    routers: RouterRegistry,
    transition_limit: u32,
}

impl Executor {
    /// Cross-checks that every step and router bound in the graph has an
    /// implementation, so [`run`](Executor::run) can never fail on a
    /// missing binding.
    pub fn new(
        graph: Graph,
        steps: StepRegistry,
        routers: RouterRegistry,
    ) -> Result<Self, ConfigError> {
        for id in graph.steps() {
            if steps.get(id).is_none() {
                return Err(ConfigError::UnboundStep(id));
            }
        }
        for id in graph.routers() {
            if routers.get(id).is_none() {
                return Err(ConfigError::UnboundRouter(id));
            }
        }
        Ok(Self {
            graph,
            steps,
            routers,
            transition_limit: DEFAULT_TRANSITION_LIMIT,
        })
    }

    /// Guard against a runaway loop (the topology permits self-loops).
    pub fn with_transition_limit(mut self, limit: u32) -> Self {
        self.transition_limit = limit;
        self
    }

    /// Run the workflow to its terminal marker (or a dead-end step) and
    /// return the final state.
    pub async fn run(&self, state: SupportState) -> Result<SupportState, FlowError> {
        let mut state = state;
        let mut current = self.graph.entry();
        let mut transitions = 0u32;

        loop {
            transitions += 1;
            if transitions > self.transition_limit {
                log::error!("run exceeded transition limit {}", self.transition_limit);
                return Err(FlowError::TransitionLimit(self.transition_limit));
            }

            log::info!("running step '{}'", current);
            let step = self
                .steps
                .get(current)
                .ok_or(ConfigError::UnboundStep(current))?;
            // The returned state is authoritative, whether or not the step
            // mutated in place.
            state = step.run(state).await;

            let next = match self.graph.edge(current) {
                None => {
                    log::info!("step '{}' has no outgoing binding, run ends", current);
                    return Ok(state);
                }
                Some(Edge::Fixed(to)) => Target::Step(*to),
                Some(Edge::Conditional { router, allowed }) => {
                    let implementation = self
                        .routers
                        .get(*router)
                        .ok_or(ConfigError::UnboundRouter(*router))?;
                    let chosen = implementation.route(&state).await;
                    log::info!("router '{}' chose '{}'", router, chosen);
                    if !allowed.contains(&chosen) {
                        return Err(RoutingError {
                            step: current,
                            router: *router,
                            returned: chosen,
                            state: Box::new(state),
                        }
                        .into());
                    }
                    chosen
                }
            };

            match next {
                Target::End => {
                    log::info!("reached terminal marker");
                    return Ok(state);
                }
                Target::Step(id) => current = id,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::graph::Graph;
    use crate::flow::router::{Router, RouterId};
    use crate::flow::step::{Step, StepId};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;

    /// Appends its tag to the notes so tests can observe step order.
    struct TraceStep {
        tag: &'static str,
    }

    #[async_trait]
    impl Step for TraceStep {
        async fn run(&self, mut state: SupportState) -> SupportState {
            state.push_note(self.tag, "ran");
            state
        }
    }

    /// Returns a fixed target regardless of state.
    struct FixedRouter {
        target: Target,
    }

    #[async_trait]
    impl Router for FixedRouter {
        async fn route(&self, _state: &SupportState) -> Target {
            self.target
        }
    }

    fn trace_steps() -> StepRegistry {
        let map: HashMap<StepId, Arc<dyn Step>> = StepId::ALL
            .iter()
            .map(|id| {
                (
                    *id,
                    Arc::new(TraceStep { tag: id.as_str() }) as Arc<dyn Step>,
                )
            })
            .collect();
        StepRegistry::new(map).unwrap()
    }

    fn routers_with(overrides: Vec<(RouterId, Target)>) -> RouterRegistry {
        let mut map: HashMap<RouterId, Arc<dyn Router>> = RouterId::ALL
            .iter()
            .map(|id| {
                (
                    *id,
                    Arc::new(FixedRouter { target: Target::End }) as Arc<dyn Router>,
                )
            })
            .collect();
        for (id, target) in overrides {
            map.insert(id, Arc::new(FixedRouter { target }));
        }
        RouterRegistry::new(map).unwrap()
    }

    fn chain_graph() -> Graph {
        // classify -> converse -> escalate (dead end)
        Graph::builder()
            .entry(StepId::Classify)
            .add_step(StepId::Classify)
            .add_step(StepId::Converse)
            .add_step(StepId::Escalate)
            .add_edge(StepId::Classify, StepId::Converse)
            .add_edge(StepId::Converse, StepId::Escalate)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_fixed_edges_run_in_order_and_stop_at_dead_end() {
        let executor = Executor::new(chain_graph(), trace_steps(), routers_with(vec![])).unwrap();

        let final_state = executor.run(SupportState::new("hi")).await.unwrap();

        let classify_at = final_state.notes.find("[classify]").unwrap();
        let converse_at = final_state.notes.find("[converse]").unwrap();
        let escalate_at = final_state.notes.find("[escalate]").unwrap();
        assert!(classify_at < converse_at && converse_at < escalate_at);
    }

    #[tokio::test]
    async fn test_conditional_end_terminates_without_further_steps() {
        let graph = Graph::builder()
            .entry(StepId::ResolutionCheck)
            .add_step(StepId::ResolutionCheck)
            .add_step(StepId::Escalate)
            .add_conditional(
                StepId::ResolutionCheck,
                RouterId::SatisfiedCheck,
                vec![Target::End, Target::Step(StepId::Escalate)],
            )
            .build()
            .unwrap();
        let executor = Executor::new(
            graph,
            trace_steps(),
            routers_with(vec![(RouterId::SatisfiedCheck, Target::End)]),
        )
        .unwrap();

        let final_state = executor.run(SupportState::new("hi")).await.unwrap();
        assert!(final_state.notes.contains("[resolution-check]"));
        assert!(!final_state.notes.contains("[escalate]"));
    }

    #[tokio::test]
    async fn test_router_output_outside_allowed_set_is_routing_error() {
        let graph = Graph::builder()
            .entry(StepId::Classify)
            .add_step(StepId::Classify)
            .add_step(StepId::Verify)
            .add_step(StepId::Converse)
            .add_conditional(
                StepId::Classify,
                RouterId::RefundableCheck,
                vec![Target::Step(StepId::Verify), Target::Step(StepId::Converse)],
            )
            .build()
            .unwrap();
        // Misbehaving router: Refund is not in the allowed set.
        let executor = Executor::new(
            graph,
            trace_steps(),
            routers_with(vec![(
                RouterId::RefundableCheck,
                Target::Step(StepId::Refund),
            )]),
        )
        .unwrap();

        let err = executor.run(SupportState::new("hi")).await.unwrap_err();
        match err {
            FlowError::Routing(routing) => {
                assert_eq!(routing.step, StepId::Classify);
                assert_eq!(routing.router, RouterId::RefundableCheck);
                assert_eq!(routing.returned, Target::Step(StepId::Refund));
                // State at time of failure preserved: classify already ran.
                assert!(routing.state.notes.contains("[classify]"));
            }
            other => panic!("expected RoutingError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_self_loop_hits_transition_limit() {
        let graph = Graph::builder()
            .entry(StepId::Converse)
            .add_step(StepId::Converse)
            .add_conditional(
                StepId::Converse,
                RouterId::IntentRouter,
                vec![Target::Step(StepId::Converse)],
            )
            .build()
            .unwrap();
        let executor = Executor::new(
            graph,
            trace_steps(),
            routers_with(vec![(
                RouterId::IntentRouter,
                Target::Step(StepId::Converse),
            )]),
        )
        .unwrap()
        .with_transition_limit(5);

        let err = executor.run(SupportState::new("hi")).await.unwrap_err();
        assert!(matches!(err, FlowError::TransitionLimit(5)));
    }

    #[tokio::test]
    async fn test_executor_reusable_across_runs() {
        let executor = Executor::new(chain_graph(), trace_steps(), routers_with(vec![])).unwrap();

        let first = executor.run(SupportState::new("run one")).await.unwrap();
        let second = executor.run(SupportState::new("run two")).await.unwrap();

        assert_eq!(first.user_first_message, "run one");
        assert_eq!(second.user_first_message, "run two");
        // Independent states: the second run starts from a fresh log.
        assert_eq!(first.notes, second.notes);
    }
}
