// SPDX-License-Identifier: MIT

//! Food delivery customer support workflow.
//!
//! Wires the nine steps and four routers into the fixed topology and hands
//! back a ready-to-run [`Executor`].

pub mod config;
pub mod console;
pub mod routers;
pub mod steps;

use crate::flow::error::ConfigError;
use crate::flow::executor::Executor;
use crate::flow::graph::Graph;
use crate::flow::registry::{RouterRegistry, StepRegistry};
use crate::flow::router::{Router, RouterId, Target};
use crate::flow::step::{Step, StepId};
use crate::oracle::{ChatOracle, VisionOracle};
use std::collections::HashMap;
use std::sync::Arc;

use console::Console;
use routers::{IntentRouter, RefundableRouter, SatisfiedRouter, VerifiedRouter};
use steps::{
    AmountCheckStep, ClassifyStep, ComplaintLogStep, ConverseStep, EscalateStep, EtaInfoStep,
    RefundStep, ResolutionCheckStep, VerifyStep,
};

/// The fixed support workflow topology.
///
/// Escalation is a designed dead end: the step carries no outgoing binding,
/// so reaching it ends the run after the handover note is written.
pub fn topology() -> Result<Graph, ConfigError> {
    let mut builder = Graph::builder().entry(StepId::Classify);
    for id in StepId::ALL {
        builder = builder.add_step(id);
    }

    builder
        .add_conditional(
            StepId::Classify,
            RouterId::RefundableCheck,
            vec![Target::Step(StepId::Verify), Target::Step(StepId::Converse)],
        )
        .add_conditional(
            StepId::Verify,
            RouterId::VerifiedCheck,
            vec![
                Target::Step(StepId::AmountCheck),
                Target::Step(StepId::Escalate),
            ],
        )
        .add_conditional(
            StepId::Converse,
            RouterId::IntentRouter,
            vec![
                Target::Step(StepId::EtaInfo),
                Target::Step(StepId::ComplaintLog),
                Target::Step(StepId::ResolutionCheck),
                Target::Step(StepId::Converse),
            ],
        )
        .add_edge(StepId::EtaInfo, StepId::Converse)
        .add_edge(StepId::ComplaintLog, StepId::Converse)
        .add_edge(StepId::AmountCheck, StepId::Refund)
        .add_edge(StepId::Refund, StepId::ResolutionCheck)
        .add_conditional(
            StepId::ResolutionCheck,
            RouterId::SatisfiedCheck,
            vec![Target::End, Target::Step(StepId::Escalate)],
        )
        .build()
}

/// Build an executor for the support workflow from its collaborators.
///
/// `chat` powers the conversational agent and intent routing, `classifier`
/// the one-shot complaint classification, `vision` the two image checks.
pub fn build(
    chat: Arc<dyn ChatOracle>,
    classifier: Arc<dyn ChatOracle>,
    vision: Arc<dyn VisionOracle>,
    console: Arc<dyn Console>,
) -> Result<Executor, ConfigError> {
    let mut steps: HashMap<StepId, Arc<dyn Step>> = HashMap::new();
    steps.insert(StepId::Classify, Arc::new(ClassifyStep::new(classifier)));
    steps.insert(
        StepId::Verify,
        Arc::new(VerifyStep::new(Arc::clone(&vision), Arc::clone(&console))),
    );
    steps.insert(
        StepId::Converse,
        Arc::new(ConverseStep::new(Arc::clone(&chat), Arc::clone(&console))),
    );
    steps.insert(StepId::EtaInfo, Arc::new(EtaInfoStep));
    steps.insert(StepId::ComplaintLog, Arc::new(ComplaintLogStep));
    steps.insert(StepId::AmountCheck, Arc::new(AmountCheckStep::new(vision)));
    steps.insert(StepId::Refund, Arc::new(RefundStep));
    steps.insert(
        StepId::ResolutionCheck,
        Arc::new(ResolutionCheckStep::new(console)),
    );
    steps.insert(StepId::Escalate, Arc::new(EscalateStep));

    let mut routers: HashMap<RouterId, Arc<dyn Router>> = HashMap::new();
    routers.insert(RouterId::RefundableCheck, Arc::new(RefundableRouter));
    routers.insert(RouterId::VerifiedCheck, Arc::new(VerifiedRouter));
    routers.insert(RouterId::IntentRouter, Arc::new(IntentRouter::new(chat)));
    routers.insert(RouterId::SatisfiedCheck, Arc::new(SatisfiedRouter));

    Executor::new(
        topology()?,
        StepRegistry::new(steps)?,
        RouterRegistry::new(routers)?,
    )
}
