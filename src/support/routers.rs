// SPDX-License-Identifier: MIT

//! The four routers of the support workflow.
//!
//! Routers only read state; the one oracle-backed router clamps free-form
//! output to a closed set of targets and falls back to the conversation
//! loop when the oracle misbehaves.

use crate::flow::router::{Router, Target};
use crate::flow::state::{Classification, SupportState};
use crate::flow::step::StepId;
use crate::oracle::ChatOracle;
use async_trait::async_trait;
use std::sync::Arc;

/// Routes a refundable complaint to verification, everything else to the
/// conversation loop.
pub struct RefundableRouter;

#[async_trait]
impl Router for RefundableRouter {
    async fn route(&self, state: &SupportState) -> Target {
        match state.classification {
            Classification::Refundable => Target::Step(StepId::Verify),
            _ => Target::Step(StepId::Converse),
        }
    }
}

/// Routes a verified claim to the bill amount check, an unverified one to a
/// human agent.
pub struct VerifiedRouter;

#[async_trait]
impl Router for VerifiedRouter {
    async fn route(&self, state: &SupportState) -> Target {
        if state.verified {
            Target::Step(StepId::AmountCheck)
        } else {
            Target::Step(StepId::Escalate)
        }
    }
}

/// Oracle-backed intent analysis of the user's latest message.
pub struct IntentRouter {
    oracle: Arc<dyn ChatOracle>,
}

impl IntentRouter {
    pub fn new(oracle: Arc<dyn ChatOracle>) -> Self {
        Self { oracle }
    }

    fn prompt_for(message: &str) -> String {
        format!(
            "The user last said: \"{}\".\n\n\
             Analyze the message and choose the most appropriate route:\n\n\
             1) Route to \"ETA tool\" if ANY of these apply:\n\
             - User is asking when their order will arrive\n\
             - User mentions delivery time, ETA, arrival, waiting, or timing\n\
             - User wants to know how much longer they need to wait\n\n\
             2) Route to \"Service complaint\" if ANY of these apply:\n\
             - User complains about a rude or unprofessional delivery person\n\
             - User mentions poor service quality\n\
             - User has feedback about delivery staff behavior\n\n\
             3) Route to \"check\" if ANY of these apply:\n\
             - User indicates their question has been answered\n\
             - User says \"thank you\" or expresses satisfaction\n\
             - User has no further questions\n\n\
             4) Route to \"Agent\" ONLY if none of the above apply.\n\n\
             Return EXACTLY ONE of these four options (case sensitive):\n\
             \"ETA tool\"\n\
             \"Service complaint\"\n\
             \"check\"\n\
             \"Agent\"",
            message
        )
    }

    /// Clamp free-form oracle output to one of the four targets. Checked
    /// most-specific first; anything unrecognized stays in the conversation.
    fn clamp(decision: &str) -> Target {
        if decision.contains("ETA tool") {
            Target::Step(StepId::EtaInfo)
        } else if decision.contains("Service complaint") {
            Target::Step(StepId::ComplaintLog)
        } else if decision.contains("check") {
            Target::Step(StepId::ResolutionCheck)
        } else {
            Target::Step(StepId::Converse)
        }
    }
}

#[async_trait]
impl Router for IntentRouter {
    async fn route(&self, state: &SupportState) -> Target {
        match self.oracle.complete(&Self::prompt_for(&state.user_message)).await {
            Ok(decision) => {
                log::debug!("intent decision: {}", decision.trim());
                Self::clamp(&decision)
            }
            Err(e) => {
                log::error!("intent oracle failed, staying in conversation: {}", e);
                Target::Step(StepId::Converse)
            }
        }
    }
}

/// Ends the workflow when the user is satisfied, escalates otherwise.
pub struct SatisfiedRouter;

#[async_trait]
impl Router for SatisfiedRouter {
    async fn route(&self, state: &SupportState) -> Target {
        if state.resolved {
            Target::End
        } else {
            Target::Step(StepId::Escalate)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::OracleError;

    struct StubChat {
        reply: String,
    }

    impl StubChat {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
            })
        }
    }

    #[async_trait]
    impl ChatOracle for StubChat {
        async fn complete(&self, _prompt: &str) -> Result<String, OracleError> {
            Ok(self.reply.clone())
        }
    }

    struct FailingChat;

    #[async_trait]
    impl ChatOracle for FailingChat {
        async fn complete(&self, _prompt: &str) -> Result<String, OracleError> {
            Err(OracleError::Api("down".to_string()))
        }
    }

    #[tokio::test]
    async fn test_refundable_router_branches_on_classification() {
        let mut state = SupportState::new("cold pizza");
        state.classification = Classification::Refundable;
        assert_eq!(
            RefundableRouter.route(&state).await,
            Target::Step(StepId::Verify)
        );

        state.classification = Classification::NonRefundable;
        assert_eq!(
            RefundableRouter.route(&state).await,
            Target::Step(StepId::Converse)
        );
    }

    #[tokio::test]
    async fn test_unset_classification_goes_to_conversation() {
        let state = SupportState::new("hello");
        assert_eq!(
            RefundableRouter.route(&state).await,
            Target::Step(StepId::Converse)
        );
    }

    #[tokio::test]
    async fn test_verified_router_branches_on_verified() {
        let mut state = SupportState::new("cold pizza");
        state.verified = true;
        assert_eq!(
            VerifiedRouter.route(&state).await,
            Target::Step(StepId::AmountCheck)
        );

        state.verified = false;
        assert_eq!(
            VerifiedRouter.route(&state).await,
            Target::Step(StepId::Escalate)
        );
    }

    #[tokio::test]
    async fn test_intent_router_clamps_each_marker() {
        let mut state = SupportState::new("hi");
        state.user_message = "when will it arrive?".to_string();

        let eta = IntentRouter::new(StubChat::new("\"ETA tool\""));
        assert_eq!(eta.route(&state).await, Target::Step(StepId::EtaInfo));

        let complaint = IntentRouter::new(StubChat::new("Service complaint"));
        assert_eq!(
            complaint.route(&state).await,
            Target::Step(StepId::ComplaintLog)
        );

        let check = IntentRouter::new(StubChat::new("check"));
        assert_eq!(
            check.route(&state).await,
            Target::Step(StepId::ResolutionCheck)
        );

        let agent = IntentRouter::new(StubChat::new("Agent"));
        assert_eq!(agent.route(&state).await, Target::Step(StepId::Converse));
    }

    #[tokio::test]
    async fn test_intent_router_unrecognized_falls_back_to_conversation() {
        let state = SupportState::new("hi");
        let router = IntentRouter::new(StubChat::new("no idea what this means"));
        assert_eq!(router.route(&state).await, Target::Step(StepId::Converse));
    }

    #[tokio::test]
    async fn test_intent_router_oracle_failure_falls_back_to_conversation() {
        let state = SupportState::new("hi");
        let router = IntentRouter::new(Arc::new(FailingChat));
        assert_eq!(router.route(&state).await, Target::Step(StepId::Converse));
    }

    #[tokio::test]
    async fn test_satisfied_router_ends_or_escalates() {
        let mut state = SupportState::new("cold pizza");
        state.resolved = true;
        assert_eq!(SatisfiedRouter.route(&state).await, Target::End);

        state.resolved = false;
        assert_eq!(
            SatisfiedRouter.route(&state).await,
            Target::Step(StepId::Escalate)
        );
    }
}
