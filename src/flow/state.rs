// SPDX-License-Identifier: MIT

//! Per-run workflow state.

use std::fmt::{self, Write};

/// Complaint classification. Set exactly once, by the classify step,
/// before any router reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Classification {
    #[default]
    Unset,
    Refundable,
    NonRefundable,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Unset => "unset",
            Classification::Refundable => "refundable",
            Classification::NonRefundable => "non_refundable",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The mutable record threaded through every step of one workflow run.
///
/// One instance is created per run and owned exclusively by the executor
/// for the run's duration. Two concurrent runs never share an instance;
/// independent runs may share the same immutable graph and registries.
#[derive(Debug, Clone, Default)]
pub struct SupportState {
    /// Most recent inbound message; mutated by conversational steps.
    pub user_message: String,
    /// The original complaint, fixed at creation. Ground truth for
    /// verification.
    pub user_first_message: String,
    pub classification: Classification,
    pub verified: bool,
    pub resolved: bool,
    /// Append-only conversation log; never truncated or rewritten mid-run.
    pub notes: String,
    /// Set by the amount-check step, consumed by the refund step.
    pub refund_amount: u32,
    /// Set once during verification, read by amount-check and refund.
    pub refund_product: String,
    pub image_problem_path: Option<String>,
    pub image_bill_path: Option<String>,
}

impl SupportState {
    /// Initial-state factory: all flags default, numeric/string fields at
    /// zero/empty, and the first message fixed for the run.
    pub fn new(first_message: impl Into<String>) -> Self {
        let message = first_message.into();
        Self {
            user_message: message.clone(),
            user_first_message: message,
            ..Default::default()
        }
    }

    /// Append a tagged segment to the conversation log.
    pub fn push_note(&mut self, tag: &str, text: &str) {
        // Writing into a String is infallible.
        let _ = write!(self.notes, "\n[{}] {}", tag, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_defaults() {
        let state = SupportState::new("my order never arrived");

        assert_eq!(state.user_message, "my order never arrived");
        assert_eq!(state.user_first_message, "my order never arrived");
        assert_eq!(state.classification, Classification::Unset);
        assert!(!state.verified);
        assert!(!state.resolved);
        assert!(state.notes.is_empty());
        assert_eq!(state.refund_amount, 0);
        assert!(state.refund_product.is_empty());
        assert!(state.image_problem_path.is_none());
        assert!(state.image_bill_path.is_none());
    }

    #[test]
    fn test_push_note_is_append_only() {
        let mut state = SupportState::new("hi");

        state.push_note("eta-info", "Provided an ETA.");
        let before = state.notes.clone();

        state.push_note("refund", "Processed refund of 10 for pizza");
        assert!(state.notes.starts_with(&before));
        assert!(state.notes.contains("[refund] Processed refund of 10"));
    }

    #[test]
    fn test_classification_display() {
        assert_eq!(Classification::Unset.to_string(), "unset");
        assert_eq!(Classification::Refundable.to_string(), "refundable");
        assert_eq!(Classification::NonRefundable.to_string(), "non_refundable");
    }
}
