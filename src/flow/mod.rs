// SPDX-License-Identifier: MIT

//! The workflow engine.
//!
//! A workflow is a directed graph of named steps connected by fixed edges
//! (unconditional transitions) and conditional dispatches (a router chooses
//! the next step from a declared allowed set). The [`Executor`] walks the
//! graph from the entry step to the terminal marker, threading one mutable
//! [`SupportState`] through every step. All wiring is validated at
//! construction time so a run can never fail on a missing implementation.

pub mod error;
pub mod executor;
pub mod graph;
pub mod registry;
pub mod router;
pub mod state;
pub mod step;

pub use error::{ConfigError, FlowError, RoutingError};
pub use executor::Executor;
pub use graph::{Edge, Graph, GraphBuilder};
pub use registry::{RouterRegistry, StepRegistry};
pub use router::{Router, RouterId, Target};
pub use state::{Classification, SupportState};
pub use step::{Step, StepId};
