// SPDX-License-Identifier: MIT

//! careflow-rs - a customer-support workflow engine.
//!
//! The [`flow`] module is the core: a directed graph of named steps connected
//! by fixed and conditional edges, executed against a mutable per-run state,
//! with every referenced step and router validated before execution begins.
//! [`oracle`] holds the delegated LLM/vision collaborators, and [`support`]
//! wires the food-delivery support workflow on top of the engine.

pub mod flow;
pub mod oracle;
pub mod support;
