// SPDX-License-Identifier: MIT

//! Validated step and router registries.
//!
//! Construction validates the mapping against the fixed required name sets
//! and fails fast with every absent name - never at first use.

use crate::flow::error::ConfigError;
use crate::flow::router::{Router, RouterId};
use crate::flow::step::{Step, StepId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Validated mapping of step name to implementation.
pub struct StepRegistry {
    steps: HashMap<StepId, Arc<dyn Step>>,
}

impl StepRegistry {
    /// Validates that every step in [`StepId::ALL`] has an implementation.
    pub fn new(steps: HashMap<StepId, Arc<dyn Step>>) -> Result<Self, ConfigError> {
        let missing: Vec<StepId> = StepId::ALL
            .iter()
            .copied()
            .filter(|id| !steps.contains_key(id))
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingSteps(missing));
        }
        Ok(Self { steps })
    }

    pub fn get(&self, id: StepId) -> Option<&Arc<dyn Step>> {
        self.steps.get(&id)
    }
}

impl fmt::Debug for StepRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepRegistry")
            .field("steps", &self.steps.keys())
            .finish()
    }
}

/// Validated mapping of router name to implementation.
pub struct RouterRegistry {
    routers: HashMap<RouterId, Arc<dyn Router>>,
}

impl RouterRegistry {
    /// Validates that every router in [`RouterId::ALL`] has an
    /// implementation.
    pub fn new(routers: HashMap<RouterId, Arc<dyn Router>>) -> Result<Self, ConfigError> {
        let missing: Vec<RouterId> = RouterId::ALL
            .iter()
            .copied()
            .filter(|id| !routers.contains_key(id))
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingRouters(missing));
        }
        Ok(Self { routers })
    }

    pub fn get(&self, id: RouterId) -> Option<&Arc<dyn Router>> {
        self.routers.get(&id)
    }
}

impl fmt::Debug for RouterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterRegistry")
            .field("routers", &self.routers.keys())
            .finish()
    }
}
