//! Exposure events sent to the experiment collaborator

use serde::{Deserialize, Serialize};

use super::params::ParameterSet;

/// Record that a visitor was shown a variation's parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureEvent {
    /// Parameters the visitor was exposed to
    pub params: ParameterSet,
    /// Name reported by the collaborator
    pub name: String,
}

impl ExposureEvent {
    pub fn new(params: ParameterSet, name: impl Into<String>) -> Self {
        Self {
            params,
            name: name.into(),
        }
    }
}
