//! Experiment Gate
//!
//! Client-side experiment enrollment:
//! - Gating on static configuration before any collaborator contact
//! - One-shot parameter resolution per activation, sync or async
//! - Exposure logging guarded by the collaborator's own dedup check
//! - Explicit context threading into parametrized content

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{
    Activation, AsyncActivation, AsyncExperimentCollaborator, Content, EnrollmentConfig,
    EnrollmentError, EnrollmentGate, ExperimentCollaborator, ExperimentContext, ExposureEvent,
    ParameterResolver, ParameterSet, RenderDecision, ResolutionState,
};
