//! Enrollment domain module
//!
//! The gate decides whether an experiment is shown, the resolver fetches the
//! visitor's parameters once and logs the exposure, and content renders
//! against an explicitly threaded [`ExperimentContext`].

mod activation;
mod async_resolver;
mod config;
mod context;
mod error;
mod flag;
mod gate;
mod resolver;

pub use activation::Activation;
pub use async_resolver::{AsyncActivation, AsyncParameterResolver};
pub use config::{ActivationRequest, EnrollmentConfig};
pub use context::{ActivationProps, Content, ExperimentContext};
pub use error::EnrollmentError;
pub use flag::EnrollmentHandle;
pub use gate::{EnrollmentGate, RenderDecision, SkipReason};
pub use resolver::{ParameterResolver, ResolutionState};
