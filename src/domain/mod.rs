//! Domain layer - Core enrollment logic and types

pub mod enrollment;
pub mod error;
pub mod experiment;

pub use enrollment::{
    Activation, ActivationProps, ActivationRequest, AsyncActivation, AsyncParameterResolver,
    Content, EnrollmentConfig, EnrollmentError, EnrollmentGate, EnrollmentHandle,
    ExperimentContext, ParameterResolver, RenderDecision, ResolutionState, SkipReason,
};
pub use error::DomainError;
pub use experiment::{
    AsyncExperimentCollaborator, CollaboratorError, ExperimentCollaborator, ExposureEvent,
    ExposureLedger, LoggedExposure, ParamValue, ParameterSet,
};
