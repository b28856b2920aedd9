//! Enrollment diagnostics

use thiserror::Error;

use crate::domain::experiment::CollaboratorError;

/// Misconfiguration detected while enrolling a visitor
///
/// None of these abort the host; they suppress rendering and are reported on
/// the diagnostic channel.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnrollmentError {
    #[error("You must pass in an experiment instance as a prop")]
    MissingExperiment,

    #[error("You must pass in either a param name or experiment name as a prop")]
    MissingIdentifier,

    /// The collaborator exists but cannot look up parameters
    #[error("You must pass in an experiment instance as a prop")]
    ContractViolation(CollaboratorError),

    /// The collaborator supports lookup but failed this time
    #[error("Could not resolve experiment parameters: {0}")]
    Unavailable(CollaboratorError),
}

impl From<CollaboratorError> for EnrollmentError {
    fn from(source: CollaboratorError) -> Self {
        match source {
            CollaboratorError::Unsupported { .. } => Self::ContractViolation(source),
            CollaboratorError::Unavailable { .. } => Self::Unavailable(source),
        }
    }
}

impl EnrollmentError {
    /// Report this error on the diagnostic channel
    pub(crate) fn report(&self, experiment_name: Option<&str>, param_name: Option<&str>) {
        match self {
            Self::ContractViolation(source) | Self::Unavailable(source) => tracing::error!(
                experiment = experiment_name,
                param = param_name,
                cause = %source,
                "{}",
                self
            ),
            _ => tracing::error!(experiment = experiment_name, param = param_name, "{}", self),
        }
    }
}
