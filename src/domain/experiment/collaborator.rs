//! Contract with the external experiment collaborator
//!
//! The collaborator owns variation assignment and exposure bookkeeping. The
//! enrollment core only reads parameters from it and, at most once per
//! activation, asks it to log an exposure.

use async_trait::async_trait;
use thiserror::Error;

use super::exposure::ExposureEvent;
use super::params::ParameterSet;

/// Failures reported by a collaborator
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    #[error("Collaborator does not support {capability}")]
    Unsupported { capability: &'static str },

    #[error("Collaborator unavailable: {message}")]
    Unavailable { message: String },
}

impl CollaboratorError {
    pub fn unsupported(capability: &'static str) -> Self {
        Self::Unsupported { capability }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Synchronous experiment collaborator
///
/// Implementations may be shared by many activations at once. Making
/// `previously_logged` and `log_exposure` consistent with each other is the
/// collaborator's job.
pub trait ExperimentCollaborator: Send + Sync {
    /// Parameters for the current visitor
    ///
    /// `None` as the experiment name selects the collaborator's default set.
    /// `Ok(None)` means the collaborator has nothing for this visitor. The
    /// default body reports that parameter lookup is not supported.
    fn get_params(
        &self,
        experiment_name: Option<&str>,
    ) -> Result<Option<ParameterSet>, CollaboratorError> {
        let _ = experiment_name;
        Err(CollaboratorError::unsupported("get_params"))
    }

    /// Whether an exposure was already recorded, `None` when unknown
    fn previously_logged(&self) -> Option<bool>;

    /// Record an exposure; fire-and-forget
    fn log_exposure(&self, event: ExposureEvent);

    /// Name stamped on exposure events
    fn name(&self) -> String;
}

/// Asynchronous experiment collaborator
#[async_trait]
pub trait AsyncExperimentCollaborator: Send + Sync {
    /// Parameters for the current visitor, see [`ExperimentCollaborator::get_params`]
    async fn get_params(
        &self,
        experiment_name: Option<&str>,
    ) -> Result<Option<ParameterSet>, CollaboratorError> {
        let _ = experiment_name;
        Err(CollaboratorError::unsupported("get_params"))
    }

    async fn previously_logged(&self) -> Option<bool>;

    async fn log_exposure(&self, event: ExposureEvent);

    fn name(&self) -> String;
}
