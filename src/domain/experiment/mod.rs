//! Experiment domain module
//!
//! Types describing what the enrollment core receives from and sends to the
//! external experiment collaborator: parameter sets, exposure events and the
//! collaborator contract itself.

mod collaborator;
mod exposure;
mod ledger;
mod params;

// Re-export all public types
pub use collaborator::{AsyncExperimentCollaborator, CollaboratorError, ExperimentCollaborator};
pub use exposure::ExposureEvent;
pub use ledger::{ExposureLedger, LoggedExposure};
pub use params::{ParamValue, ParameterSet};

#[cfg(test)]
pub use collaborator::mock::{MockExperiment, ParamlessExperiment};
#[cfg(test)]
pub use ledger::MockExposureLedger;
