//! Collaborator serving fixed parameter sets from configuration

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::config::ExperimentDefinition;
use crate::domain::{
    AsyncExperimentCollaborator, CollaboratorError, ExperimentCollaborator, ExposureEvent,
    ExposureLedger, LoggedExposure, ParameterSet,
};

/// Experiment collaborator for a single visitor unit
///
/// Every visitor gets the same parameters; assignment is out of scope here.
/// Exposure deduplication is delegated to the ledger, so two activations
/// for the same unit log one exposure between them.
pub struct StaticExperiment {
    definition: Arc<ExperimentDefinition>,
    unit: String,
    ledger: Arc<dyn ExposureLedger>,
}

impl StaticExperiment {
    pub fn new(
        definition: impl Into<Arc<ExperimentDefinition>>,
        unit: impl Into<String>,
        ledger: Arc<dyn ExposureLedger>,
    ) -> Self {
        Self {
            definition: definition.into(),
            unit: unit.into(),
            ledger,
        }
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn definition(&self) -> &ExperimentDefinition {
        &self.definition
    }

    fn lookup(&self, experiment_name: Option<&str>) -> Option<ParameterSet> {
        match experiment_name {
            Some(name) => self.definition.named.get(name).cloned(),
            None if self.definition.params.is_empty() => None,
            None => Some(self.definition.params.clone()),
        }
    }

    fn logged(&self) -> Option<bool> {
        match self.ledger.has_logged(&self.definition.name, &self.unit) {
            Ok(logged) => Some(logged),
            Err(e) => {
                warn!(
                    experiment = %self.definition.name,
                    unit = %self.unit,
                    error = %e,
                    "Could not read exposure ledger"
                );
                None
            }
        }
    }

    fn record(&self, event: ExposureEvent) {
        if let Err(e) = self.ledger.record(LoggedExposure::new(self.unit.clone(), event)) {
            warn!(
                experiment = %self.definition.name,
                unit = %self.unit,
                error = %e,
                "Failed to record exposure"
            );
        }
    }
}

impl fmt::Debug for StaticExperiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticExperiment")
            .field("name", &self.definition.name)
            .field("unit", &self.unit)
            .finish()
    }
}

impl ExperimentCollaborator for StaticExperiment {
    fn get_params(
        &self,
        experiment_name: Option<&str>,
    ) -> Result<Option<ParameterSet>, CollaboratorError> {
        Ok(self.lookup(experiment_name))
    }

    fn previously_logged(&self) -> Option<bool> {
        self.logged()
    }

    fn log_exposure(&self, event: ExposureEvent) {
        self.record(event);
    }

    fn name(&self) -> String {
        self.definition.name.clone()
    }
}

#[async_trait]
impl AsyncExperimentCollaborator for StaticExperiment {
    async fn get_params(
        &self,
        experiment_name: Option<&str>,
    ) -> Result<Option<ParameterSet>, CollaboratorError> {
        Ok(self.lookup(experiment_name))
    }

    async fn previously_logged(&self) -> Option<bool> {
        self.logged()
    }

    async fn log_exposure(&self, event: ExposureEvent) {
        self.record(event);
    }

    fn name(&self) -> String {
        self.definition.name.clone()
    }
}
