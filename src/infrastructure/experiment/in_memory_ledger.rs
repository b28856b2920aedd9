//! In-memory implementation of the exposure ledger

use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::{DomainError, ExposureLedger, LoggedExposure};

/// In-memory exposure ledger
#[derive(Debug, Default)]
pub struct InMemoryExposureLedger {
    exposures: RwLock<HashMap<(String, String), Vec<LoggedExposure>>>,
}

impl InMemoryExposureLedger {
    /// Create a new empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// All exposures recorded for an experiment and unit, oldest first
    pub fn exposures(
        &self,
        experiment: &str,
        unit: &str,
    ) -> Result<Vec<LoggedExposure>, DomainError> {
        let exposures = self
            .exposures
            .read()
            .map_err(|e| DomainError::internal(format!("Failed to acquire read lock: {}", e)))?;

        Ok(exposures
            .get(&(experiment.to_string(), unit.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    /// Total number of recorded exposures
    pub fn len(&self) -> usize {
        self.exposures
            .read()
            .map(|exposures| exposures.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ExposureLedger for InMemoryExposureLedger {
    fn has_logged(&self, experiment: &str, unit: &str) -> Result<bool, DomainError> {
        let exposures = self
            .exposures
            .read()
            .map_err(|e| DomainError::internal(format!("Failed to acquire read lock: {}", e)))?;

        Ok(exposures
            .get(&(experiment.to_string(), unit.to_string()))
            .is_some_and(|entries| !entries.is_empty()))
    }

    fn record(&self, exposure: LoggedExposure) -> Result<(), DomainError> {
        let mut exposures = self
            .exposures
            .write()
            .map_err(|e| DomainError::internal(format!("Failed to acquire write lock: {}", e)))?;

        exposures
            .entry((exposure.event.name.clone(), exposure.unit.clone()))
            .or_default()
            .push(exposure);

        Ok(())
    }
}
