//! Exposure ledger trait

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::exposure::ExposureEvent;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// An exposure as stored in a ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedExposure {
    /// Visitor unit the exposure belongs to
    pub unit: String,
    pub event: ExposureEvent,
    pub logged_at: DateTime<Utc>,
}

impl LoggedExposure {
    pub fn new(unit: impl Into<String>, event: ExposureEvent) -> Self {
        Self {
            unit: unit.into(),
            event,
            logged_at: Utc::now(),
        }
    }
}

/// Source of truth for "has this visitor already been exposed"
///
/// Entries are keyed by the collaborator name stamped on the event and the
/// visitor unit, which lets deduplication span activations.
#[cfg_attr(test, automock)]
pub trait ExposureLedger: Send + Sync {
    /// Check whether an exposure exists for the experiment and unit
    fn has_logged(&self, experiment: &str, unit: &str) -> Result<bool, DomainError>;

    /// Append an exposure
    fn record(&self, exposure: LoggedExposure) -> Result<(), DomainError>;
}
