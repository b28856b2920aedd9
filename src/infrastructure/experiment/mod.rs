//! Infrastructure layer for experiment collaborators
//!
//! Provides a configuration-backed collaborator and exposure ledgers.

mod in_memory_ledger;
mod static_experiment;

pub use in_memory_ledger::InMemoryExposureLedger;
pub use static_experiment::StaticExperiment;
