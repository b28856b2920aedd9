//! Infrastructure layer - Collaborator and logging implementations

pub mod experiment;
pub mod logging;
