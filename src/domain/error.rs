use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error() {
        let error = DomainError::storage("ledger offline");
        assert_eq!(error.to_string(), "Storage error: ledger offline");
    }

    #[test]
    fn test_internal_error() {
        let error = DomainError::internal("lock poisoned");
        assert_eq!(error.to_string(), "Internal error: lock poisoned");
    }

    #[test]
    fn test_serialization_error_from_serde() {
        let err = serde_json::from_str::<u32>("\"blue\"").unwrap_err();
        let error: DomainError = err.into();
        assert!(error.to_string().starts_with("Serialization error:"));
    }
}
