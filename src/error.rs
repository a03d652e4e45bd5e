use thiserror::Error;

use crate::store::StoreError;

/// Failures surfaced by the repository and the form/deletion flows
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    #[error("Failed to fetch villas: {0}")]
    FetchFailed(String),

    #[error("Failed to write villa: {0}")]
    WriteFailed(String),

    #[error("Invalid villa: {0}")]
    ValidationFailed(String),
}

impl DashboardError {
    pub fn fetch(err: StoreError) -> Self {
        Self::FetchFailed(err.to_string())
    }

    pub fn write(err: StoreError) -> Self {
        Self::WriteFailed(err.to_string())
    }

    /// The message without the classification prefix
    pub fn message(&self) -> &str {
        match self {
            Self::FetchFailed(message)
            | Self::WriteFailed(message)
            | Self::ValidationFailed(message) => message,
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_failure_reads_the_same_for_every_mutation() {
        let err = DashboardError::write(StoreError::NotFound(12));
        assert_eq!(err.to_string(), "Failed to write villa: no villa with id 12");
        assert_eq!(err.message(), "no villa with id 12");
    }
}
