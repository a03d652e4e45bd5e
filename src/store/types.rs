use crate::models::VillaId;
use thiserror::Error;

/// Failure reported by a record store
/// Every variant renders as a message fit to show the operator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("{0}")]
    Transport(String),

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected response from store: {0}")]
    Decode(String),

    #[error("no villa with id {0}")]
    NotFound(VillaId),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
