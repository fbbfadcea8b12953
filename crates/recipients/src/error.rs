//! Recipients error types

use std::path::PathBuf;
use thiserror::Error;

/// Queue builder errors
#[derive(Debug, Error)]
pub enum RecipientsError {
    /// Recipient file could not be read
    #[error("failed to read recipient file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<RecipientsError> for contracts::ContractError {
    fn from(err: RecipientsError) -> Self {
        match err {
            RecipientsError::Read { source, .. } => contracts::ContractError::Io(source),
        }
    }
}
