use thiserror::Error;

use crate::storage::StorageError;

pub type PortalResult<T> = core::result::Result<T, PortalError>;

#[derive(Debug, Error)]
pub enum PortalError {
    #[error("Trip not found: {0}")]
    TripNotFound(String),
    #[error("Checklist item not found: {0}")]
    ChecklistItemNotFound(String),
    #[error("Promise not found: {0}")]
    PromiseNotFound(String),
    #[error("Invalid tenant key: {0:?}")]
    InvalidTenantKey(String),
    #[error("Tenant config unavailable: {0}")]
    ConfigUnavailable(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Not logged in")]
    Unauthenticated,
    #[error("Access denied: requires one of [{0}]")]
    Forbidden(String),
    #[error("{0}")]
    Storage(#[from] StorageError),
    #[error("{0}")]
    IoError(#[from] std::io::Error),
    #[error("{0}")]
    SerdeJsonError(#[from] serde_json::Error),
    #[error("{0}")]
    Other(String),
}

impl PortalError {
    /// True for the "referenced id does not exist" family of failures.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            PortalError::TripNotFound(_)
                | PortalError::ChecklistItemNotFound(_)
                | PortalError::PromiseNotFound(_)
        )
    }
}
