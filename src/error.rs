use thiserror::Error;

/// Errors surfaced at the store boundary.
///
/// Missing ids on update/delete are not errors; those commands report the
/// no-op through their return value instead.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown challenge id {0} (expected 1..=5)")]
    UnknownChallenge(u8),

    #[error("unknown study subject '{0}'")]
    UnknownSubject(String),

    #[error("invalid patch payload: {0}")]
    InvalidPatch(String),

    #[error("validation error: {0}")]
    Validation(String),

    /// The in-memory state was updated but the snapshot could not be written.
    #[error("failed to persist snapshot: {0:#}")]
    Persist(anyhow::Error),

    #[error("failed to load snapshot: {0:#}")]
    Load(anyhow::Error),

    #[error("stored snapshot is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

impl StoreError {
    /// True for write failures that leave the in-memory state ahead of the slot.
    pub fn is_persist(&self) -> bool {
        matches!(self, StoreError::Persist(_))
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
