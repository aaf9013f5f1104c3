//! Domain-level errors.
//!
//! Invariant violations are rejected synchronously and surfaced to the caller
//! as a [`StoreError`]; storage failures live in
//! [`crate::storage::StorageError`].

use thiserror::Error;

/// An operation was rejected because it would violate a store invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("group '{0}' not found")]
    GroupNotFound(String),
    #[error("cannot delete the last remaining group")]
    LastGroup,
    #[error("group name must be non-empty")]
    EmptyName,
    #[error("'{0}' is not a valid ticker code")]
    InvalidTicker(String),
    #[error("reorder must reference every existing entry exactly once")]
    BadReorder,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            format!("{}", StoreError::GroupNotFound("g1".into())),
            "group 'g1' not found"
        );
        assert_eq!(
            format!("{}", StoreError::LastGroup),
            "cannot delete the last remaining group"
        );
        assert_eq!(
            format!("{}", StoreError::InvalidTicker("abc".into())),
            "'abc' is not a valid ticker code"
        );
    }
}
