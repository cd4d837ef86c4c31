//! Ledger error types.
//!
//! Verification outcomes are deliberately not errors: a receipt that fails
//! to authenticate is reported through [`crate::verify::VerifyReport`], never
//! through this enum.

use thiserror::Error;

/// Ledger error
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Payload rejected at submission, before entering the pending set
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Unknown transaction, block, or wallet id
    #[error("Not found: {0}")]
    NotFound(String),

    /// Receipt requested for a transaction that has not been sealed yet
    #[error("Transaction not yet confirmed: {0}")]
    NotYetConfirmed(String),

    /// Duplicate id on insert
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Seal attempts exhausted; every snapshotted transaction is still pending
    #[error("Seal failed after {attempts} attempts: {last_error}")]
    SealFailed { attempts: u32, last_error: String },

    /// Storage backend failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Ledger result type
pub type LedgerResult<T> = Result<T, LedgerError>;

impl From<serde_json::Error> for LedgerError {
    fn from(e: serde_json::Error) -> Self {
        LedgerError::Serialization(e.to_string())
    }
}
