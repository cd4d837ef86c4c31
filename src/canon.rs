//! Canonical payload serialization.
//!
//! The digest sealed into the Merkle tree commits to one canonical byte
//! encoding of the payload: JSON with the field order fixed by
//! [`TransactionPayload`]'s declaration and amounts rendered as decimal
//! strings. Submission, preparation, sealing, and verification all hash
//! through here; if any of them serialized payloads differently, every
//! proof would silently fail to verify.

use crate::crypto::Digest;
use crate::error::LedgerResult;
use crate::types::TransactionPayload;

/// Canonical byte encoding of a payload
pub fn canonical_bytes(payload: &TransactionPayload) -> LedgerResult<Vec<u8>> {
    Ok(serde_json::to_vec(payload)?)
}

/// Digest of the canonical payload bytes; the transaction's Merkle leaf
pub fn payload_digest(payload: &TransactionPayload) -> LedgerResult<Digest> {
    Ok(Digest::sha256(&canonical_bytes(payload)?))
}
