//! Offline receipt verification.
//!
//! A receipt carries everything needed to re-check inclusion: the payload,
//! the block header, and the proof path. Verification recomputes the
//! payload digest from the canonical bytes and replays the proof against
//! the header's Merkle root. No ledger access is involved, and a failed
//! check is a verdict, not an error.

use serde::{Deserialize, Serialize};

use crate::canon;
use crate::crypto::verify_inclusion;
use crate::types::Receipt;

/// Outcome of verifying a receipt.
///
/// `reason` is set only when the receipt is invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyReport {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl VerifyReport {
    /// A passing verdict.
    pub fn valid() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    /// A failing verdict with the reason it failed.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
        }
    }
}

/// Verify a receipt against its own block header.
///
/// Checks, in order: the signature is present, the payload digest is
/// recomputed from the canonical serialization, and the proof path
/// replays from that digest to the header's Merkle root. Whether the
/// claimed root belongs to a real ledger is out of scope here; see
/// `LedgerService::verify_receipt` for the ledger-backed check.
pub fn verify_receipt(receipt: &Receipt) -> VerifyReport {
    if receipt.signature.is_empty() {
        return VerifyReport::invalid("missing signature");
    }

    let leaf = match canon::payload_digest(&receipt.payload) {
        Ok(digest) => digest,
        Err(error) => {
            return VerifyReport::invalid(format!("payload cannot be canonicalized: {}", error))
        }
    };

    if !verify_inclusion(&leaf, &receipt.proof, &receipt.block_header.merkle_root) {
        return VerifyReport::invalid("proof does not reconstruct the claimed root");
    }

    VerifyReport::valid()
}
