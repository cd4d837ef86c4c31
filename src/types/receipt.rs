//! Receipts and stored proof records.

use serde::{Deserialize, Serialize};

use crate::crypto::ProofStep;
use crate::types::block::BlockHeader;
use crate::types::transaction::TransactionPayload;

/// Stored inclusion proof for one confirmed transaction
///
/// Created atomically alongside the block that issued it; immutable
/// thereafter. Replaying `steps` from the transaction's payload digest
/// reproduces the owning block's root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofRecord {
    /// Transaction this proof belongs to
    pub tx_id: String,
    /// Block that issued the proof
    pub block_id: String,
    /// Sibling steps from leaf to root
    pub steps: Vec<ProofStep>,
}

/// Self-contained, offline-verifiable inclusion receipt
///
/// Carries everything a third party needs: the payload (to recompute the
/// leaf digest), the signature and signer public key, the proof steps, and
/// the header of the sealing block. No ledger access is required to
/// verify it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// The signed transfer payload
    pub payload: TransactionPayload,
    /// Opaque signature over the canonical payload bytes
    pub signature: String,
    /// Sender wallet's public key, empty if none was registered
    pub public_key: String,
    /// Header of the block that sealed the transaction
    pub block_header: BlockHeader,
    /// Inclusion proof from the payload digest up to the header root
    pub proof: Vec<ProofStep>,
}
