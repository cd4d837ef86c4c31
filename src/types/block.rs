//! Sealed block records and headers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::Digest;

/// A sealed block
///
/// Created once, atomically, when a batch boundary is reached; immutable
/// thereafter. `index` runs 1, 2, 3, ... with no gaps and no duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Block id (`block:{uuid}`)
    pub block_id: String,
    /// Chain position, strictly one greater than the previous block
    pub index: u64,
    /// Seal time
    pub sealed_at: DateTime<Utc>,
    /// Root committing to the ordered batch of payload digests
    pub merkle_root: Digest,
    /// Number of transactions sealed in this block
    pub tx_count: usize,
    /// External chain anchor reference, filled by an anchoring layer
    pub anchor_ref: Option<String>,
}

impl Block {
    /// The published portion embedded in receipts
    pub fn header(&self) -> BlockHeader {
        BlockHeader {
            index: self.index,
            sealed_at: self.sealed_at,
            merkle_root: self.merkle_root.clone(),
        }
    }
}

/// The published portion of a block, sufficient for offline verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Chain position of the sealing block
    pub index: u64,
    /// Seal time
    pub sealed_at: DateTime<Utc>,
    /// Root the receipt's proof must reconstruct
    pub merkle_root: Digest,
}
