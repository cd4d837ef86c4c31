//! Transaction payloads and ledger records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::crypto::Digest;

/// Transaction lifecycle status
///
/// `Pending -> Confirmed` is the only transition, made exactly once by the
/// sealer. Confirmed is terminal; confirmed records are immutable history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxStatus {
    /// Submitted, waiting for the next sealed block
    Pending,
    /// Sealed into a block
    Confirmed,
}

impl TxStatus {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
        }
    }
}

/// The client-signed transfer payload
///
/// Field declaration order is the canonical serialization order; the
/// payload digest is computed over exactly these fields (see
/// [`crate::canon`]), never over bookkeeping fields like status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPayload {
    /// Sender wallet id
    pub sender: String,
    /// Recipient reference
    pub recipient: String,
    /// Transfer amount
    pub amount: Decimal,
    /// Currency code
    pub currency: String,
    /// Strictly increasing per-sender nonce
    pub nonce: u64,
    /// Client-side unix timestamp, part of the signed bytes
    pub timestamp: i64,
}

/// A ledger transaction record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Transaction id (`tx:{uuid}`)
    pub tx_id: String,
    /// Signed payload
    pub payload: TransactionPayload,
    /// Digest of the canonical payload bytes; the transaction's Merkle leaf
    pub payload_hash: Digest,
    /// Opaque signature blob
    pub signature: String,
    /// Lifecycle status
    pub status: TxStatus,
    /// Owning block, set exactly once at seal time
    pub block_id: Option<String>,
    /// Server-side submission time
    pub submitted_at: DateTime<Utc>,
}

impl TransactionRecord {
    /// Whether this record has been sealed into a block
    pub fn is_confirmed(&self) -> bool {
        self.status == TxStatus::Confirmed
    }
}
