//! Append-only transaction ledger with Merkle-proof receipts.
//!
//! This crate batches signed transaction payloads into sealed blocks and
//! issues a portable receipt for each one. A receipt carries the payload,
//! the block header, and a Merkle proof path, so any holder can re-check
//! inclusion offline without talking to the ledger.
//!
//! # Architecture
//!
//! The ledger consists of several components:
//!
//! - **Canonical Serialization**: Deterministic payload bytes for hashing and signing
//! - **Merkle Tree Builder**: Batches payload digests into a root with one proof per leaf
//! - **Ledger Store**: Ordered pending queue, wallets, blocks, and atomic seal commits
//! - **Block Sealer**: Batch boundary policy plus retried, all-or-nothing seals
//! - **Receipt Verification**: Offline proof replay and ledger root lookup
//!
//! # Canonical Payload Format
//!
//! Payloads are hashed over their canonical JSON encoding, with fields in
//! this fixed order:
//!
//! ```text
//! | Field     | Type           | Notes                          |
//! |-----------|----------------|--------------------------------|
//! | sender    | string         | Sender wallet id               |
//! | recipient | string         | Recipient wallet id            |
//! | amount    | decimal string | E.g. "10.50"                   |
//! | currency  | string         | Currency code                  |
//! | nonce     | integer        | Strictly increasing per sender |
//! | timestamp | integer        | Unix seconds                   |
//! ```
//!
//! Proof steps travel as `{"hash": "<hex digest>", "side": "L" | "R"}`.
//!
//! # Usage
//!
//! ```rust,no_run
//! use qwallet_ledger::{LedgerConfig, LedgerService};
//! use rust_decimal::Decimal;
//!
//! async fn example() {
//!     let service = LedgerService::in_memory(LedgerConfig::default());
//!
//!     // Register a wallet and prepare a payload for signing
//!     let wallet = service.register_wallet("user-1", None).await.unwrap();
//!     let prepared = service
//!         .prepare(&wallet.wallet_id, "wallet:bob", Decimal::new(1050, 2), "MXN")
//!         .await
//!         .unwrap();
//!
//!     // Submit the signed payload; the ledger seals at the batch boundary
//!     let submitted = service.submit(prepared.payload, "signature").await.unwrap();
//!     let sealed = service.maybe_seal().await.unwrap();
//!
//!     // Once sealed, the receipt verifies offline
//!     if sealed.is_some() {
//!         let receipt = service.get_receipt(&submitted.tx_id).await.unwrap();
//!         let report = qwallet_ledger::verify_receipt(&receipt);
//!         assert!(report.valid);
//!     }
//! }
//! ```

pub mod canon;
pub mod config;
pub mod crypto;
pub mod error;
pub mod retry;
pub mod sealer;
pub mod service;
pub mod storage;
pub mod types;
pub mod verify;

pub use canon::{canonical_bytes, payload_digest};
pub use config::{LedgerConfig, SealPolicy};
pub use crypto::{
    empty_root, replay_proof, verify_inclusion, Digest, DigestError, MerkleTree, ProofStep, Side,
};
pub use error::{LedgerError, LedgerResult};
pub use retry::RetryStrategy;
pub use sealer::BlockSealer;
pub use service::{LedgerService, PreparedTransaction, SubmitResult};
pub use storage::{LedgerStore, MemoryStore};
pub use types::{
    Block, BlockHeader, ProofRecord, Receipt, TransactionPayload, TransactionRecord, TxStatus,
    WalletRecord,
};
pub use verify::{verify_receipt, VerifyReport};

/// Create a service with the development configuration and in-memory storage.
pub fn create_development_service() -> LedgerService {
    LedgerService::in_memory(LedgerConfig::development())
}
