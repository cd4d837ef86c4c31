//! Ledger storage.
//!
//! [`LedgerStore`] is the persistence boundary the sealer and service are
//! written against. The reference backend is in-memory; a database-backed
//! implementation only has to honor the same two guarantees:
//!
//! - `insert_pending` enforces id uniqueness and the per-sender nonce rule
//!   under the same exclusion that orders the pending queue;
//! - `commit_seal` persists the block, confirms every covered transaction,
//!   and stores every proof atomically, or leaves no trace at all.

pub mod memory;

use async_trait::async_trait;

use crate::crypto::Digest;
use crate::error::LedgerResult;
use crate::types::{Block, ProofRecord, TransactionRecord, WalletRecord};

/// Ledger storage interface
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Save a wallet record
    async fn put_wallet(&self, wallet: &WalletRecord) -> LedgerResult<()>;

    /// Fetch a wallet by id
    async fn get_wallet(&self, wallet_id: &str) -> LedgerResult<Option<WalletRecord>>;

    /// Highest nonce accepted for a sender, if any
    async fn latest_nonce(&self, sender: &str) -> LedgerResult<Option<u64>>;

    /// Insert a new pending transaction
    ///
    /// Rejects duplicate ids and nonces that are not strictly greater than
    /// the sender's last accepted nonce; accepted transactions join the
    /// pending queue in insertion order.
    async fn insert_pending(&self, tx: &TransactionRecord) -> LedgerResult<()>;

    /// Fetch a transaction by id
    async fn get_transaction(&self, tx_id: &str) -> LedgerResult<Option<TransactionRecord>>;

    /// Snapshot the pending set in submission order
    async fn pending_snapshot(&self) -> LedgerResult<Vec<TransactionRecord>>;

    /// Number of pending transactions
    async fn pending_count(&self) -> LedgerResult<usize>;

    /// Index of the latest sealed block, 0 when the chain is empty
    async fn head_index(&self) -> LedgerResult<u64>;

    /// Atomically persist a sealed block
    ///
    /// Stores the block, flips every covered transaction to confirmed with
    /// its `block_id`, and stores the proofs, all or nothing. Fails without
    /// mutating anything if the confirmation set is empty, if the block id
    /// or index collides, if `block.index` does not extend the current head
    /// by exactly one, or if any covered transaction is missing or already
    /// confirmed.
    async fn commit_seal(&self, block: &Block, proofs: &[ProofRecord]) -> LedgerResult<()>;

    /// Fetch a block by id
    async fn get_block(&self, block_id: &str) -> LedgerResult<Option<Block>>;

    /// Fetch a block by chain index
    async fn get_block_by_index(&self, index: u64) -> LedgerResult<Option<Block>>;

    /// Fetch the block committing to the given root, if one exists
    async fn find_block_by_root(&self, root: &Digest) -> LedgerResult<Option<Block>>;

    /// All sealed blocks in index order
    async fn list_blocks(&self) -> LedgerResult<Vec<Block>>;

    /// Fetch the stored proof for a confirmed transaction
    async fn get_proof(&self, tx_id: &str) -> LedgerResult<Option<ProofRecord>>;
}

pub use memory::MemoryStore;
