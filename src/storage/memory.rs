//! In-memory storage implementation.
//!
//! Reference backend for tests and development. All collections live under
//! one `RwLock` so `commit_seal` mutates the block map, the transaction
//! records, the pending queue, and the proof map inside a single writer
//! section, which is what makes the all-or-nothing contract hold.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use tokio::sync::RwLock;

use super::LedgerStore;
use crate::crypto::Digest;
use crate::error::{LedgerError, LedgerResult};
use crate::types::{Block, ProofRecord, TransactionRecord, TxStatus, WalletRecord};

#[derive(Debug, Default)]
struct LedgerState {
    wallets: HashMap<String, WalletRecord>,
    transactions: HashMap<String, TransactionRecord>,
    /// Pending transaction ids in submission order
    pending: Vec<String>,
    blocks: HashMap<String, Block>,
    blocks_by_index: BTreeMap<u64, String>,
    proofs: HashMap<String, ProofRecord>,
    /// Last accepted nonce per sender
    nonces: HashMap<String, u64>,
}

/// In-memory ledger store
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<LedgerState>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn put_wallet(&self, wallet: &WalletRecord) -> LedgerResult<()> {
        let mut state = self.state.write().await;
        if state.wallets.contains_key(&wallet.wallet_id) {
            return Err(LedgerError::AlreadyExists(wallet.wallet_id.clone()));
        }
        state.wallets.insert(wallet.wallet_id.clone(), wallet.clone());
        Ok(())
    }

    async fn get_wallet(&self, wallet_id: &str) -> LedgerResult<Option<WalletRecord>> {
        let state = self.state.read().await;
        Ok(state.wallets.get(wallet_id).cloned())
    }

    async fn latest_nonce(&self, sender: &str) -> LedgerResult<Option<u64>> {
        let state = self.state.read().await;
        Ok(state.nonces.get(sender).copied())
    }

    async fn insert_pending(&self, tx: &TransactionRecord) -> LedgerResult<()> {
        let mut state = self.state.write().await;
        if state.transactions.contains_key(&tx.tx_id) {
            return Err(LedgerError::AlreadyExists(tx.tx_id.clone()));
        }

        // Nonce check happens under the same write lock that orders the
        // pending queue, so racing submissions cannot both pass it
        let sender = tx.payload.sender.clone();
        if let Some(last) = state.nonces.get(&sender) {
            if tx.payload.nonce <= *last {
                return Err(LedgerError::InvalidPayload(format!(
                    "nonce {} for {} is not greater than last accepted nonce {}",
                    tx.payload.nonce, sender, last
                )));
            }
        }

        state.nonces.insert(sender, tx.payload.nonce);
        state.pending.push(tx.tx_id.clone());
        state.transactions.insert(tx.tx_id.clone(), tx.clone());
        Ok(())
    }

    async fn get_transaction(&self, tx_id: &str) -> LedgerResult<Option<TransactionRecord>> {
        let state = self.state.read().await;
        Ok(state.transactions.get(tx_id).cloned())
    }

    async fn pending_snapshot(&self) -> LedgerResult<Vec<TransactionRecord>> {
        let state = self.state.read().await;
        Ok(state
            .pending
            .iter()
            .filter_map(|id| state.transactions.get(id))
            .cloned()
            .collect())
    }

    async fn pending_count(&self) -> LedgerResult<usize> {
        let state = self.state.read().await;
        Ok(state.pending.len())
    }

    async fn head_index(&self) -> LedgerResult<u64> {
        let state = self.state.read().await;
        Ok(state
            .blocks_by_index
            .keys()
            .next_back()
            .copied()
            .unwrap_or(0))
    }

    async fn commit_seal(&self, block: &Block, proofs: &[ProofRecord]) -> LedgerResult<()> {
        let mut state = self.state.write().await;

        // Validate everything before touching state; a rejected commit
        // must leave no trace
        if proofs.is_empty() {
            // An empty block is never committed
            return Err(LedgerError::Storage(format!(
                "block {} confirms no transactions",
                block.block_id
            )));
        }
        if state.blocks.contains_key(&block.block_id) {
            return Err(LedgerError::AlreadyExists(block.block_id.clone()));
        }
        let head = state
            .blocks_by_index
            .keys()
            .next_back()
            .copied()
            .unwrap_or(0);
        if block.index != head + 1 {
            return Err(LedgerError::Storage(format!(
                "block index {} does not extend head {}",
                block.index, head
            )));
        }
        for proof in proofs {
            match state.transactions.get(&proof.tx_id) {
                None => return Err(LedgerError::NotFound(proof.tx_id.clone())),
                Some(tx) if tx.status != TxStatus::Pending => {
                    return Err(LedgerError::Storage(format!(
                        "transaction {} is {}, not pending",
                        proof.tx_id,
                        tx.status.as_str()
                    )));
                }
                Some(_) => {}
            }
        }

        state
            .blocks_by_index
            .insert(block.index, block.block_id.clone());
        state.blocks.insert(block.block_id.clone(), block.clone());

        let confirmed: HashSet<&str> = proofs.iter().map(|p| p.tx_id.as_str()).collect();
        state.pending.retain(|id| !confirmed.contains(id.as_str()));

        for proof in proofs {
            if let Some(tx) = state.transactions.get_mut(&proof.tx_id) {
                tx.status = TxStatus::Confirmed;
                tx.block_id = Some(block.block_id.clone());
            }
            state.proofs.insert(proof.tx_id.clone(), proof.clone());
        }
        Ok(())
    }

    async fn get_block(&self, block_id: &str) -> LedgerResult<Option<Block>> {
        let state = self.state.read().await;
        Ok(state.blocks.get(block_id).cloned())
    }

    async fn get_block_by_index(&self, index: u64) -> LedgerResult<Option<Block>> {
        let state = self.state.read().await;
        Ok(state
            .blocks_by_index
            .get(&index)
            .and_then(|id| state.blocks.get(id))
            .cloned())
    }

    async fn find_block_by_root(&self, root: &Digest) -> LedgerResult<Option<Block>> {
        let state = self.state.read().await;
        Ok(state
            .blocks
            .values()
            .find(|b| b.merkle_root == *root)
            .cloned())
    }

    async fn list_blocks(&self) -> LedgerResult<Vec<Block>> {
        let state = self.state.read().await;
        Ok(state
            .blocks_by_index
            .values()
            .filter_map(|id| state.blocks.get(id))
            .cloned()
            .collect())
    }

    async fn get_proof(&self, tx_id: &str) -> LedgerResult<Option<ProofRecord>> {
        let state = self.state.read().await;
        Ok(state.proofs.get(tx_id).cloned())
    }
}
