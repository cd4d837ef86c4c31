//! Block sealing.
//!
//! The sealer decides when the pending set has reached its batch boundary
//! and turns the batch into a sealed block plus one inclusion proof per
//! transaction. A `tokio` mutex serializes seal attempts so that
//! concurrent submitters racing past the boundary produce exactly one
//! block, and the store's `commit_seal` keeps each commit all-or-nothing.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::canon;
use crate::config::LedgerConfig;
use crate::crypto::MerkleTree;
use crate::error::{LedgerError, LedgerResult};
use crate::storage::LedgerStore;
use crate::types::{Block, ProofRecord};

/// Seals pending transactions into blocks.
pub struct BlockSealer {
    store: Arc<dyn LedgerStore>,
    config: LedgerConfig,
    /// Only one seal attempt runs at a time.
    seal_lock: tokio::sync::Mutex<()>,
}

impl BlockSealer {
    /// Create a sealer over a shared store.
    pub fn new(store: Arc<dyn LedgerStore>, config: LedgerConfig) -> Self {
        Self {
            store,
            config,
            seal_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Seal the pending set into a block if the batch boundary is reached.
    ///
    /// Returns `Ok(None)` when the boundary policy says the batch is not
    /// ready, which includes an empty pending set. A failed attempt leaves
    /// every snapshotted transaction pending and is retried whole under
    /// the configured strategy; once attempts are exhausted the error
    /// carries the attempt count and the last underlying failure.
    pub async fn maybe_seal(&self) -> LedgerResult<Option<Block>> {
        let _guard = self.seal_lock.lock().await;

        let pending = self.store.pending_count().await?;
        if !self.config.seal_policy.should_seal(pending) {
            debug!(
                operation = "seal",
                pending = pending,
                "Batch boundary not reached"
            );
            return Ok(None);
        }

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.seal_once().await {
                Ok(block) => return Ok(block),
                Err(error) if attempt < self.config.max_seal_attempts => {
                    warn!(
                        operation = "seal",
                        attempt = attempt,
                        error = %error,
                        "Seal attempt failed, retrying"
                    );
                    let delay = self.config.seal_retry.delay_for_attempt(attempt);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
                Err(error) => {
                    warn!(
                        operation = "seal",
                        attempts = attempt,
                        error = %error,
                        "Seal attempts exhausted"
                    );
                    return Err(LedgerError::SealFailed {
                        attempts: attempt,
                        last_error: error.to_string(),
                    });
                }
            }
        }
    }

    /// One full seal attempt: snapshot the batch, build the tree, commit.
    ///
    /// A failed attempt never mutates the store, so re-running from the
    /// snapshot step is always safe.
    async fn seal_once(&self) -> LedgerResult<Option<Block>> {
        let batch = self.store.pending_snapshot().await?;
        if batch.is_empty() {
            // An empty block is never sealed.
            return Ok(None);
        }

        // Leaf digests are recomputed from the canonical payload bytes at
        // seal time; leaf order is the submission order of the batch.
        let mut leaves = Vec::with_capacity(batch.len());
        for tx in &batch {
            leaves.push(canon::payload_digest(&tx.payload)?);
        }

        let tree = MerkleTree::build(&leaves);
        let index = self.store.head_index().await? + 1;
        let block = Block {
            block_id: format!("block:{}", Uuid::new_v4()),
            index,
            sealed_at: Utc::now(),
            merkle_root: tree.root.clone(),
            tx_count: batch.len(),
            anchor_ref: None,
        };

        let proofs: Vec<ProofRecord> = batch
            .iter()
            .zip(tree.proofs)
            .map(|(tx, steps)| ProofRecord {
                tx_id: tx.tx_id.clone(),
                block_id: block.block_id.clone(),
                steps,
            })
            .collect();

        self.store.commit_seal(&block, &proofs).await?;

        info!(
            operation = "seal",
            block_id = %block.block_id,
            index = block.index,
            tx_count = block.tx_count,
            merkle_root = %block.merkle_root,
            "Block sealed"
        );

        Ok(Some(block))
    }
}
