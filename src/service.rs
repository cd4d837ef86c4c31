//! Ledger service facade.
//!
//! `LedgerService` is the single entry point callers use: wallet
//! registration, payload preparation, submission, sealing, and receipt
//! issuance and verification all go through it. The service validates at
//! the submission gate, delegates ordering and atomicity to the store,
//! and delegates batch boundaries to the sealer.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::canon;
use crate::config::LedgerConfig;
use crate::crypto::Digest;
use crate::error::{LedgerError, LedgerResult};
use crate::sealer::BlockSealer;
use crate::storage::{LedgerStore, MemoryStore};
use crate::types::{
    Block, Receipt, TransactionPayload, TransactionRecord, TxStatus, WalletRecord,
};
use crate::verify::{self, VerifyReport};

/// A payload assembled by the service, ready for the caller to sign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreparedTransaction {
    pub payload: TransactionPayload,
    pub payload_hash: Digest,
    pub nonce: u64,
}

/// Outcome of accepting a transaction into the pending set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResult {
    pub tx_id: String,
    pub nonce: u64,
    pub payload_hash: Digest,
}

/// Entry point for all ledger operations.
pub struct LedgerService {
    store: Arc<dyn LedgerStore>,
    sealer: BlockSealer,
}

impl LedgerService {
    /// Create a service over a shared store.
    pub fn new(store: Arc<dyn LedgerStore>, config: LedgerConfig) -> Self {
        let sealer = BlockSealer::new(store.clone(), config);
        Self { store, sealer }
    }

    /// Create a service backed by the in-memory store.
    pub fn in_memory(config: LedgerConfig) -> Self {
        Self::new(Arc::new(MemoryStore::new()), config)
    }

    /// Register a wallet and return its record.
    ///
    /// The public key is optional; wallets registered without one issue
    /// receipts with an empty key field.
    pub async fn register_wallet(
        &self,
        user_id: &str,
        public_key: Option<String>,
    ) -> LedgerResult<WalletRecord> {
        let wallet = WalletRecord {
            wallet_id: format!("wallet:{}", Uuid::new_v4()),
            user_id: user_id.to_string(),
            public_key,
            created_at: Utc::now(),
        };
        self.store.put_wallet(&wallet).await?;

        info!(
            operation = "register_wallet",
            wallet_id = %wallet.wallet_id,
            user_id = %wallet.user_id,
            "Wallet registered"
        );
        Ok(wallet)
    }

    /// Look up a wallet by id.
    pub async fn get_wallet(&self, wallet_id: &str) -> LedgerResult<WalletRecord> {
        self.store
            .get_wallet(wallet_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("wallet {} not found", wallet_id)))
    }

    /// Assemble a payload for the caller to sign.
    ///
    /// The nonce is the sender's last accepted nonce plus one, and the
    /// timestamp is the current unix time. Nothing is written; the caller
    /// signs the canonical bytes and submits the payload back.
    pub async fn prepare(
        &self,
        wallet_id: &str,
        recipient: &str,
        amount: Decimal,
        currency: &str,
    ) -> LedgerResult<PreparedTransaction> {
        self.get_wallet(wallet_id).await?;

        let nonce = self.store.latest_nonce(wallet_id).await?.unwrap_or(0) + 1;
        let payload = TransactionPayload {
            sender: wallet_id.to_string(),
            recipient: recipient.to_string(),
            amount,
            currency: currency.to_string(),
            nonce,
            timestamp: Utc::now().timestamp(),
        };
        let payload_hash = canon::payload_digest(&payload)?;

        debug!(
            operation = "prepare",
            wallet_id = wallet_id,
            nonce = nonce,
            "Payload prepared"
        );
        Ok(PreparedTransaction {
            payload,
            payload_hash,
            nonce,
        })
    }

    /// Accept a signed payload into the pending set.
    ///
    /// The signature is stored opaquely; it is checked for presence at
    /// verification time, not here. The store enforces the per-sender
    /// nonce order under the same lock that orders the pending queue.
    pub async fn submit(
        &self,
        payload: TransactionPayload,
        signature: &str,
    ) -> LedgerResult<SubmitResult> {
        if payload.nonce == 0 {
            return Err(LedgerError::InvalidPayload(
                "nonce must be at least 1".to_string(),
            ));
        }
        if payload.amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidPayload(
                "amount must be positive".to_string(),
            ));
        }
        if payload.currency.is_empty() {
            return Err(LedgerError::InvalidPayload(
                "currency must not be empty".to_string(),
            ));
        }
        if payload.recipient.is_empty() {
            return Err(LedgerError::InvalidPayload(
                "recipient must not be empty".to_string(),
            ));
        }
        if self.store.get_wallet(&payload.sender).await?.is_none() {
            return Err(LedgerError::InvalidPayload(format!(
                "sender wallet {} is not registered",
                payload.sender
            )));
        }

        let payload_hash = canon::payload_digest(&payload)?;
        let tx = TransactionRecord {
            tx_id: format!("tx:{}", Uuid::new_v4()),
            payload,
            payload_hash: payload_hash.clone(),
            signature: signature.to_string(),
            status: TxStatus::Pending,
            block_id: None,
            submitted_at: Utc::now(),
        };
        self.store.insert_pending(&tx).await?;

        info!(
            operation = "submit",
            tx_id = %tx.tx_id,
            sender = %tx.payload.sender,
            nonce = tx.payload.nonce,
            "Transaction accepted"
        );
        Ok(SubmitResult {
            tx_id: tx.tx_id,
            nonce: tx.payload.nonce,
            payload_hash,
        })
    }

    /// Seal the pending set into a block if the batch boundary is reached.
    pub async fn maybe_seal(&self) -> LedgerResult<Option<Block>> {
        self.sealer.maybe_seal().await
    }

    /// Issue the portable receipt for a confirmed transaction.
    ///
    /// Pending transactions return `NotYetConfirmed`; a confirmed
    /// transaction whose block or proof cannot be loaded is a storage
    /// fault, not a caller error.
    pub async fn get_receipt(&self, tx_id: &str) -> LedgerResult<Receipt> {
        let tx = self
            .store
            .get_transaction(tx_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("transaction {} not found", tx_id)))?;

        if !tx.is_confirmed() {
            return Err(LedgerError::NotYetConfirmed(format!(
                "transaction {} is not confirmed yet",
                tx_id
            )));
        }

        let block_id = tx.block_id.as_deref().ok_or_else(|| {
            LedgerError::Storage(format!(
                "confirmed transaction {} has no block reference",
                tx_id
            ))
        })?;
        let block = self.store.get_block(block_id).await?.ok_or_else(|| {
            LedgerError::Storage(format!("block {} missing for transaction {}", block_id, tx_id))
        })?;
        let proof = self
            .store
            .get_proof(tx_id)
            .await?
            .ok_or_else(|| LedgerError::Storage(format!("proof missing for transaction {}", tx_id)))?;

        let public_key = self
            .store
            .get_wallet(&tx.payload.sender)
            .await?
            .and_then(|wallet| wallet.public_key)
            .unwrap_or_default();

        debug!(operation = "get_receipt", tx_id = tx_id, "Receipt issued");
        Ok(Receipt {
            payload: tx.payload,
            signature: tx.signature,
            public_key,
            block_header: block.header(),
            proof: proof.steps,
        })
    }

    /// Verify a receipt offline, then against the ledger.
    ///
    /// The offline replay runs first; when it passes, the claimed root
    /// must also belong to a sealed block of this ledger. Both failures
    /// come back as verdicts, never as errors.
    pub async fn verify_receipt(&self, receipt: &Receipt) -> LedgerResult<VerifyReport> {
        let report = verify::verify_receipt(receipt);
        if !report.valid {
            debug!(
                operation = "verify_receipt",
                reason = report.reason.as_deref().unwrap_or(""),
                "Receipt rejected offline"
            );
            return Ok(report);
        }

        match self
            .store
            .find_block_by_root(&receipt.block_header.merkle_root)
            .await?
        {
            Some(_) => Ok(VerifyReport::valid()),
            None => Ok(VerifyReport::invalid("root does not match any known block")),
        }
    }

    /// Look up a sealed block by its chain index.
    pub async fn get_block(&self, index: u64) -> LedgerResult<Block> {
        self.store
            .get_block_by_index(index)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("block {} not found", index)))
    }

    /// Index of the latest sealed block, 0 when nothing is sealed.
    pub async fn head_index(&self) -> LedgerResult<u64> {
        self.store.head_index().await
    }

    /// All sealed blocks in chain order.
    pub async fn list_blocks(&self) -> LedgerResult<Vec<Block>> {
        self.store.list_blocks().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SealPolicy;
    use crate::retry::RetryStrategy;

    fn create_test_service() -> LedgerService {
        LedgerService::in_memory(LedgerConfig::default())
    }

    fn create_seal_on_submit_service() -> LedgerService {
        LedgerService::in_memory(LedgerConfig {
            seal_policy: SealPolicy::EveryCall,
            max_seal_attempts: 3,
            seal_retry: RetryStrategy::None,
        })
    }

    async fn submit_prepared(
        service: &LedgerService,
        wallet_id: &str,
        amount: Decimal,
    ) -> SubmitResult {
        let prepared = service
            .prepare(wallet_id, "wallet:bob", amount, "MXN")
            .await
            .unwrap();
        service.submit(prepared.payload, "sig").await.unwrap()
    }

    #[tokio::test]
    async fn test_register_and_prepare_first_nonce() {
        let service = create_test_service();
        let wallet = service.register_wallet("user-1", None).await.unwrap();

        let prepared = service
            .prepare(&wallet.wallet_id, "wallet:bob", Decimal::new(1050, 2), "MXN")
            .await
            .unwrap();

        assert_eq!(prepared.nonce, 1);
        assert_eq!(prepared.payload.sender, wallet.wallet_id);
        assert_eq!(prepared.payload.nonce, 1);
        assert_eq!(
            prepared.payload_hash,
            canon::payload_digest(&prepared.payload).unwrap()
        );
    }

    #[tokio::test]
    async fn test_prepare_unknown_wallet() {
        let service = create_test_service();

        let result = service
            .prepare("wallet:ghost", "wallet:bob", Decimal::ONE, "MXN")
            .await;

        assert!(matches!(result, Err(LedgerError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_nonce_advances_after_submit() {
        let service = create_test_service();
        let wallet = service.register_wallet("user-1", None).await.unwrap();

        submit_prepared(&service, &wallet.wallet_id, Decimal::ONE).await;
        let prepared = service
            .prepare(&wallet.wallet_id, "wallet:bob", Decimal::ONE, "MXN")
            .await
            .unwrap();

        assert_eq!(prepared.nonce, 2);
    }

    #[tokio::test]
    async fn test_submit_rejects_unregistered_sender() {
        let service = create_test_service();
        let payload = TransactionPayload {
            sender: "wallet:ghost".to_string(),
            recipient: "wallet:bob".to_string(),
            amount: Decimal::ONE,
            currency: "MXN".to_string(),
            nonce: 1,
            timestamp: 1_700_000_000,
        };

        let result = service.submit(payload, "sig").await;

        assert!(matches!(result, Err(LedgerError::InvalidPayload(_))));
    }

    #[tokio::test]
    async fn test_submit_rejects_non_positive_amounts() {
        let service = create_test_service();
        let wallet = service.register_wallet("user-1", None).await.unwrap();

        for amount in [Decimal::ZERO, Decimal::new(-100, 2)] {
            let mut prepared = service
                .prepare(&wallet.wallet_id, "wallet:bob", Decimal::ONE, "MXN")
                .await
                .unwrap();
            prepared.payload.amount = amount;

            let result = service.submit(prepared.payload, "sig").await;
            assert!(matches!(result, Err(LedgerError::InvalidPayload(_))));
        }
    }

    #[tokio::test]
    async fn test_submit_rejects_zero_nonce() {
        let service = create_test_service();
        let wallet = service.register_wallet("user-1", None).await.unwrap();
        let mut prepared = service
            .prepare(&wallet.wallet_id, "wallet:bob", Decimal::ONE, "MXN")
            .await
            .unwrap();
        prepared.payload.nonce = 0;

        let result = service.submit(prepared.payload, "sig").await;

        assert!(matches!(result, Err(LedgerError::InvalidPayload(_))));
    }

    #[tokio::test]
    async fn test_submit_rejects_empty_currency() {
        let service = create_test_service();
        let wallet = service.register_wallet("user-1", None).await.unwrap();
        let mut prepared = service
            .prepare(&wallet.wallet_id, "wallet:bob", Decimal::ONE, "MXN")
            .await
            .unwrap();
        prepared.payload.currency = String::new();

        let result = service.submit(prepared.payload, "sig").await;

        assert!(matches!(result, Err(LedgerError::InvalidPayload(_))));
    }

    #[tokio::test]
    async fn test_receipt_unknown_transaction() {
        let service = create_test_service();

        let result = service.get_receipt("tx:ghost").await;

        assert!(matches!(result, Err(LedgerError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_receipt_for_pending_transaction() {
        let service = create_test_service();
        let wallet = service.register_wallet("user-1", None).await.unwrap();
        let submitted = submit_prepared(&service, &wallet.wallet_id, Decimal::ONE).await;

        let result = service.get_receipt(&submitted.tx_id).await;

        assert!(matches!(result, Err(LedgerError::NotYetConfirmed(_))));
    }

    #[tokio::test]
    async fn test_receipt_after_seal_verifies() {
        let service = create_seal_on_submit_service();
        let wallet = service
            .register_wallet("user-1", Some("04deadbeef".to_string()))
            .await
            .unwrap();
        let submitted = submit_prepared(&service, &wallet.wallet_id, Decimal::new(1050, 2)).await;

        let block = service.maybe_seal().await.unwrap().unwrap();
        let receipt = service.get_receipt(&submitted.tx_id).await.unwrap();

        assert_eq!(receipt.public_key, "04deadbeef");
        assert_eq!(receipt.block_header.index, block.index);
        assert_eq!(receipt.block_header.merkle_root, block.merkle_root);

        let offline = verify::verify_receipt(&receipt);
        assert!(offline.valid);

        let report = service.verify_receipt(&receipt).await.unwrap();
        assert!(report.valid);
    }

    #[tokio::test]
    async fn test_receipt_without_registered_key_is_empty() {
        let service = create_seal_on_submit_service();
        let wallet = service.register_wallet("user-1", None).await.unwrap();
        let submitted = submit_prepared(&service, &wallet.wallet_id, Decimal::ONE).await;
        service.maybe_seal().await.unwrap().unwrap();

        let receipt = service.get_receipt(&submitted.tx_id).await.unwrap();

        assert_eq!(receipt.public_key, "");
    }

    #[tokio::test]
    async fn test_verify_rejects_foreign_root() {
        // A receipt sealed by one ledger does not verify against another.
        let origin = create_seal_on_submit_service();
        let wallet = origin.register_wallet("user-1", None).await.unwrap();
        let submitted = submit_prepared(&origin, &wallet.wallet_id, Decimal::ONE).await;
        origin.maybe_seal().await.unwrap().unwrap();
        let receipt = origin.get_receipt(&submitted.tx_id).await.unwrap();

        let other = create_test_service();
        let report = other.verify_receipt(&receipt).await.unwrap();

        assert!(!report.valid);
        assert_eq!(
            report.reason.as_deref(),
            Some("root does not match any known block")
        );
    }

    #[tokio::test]
    async fn test_block_reads() {
        let service = create_seal_on_submit_service();
        let wallet = service.register_wallet("user-1", None).await.unwrap();

        submit_prepared(&service, &wallet.wallet_id, Decimal::ONE).await;
        service.maybe_seal().await.unwrap().unwrap();
        submit_prepared(&service, &wallet.wallet_id, Decimal::ONE).await;
        service.maybe_seal().await.unwrap().unwrap();

        assert_eq!(service.head_index().await.unwrap(), 2);
        assert_eq!(service.get_block(1).await.unwrap().index, 1);

        let blocks = service.list_blocks().await.unwrap();
        assert_eq!(blocks.len(), 2);
        assert!(matches!(
            service.get_block(99).await,
            Err(LedgerError::NotFound(_))
        ));
    }
}
