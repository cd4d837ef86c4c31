//! Ledger record types: wallets, transactions, blocks, proofs, receipts.

pub mod block;
pub mod receipt;
pub mod transaction;
pub mod wallet;

pub use block::{Block, BlockHeader};
pub use receipt::{ProofRecord, Receipt};
pub use transaction::{TransactionPayload, TransactionRecord, TxStatus};
pub use wallet::WalletRecord;
