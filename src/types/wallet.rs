//! Wallet registry records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered sender identity
///
/// The public key is an opaque blob supplied at registration; receipts
/// embed it so holders can check the payload signature out of band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletRecord {
    /// Wallet id (`wallet:{uuid}`)
    pub wallet_id: String,
    /// Owning user reference
    pub user_id: String,
    /// Opaque public key, if one was registered
    pub public_key: Option<String>,
    /// Registration time
    pub created_at: DateTime<Utc>,
}
