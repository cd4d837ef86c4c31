//! Cryptographic primitives for the ledger
//!
//! - Fixed 32-byte SHA-256 digests
//! - Merkle trees over ordered transaction batches, with per-leaf
//!   inclusion proofs

pub mod digest;
pub mod merkle;

pub use digest::{Digest, DigestError};
pub use merkle::{empty_root, replay_proof, verify_inclusion, MerkleTree, ProofStep, Side};
