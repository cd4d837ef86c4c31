//! Merkle tree construction and inclusion proofs.
//!
//! Builds a binary hash tree over an ordered batch of leaf digests and
//! issues one inclusion proof per leaf:
//!
//! - Adjacent nodes pair left-to-right at every level; an odd level pairs
//!   its last node with itself.
//! - A parent is `sha256(left || right)` over the raw 32-byte digests.
//! - Each proof step records the sibling digest and which side of the pair
//!   it occupies, one step per level, so replaying the steps from a leaf
//!   digest reproduces the root.
//!
//! Leaf order is part of the committed data: reordering the batch changes
//! the root.

use serde::{Deserialize, Serialize};

use crate::crypto::digest::Digest;

/// Which side of the pair a proof sibling occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Sibling is the left input of the parent hash
    #[serde(rename = "L")]
    Left,
    /// Sibling is the right input of the parent hash
    #[serde(rename = "R")]
    Right,
}

/// One step of an inclusion proof
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    /// Sibling digest at this level
    pub hash: Digest,
    /// Side the sibling occupies relative to the node being hashed upward
    pub side: Side,
}

/// A built tree: the batch root plus one proof per leaf
///
/// `proofs[i]` belongs to `leaves[i]` of the input batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    /// Root digest committing to the full ordered batch
    pub root: Digest,
    /// Inclusion proofs, positionally matching the input leaves
    pub proofs: Vec<Vec<ProofStep>>,
}

impl MerkleTree {
    /// Build the tree over an ordered batch of leaf digests.
    ///
    /// An empty batch yields [`empty_root`] and no proofs; a single leaf is
    /// its own root with an empty proof. Each level is folded in one pass:
    /// `chunks(2)` pairs adjacent nodes, the level's per-node sibling steps
    /// are recorded, and every leaf appends the step of the node it
    /// currently descends from.
    pub fn build(leaves: &[Digest]) -> Self {
        if leaves.is_empty() {
            return Self {
                root: empty_root(),
                proofs: Vec::new(),
            };
        }

        let mut proofs: Vec<Vec<ProofStep>> = vec![Vec::new(); leaves.len()];
        // positions[i] = index of the node leaf i descends from in `level`
        let mut positions: Vec<usize> = (0..leaves.len()).collect();
        let mut level: Vec<Digest> = leaves.to_vec();

        while level.len() > 1 {
            let mut next = Vec::with_capacity((level.len() + 1) / 2);
            let mut steps = Vec::with_capacity(level.len());

            for chunk in level.chunks(2) {
                let left = &chunk[0];
                // Odd level: the last node pairs with itself
                let right = if chunk.len() == 2 { &chunk[1] } else { left };
                next.push(Digest::combine(left, right));

                // Per-node step, in node order: a self-paired node records
                // its own digest as a right-hand sibling
                steps.push(ProofStep {
                    hash: right.clone(),
                    side: Side::Right,
                });
                if chunk.len() == 2 {
                    steps.push(ProofStep {
                        hash: left.clone(),
                        side: Side::Left,
                    });
                }
            }

            for (leaf, position) in positions.iter_mut().enumerate() {
                proofs[leaf].push(steps[*position].clone());
                *position /= 2;
            }

            level = next;
        }

        Self {
            root: level[0].clone(),
            proofs,
        }
    }

    /// Number of leaves the tree was built over
    pub fn leaf_count(&self) -> usize {
        self.proofs.len()
    }
}

/// Root committed for an empty batch
pub fn empty_root() -> Digest {
    Digest::sha256(b"")
}

/// Replay an inclusion proof from a leaf digest up to its implied root
pub fn replay_proof(leaf: &Digest, steps: &[ProofStep]) -> Digest {
    let mut current = leaf.clone();
    for step in steps {
        current = match step.side {
            Side::Left => Digest::combine(&step.hash, &current),
            Side::Right => Digest::combine(&current, &step.hash),
        };
    }
    current
}

/// Check an inclusion proof against a claimed root
pub fn verify_inclusion(leaf: &Digest, steps: &[ProofStep], root: &Digest) -> bool {
    replay_proof(leaf, steps) == *root
}
