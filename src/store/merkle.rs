//! Sparse Authenticated Tree
//!
//! Fixed-depth binary Merkle tree over value hashes, with inclusion
//! witnesses. Depth 8 (256 leaves) matches the persisted leaderboard
//! layout; the single root is the only quantity the on-chain side ever
//! stores, and a witness re-binds any `(key, value_hash)` pair to it.
//!
//! The full tree lives off-chain with whoever produces witnesses; the
//! empty leaf is the all-zero digest.

use serde::{Deserialize, Serialize};
use sha2::{Digest as Sha2Digest, Sha256};

use crate::core::hash::Digest;

/// Tree depth; keys are leaf indices in `0..2^DEPTH`.
pub const TREE_DEPTH: usize = 8;

/// Number of addressable leaves.
pub const TREE_LEAVES: usize = 1 << TREE_DEPTH;

/// Domain separator for internal nodes.
const MERKLE_NODE_DOMAIN: &[u8] = b"GAMECHAIN_MERKLE_NODE_V1";

/// The unset leaf value.
pub const EMPTY_LEAF: Digest = [0; 32];

/// Hash two child nodes with domain separation.
fn hash_nodes(left: &Digest, right: &Digest) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(MERKLE_NODE_DOMAIN);
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Off-chain mirror of the authenticated map.
///
/// Maintained by witness producers (admin/server side); the verifying
/// side holds only the root.
#[derive(Clone, Debug)]
pub struct SparseTree {
    leaves: Vec<Digest>,
}

impl Default for SparseTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SparseTree {
    /// Create a tree with every leaf unset.
    pub fn new() -> Self {
        Self {
            leaves: vec![EMPTY_LEAF; TREE_LEAVES],
        }
    }

    /// Read a leaf value hash.
    pub fn get(&self, key: u64) -> Option<Digest> {
        self.leaves.get(key as usize).copied()
    }

    /// Set a leaf value hash. Returns false if the key is out of range.
    pub fn set(&mut self, key: u64, value_hash: Digest) -> bool {
        match self.leaves.get_mut(key as usize) {
            Some(leaf) => {
                *leaf = value_hash;
                true
            }
            None => false,
        }
    }

    /// All tree levels, leaves first, root level last.
    fn levels(&self) -> Vec<Vec<Digest>> {
        let mut levels = Vec::with_capacity(TREE_DEPTH + 1);
        let mut current = self.leaves.clone();
        levels.push(current.clone());

        while current.len() > 1 {
            let next: Vec<Digest> = current
                .chunks(2)
                .map(|pair| hash_nodes(&pair[0], &pair[1]))
                .collect();
            levels.push(next.clone());
            current = next;
        }
        levels
    }

    /// Root commitment of the current contents.
    pub fn root(&self) -> Digest {
        self.levels()
            .last()
            .and_then(|level| level.first())
            .copied()
            .unwrap_or(EMPTY_LEAF)
    }

    /// Generate an inclusion witness for a key.
    ///
    /// Returns `None` if the key is out of range.
    pub fn witness(&self, key: u64) -> Option<MerkleWitness> {
        if key as usize >= TREE_LEAVES {
            return None;
        }

        let levels = self.levels();
        let mut siblings = Vec::with_capacity(TREE_DEPTH);
        let mut index = key as usize;

        for level in &levels[..TREE_DEPTH] {
            let sibling_is_right = index % 2 == 0;
            let sibling_index = if sibling_is_right { index + 1 } else { index - 1 };
            siblings.push((level[sibling_index], sibling_is_right));
            index /= 2;
        }

        Some(MerkleWitness { siblings })
    }
}

/// Root of the all-empty tree; the store's initial commitment.
pub fn empty_root() -> Digest {
    let mut node = EMPTY_LEAF;
    for _ in 0..TREE_DEPTH {
        node = hash_nodes(&node, &node);
    }
    node
}

/// Inclusion witness: the sibling path from a leaf to the root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleWitness {
    /// Sibling hashes bottom-up, each tagged with whether the sibling
    /// sits to the right of the path.
    pub siblings: Vec<(Digest, bool)>,
}

impl MerkleWitness {
    /// Recompute the root this witness yields for a given leaf value.
    pub fn compute_root(&self, leaf: Digest) -> Digest {
        let mut current = leaf;
        for (sibling, sibling_is_right) in &self.siblings {
            current = if *sibling_is_right {
                hash_nodes(&current, sibling)
            } else {
                hash_nodes(sibling, &current)
            };
        }
        current
    }

    /// The leaf key this witness path addresses.
    pub fn key(&self) -> u64 {
        let mut key = 0u64;
        for (depth, (_, sibling_is_right)) in self.siblings.iter().enumerate() {
            if !sibling_is_right {
                key |= 1 << depth;
            }
        }
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(byte: u8) -> Digest {
        [byte; 32]
    }

    #[test]
    fn test_empty_root_matches_empty_tree() {
        assert_eq!(SparseTree::new().root(), empty_root());
    }

    #[test]
    fn test_root_changes_with_contents() {
        let mut tree = SparseTree::new();
        let empty = tree.root();
        tree.set(1, leaf(7));
        assert_ne!(tree.root(), empty);
    }

    #[test]
    fn test_witness_binds_leaf_to_root() {
        let mut tree = SparseTree::new();
        tree.set(3, leaf(9));
        tree.set(200, leaf(4));
        let root = tree.root();

        for key in [0u64, 3, 200, 255] {
            let witness = tree.witness(key).unwrap();
            assert_eq!(witness.key(), key);
            assert_eq!(witness.compute_root(tree.get(key).unwrap()), root);
        }
    }

    #[test]
    fn test_wrong_leaf_fails_to_bind() {
        let mut tree = SparseTree::new();
        tree.set(3, leaf(9));
        let witness = tree.witness(3).unwrap();
        assert_ne!(witness.compute_root(leaf(8)), tree.root());
    }

    #[test]
    fn test_witness_predicts_updated_root() {
        // The on-chain update rule: recompute the root from the same
        // witness with the new value.
        let mut tree = SparseTree::new();
        tree.set(5, leaf(1));
        let witness = tree.witness(5).unwrap();

        tree.set(5, leaf(2));
        assert_eq!(witness.compute_root(leaf(2)), tree.root());
    }

    #[test]
    fn test_out_of_range_key() {
        let tree = SparseTree::new();
        assert!(tree.witness(TREE_LEAVES as u64).is_none());
        assert!(tree.get(10_000).is_none());
    }

    #[test]
    fn test_witnesses_over_randomly_populated_tree() {
        use rand::{rngs::StdRng, Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        let mut tree = SparseTree::new();
        for _ in 0..64 {
            let key = rng.gen_range(0..TREE_LEAVES as u64);
            tree.set(key, rng.gen::<[u8; 32]>());
        }

        let root = tree.root();
        for key in 0..TREE_LEAVES as u64 {
            let witness = tree.witness(key).unwrap();
            assert_eq!(witness.key(), key);
            assert_eq!(witness.compute_root(tree.get(key).unwrap()), root);
        }
    }
}
