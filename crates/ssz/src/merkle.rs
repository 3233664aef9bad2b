//! SHA-256 binary Merkle trees over 32-byte chunks.
//!
//! Trees are always padded to a power of two with zero subtrees. Padding is
//! virtual: the root of an all-zero subtree of depth `d` is looked up in a
//! precomputed table, so a list with a limit of 2^40 elements costs no more
//! than its actual contents plus 40 hashes.

use once_cell::sync::Lazy;
use sha2::{Digest, Sha256};

use crate::error::{Result, SszError};

pub type Root = [u8; 32];

pub const BYTES_PER_CHUNK: usize = 32;

/// Deepest tree any limit can describe (2^64 leaves).
pub const MAX_TREE_DEPTH: usize = 64;

/// `ZERO_HASHES[d]` is the root of a depth-`d` tree whose leaves are all zero.
static ZERO_HASHES: Lazy<Vec<Root>> = Lazy::new(|| {
    let mut z = vec![[0u8; 32]; MAX_TREE_DEPTH + 1];
    for d in 1..=MAX_TREE_DEPTH {
        z[d] = hash_pair(&z[d - 1], &z[d - 1]);
    }
    z
});

/// Root of an all-zero subtree of the given depth. Depths past 64 clamp.
#[inline]
pub fn zero_hash(depth: usize) -> Root {
    ZERO_HASHES[depth.min(MAX_TREE_DEPTH)]
}

/// sha256(left || right)
#[inline(always)]
pub fn hash_pair(left: &Root, right: &Root) -> Root {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

#[inline]
pub fn sha256(data: &[u8]) -> Root {
    Sha256::digest(data).into()
}

/// Number of levels above `leaf_count` leaves once padded to a power of two.
#[inline]
pub fn tree_depth(leaf_count: u64) -> usize {
    if leaf_count <= 1 {
        0
    } else {
        (64 - (leaf_count - 1).leading_zeros()) as usize
    }
}

/// Next power of two >= n (min 1). Saturates at 2^63.
#[inline]
pub fn next_pow2(n: u64) -> u64 {
    n.max(1).checked_next_power_of_two().unwrap_or(1 << 63)
}

/// Split bytes into 32-byte chunks, zero-padding the last one.
pub fn chunkify(bytes: &[u8]) -> Vec<Root> {
    bytes
        .chunks(BYTES_PER_CHUNK)
        .map(|c| {
            let mut chunk = [0u8; 32];
            chunk[..c.len()].copy_from_slice(c);
            chunk
        })
        .collect()
}

/// Right-pad a short value (at most 32 bytes) into a single chunk.
#[inline]
pub fn pad_to_chunk(bytes: &[u8]) -> Root {
    let mut chunk = [0u8; 32];
    let n = bytes.len().min(BYTES_PER_CHUNK);
    chunk[..n].copy_from_slice(&bytes[..n]);
    chunk
}

/// Merkleize `chunks`, padding to `next_pow2(limit)` leaves.
///
/// `limit = None` pads to the next power of two of the chunk count itself.
/// More chunks than `limit` is an error, never a truncation.
pub fn merkleize(chunks: &[Root], limit: Option<u64>) -> Result<Root> {
    let count = chunks.len() as u64;
    let limit = match limit {
        Some(l) if count > l => {
            return Err(SszError::ListTooLong {
                have: chunks.len(),
                max: l,
            })
        }
        Some(l) => l,
        None => count,
    };
    let depth = tree_depth(limit);
    if chunks.is_empty() {
        return Ok(zero_hash(depth));
    }

    let mut layer: Vec<Root> = chunks.to_vec();
    for d in 0..depth {
        if layer.len() % 2 == 1 {
            layer.push(zero_hash(d));
        }
        layer = layer
            .chunks_exact(2)
            .map(|pair| hash_pair(&pair[0], &pair[1]))
            .collect();
    }
    Ok(layer[0])
}

/// Fold a list length into its data root: sha256(root || uint256(len)).
#[inline]
pub fn mix_in_length(root: &Root, len: u64) -> Root {
    let mut leaf = [0u8; 32];
    leaf[..8].copy_from_slice(&len.to_le_bytes());
    hash_pair(root, &leaf)
}

/* -------- Proofs -------- */

/// Position of a node in a binary tree: root is 1, children of `g` are `2g`
/// and `2g + 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GeneralizedIndex(pub u64);

impl GeneralizedIndex {
    pub const ROOT: Self = Self(1);

    /// Node `index` (0-based, left to right) at `depth` below the root.
    pub fn from_depth_and_index(depth: usize, index: u64) -> Result<Self> {
        let width = u32::try_from(depth)
            .ok()
            .and_then(|d| 1u64.checked_shl(d))
            .ok_or(SszError::TreeTooDeep(depth))?;
        if index >= width {
            return Err(SszError::IndexOutOfRange {
                index,
                leaves: width,
            });
        }
        Ok(Self(width | index))
    }

    #[inline]
    pub fn depth(self) -> usize {
        (63 - self.0.max(1).leading_zeros()) as usize
    }

    /// Offset of this node among the nodes at its depth.
    #[inline]
    pub fn index_at_depth(self) -> u64 {
        self.0 - (1u64 << self.depth())
    }

    #[inline]
    pub fn sibling(self) -> Self {
        Self(self.0 ^ 1)
    }

    #[inline]
    pub fn parent(self) -> Self {
        Self(self.0 / 2)
    }

    #[inline]
    pub fn left_child(self) -> Self {
        Self(self.0 * 2)
    }

    #[inline]
    pub fn right_child(self) -> Self {
        Self(self.0 * 2 + 1)
    }

    #[inline]
    pub fn is_left(self) -> bool {
        self.0 & 1 == 0
    }

    /// Index of `other` (rooted at this node) within the whole tree.
    pub fn concat(self, other: Self) -> Self {
        let d = other.depth();
        Self((self.0 << d) | other.index_at_depth())
    }

    /// Siblings needed to prove this node, bottom to top.
    pub fn branch_indices(self) -> Vec<Self> {
        let mut out = Vec::with_capacity(self.depth());
        let mut g = self;
        while g.0 > 1 {
            out.push(g.sibling());
            g = g.parent();
        }
        out
    }

    /// This node and every ancestor below the root, bottom to top.
    pub fn path_indices(self) -> Vec<Self> {
        let mut out = Vec::with_capacity(self.depth());
        let mut g = self;
        while g.0 > 1 {
            out.push(g);
            g = g.parent();
        }
        out
    }
}

/// Sibling branch (bottom to top) and root for leaf `index` of a zero-padded
/// tree with `2^depth` leaves.
pub fn merkle_proof(leaves: &[Root], depth: usize, index: u64) -> Result<(Vec<Root>, Root)> {
    let width = if depth >= MAX_TREE_DEPTH {
        u64::MAX
    } else {
        1u64 << depth
    };
    if index >= width {
        return Err(SszError::IndexOutOfRange {
            index,
            leaves: width,
        });
    }
    if leaves.len() as u64 > width {
        return Err(SszError::ListTooLong {
            have: leaves.len(),
            max: width,
        });
    }

    let mut branch = Vec::with_capacity(depth);
    let mut layer: Vec<Root> = leaves.to_vec();
    let mut idx = index;
    for d in 0..depth {
        let sib = (idx ^ 1) as usize;
        branch.push(layer.get(sib).copied().unwrap_or_else(|| zero_hash(d)));
        if layer.len() % 2 == 1 {
            layer.push(zero_hash(d));
        }
        layer = layer
            .chunks_exact(2)
            .map(|pair| hash_pair(&pair[0], &pair[1]))
            .collect();
        idx /= 2;
    }
    let root = layer.first().copied().unwrap_or_else(|| zero_hash(depth));
    Ok((branch, root))
}

/// Check that `leaf` sits at `index` under `root` given `branch`.
pub fn verify_merkle_branch(
    leaf: &Root,
    branch: &[Root],
    depth: usize,
    index: u64,
    root: &Root,
) -> bool {
    if depth > MAX_TREE_DEPTH || branch.len() < depth {
        return false;
    }
    let mut node = *leaf;
    for (i, sib) in branch.iter().take(depth).enumerate() {
        node = if (index >> i) & 1 == 1 {
            hash_pair(sib, &node)
        } else {
            hash_pair(&node, sib)
        };
    }
    node == *root
}

/// Recompute the root above `leaf` sitting at `gindex`.
pub fn calculate_merkle_root(leaf: &Root, proof: &[Root], gindex: GeneralizedIndex) -> Result<Root> {
    let depth = gindex.depth();
    if proof.len() != depth {
        return Err(SszError::InvalidProofLength {
            have: proof.len(),
            expected: depth,
        });
    }
    let mut node = *leaf;
    let mut g = gindex;
    for sib in proof {
        node = if g.is_left() {
            hash_pair(&node, sib)
        } else {
            hash_pair(sib, &node)
        };
        g = g.parent();
    }
    Ok(node)
}

pub fn verify_merkle_proof(
    leaf: &Root,
    proof: &[Root],
    gindex: GeneralizedIndex,
    root: &Root,
) -> bool {
    matches!(calculate_merkle_root(leaf, proof, gindex), Ok(r) if r == *root)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(s: &str) -> Root {
        let mut r = [0u8; 32];
        hex::decode_to_slice(s, &mut r).unwrap();
        r
    }

    #[test]
    fn zero_hash_table_matches_known_values() {
        assert_eq!(zero_hash(0), [0u8; 32]);
        assert_eq!(
            zero_hash(1),
            h("f5a5fd42d16a20302798ef6ed309979b43003d2320d9f0e8ea9831a92759fb4b")
        );
        assert_eq!(
            zero_hash(2),
            h("db56114e00fdd4c1f85c892bf35ac9a89289aaecb1ebd0a96cde606a748b5d71")
        );
    }

    #[test]
    fn depth_of_limits() {
        assert_eq!(tree_depth(0), 0);
        assert_eq!(tree_depth(1), 0);
        assert_eq!(tree_depth(2), 1);
        assert_eq!(tree_depth(3), 2);
        assert_eq!(tree_depth(16), 4);
        assert_eq!(tree_depth(1 << 40), 40);
        assert_eq!(next_pow2(0), 1);
        assert_eq!(next_pow2(5), 8);
    }

    #[test]
    fn merkleize_pads_virtually() {
        let a = [1u8; 32];
        let b = [2u8; 32];
        let two = hash_pair(&a, &b);
        assert_eq!(merkleize(&[a, b], None).unwrap(), two);
        // Three leaves pad to four.
        let c = [3u8; 32];
        let expect = hash_pair(&two, &hash_pair(&c, &zero_hash(0)));
        assert_eq!(merkleize(&[a, b, c], None).unwrap(), expect);
        // Limit 8 adds one more level against a zero subtree.
        let wide = merkleize(&[a, b, c], Some(8)).unwrap();
        assert_eq!(wide, hash_pair(&expect, &zero_hash(2)));
    }

    #[test]
    fn merkleize_empty_is_zero_subtree() {
        assert_eq!(merkleize(&[], None).unwrap(), [0u8; 32]);
        assert_eq!(merkleize(&[], Some(0)).unwrap(), [0u8; 32]);
        assert_eq!(merkleize(&[], Some(1 << 40)).unwrap(), zero_hash(40));
    }

    #[test]
    fn merkleize_rejects_over_limit() {
        let err = merkleize(&[[0u8; 32]; 3], Some(2)).unwrap_err();
        assert_eq!(err, SszError::ListTooLong { have: 3, max: 2 });
    }

    #[test]
    fn chunkify_pads_tail() {
        let chunks = chunkify(&[9u8; 33]);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1][0], 9);
        assert!(chunks[1][1..].iter().all(|b| *b == 0));
        assert!(chunkify(&[]).is_empty());
    }

    #[test]
    fn mixin_is_little_endian_length() {
        let mut len_leaf = [0u8; 32];
        len_leaf[0] = 3;
        assert_eq!(mix_in_length(&[0u8; 32], 3), hash_pair(&[0u8; 32], &len_leaf));
    }

    #[test]
    fn proof_roundtrip_over_sparse_tree() {
        let leaves: Vec<Root> = (0u8..5).map(|i| [i + 1; 32]).collect();
        let depth = 4;
        let root = merkleize(&leaves, Some(16)).unwrap();
        for i in 0..16u64 {
            let (branch, r) = merkle_proof(&leaves, depth, i).unwrap();
            assert_eq!(r, root);
            let leaf = leaves.get(i as usize).copied().unwrap_or([0u8; 32]);
            assert!(verify_merkle_branch(&leaf, &branch, depth, i, &root));
            let g = GeneralizedIndex::from_depth_and_index(depth, i).unwrap();
            assert!(verify_merkle_proof(&leaf, &branch, g, &root));
        }
        let (branch, _) = merkle_proof(&leaves, depth, 2).unwrap();
        assert!(!verify_merkle_branch(&[0xAA; 32], &branch, depth, 2, &root));
        assert!(merkle_proof(&leaves, depth, 16).is_err());
    }

    #[test]
    fn generalized_index_bounds() {
        assert_eq!(
            GeneralizedIndex::from_depth_and_index(63, (1 << 63) - 1).unwrap(),
            GeneralizedIndex(u64::MAX)
        );
        assert_eq!(
            GeneralizedIndex::from_depth_and_index(64, 0),
            Err(SszError::TreeTooDeep(64))
        );
        assert_eq!(
            GeneralizedIndex::from_depth_and_index(usize::MAX, 0),
            Err(SszError::TreeTooDeep(usize::MAX))
        );
        assert_eq!(
            GeneralizedIndex::from_depth_and_index(3, 8),
            Err(SszError::IndexOutOfRange { index: 8, leaves: 8 })
        );
    }

    #[test]
    fn generalized_index_navigation() {
        let g = GeneralizedIndex(27);
        assert_eq!(g.depth(), 4);
        assert_eq!(g.index_at_depth(), 11);
        assert_eq!(g.sibling(), GeneralizedIndex(26));
        assert_eq!(g.parent(), GeneralizedIndex(13));
        assert!(!g.is_left());
        assert_eq!(g.left_child(), GeneralizedIndex(54));
        let list_data = GeneralizedIndex(2);
        let elem = GeneralizedIndex::from_depth_and_index(12, 5).unwrap();
        assert_eq!(
            g.concat(list_data).concat(elem),
            GeneralizedIndex(54 * 4096 + 5)
        );
        assert_eq!(
            g.branch_indices(),
            vec![
                GeneralizedIndex(26),
                GeneralizedIndex(12),
                GeneralizedIndex(7),
                GeneralizedIndex(2)
            ]
        );
        assert_eq!(g.path_indices().len(), 4);
    }

    #[test]
    fn calculate_root_checks_proof_length() {
        let err = calculate_merkle_root(&[0u8; 32], &[], GeneralizedIndex(2)).unwrap_err();
        assert_eq!(err, SszError::InvalidProofLength { have: 0, expected: 1 });
    }
}
