//! Blob commitments: versioned hashes and inclusion proofs against a body root.

use beacon_ssz::merkle::{sha256, verify_merkle_branch};
use beacon_ssz::{GeneralizedIndex, HashTreeRoot, Root};

use beacon_ssz::SszError;

use crate::constants::{
    KZG_COMMITMENTS_FIELD_INDEX, KZG_COMMITMENTS_TREE_DEPTH, KZG_INCLUSION_PROOF_DEPTH,
    MAX_BLOB_COMMITMENTS_PER_BLOCK, VERSIONED_HASH_VERSION_KZG,
};
use crate::error::Result;
use crate::primitives::{ExecutionHash, KzgCommitment};

/// `0x01 || sha256(commitment)[1..]`
pub fn kzg_commitment_to_versioned_hash(commitment: &KzgCommitment) -> ExecutionHash {
    let mut h = sha256(commitment.as_bytes());
    h[0] = VERSIONED_HASH_VERSION_KZG;
    h
}

fn check_commitment_index(index: u64) -> Result<()> {
    if index >= MAX_BLOB_COMMITMENTS_PER_BLOCK {
        return Err(SszError::IndexOutOfRange {
            index,
            leaves: MAX_BLOB_COMMITMENTS_PER_BLOCK,
        }
        .into());
    }
    Ok(())
}

/// Leaf index of commitment `index` in the depth-17 tree rooted at the body:
/// body field 11, left (data) child of the length mixin, then `index`.
pub fn kzg_commitment_subtree_index(index: u64) -> Result<u64> {
    check_commitment_index(index)?;
    Ok((KZG_COMMITMENTS_FIELD_INDEX << (KZG_COMMITMENTS_TREE_DEPTH + 1)) | index)
}

pub fn kzg_commitment_gindex(index: u64) -> Result<GeneralizedIndex> {
    Ok(GeneralizedIndex::from_depth_and_index(
        KZG_INCLUSION_PROOF_DEPTH,
        kzg_commitment_subtree_index(index)?,
    )?)
}

/// Check that `commitment` is blob `index` of the body with root `body_root`.
pub fn verify_kzg_commitment_inclusion_proof(
    body_root: &Root,
    commitment: &KzgCommitment,
    index: u64,
    proof: &[Root],
) -> Result<bool> {
    let subtree_index = kzg_commitment_subtree_index(index)?;
    if proof.len() != KZG_INCLUSION_PROOF_DEPTH {
        return Ok(false);
    }
    let leaf = commitment.hash_tree_root()?;
    Ok(verify_merkle_branch(
        &leaf,
        proof,
        KZG_INCLUSION_PROOF_DEPTH,
        subtree_index,
        body_root,
    ))
}
