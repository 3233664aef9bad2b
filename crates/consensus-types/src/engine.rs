//! Payload checks done before handing a payload to the execution client.

use crate::block::BeaconBlock;
use crate::codec::VersionedSsz;
use crate::error::{Error, Result};
use crate::execution_requests::ExecutionRequests;
use crate::kzg::kzg_commitment_to_versioned_hash;
use crate::payload::ExecutionPayload;
use crate::primitives::{ExecutionHash, Root};

/// Execution-layer knowledge the codec does not have: transaction decoding
/// and block hashing.
pub trait ExecutionBlockBuilder {
    /// Blob versioned hashes carried by one encoded transaction, in order.
    fn blob_versioned_hashes(&self, transaction: &[u8]) -> Result<Vec<ExecutionHash>>;

    /// Hash of the execution block `payload` describes.
    fn block_hash(
        &self,
        payload: &ExecutionPayload,
        parent_beacon_block_root: Option<&Root>,
        execution_requests: Option<&[Vec<u8>]>,
    ) -> Result<ExecutionHash>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewPayloadRequest {
    pub execution_payload: ExecutionPayload,
    pub versioned_hashes: Vec<ExecutionHash>,
    pub parent_beacon_block_root: Option<Root>,
    pub execution_requests: Option<ExecutionRequests>,
}

impl NewPayloadRequest {
    pub fn new(
        execution_payload: ExecutionPayload,
        versioned_hashes: Vec<ExecutionHash>,
        parent_beacon_block_root: Option<Root>,
        execution_requests: Option<ExecutionRequests>,
    ) -> Self {
        Self {
            execution_payload,
            versioned_hashes,
            parent_beacon_block_root,
            execution_requests,
        }
    }

    /// Request for the payload in `block`: versioned hashes from its blob
    /// commitments, its parent root, and its requests from Electra.
    pub fn from_block(block: &BeaconBlock) -> Result<Self> {
        let body = &block.body;
        let execution_requests = if block.version().has_execution_requests() {
            Some(body.execution_requests()?.clone())
        } else {
            None
        };
        Ok(Self {
            execution_payload: body.execution_payload.clone(),
            versioned_hashes: body
                .blob_kzg_commitments
                .iter()
                .map(kzg_commitment_to_versioned_hash)
                .collect(),
            parent_beacon_block_root: Some(block.parent_root),
            execution_requests,
        })
    }

    /// Blob hashes in the transactions must equal `versioned_hashes`
    /// element for element, and the payload's block hash must be the one
    /// the builder computes.
    pub fn has_valid_versioned_and_block_hashes(
        &self,
        builder: &dyn ExecutionBlockBuilder,
    ) -> Result<()> {
        let mut blob_hashes = Vec::with_capacity(self.versioned_hashes.len());
        for (i, tx) in self.execution_payload.transactions.iter().enumerate() {
            let hashes = builder
                .blob_versioned_hashes(tx)
                .map_err(|e| Error::Builder(format!("invalid transaction {i}: {e}")))?;
            blob_hashes.extend(hashes);
        }

        if blob_hashes.len() != self.versioned_hashes.len() {
            return Err(Error::MismatchedVersionedHashCount {
                have: blob_hashes.len(),
                expected: self.versioned_hashes.len(),
            });
        }
        if let Some(index) = blob_hashes
            .iter()
            .zip(&self.versioned_hashes)
            .position(|(a, b)| a != b)
        {
            return Err(Error::InvalidVersionedHash { index });
        }

        let requests = self
            .execution_requests
            .as_ref()
            .map(ExecutionRequests::to_request_list)
            .transpose()?;
        let computed = builder.block_hash(
            &self.execution_payload,
            self.parent_beacon_block_root.as_ref(),
            requests.as_deref(),
        )?;
        if computed != self.execution_payload.block_hash {
            log::debug!(
                "payload {} claims block hash {}",
                self.execution_payload.number,
                hex::encode(self.execution_payload.block_hash)
            );
            return Err(Error::BlockHashMismatch {
                computed: hex::encode(computed),
                payload: hex::encode(self.execution_payload.block_hash),
            });
        }
        Ok(())
    }
}
