use beacon_ssz::{
    hash, ContainerDecoder, Decode, Encode, EnforceUnused, HashTreeRoot, Root, SszError, StaticSsz,
};

use crate::constants::SYNC_AGGREGATE_SIZE;
use crate::primitives::{BlsSignature, SyncCommitteeBits};

/// Reserved sync-committee aggregate. Sync committees are not run, so the
/// container keeps its wire slot but must be all zero. Decode does not check
/// this; the block body does, alongside its other reserved fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncAggregate {
    pub sync_committee_bits: SyncCommitteeBits,
    pub sync_committee_signature: BlsSignature,
}

impl EnforceUnused for SyncAggregate {
    fn enforce_unused(&self, field: &'static str) -> beacon_ssz::Result<()> {
        if self.sync_committee_bits.is_zero() && self.sync_committee_signature.is_zero() {
            Ok(())
        } else {
            Err(SszError::MustBeUnused { field })
        }
    }
}

impl Encode for SyncAggregate {
    fn ssz_size(&self) -> usize {
        SYNC_AGGREGATE_SIZE
    }

    fn ssz_write(&self, out: &mut Vec<u8>) -> beacon_ssz::Result<()> {
        self.enforce_unused("sync_aggregate")?;
        self.sync_committee_bits.ssz_write(out)?;
        self.sync_committee_signature.ssz_write(out)
    }
}

impl Decode for SyncAggregate {
    fn ssz_read(input: &[u8]) -> beacon_ssz::Result<Self> {
        let mut dec = ContainerDecoder::new(input, SYNC_AGGREGATE_SIZE)?;
        let sync_committee_bits = dec.read_static::<SyncCommitteeBits>()?;
        let sync_committee_signature = dec.read_static::<BlsSignature>()?;
        dec.finish()?;
        Ok(Self {
            sync_committee_bits,
            sync_committee_signature,
        })
    }
}

impl StaticSsz for SyncAggregate {
    const SSZ_SIZE: usize = SYNC_AGGREGATE_SIZE;
}

impl HashTreeRoot for SyncAggregate {
    fn hash_tree_root(&self) -> beacon_ssz::Result<Root> {
        hash::container_root(&[
            self.sync_committee_bits.hash_tree_root()?,
            self.sync_committee_signature.hash_tree_root()?,
        ])
    }
}
