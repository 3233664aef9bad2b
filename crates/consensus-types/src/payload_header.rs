use beacon_ssz::{hash, list, ContainerDecoder, ContainerEncoder, FieldHasher, HashTreeRoot, Root};

use crate::codec::VersionedSsz;
use crate::constants::{
    EXECUTION_PAYLOAD_HEADER_BELLATRIX_SIZE, EXECUTION_PAYLOAD_HEADER_CAPELLA_SIZE,
    EXECUTION_PAYLOAD_HEADER_DENEB_SIZE, MAX_EXTRA_DATA_BYTES,
};
use crate::error::{Error, Result};
use crate::primitives::{Bytes32, ExecutionAddress, ExecutionHash, LogsBloom, U256};
use crate::version::{ensure_supported, ForkVersion};

/// Execution payload with transactions and withdrawals replaced by their
/// roots, as kept in the beacon state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionPayloadHeader {
    version: ForkVersion,
    pub parent_hash: ExecutionHash,
    pub fee_recipient: ExecutionAddress,
    pub state_root: Bytes32,
    pub receipts_root: Bytes32,
    pub logs_bloom: LogsBloom,
    pub prev_randao: Bytes32,
    pub number: u64,
    pub gas_limit: u64,
    pub gas_used: u64,
    pub timestamp: u64,
    pub extra_data: Vec<u8>,
    pub base_fee_per_gas: U256,
    pub block_hash: ExecutionHash,
    pub transactions_root: Root,
    withdrawals_root: Root,
    blob_gas_used: u64,
    excess_blob_gas: u64,
}

impl ExecutionPayloadHeader {
    pub fn fixed_size(version: ForkVersion) -> usize {
        if version.has_blob_gas() {
            EXECUTION_PAYLOAD_HEADER_DENEB_SIZE
        } else if version.has_withdrawals() {
            EXECUTION_PAYLOAD_HEADER_CAPELLA_SIZE
        } else {
            EXECUTION_PAYLOAD_HEADER_BELLATRIX_SIZE
        }
    }

    pub fn new_empty(version: ForkVersion) -> Result<Self> {
        ensure_supported(Self::TYPE_NAME, version, ForkVersion::Bellatrix)?;
        Ok(Self {
            version,
            parent_hash: ExecutionHash::default(),
            fee_recipient: ExecutionAddress::default(),
            state_root: Bytes32::default(),
            receipts_root: Bytes32::default(),
            logs_bloom: LogsBloom::default(),
            prev_randao: Bytes32::default(),
            number: 0,
            gas_limit: 0,
            gas_used: 0,
            timestamp: 0,
            extra_data: Vec::new(),
            base_fee_per_gas: U256::zero(),
            block_hash: ExecutionHash::default(),
            transactions_root: Root::default(),
            withdrawals_root: Root::default(),
            blob_gas_used: 0,
            excess_blob_gas: 0,
        })
    }

    /// `None` before Capella.
    pub fn withdrawals_root(&self) -> Option<Root> {
        self.version.has_withdrawals().then_some(self.withdrawals_root)
    }

    pub fn set_withdrawals_root(&mut self, root: Root) -> Result<()> {
        if !self.version.has_withdrawals() {
            return Err(Error::FieldNotSupported {
                field: "withdrawals_root",
                since: ForkVersion::Capella,
                version: self.version,
            });
        }
        self.withdrawals_root = root;
        Ok(())
    }

    pub fn blob_gas_used(&self) -> u64 {
        self.blob_gas_used
    }

    pub fn excess_blob_gas(&self) -> u64 {
        self.excess_blob_gas
    }

    pub fn set_blob_gas(&mut self, blob_gas_used: u64, excess_blob_gas: u64) -> Result<()> {
        if !self.version.has_blob_gas() && (blob_gas_used != 0 || excess_blob_gas != 0) {
            return Err(Error::FieldNotSupported {
                field: "blob_gas",
                since: ForkVersion::Deneb,
                version: self.version,
            });
        }
        self.blob_gas_used = blob_gas_used;
        self.excess_blob_gas = excess_blob_gas;
        Ok(())
    }

    fn write_fields(&self, out: &mut Vec<u8>) -> beacon_ssz::Result<()> {
        let mut enc = ContainerEncoder::new(out, Self::fixed_size(self.version));
        enc.append_static(&self.parent_hash)?;
        enc.append_static(&self.fee_recipient)?;
        enc.append_static(&self.state_root)?;
        enc.append_static(&self.receipts_root)?;
        enc.append_static(&self.logs_bloom)?;
        enc.append_static(&self.prev_randao)?;
        enc.append_static(&self.number)?;
        enc.append_static(&self.gas_limit)?;
        enc.append_static(&self.gas_used)?;
        enc.append_static(&self.timestamp)?;
        enc.append_dynamic(|buf| list::write_byte_list(&self.extra_data, MAX_EXTRA_DATA_BYTES, buf))?;
        enc.append_static(&self.base_fee_per_gas)?;
        enc.append_static(&self.block_hash)?;
        enc.append_static(&self.transactions_root)?;
        if self.version.has_withdrawals() {
            enc.append_static(&self.withdrawals_root)?;
        }
        if self.version.has_blob_gas() {
            enc.append_static(&self.blob_gas_used)?;
            enc.append_static(&self.excess_blob_gas)?;
        }
        enc.finish()
    }
}

impl VersionedSsz for ExecutionPayloadHeader {
    const TYPE_NAME: &'static str = "ExecutionPayloadHeader";

    fn version(&self) -> ForkVersion {
        self.version
    }

    fn ssz_size(&self) -> usize {
        Self::fixed_size(self.version) + self.extra_data.len()
    }

    fn ssz_write(&self, out: &mut Vec<u8>) -> Result<()> {
        Ok(self.write_fields(out)?)
    }

    fn ssz_read_versioned(bytes: &[u8], version: ForkVersion) -> Result<Self> {
        ensure_supported(Self::TYPE_NAME, version, ForkVersion::Bellatrix)?;
        let mut dec = ContainerDecoder::new(bytes, Self::fixed_size(version))?;
        let parent_hash = dec.read_static()?;
        let fee_recipient = dec.read_static()?;
        let state_root = dec.read_static()?;
        let receipts_root = dec.read_static()?;
        let logs_bloom = dec.read_static()?;
        let prev_randao = dec.read_static()?;
        let number = dec.read_static()?;
        let gas_limit = dec.read_static()?;
        let gas_used = dec.read_static()?;
        let timestamp = dec.read_static()?;
        dec.read_offset()?;
        let base_fee_per_gas = dec.read_static()?;
        let block_hash = dec.read_static()?;
        let transactions_root = dec.read_static()?;
        let withdrawals_root = if version.has_withdrawals() {
            dec.read_static()?
        } else {
            Root::default()
        };
        let (blob_gas_used, excess_blob_gas) = if version.has_blob_gas() {
            (dec.read_static()?, dec.read_static()?)
        } else {
            (0, 0)
        };
        let mut fields = dec.finish()?;
        let extra_data = list::read_byte_list(fields.next_field()?, MAX_EXTRA_DATA_BYTES)?;
        Ok(Self {
            version,
            parent_hash,
            fee_recipient,
            state_root,
            receipts_root,
            logs_bloom,
            prev_randao,
            number,
            gas_limit,
            gas_used,
            timestamp,
            extra_data,
            base_fee_per_gas,
            block_hash,
            transactions_root,
            withdrawals_root,
            blob_gas_used,
            excess_blob_gas,
        })
    }

    fn hash_tree_root(&self) -> Result<Root> {
        let base: [FieldHasher<'_>; 14] = [
            &|| self.parent_hash.hash_tree_root(),
            &|| self.fee_recipient.hash_tree_root(),
            &|| self.state_root.hash_tree_root(),
            &|| self.receipts_root.hash_tree_root(),
            &|| self.logs_bloom.hash_tree_root(),
            &|| self.prev_randao.hash_tree_root(),
            &|| self.number.hash_tree_root(),
            &|| self.gas_limit.hash_tree_root(),
            &|| self.gas_used.hash_tree_root(),
            &|| self.timestamp.hash_tree_root(),
            &|| hash::byte_list_root(&self.extra_data, MAX_EXTRA_DATA_BYTES),
            &|| self.base_fee_per_gas.hash_tree_root(),
            &|| self.block_hash.hash_tree_root(),
            &|| self.transactions_root.hash_tree_root(),
        ];
        let withdrawals_root = || self.withdrawals_root.hash_tree_root();
        let blob_gas_used = || self.blob_gas_used.hash_tree_root();
        let excess_blob_gas = || self.excess_blob_gas.hash_tree_root();

        let mut fields: Vec<FieldHasher<'_>> = base.to_vec();
        if self.version.has_withdrawals() {
            fields.push(&withdrawals_root);
        }
        if self.version.has_blob_gas() {
            fields.push(&blob_gas_used);
            fields.push(&excess_blob_gas);
        }
        Ok(hash::container_root_with(&fields)?)
    }
}
