use beacon_ssz::{hash, list, ContainerDecoder, ContainerEncoder, FieldHasher, HashTreeRoot, Root};

use crate::codec::VersionedSsz;
use crate::constants::{
    EXECUTION_PAYLOAD_BELLATRIX_SIZE, EXECUTION_PAYLOAD_CAPELLA_SIZE, EXECUTION_PAYLOAD_DENEB_SIZE,
    MAX_BYTES_PER_TRANSACTION, MAX_EXTRA_DATA_BYTES, MAX_TRANSACTIONS_PER_PAYLOAD,
    MAX_WITHDRAWALS_PER_PAYLOAD, WITHDRAWAL_SIZE,
};
use crate::error::{Error, Result};
use crate::payload_header::ExecutionPayloadHeader;
use crate::primitives::{Bytes32, ExecutionAddress, ExecutionHash, LogsBloom, U256};
use crate::version::{ensure_supported, ForkVersion};
use crate::withdrawal::Withdrawal;

/// Root of a transaction list: each transaction is a byte list.
pub fn transactions_root(transactions: &[Vec<u8>]) -> beacon_ssz::Result<Root> {
    let leaves = transactions
        .iter()
        .map(|tx| hash::byte_list_root(tx, MAX_BYTES_PER_TRANSACTION))
        .collect::<beacon_ssz::Result<Vec<_>>>()?;
    hash::list_root_from_leaves(&leaves, MAX_TRANSACTIONS_PER_PAYLOAD)
}

pub fn withdrawals_root(withdrawals: &[Withdrawal]) -> beacon_ssz::Result<Root> {
    hash::list_root(withdrawals, MAX_WITHDRAWALS_PER_PAYLOAD)
}

/// Execution block as embedded in a beacon block body.
///
/// Withdrawals exist from Capella (present but possibly empty), blob gas
/// accounting from Deneb. Both are private so the version gate can't be
/// bypassed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionPayload {
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
    pub transactions: Vec<Vec<u8>>,
    withdrawals: Option<Vec<Withdrawal>>,
    blob_gas_used: u64,
    excess_blob_gas: u64,
}

impl ExecutionPayload {
    pub fn fixed_size(version: ForkVersion) -> usize {
        if version.has_blob_gas() {
            EXECUTION_PAYLOAD_DENEB_SIZE
        } else if version.has_withdrawals() {
            EXECUTION_PAYLOAD_CAPELLA_SIZE
        } else {
            EXECUTION_PAYLOAD_BELLATRIX_SIZE
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
            transactions: Vec::new(),
            withdrawals: version.has_withdrawals().then(Vec::new),
            blob_gas_used: 0,
            excess_blob_gas: 0,
        })
    }

    /// `None` before Capella.
    pub fn withdrawals(&self) -> Option<&[Withdrawal]> {
        self.withdrawals.as_deref()
    }

    pub fn set_withdrawals(&mut self, withdrawals: Vec<Withdrawal>) -> Result<()> {
        if !self.version.has_withdrawals() {
            return Err(Error::FieldNotSupported {
                field: "withdrawals",
                since: ForkVersion::Capella,
                version: self.version,
            });
        }
        self.withdrawals = Some(withdrawals);
        Ok(())
    }

    pub fn blob_gas_used(&self) -> u64 {
        self.blob_gas_used
    }

    pub fn excess_blob_gas(&self) -> u64 {
        self.excess_blob_gas
    }

    /// Before Deneb only zero is accepted.
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

    /// Version consistency of the gated fields.
    pub fn validate(&self) -> Result<()> {
        if self.withdrawals.is_some() != self.version.has_withdrawals() {
            return Err(Error::FieldNotSupported {
                field: "withdrawals",
                since: ForkVersion::Capella,
                version: self.version,
            });
        }
        if !self.version.has_blob_gas() && (self.blob_gas_used != 0 || self.excess_blob_gas != 0) {
            return Err(Error::FieldNotSupported {
                field: "blob_gas",
                since: ForkVersion::Deneb,
                version: self.version,
            });
        }
        Ok(())
    }

    /// Project into the header form: lists replaced by their roots.
    pub fn to_header(&self) -> Result<ExecutionPayloadHeader> {
        let mut header = ExecutionPayloadHeader::new_empty(self.version)?;
        header.parent_hash = self.parent_hash;
        header.fee_recipient = self.fee_recipient;
        header.state_root = self.state_root;
        header.receipts_root = self.receipts_root;
        header.logs_bloom = self.logs_bloom;
        header.prev_randao = self.prev_randao;
        header.number = self.number;
        header.gas_limit = self.gas_limit;
        header.gas_used = self.gas_used;
        header.timestamp = self.timestamp;
        header.extra_data = self.extra_data.clone();
        header.base_fee_per_gas = self.base_fee_per_gas;
        header.block_hash = self.block_hash;
        header.transactions_root = transactions_root(&self.transactions)?;
        if let Some(w) = &self.withdrawals {
            header.set_withdrawals_root(withdrawals_root(w)?)?;
        }
        header.set_blob_gas(self.blob_gas_used, self.excess_blob_gas)?;
        Ok(header)
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
        enc.append_dynamic(|buf| {
            list::write_byte_lists(
                &self.transactions,
                MAX_TRANSACTIONS_PER_PAYLOAD,
                MAX_BYTES_PER_TRANSACTION,
                buf,
            )
        })?;
        if let Some(w) = &self.withdrawals {
            enc.append_dynamic(|buf| list::write_static_list(w, MAX_WITHDRAWALS_PER_PAYLOAD, buf))?;
        }
        if self.version.has_blob_gas() {
            enc.append_static(&self.blob_gas_used)?;
            enc.append_static(&self.excess_blob_gas)?;
        }
        enc.finish()
    }
}

impl VersionedSsz for ExecutionPayload {
    const TYPE_NAME: &'static str = "ExecutionPayload";

    fn version(&self) -> ForkVersion {
        self.version
    }

    fn ssz_size(&self) -> usize {
        Self::fixed_size(self.version)
            + self.extra_data.len()
            + list::byte_lists_size(&self.transactions)
            + self.withdrawals.as_ref().map_or(0, |w| w.len() * WITHDRAWAL_SIZE)
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
        dec.read_offset()?;
        if version.has_withdrawals() {
            dec.read_offset()?;
        }
        let (blob_gas_used, excess_blob_gas) = if version.has_blob_gas() {
            (dec.read_static()?, dec.read_static()?)
        } else {
            (0, 0)
        };
        let mut fields = dec.finish()?;
        let extra_data = list::read_byte_list(fields.next_field()?, MAX_EXTRA_DATA_BYTES)?;
        let transactions = list::read_byte_lists(
            fields.next_field()?,
            MAX_TRANSACTIONS_PER_PAYLOAD,
            MAX_BYTES_PER_TRANSACTION,
        )?;
        let withdrawals = if version.has_withdrawals() {
            Some(list::read_static_list(fields.next_field()?, MAX_WITHDRAWALS_PER_PAYLOAD)?)
        } else {
            None
        };
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
            transactions,
            withdrawals,
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
            &|| transactions_root(&self.transactions),
        ];
        let withdrawals = || withdrawals_root(self.withdrawals.as_deref().unwrap_or_default());
        let blob_gas_used = || self.blob_gas_used.hash_tree_root();
        let excess_blob_gas = || self.excess_blob_gas.hash_tree_root();

        let mut fields: Vec<FieldHasher<'_>> = base.to_vec();
        if self.version.has_withdrawals() {
            fields.push(&withdrawals);
        }
        if self.version.has_blob_gas() {
            fields.push(&blob_gas_used);
            fields.push(&excess_blob_gas);
        }
        Ok(hash::container_root_with(&fields)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_ssz::SszError;

    fn sample(version: ForkVersion) -> ExecutionPayload {
        let mut p = ExecutionPayload::new_empty(version).unwrap();
        p.parent_hash = [1u8; 32];
        p.fee_recipient = [2u8; 20];
        p.number = 42;
        p.gas_limit = 30_000_000;
        p.timestamp = 1_700_000_000;
        p.extra_data = b"beacon".to_vec();
        p.base_fee_per_gas = U256::from(7u64);
        p.block_hash = [3u8; 32];
        p.transactions = vec![vec![0xf8, 0x01], vec![], vec![0xaa; 100]];
        if version.has_withdrawals() {
            p.set_withdrawals(vec![Withdrawal::new(0, 1, [9u8; 20], 100)]).unwrap();
        }
        if version.has_blob_gas() {
            p.set_blob_gas(131_072, 5).unwrap();
        }
        p
    }

    #[test]
    fn fixed_sizes_follow_version() {
        assert_eq!(ExecutionPayload::fixed_size(ForkVersion::Bellatrix), 508);
        assert_eq!(ExecutionPayload::fixed_size(ForkVersion::Capella), 512);
        assert_eq!(ExecutionPayload::fixed_size(ForkVersion::Deneb), 528);
        assert_eq!(ExecutionPayload::fixed_size(ForkVersion::Electra1), 528);
    }

    #[test]
    fn roundtrip_every_supported_version() {
        for v in ForkVersion::ALL.into_iter().filter(|v| *v >= ForkVersion::Bellatrix) {
            let p = sample(v);
            let bytes = p.ssz_bytes().unwrap();
            assert_eq!(bytes.len(), p.ssz_size(), "{v}");
            assert_eq!(&bytes[..32], &[1u8; 32]);
            let back = ExecutionPayload::from_ssz_bytes(&bytes, v).unwrap();
            assert_eq!(back, p, "{v}");
            assert_eq!(back.hash_tree_root().unwrap(), p.hash_tree_root().unwrap());
        }
    }

    #[test]
    fn unsupported_versions_rejected() {
        assert_eq!(
            ExecutionPayload::new_empty(ForkVersion::Altair),
            Err(Error::UnsupportedVersion {
                ty: "ExecutionPayload",
                version: ForkVersion::Altair
            })
        );
        let bytes = sample(ForkVersion::Deneb).ssz_bytes().unwrap();
        assert!(ExecutionPayload::from_ssz_bytes(&bytes, ForkVersion::Phase0).is_err());
    }

    #[test]
    fn version_gated_fields() {
        let mut p = ExecutionPayload::new_empty(ForkVersion::Bellatrix).unwrap();
        assert!(p.withdrawals().is_none());
        assert!(matches!(
            p.set_withdrawals(vec![]),
            Err(Error::FieldNotSupported { field: "withdrawals", .. })
        ));
        assert!(matches!(
            p.set_blob_gas(1, 0),
            Err(Error::FieldNotSupported { since: ForkVersion::Deneb, .. })
        ));
        assert!(p.set_blob_gas(0, 0).is_ok());

        let capella = ExecutionPayload::new_empty(ForkVersion::Capella).unwrap();
        assert_eq!(capella.withdrawals(), Some(&[][..]));
    }

    #[test]
    fn same_field_set_same_bytes() {
        let deneb = sample(ForkVersion::Deneb).ssz_bytes().unwrap();
        let deneb1 = sample(ForkVersion::Deneb1).ssz_bytes().unwrap();
        assert_eq!(deneb, deneb1);

        let capella = sample(ForkVersion::Capella).ssz_bytes().unwrap();
        assert_ne!(capella, deneb);
    }

    #[test]
    fn oversize_extra_data_rejected() {
        let mut p = sample(ForkVersion::Deneb);
        p.extra_data = vec![0u8; 33];
        assert_eq!(
            p.ssz_bytes(),
            Err(Error::Ssz(SszError::ListTooLong { have: 33, max: 32 }))
        );
        assert!(p.hash_tree_root().is_err());
    }

    #[test]
    fn first_offset_must_match_fixed_region() {
        let mut bytes = sample(ForkVersion::Capella).ssz_bytes().unwrap();
        // extra_data offset slot sits after the four u64s
        bytes[436..440].copy_from_slice(&511u32.to_le_bytes());
        assert_eq!(
            ExecutionPayload::from_ssz_bytes(&bytes, ForkVersion::Capella),
            Err(Error::Ssz(SszError::InvalidVariableOffset { offset: 511, expected: 512 }))
        );
    }

    #[test]
    fn empty_transactions_root_is_zero_subtree_mixed_with_zero() {
        let root = transactions_root(&[]).unwrap();
        let expected = beacon_ssz::merkle::mix_in_length(&beacon_ssz::merkle::zero_hash(20), 0);
        assert_eq!(root, expected);
    }
}
