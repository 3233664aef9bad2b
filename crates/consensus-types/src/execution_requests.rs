//! Execution-layer requests (EIP-7685) carried in Electra bodies.

use beacon_ssz::{
    hash, impl_static_container, list, ContainerDecoder, ContainerEncoder, Decode, Encode,
    HashTreeRoot, Root, StaticSsz, BYTES_PER_LENGTH_OFFSET,
};

use crate::constants::{
    CONSOLIDATION_REQUEST_TYPE, DEPOSIT_REQUEST_TYPE, MAX_CONSOLIDATION_REQUESTS_PER_PAYLOAD,
    MAX_DEPOSIT_REQUESTS_PER_PAYLOAD, MAX_WITHDRAWAL_REQUESTS_PER_PAYLOAD, WITHDRAWAL_REQUEST_TYPE,
};
use crate::error::{Error, Result};
use crate::primitives::{BlsPubkey, BlsSignature, ExecutionAddress, Gwei};
use crate::validator::WithdrawalCredentials;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DepositRequest {
    pub pubkey: BlsPubkey,
    pub withdrawal_credentials: WithdrawalCredentials,
    pub amount: Gwei,
    pub signature: BlsSignature,
    pub index: u64,
}

impl_static_container!(DepositRequest {
    pubkey: BlsPubkey,
    withdrawal_credentials: WithdrawalCredentials,
    amount: Gwei,
    signature: BlsSignature,
    index: u64,
});

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WithdrawalRequest {
    pub source_address: ExecutionAddress,
    pub validator_pubkey: BlsPubkey,
    pub amount: Gwei,
}

impl_static_container!(WithdrawalRequest {
    source_address: ExecutionAddress,
    validator_pubkey: BlsPubkey,
    amount: Gwei,
});

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConsolidationRequest {
    pub source_address: ExecutionAddress,
    pub source_pubkey: BlsPubkey,
    pub target_pubkey: BlsPubkey,
}

impl_static_container!(ConsolidationRequest {
    source_address: ExecutionAddress,
    source_pubkey: BlsPubkey,
    target_pubkey: BlsPubkey,
});

/// Three dynamic lists, so the fixed region is three offsets.
pub const EXECUTION_REQUESTS_FIXED_SIZE: usize = 3 * BYTES_PER_LENGTH_OFFSET;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecutionRequests {
    pub deposits: Vec<DepositRequest>,
    pub withdrawals: Vec<WithdrawalRequest>,
    pub consolidations: Vec<ConsolidationRequest>,
}

impl Encode for ExecutionRequests {
    fn ssz_size(&self) -> usize {
        EXECUTION_REQUESTS_FIXED_SIZE
            + list::static_list_size(&self.deposits)
            + list::static_list_size(&self.withdrawals)
            + list::static_list_size(&self.consolidations)
    }

    fn ssz_write(&self, out: &mut Vec<u8>) -> beacon_ssz::Result<()> {
        let mut enc = ContainerEncoder::new(out, EXECUTION_REQUESTS_FIXED_SIZE);
        enc.append_dynamic(|buf| {
            list::write_static_list(&self.deposits, MAX_DEPOSIT_REQUESTS_PER_PAYLOAD, buf)
        })?;
        enc.append_dynamic(|buf| {
            list::write_static_list(&self.withdrawals, MAX_WITHDRAWAL_REQUESTS_PER_PAYLOAD, buf)
        })?;
        enc.append_dynamic(|buf| {
            list::write_static_list(
                &self.consolidations,
                MAX_CONSOLIDATION_REQUESTS_PER_PAYLOAD,
                buf,
            )
        })?;
        enc.finish()
    }
}

impl Decode for ExecutionRequests {
    fn ssz_read(input: &[u8]) -> beacon_ssz::Result<Self> {
        let mut dec = ContainerDecoder::new(input, EXECUTION_REQUESTS_FIXED_SIZE)?;
        dec.read_offset()?;
        dec.read_offset()?;
        dec.read_offset()?;
        let mut fields = dec.finish()?;
        Ok(Self {
            deposits: list::read_static_list(fields.next_field()?, MAX_DEPOSIT_REQUESTS_PER_PAYLOAD)?,
            withdrawals: list::read_static_list(
                fields.next_field()?,
                MAX_WITHDRAWAL_REQUESTS_PER_PAYLOAD,
            )?,
            consolidations: list::read_static_list(
                fields.next_field()?,
                MAX_CONSOLIDATION_REQUESTS_PER_PAYLOAD,
            )?,
        })
    }
}

impl HashTreeRoot for ExecutionRequests {
    fn hash_tree_root(&self) -> beacon_ssz::Result<Root> {
        hash::container_root(&[
            hash::list_root(&self.deposits, MAX_DEPOSIT_REQUESTS_PER_PAYLOAD)?,
            hash::list_root(&self.withdrawals, MAX_WITHDRAWAL_REQUESTS_PER_PAYLOAD)?,
            hash::list_root(&self.consolidations, MAX_CONSOLIDATION_REQUESTS_PER_PAYLOAD)?,
        ])
    }
}

fn typed_entry<T: StaticSsz>(ty: u8, items: &[T], max: u64) -> Result<Vec<u8>> {
    let mut entry = Vec::with_capacity(1 + list::static_list_size(items));
    entry.push(ty);
    list::write_static_list(items, max, &mut entry)?;
    Ok(entry)
}

impl ExecutionRequests {
    pub fn is_empty(&self) -> bool {
        self.deposits.is_empty() && self.withdrawals.is_empty() && self.consolidations.is_empty()
    }

    /// Flatten into `type || ssz(list)` entries, skipping empty lists, in
    /// ascending type order.
    pub fn to_request_list(&self) -> Result<Vec<Vec<u8>>> {
        let mut out = Vec::with_capacity(3);
        if !self.deposits.is_empty() {
            out.push(typed_entry(
                DEPOSIT_REQUEST_TYPE,
                &self.deposits,
                MAX_DEPOSIT_REQUESTS_PER_PAYLOAD,
            )?);
        }
        if !self.withdrawals.is_empty() {
            out.push(typed_entry(
                WITHDRAWAL_REQUEST_TYPE,
                &self.withdrawals,
                MAX_WITHDRAWAL_REQUESTS_PER_PAYLOAD,
            )?);
        }
        if !self.consolidations.is_empty() {
            out.push(typed_entry(
                CONSOLIDATION_REQUEST_TYPE,
                &self.consolidations,
                MAX_CONSOLIDATION_REQUESTS_PER_PAYLOAD,
            )?);
        }
        Ok(out)
    }

    /// Inverse of `to_request_list`. Types must be known and strictly
    /// increasing, and every entry must carry data.
    pub fn from_request_list<B: AsRef<[u8]>>(entries: &[B]) -> Result<Self> {
        let mut out = Self::default();
        let mut prev: Option<u8> = None;
        for entry in entries {
            let (&ty, data) = entry
                .as_ref()
                .split_first()
                .ok_or(beacon_ssz::SszError::InsufficientBytes { need: 1, have: 0 })?;
            if let Some(p) = prev {
                if p >= ty {
                    return Err(Error::InvalidRequestsOrder { prev: p, next: ty });
                }
            }
            prev = Some(ty);
            if data.is_empty() {
                return Err(Error::EmptyRequest(ty));
            }
            match ty {
                DEPOSIT_REQUEST_TYPE => {
                    out.deposits = list::read_static_list(data, MAX_DEPOSIT_REQUESTS_PER_PAYLOAD)?
                }
                WITHDRAWAL_REQUEST_TYPE => {
                    out.withdrawals =
                        list::read_static_list(data, MAX_WITHDRAWAL_REQUESTS_PER_PAYLOAD)?
                }
                CONSOLIDATION_REQUEST_TYPE => {
                    out.consolidations =
                        list::read_static_list(data, MAX_CONSOLIDATION_REQUESTS_PER_PAYLOAD)?
                }
                other => return Err(Error::UnknownRequestType(other)),
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{
        CONSOLIDATION_REQUEST_SIZE, DEPOSIT_REQUEST_SIZE, WITHDRAWAL_REQUEST_SIZE,
    };
    use beacon_ssz::SszError;

    fn sample() -> ExecutionRequests {
        ExecutionRequests {
            deposits: vec![DepositRequest {
                pubkey: BlsPubkey::repeat_byte(1),
                withdrawal_credentials: [2u8; 32],
                amount: 3,
                signature: BlsSignature::repeat_byte(4),
                index: 5,
            }],
            withdrawals: vec![],
            consolidations: vec![ConsolidationRequest {
                source_address: [6u8; 20],
                source_pubkey: BlsPubkey::repeat_byte(7),
                target_pubkey: BlsPubkey::repeat_byte(8),
            }],
        }
    }

    #[test]
    fn request_sizes() {
        assert_eq!(DepositRequest::SSZ_SIZE, DEPOSIT_REQUEST_SIZE);
        assert_eq!(WithdrawalRequest::SSZ_SIZE, WITHDRAWAL_REQUEST_SIZE);
        assert_eq!(ConsolidationRequest::SSZ_SIZE, CONSOLIDATION_REQUEST_SIZE);
    }

    #[test]
    fn container_layout_and_roundtrip() {
        let reqs = sample();
        let bytes = reqs.ssz_bytes().unwrap();
        assert_eq!(bytes.len(), 12 + 192 + 116);
        assert_eq!(&bytes[0..4], &12u32.to_le_bytes());
        assert_eq!(&bytes[4..8], &204u32.to_le_bytes());
        assert_eq!(&bytes[8..12], &204u32.to_le_bytes());
        assert_eq!(ExecutionRequests::ssz_read(&bytes).unwrap(), reqs);

        let empty = ExecutionRequests::default().ssz_bytes().unwrap();
        assert_eq!(empty, [12u8, 0, 0, 0, 12, 0, 0, 0, 12, 0, 0, 0]);
    }

    #[test]
    fn too_many_consolidations_rejected() {
        let mut reqs = sample();
        reqs.consolidations = vec![ConsolidationRequest::default(); 3];
        assert_eq!(
            reqs.ssz_bytes(),
            Err(SszError::ListTooLong { have: 3, max: 2 })
        );
        assert!(reqs.hash_tree_root().is_err());
    }

    #[test]
    fn request_list_skips_empty_and_roundtrips() {
        let reqs = sample();
        let list = reqs.to_request_list().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0][0], DEPOSIT_REQUEST_TYPE);
        assert_eq!(list[0].len(), 1 + DEPOSIT_REQUEST_SIZE);
        assert_eq!(list[1][0], CONSOLIDATION_REQUEST_TYPE);
        assert_eq!(ExecutionRequests::from_request_list(&list).unwrap(), reqs);
        assert!(ExecutionRequests::default().to_request_list().unwrap().is_empty());
    }

    #[test]
    fn request_list_rejects_bad_entries() {
        let list = sample().to_request_list().unwrap();

        let swapped = vec![list[1].clone(), list[0].clone()];
        assert_eq!(
            ExecutionRequests::from_request_list(&swapped),
            Err(Error::InvalidRequestsOrder { prev: 2, next: 0 })
        );

        let dup = vec![list[0].clone(), list[0].clone()];
        assert_eq!(
            ExecutionRequests::from_request_list(&dup),
            Err(Error::InvalidRequestsOrder { prev: 0, next: 0 })
        );

        assert_eq!(
            ExecutionRequests::from_request_list(&[vec![WITHDRAWAL_REQUEST_TYPE]]),
            Err(Error::EmptyRequest(WITHDRAWAL_REQUEST_TYPE))
        );
        assert_eq!(
            ExecutionRequests::from_request_list(&[vec![9u8, 0]]),
            Err(Error::UnknownRequestType(9))
        );
        assert!(ExecutionRequests::from_request_list(&[vec![DEPOSIT_REQUEST_TYPE, 1, 2]]).is_err());
    }
}
