use beacon_ssz::{hash, list, ContainerDecoder, ContainerEncoder, FieldHasher, HashTreeRoot, Root};

use crate::codec::VersionedSsz;
use crate::constants::{
    BEACON_STATE_DENEB_SIZE, BEACON_STATE_ELECTRA_SIZE, EPOCHS_PER_HISTORICAL_VECTOR,
    PENDING_PARTIAL_WITHDRAWALS_LIMIT, SLOTS_PER_HISTORICAL_ROOT, VALIDATOR_REGISTRY_LIMIT,
};
use crate::error::{Error, Result};
use crate::eth1_data::Eth1Data;
use crate::fork::Fork;
use crate::header::BeaconBlockHeader;
use crate::payload_header::ExecutionPayloadHeader;
use crate::primitives::{Epoch, Gwei, Slot, ValidatorIndex, WithdrawalIndex};
use crate::validator::Validator;
use crate::version::{ensure_same, ensure_supported, ForkVersion};
use crate::withdrawal::{pending_balance_to_withdraw, PendingPartialWithdrawal};

type CombineRoots = fn(&[FieldHasher<'_, Error>]) -> Result<Root>;

/// Chain state.
///
/// Roots, validators, balances and slashings are bounded lists rather than
/// fixed vectors, so a fresh state encodes small. The pending partial
/// withdrawal queue exists from Electra and must stay empty before.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BeaconState {
    version: ForkVersion,
    pub genesis_validators_root: Root,
    pub slot: Slot,
    pub fork: Fork,
    pub latest_block_header: BeaconBlockHeader,
    pub block_roots: Vec<Root>,
    pub state_roots: Vec<Root>,
    pub eth1_data: Eth1Data,
    pub eth1_deposit_index: u64,
    pub latest_execution_payload_header: ExecutionPayloadHeader,
    pub validators: Vec<Validator>,
    pub balances: Vec<Gwei>,
    pub randao_mixes: Vec<Root>,
    pub next_withdrawal_index: WithdrawalIndex,
    pub next_withdrawal_validator_index: ValidatorIndex,
    pub slashings: Vec<Gwei>,
    pub total_slashing: Gwei,
    pending_partial_withdrawals: Vec<PendingPartialWithdrawal>,
}

impl BeaconState {
    pub fn fixed_size(version: ForkVersion) -> usize {
        if version.has_pending_partial_withdrawals() {
            BEACON_STATE_ELECTRA_SIZE
        } else {
            BEACON_STATE_DENEB_SIZE
        }
    }

    pub fn new_empty(version: ForkVersion) -> Result<Self> {
        ensure_supported(Self::TYPE_NAME, version, ForkVersion::Deneb)?;
        Ok(Self {
            version,
            genesis_validators_root: Root::default(),
            slot: 0,
            fork: Fork::default(),
            latest_block_header: BeaconBlockHeader::default(),
            block_roots: Vec::new(),
            state_roots: Vec::new(),
            eth1_data: Eth1Data::default(),
            eth1_deposit_index: 0,
            latest_execution_payload_header: ExecutionPayloadHeader::new_empty(version)?,
            validators: Vec::new(),
            balances: Vec::new(),
            randao_mixes: Vec::new(),
            next_withdrawal_index: 0,
            next_withdrawal_validator_index: 0,
            slashings: Vec::new(),
            total_slashing: 0,
            pending_partial_withdrawals: Vec::new(),
        })
    }

    pub fn pending_partial_withdrawals(&self) -> &[PendingPartialWithdrawal] {
        &self.pending_partial_withdrawals
    }

    /// Only an empty queue is accepted before Electra.
    pub fn set_pending_partial_withdrawals(
        &mut self,
        pending: Vec<PendingPartialWithdrawal>,
    ) -> Result<()> {
        if !self.version.has_pending_partial_withdrawals() && !pending.is_empty() {
            return Err(self.pending_not_supported());
        }
        self.pending_partial_withdrawals = pending;
        Ok(())
    }

    pub fn push_pending_partial_withdrawal(&mut self, w: PendingPartialWithdrawal) -> Result<()> {
        if !self.version.has_pending_partial_withdrawals() {
            return Err(self.pending_not_supported());
        }
        self.pending_partial_withdrawals.push(w);
        Ok(())
    }

    fn pending_not_supported(&self) -> Error {
        Error::FieldNotSupported {
            field: "pending_partial_withdrawals",
            since: ForkVersion::Electra,
            version: self.version,
        }
    }

    /// Queued partial withdrawal amount for one validator.
    pub fn pending_balance_to_withdraw(&self, index: ValidatorIndex) -> Gwei {
        pending_balance_to_withdraw(&self.pending_partial_withdrawals, index)
    }

    /// Append a registry entry with its balance; returns the new index.
    pub fn add_validator(&mut self, validator: Validator, balance: Gwei) -> ValidatorIndex {
        self.validators.push(validator);
        self.balances.push(balance);
        (self.validators.len() - 1) as ValidatorIndex
    }

    pub fn validator(&self, index: ValidatorIndex) -> Option<&Validator> {
        self.validators.get(usize::try_from(index).ok()?)
    }

    pub fn balance(&self, index: ValidatorIndex) -> Option<Gwei> {
        self.balances.get(usize::try_from(index).ok()?).copied()
    }

    pub fn active_validator_indices(&self, epoch: Epoch) -> Vec<ValidatorIndex> {
        self.validators
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_active(epoch))
            .map(|(i, _)| i as ValidatorIndex)
            .collect()
    }

    fn check_versions(&self) -> Result<()> {
        ensure_same(
            "latest_execution_payload_header",
            self.version,
            self.latest_execution_payload_header.version(),
        )?;
        if !self.version.has_pending_partial_withdrawals()
            && !self.pending_partial_withdrawals.is_empty()
        {
            return Err(self.pending_not_supported());
        }
        Ok(())
    }

    fn root_with(&self, combine: CombineRoots) -> Result<Root> {
        self.check_versions()?;
        let base: [FieldHasher<'_, Error>; 16] = [
            &|| -> Result<Root> { Ok(self.genesis_validators_root.hash_tree_root()?) },
            &|| -> Result<Root> { Ok(self.slot.hash_tree_root()?) },
            &|| -> Result<Root> { Ok(self.fork.hash_tree_root()?) },
            &|| -> Result<Root> { Ok(self.latest_block_header.hash_tree_root()?) },
            &|| -> Result<Root> {
                Ok(hash::list_root(&self.block_roots, SLOTS_PER_HISTORICAL_ROOT)?)
            },
            &|| -> Result<Root> {
                Ok(hash::list_root(&self.state_roots, SLOTS_PER_HISTORICAL_ROOT)?)
            },
            &|| -> Result<Root> { Ok(self.eth1_data.hash_tree_root()?) },
            &|| -> Result<Root> { Ok(self.eth1_deposit_index.hash_tree_root()?) },
            &|| self.latest_execution_payload_header.hash_tree_root(),
            &|| -> Result<Root> {
                Ok(hash::list_root(&self.validators, VALIDATOR_REGISTRY_LIMIT)?)
            },
            &|| -> Result<Root> {
                Ok(hash::basic_list_root(&self.balances, VALIDATOR_REGISTRY_LIMIT)?)
            },
            &|| -> Result<Root> {
                Ok(hash::list_root(&self.randao_mixes, EPOCHS_PER_HISTORICAL_VECTOR)?)
            },
            &|| -> Result<Root> { Ok(self.next_withdrawal_index.hash_tree_root()?) },
            &|| -> Result<Root> { Ok(self.next_withdrawal_validator_index.hash_tree_root()?) },
            &|| -> Result<Root> {
                Ok(hash::basic_list_root(&self.slashings, VALIDATOR_REGISTRY_LIMIT)?)
            },
            &|| -> Result<Root> { Ok(self.total_slashing.hash_tree_root()?) },
        ];
        let pending = || -> Result<Root> {
            Ok(hash::list_root(
                &self.pending_partial_withdrawals,
                PENDING_PARTIAL_WITHDRAWALS_LIMIT,
            )?)
        };

        let mut fields: Vec<FieldHasher<'_, Error>> = base.to_vec();
        if self.version.has_pending_partial_withdrawals() {
            fields.push(&pending);
        }
        combine(&fields)
    }
}

impl VersionedSsz for BeaconState {
    const TYPE_NAME: &'static str = "BeaconState";

    fn version(&self) -> ForkVersion {
        self.version
    }

    fn ssz_size(&self) -> usize {
        let pending = if self.version.has_pending_partial_withdrawals() {
            list::static_list_size(&self.pending_partial_withdrawals)
        } else {
            0
        };
        Self::fixed_size(self.version)
            + list::static_list_size(&self.block_roots)
            + list::static_list_size(&self.state_roots)
            + self.latest_execution_payload_header.ssz_size()
            + list::static_list_size(&self.validators)
            + list::static_list_size(&self.balances)
            + list::static_list_size(&self.randao_mixes)
            + list::static_list_size(&self.slashings)
            + pending
    }

    fn ssz_write(&self, out: &mut Vec<u8>) -> Result<()> {
        self.check_versions()?;
        let mut enc = ContainerEncoder::new(out, Self::fixed_size(self.version));
        enc.append_static(&self.genesis_validators_root)?;
        enc.append_static(&self.slot)?;
        enc.append_static(&self.fork)?;
        enc.append_static(&self.latest_block_header)?;
        enc.append_dynamic(|buf| {
            list::write_static_list(&self.block_roots, SLOTS_PER_HISTORICAL_ROOT, buf)
        })?;
        enc.append_dynamic(|buf| {
            list::write_static_list(&self.state_roots, SLOTS_PER_HISTORICAL_ROOT, buf)
        })?;
        enc.append_static(&self.eth1_data)?;
        enc.append_static(&self.eth1_deposit_index)?;
        enc.append_dynamic(|buf| self.latest_execution_payload_header.ssz_write(buf))?;
        enc.append_dynamic(|buf| {
            list::write_static_list(&self.validators, VALIDATOR_REGISTRY_LIMIT, buf)
        })?;
        enc.append_dynamic(|buf| {
            list::write_static_list(&self.balances, VALIDATOR_REGISTRY_LIMIT, buf)
        })?;
        enc.append_dynamic(|buf| {
            list::write_static_list(&self.randao_mixes, EPOCHS_PER_HISTORICAL_VECTOR, buf)
        })?;
        enc.append_static(&self.next_withdrawal_index)?;
        enc.append_static(&self.next_withdrawal_validator_index)?;
        enc.append_dynamic(|buf| {
            list::write_static_list(&self.slashings, VALIDATOR_REGISTRY_LIMIT, buf)
        })?;
        enc.append_static(&self.total_slashing)?;
        if self.version.has_pending_partial_withdrawals() {
            enc.append_dynamic(|buf| {
                list::write_static_list(
                    &self.pending_partial_withdrawals,
                    PENDING_PARTIAL_WITHDRAWALS_LIMIT,
                    buf,
                )
            })?;
        }
        enc.finish()?;
        Ok(())
    }

    fn ssz_read_versioned(bytes: &[u8], version: ForkVersion) -> Result<Self> {
        ensure_supported(Self::TYPE_NAME, version, ForkVersion::Deneb)?;
        let mut dec = ContainerDecoder::new(bytes, Self::fixed_size(version))?;
        let genesis_validators_root = dec.read_static()?;
        let slot = dec.read_static()?;
        let fork = dec.read_static()?;
        let latest_block_header = dec.read_static()?;
        dec.read_offset()?;
        dec.read_offset()?;
        let eth1_data = dec.read_static()?;
        let eth1_deposit_index = dec.read_static()?;
        dec.read_offset()?;
        dec.read_offset()?;
        dec.read_offset()?;
        dec.read_offset()?;
        let next_withdrawal_index = dec.read_static()?;
        let next_withdrawal_validator_index = dec.read_static()?;
        dec.read_offset()?;
        let total_slashing = dec.read_static()?;
        if version.has_pending_partial_withdrawals() {
            dec.read_offset()?;
        }

        let mut fields = dec.finish()?;
        let block_roots = list::read_static_list(fields.next_field()?, SLOTS_PER_HISTORICAL_ROOT)?;
        let state_roots = list::read_static_list(fields.next_field()?, SLOTS_PER_HISTORICAL_ROOT)?;
        let latest_execution_payload_header =
            ExecutionPayloadHeader::ssz_read_versioned(fields.next_field()?, version)?;
        let validators = list::read_static_list(fields.next_field()?, VALIDATOR_REGISTRY_LIMIT)?;
        let balances = list::read_static_list(fields.next_field()?, VALIDATOR_REGISTRY_LIMIT)?;
        let randao_mixes = list::read_static_list(fields.next_field()?, EPOCHS_PER_HISTORICAL_VECTOR)?;
        let slashings = list::read_static_list(fields.next_field()?, VALIDATOR_REGISTRY_LIMIT)?;
        let pending_partial_withdrawals = if version.has_pending_partial_withdrawals() {
            list::read_static_list(fields.next_field()?, PENDING_PARTIAL_WITHDRAWALS_LIMIT)?
        } else {
            Vec::new()
        };

        Ok(Self {
            version,
            genesis_validators_root,
            slot,
            fork,
            latest_block_header,
            block_roots,
            state_roots,
            eth1_data,
            eth1_deposit_index,
            latest_execution_payload_header,
            validators,
            balances,
            randao_mixes,
            next_withdrawal_index,
            next_withdrawal_validator_index,
            slashings,
            total_slashing,
            pending_partial_withdrawals,
        })
    }

    fn hash_tree_root(&self) -> Result<Root> {
        self.root_with(hash::container_root_with::<Error>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{EFFECTIVE_BALANCE_INCREMENT, MAX_EFFECTIVE_BALANCE, VALIDATOR_SIZE};
    use crate::payload::ExecutionPayload;
    use beacon_ssz::merkle::{mix_in_length, zero_hash};
    use beacon_ssz::SszError;

    fn populated(version: ForkVersion) -> BeaconState {
        let mut state = BeaconState::new_empty(version).unwrap();
        state.genesis_validators_root = [0xaa; 32];
        state.slot = 64;
        state.fork = Fork::new([4, 0, 0, 0], version.to_bytes(), 2);
        state.block_roots = vec![[1u8; 32], [2u8; 32]];
        state.state_roots = vec![[3u8; 32]];
        state.randao_mixes = vec![[4u8; 32]; 3];
        state.slashings = vec![0, 5];
        state.total_slashing = 5;
        for i in 0..4u8 {
            let v = Validator::from_deposit(
                crate::primitives::BlsPubkey::repeat_byte(i),
                [i; 32],
                MAX_EFFECTIVE_BALANCE,
                EFFECTIVE_BALANCE_INCREMENT,
                MAX_EFFECTIVE_BALANCE,
            );
            state.add_validator(v, MAX_EFFECTIVE_BALANCE + u64::from(i));
        }
        let mut payload = ExecutionPayload::new_empty(version).unwrap();
        payload.transactions = vec![vec![0xde, 0xad]];
        state.latest_execution_payload_header = payload.to_header().unwrap();
        state
    }

    #[test]
    fn empty_state_sizes() {
        let deneb = BeaconState::new_empty(ForkVersion::Deneb).unwrap();
        assert_eq!(deneb.ssz_bytes().unwrap().len(), 300 + 584);
        let electra = BeaconState::new_empty(ForkVersion::Electra1).unwrap();
        assert_eq!(electra.ssz_bytes().unwrap().len(), 304 + 584);
        assert!(BeaconState::new_empty(ForkVersion::Capella).is_err());
    }

    #[test]
    fn populated_state_roundtrips() {
        for v in [ForkVersion::Deneb, ForkVersion::Electra] {
            let mut state = populated(v);
            if v.has_pending_partial_withdrawals() {
                state
                    .push_pending_partial_withdrawal(PendingPartialWithdrawal {
                        validator_index: 1,
                        amount: 7,
                        withdrawable_epoch: 9,
                    })
                    .unwrap();
            }
            let bytes = state.ssz_bytes().unwrap();
            assert_eq!(bytes.len(), state.ssz_size());
            let back = BeaconState::from_ssz_bytes(&bytes, v).unwrap();
            assert_eq!(back, state);
            assert_eq!(back.hash_tree_root().unwrap(), state.hash_tree_root().unwrap());
        }
    }

    #[test]
    fn validators_region_follows_header() {
        let state = populated(ForkVersion::Deneb);
        let bytes = state.ssz_bytes().unwrap();
        let offset = |at: usize| u32::from_le_bytes(bytes[at..at + 4].try_into().unwrap()) as usize;
        // gvr(32) slot(8) fork(16) header(112), then two offsets,
        // eth1_data(72) and the deposit index(8).
        let header_offset_at = 32 + 8 + 16 + 112 + 8 + 72 + 8;
        let header_start = offset(header_offset_at);
        let validators_start = offset(header_offset_at + 4);
        assert_eq!(
            validators_start - header_start,
            state.latest_execution_payload_header.ssz_size()
        );
        assert_eq!(
            offset(header_offset_at + 8) - validators_start,
            4 * VALIDATOR_SIZE
        );
    }

    #[test]
    fn pending_withdrawals_gated_on_electra() {
        let mut deneb = BeaconState::new_empty(ForkVersion::Deneb1).unwrap();
        assert!(deneb.set_pending_partial_withdrawals(Vec::new()).is_ok());
        assert!(matches!(
            deneb.push_pending_partial_withdrawal(PendingPartialWithdrawal::default()),
            Err(Error::FieldNotSupported { since: ForkVersion::Electra, .. })
        ));

        let mut electra = BeaconState::new_empty(ForkVersion::Electra).unwrap();
        electra
            .set_pending_partial_withdrawals(vec![
                PendingPartialWithdrawal { validator_index: 2, amount: 10, withdrawable_epoch: 1 },
                PendingPartialWithdrawal { validator_index: 3, amount: 1, withdrawable_epoch: 1 },
                PendingPartialWithdrawal { validator_index: 2, amount: 5, withdrawable_epoch: 4 },
            ])
            .unwrap();
        assert_eq!(electra.pending_balance_to_withdraw(2), 15);
        assert_eq!(electra.pending_balance_to_withdraw(9), 0);
    }

    #[test]
    fn empty_balances_hash_to_zero_subtree() {
        let state = BeaconState::new_empty(ForkVersion::Deneb).unwrap();
        // 2^40 u64 balances pack into 2^38 chunks.
        let expected = mix_in_length(&zero_hash(38), 0);
        assert_eq!(
            hash::basic_list_root(&state.balances, VALIDATOR_REGISTRY_LIMIT).unwrap(),
            expected
        );
    }

    #[test]
    fn concurrent_and_sequential_roots_agree() {
        let state = populated(ForkVersion::Electra);
        assert_eq!(
            state.root_with(hash::container_root_with::<Error>).unwrap(),
            state.root_with(hash::container_root_sequential::<Error>).unwrap()
        );
    }

    #[test]
    fn header_version_must_match_state() {
        let mut state = BeaconState::new_empty(ForkVersion::Electra).unwrap();
        state.latest_execution_payload_header =
            ExecutionPayloadHeader::new_empty(ForkVersion::Capella).unwrap();
        assert!(matches!(
            state.hash_tree_root(),
            Err(Error::VersionMismatch { field: "latest_execution_payload_header", .. })
        ));
    }

    #[test]
    fn too_many_block_roots_rejected() {
        let mut state = BeaconState::new_empty(ForkVersion::Deneb).unwrap();
        state.block_roots = vec![[0u8; 32]; SLOTS_PER_HISTORICAL_ROOT as usize + 1];
        assert_eq!(
            state.ssz_bytes(),
            Err(Error::Ssz(SszError::ListTooLong { have: 8193, max: 8192 }))
        );
        assert!(state.hash_tree_root().is_err());
    }

    #[test]
    fn registry_helpers() {
        let mut state = populated(ForkVersion::Deneb);
        assert_eq!(state.validator(3).map(|v| v.pubkey.0[0]), Some(3));
        assert_eq!(state.balance(1), Some(MAX_EFFECTIVE_BALANCE + 1));
        assert!(state.validator(4).is_none());
        assert!(state.active_validator_indices(0).is_empty());
        state.validators[2].activation_epoch = 0;
        assert_eq!(state.active_validator_indices(0), vec![2]);
    }
}
