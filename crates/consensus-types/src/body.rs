use beacon_ssz::merkle::{self, mix_in_length};
use beacon_ssz::{
    enforce_all_unused, hash, list, ContainerDecoder, ContainerEncoder, EnforceUnused, FieldHasher,
    HashTreeRoot, Root, Unused,
};

use crate::codec::VersionedSsz;
use crate::constants::{
    BEACON_BLOCK_BODY_DENEB_SIZE, BEACON_BLOCK_BODY_ELECTRA_SIZE, BODY_TREE_DEPTH,
    KZG_COMMITMENTS_FIELD_INDEX, KZG_COMMITMENTS_TREE_DEPTH,
    MAX_ATTESTATIONS, MAX_ATTESTER_SLASHINGS, MAX_BLOB_COMMITMENTS_PER_BLOCK,
    MAX_BLS_TO_EXECUTION_CHANGES, MAX_DEPOSITS, MAX_PROPOSER_SLASHINGS, MAX_VOLUNTARY_EXITS,
};
use crate::deposit::Deposit;
use crate::error::{join, Error, Result};
use crate::eth1_data::Eth1Data;
use crate::execution_requests::ExecutionRequests;
use crate::payload::ExecutionPayload;
use crate::primitives::{BlsSignature, Bytes32, KzgCommitment};
use crate::sync_aggregate::SyncAggregate;
use crate::version::{ensure_same, ensure_supported, ForkVersion};

/// Block body.
///
/// Slashings, attestations, exits, BLS changes and the sync aggregate keep
/// their wire slots but are reserved: they must stay empty (or zero) and are
/// only reachable through setters so a caller can't fill them by accident.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BeaconBlockBody {
    version: ForkVersion,
    pub randao_reveal: BlsSignature,
    pub eth1_data: Eth1Data,
    pub graffiti: Bytes32,
    proposer_slashings: Vec<Unused>,
    attester_slashings: Vec<Unused>,
    attestations: Vec<Unused>,
    pub deposits: Vec<Deposit>,
    voluntary_exits: Vec<Unused>,
    sync_aggregate: SyncAggregate,
    pub execution_payload: ExecutionPayload,
    bls_to_execution_changes: Vec<Unused>,
    pub blob_kzg_commitments: Vec<KzgCommitment>,
    execution_requests: Option<ExecutionRequests>,
}

impl BeaconBlockBody {
    pub fn fixed_size(version: ForkVersion) -> usize {
        if version.has_execution_requests() {
            BEACON_BLOCK_BODY_ELECTRA_SIZE
        } else {
            BEACON_BLOCK_BODY_DENEB_SIZE
        }
    }

    pub fn new_empty(version: ForkVersion) -> Result<Self> {
        ensure_supported(Self::TYPE_NAME, version, ForkVersion::Deneb)?;
        Ok(Self {
            version,
            randao_reveal: BlsSignature::default(),
            eth1_data: Eth1Data::default(),
            graffiti: Bytes32::default(),
            proposer_slashings: Vec::new(),
            attester_slashings: Vec::new(),
            attestations: Vec::new(),
            deposits: Vec::new(),
            voluntary_exits: Vec::new(),
            sync_aggregate: SyncAggregate::default(),
            execution_payload: ExecutionPayload::new_empty(version)?,
            bls_to_execution_changes: Vec::new(),
            blob_kzg_commitments: Vec::new(),
            execution_requests: version.has_execution_requests().then(ExecutionRequests::default),
        })
    }

    /* -------- Reserved fields -------- */

    pub fn proposer_slashings(&self) -> &[Unused] {
        &self.proposer_slashings
    }

    pub fn set_proposer_slashings(&mut self, v: Vec<Unused>) {
        self.proposer_slashings = v;
    }

    pub fn attester_slashings(&self) -> &[Unused] {
        &self.attester_slashings
    }

    pub fn set_attester_slashings(&mut self, v: Vec<Unused>) {
        self.attester_slashings = v;
    }

    pub fn attestations(&self) -> &[Unused] {
        &self.attestations
    }

    pub fn set_attestations(&mut self, v: Vec<Unused>) {
        self.attestations = v;
    }

    pub fn voluntary_exits(&self) -> &[Unused] {
        &self.voluntary_exits
    }

    pub fn set_voluntary_exits(&mut self, v: Vec<Unused>) {
        self.voluntary_exits = v;
    }

    pub fn sync_aggregate(&self) -> &SyncAggregate {
        &self.sync_aggregate
    }

    pub fn set_sync_aggregate(&mut self, agg: SyncAggregate) {
        self.sync_aggregate = agg;
    }

    pub fn bls_to_execution_changes(&self) -> &[Unused] {
        &self.bls_to_execution_changes
    }

    pub fn set_bls_to_execution_changes(&mut self, v: Vec<Unused>) {
        self.bls_to_execution_changes = v;
    }

    fn enforce_reserved(&self) -> beacon_ssz::Result<()> {
        enforce_all_unused(&[
            ("proposer_slashings", &self.proposer_slashings as &dyn EnforceUnused),
            ("attester_slashings", &self.attester_slashings as &dyn EnforceUnused),
            ("attestations", &self.attestations as &dyn EnforceUnused),
            ("voluntary_exits", &self.voluntary_exits as &dyn EnforceUnused),
            ("sync_aggregate", &self.sync_aggregate as &dyn EnforceUnused),
            (
                "bls_to_execution_changes",
                &self.bls_to_execution_changes as &dyn EnforceUnused,
            ),
        ])
    }

    /* -------- Electra -------- */

    pub fn execution_requests(&self) -> Result<&ExecutionRequests> {
        self.execution_requests
            .as_ref()
            .ok_or(Error::FieldNotSupported {
                field: "execution_requests",
                since: ForkVersion::Electra,
                version: self.version,
            })
    }

    pub fn set_execution_requests(&mut self, requests: ExecutionRequests) -> Result<()> {
        if !self.version.has_execution_requests() {
            return Err(Error::FieldNotSupported {
                field: "execution_requests",
                since: ForkVersion::Electra,
                version: self.version,
            });
        }
        self.execution_requests = Some(requests);
        Ok(())
    }

    /* -------- Hashing -------- */

    fn kzg_commitment_leaves(&self) -> beacon_ssz::Result<Vec<Root>> {
        list::check_len(self.blob_kzg_commitments.len(), MAX_BLOB_COMMITMENTS_PER_BLOCK)?;
        self.blob_kzg_commitments
            .iter()
            .map(HashTreeRoot::hash_tree_root)
            .collect()
    }

    /// One root per field, in declaration order.
    pub fn field_roots(&self) -> Result<Vec<Root>> {
        ensure_same(
            "execution_payload",
            self.version,
            self.execution_payload.version(),
        )?;
        let base: [FieldHasher<'_, Error>; 12] = [
            &|| -> Result<Root> { Ok(self.randao_reveal.hash_tree_root()?) },
            &|| -> Result<Root> { Ok(self.eth1_data.hash_tree_root()?) },
            &|| -> Result<Root> { Ok(self.graffiti.hash_tree_root()?) },
            &|| -> Result<Root> {
                Ok(hash::list_root(&self.proposer_slashings, MAX_PROPOSER_SLASHINGS)?)
            },
            &|| -> Result<Root> {
                Ok(hash::list_root(&self.attester_slashings, MAX_ATTESTER_SLASHINGS)?)
            },
            &|| -> Result<Root> { Ok(hash::list_root(&self.attestations, MAX_ATTESTATIONS)?) },
            &|| -> Result<Root> { Ok(hash::list_root(&self.deposits, MAX_DEPOSITS)?) },
            &|| -> Result<Root> {
                Ok(hash::list_root(&self.voluntary_exits, MAX_VOLUNTARY_EXITS)?)
            },
            &|| -> Result<Root> { Ok(self.sync_aggregate.hash_tree_root()?) },
            &|| self.execution_payload.hash_tree_root(),
            &|| -> Result<Root> {
                Ok(hash::list_root(
                    &self.bls_to_execution_changes,
                    MAX_BLS_TO_EXECUTION_CHANGES,
                )?)
            },
            &|| -> Result<Root> { self.blob_kzg_commitments_root() },
        ];
        let execution_requests = || -> Result<Root> {
            Ok(self.execution_requests()?.hash_tree_root()?)
        };

        let mut fields: Vec<FieldHasher<'_, Error>> = base.to_vec();
        if self.version.has_execution_requests() {
            fields.push(&execution_requests);
        }
        Ok(hash::field_roots_with(&fields)?)
    }

    /// Proof that commitment `index` sits under the body root: 12 list
    /// levels, the length leaf, then 4 body levels.
    pub fn kzg_commitment_inclusion_proof(&self, index: u64) -> Result<Vec<Root>> {
        let leaves = self.kzg_commitment_leaves()?;
        let count = leaves.len() as u64;
        if index >= count {
            return Err(beacon_ssz::SszError::IndexOutOfRange { index, leaves: count }.into());
        }
        let (mut proof, _) = merkle::merkle_proof(&leaves, KZG_COMMITMENTS_TREE_DEPTH, index)?;

        let mut length_leaf = [0u8; 32];
        length_leaf[..8].copy_from_slice(&count.to_le_bytes());
        proof.push(length_leaf);

        let field_roots = self.field_roots()?;
        let (body_branch, _) =
            merkle::merkle_proof(&field_roots, BODY_TREE_DEPTH, KZG_COMMITMENTS_FIELD_INDEX)?;
        proof.extend(body_branch);
        Ok(proof)
    }

    /// Check a proof produced by `kzg_commitment_inclusion_proof` against this body.
    pub fn verify_kzg_commitment_inclusion_proof(&self, index: u64, proof: &[Root]) -> Result<bool> {
        let commitment = match self.blob_kzg_commitments.get(index as usize) {
            Some(c) => c,
            None => return Ok(false),
        };
        crate::kzg::verify_kzg_commitment_inclusion_proof(
            &VersionedSsz::hash_tree_root(self)?,
            commitment,
            index,
            proof,
        )
    }

    /// Root of the commitments list, as committed in the body.
    pub fn blob_kzg_commitments_root(&self) -> Result<Root> {
        let leaves = self.kzg_commitment_leaves()?;
        let root = merkle::merkleize(&leaves, Some(MAX_BLOB_COMMITMENTS_PER_BLOCK))?;
        Ok(mix_in_length(&root, leaves.len() as u64))
    }

    /* -------- Encoding -------- */

    fn dynamic_size(&self) -> usize {
        let reserved = self.proposer_slashings.len()
            + self.attester_slashings.len()
            + self.attestations.len()
            + self.voluntary_exits.len()
            + self.bls_to_execution_changes.len();
        reserved
            + list::static_list_size(&self.deposits)
            + self.execution_payload.ssz_size()
            + list::static_list_size(&self.blob_kzg_commitments)
            + self
                .execution_requests
                .as_ref()
                .map_or(0, beacon_ssz::Encode::ssz_size)
    }
}

impl VersionedSsz for BeaconBlockBody {
    const TYPE_NAME: &'static str = "BeaconBlockBody";

    fn version(&self) -> ForkVersion {
        self.version
    }

    fn ssz_size(&self) -> usize {
        Self::fixed_size(self.version) + self.dynamic_size()
    }

    fn ssz_write(&self, out: &mut Vec<u8>) -> Result<()> {
        self.enforce_reserved()?;
        self.write_fields(out)
    }

    fn ssz_read_versioned(bytes: &[u8], version: ForkVersion) -> Result<Self> {
        ensure_supported(Self::TYPE_NAME, version, ForkVersion::Deneb)?;
        let mut dec = ContainerDecoder::new(bytes, Self::fixed_size(version))?;
        let randao_reveal = dec.read_static()?;
        let eth1_data = dec.read_static()?;
        let graffiti = dec.read_static()?;
        for _ in 0..5 {
            dec.read_offset()?;
        }
        let sync_aggregate = dec.read_static()?;
        dec.read_offset()?;
        dec.read_offset()?;
        dec.read_offset()?;
        if version.has_execution_requests() {
            dec.read_offset()?;
        }
        let mut fields = dec.finish()?;
        let proposer_slashings = list::read_static_list(fields.next_field()?, MAX_PROPOSER_SLASHINGS)?;
        let attester_slashings = list::read_static_list(fields.next_field()?, MAX_ATTESTER_SLASHINGS)?;
        let attestations = list::read_static_list(fields.next_field()?, MAX_ATTESTATIONS)?;
        let deposits = list::read_static_list(fields.next_field()?, MAX_DEPOSITS)?;
        let voluntary_exits = list::read_static_list(fields.next_field()?, MAX_VOLUNTARY_EXITS)?;
        let execution_payload = ExecutionPayload::ssz_read_versioned(fields.next_field()?, version)?;
        let bls_to_execution_changes =
            list::read_static_list(fields.next_field()?, MAX_BLS_TO_EXECUTION_CHANGES)?;
        let blob_kzg_commitments =
            list::read_static_list(fields.next_field()?, MAX_BLOB_COMMITMENTS_PER_BLOCK)?;
        let execution_requests = if version.has_execution_requests() {
            Some(beacon_ssz::Decode::ssz_read(fields.next_field()?)?)
        } else {
            None
        };

        let body = Self {
            version,
            randao_reveal,
            eth1_data,
            graffiti,
            proposer_slashings,
            attester_slashings,
            attestations,
            deposits,
            voluntary_exits,
            sync_aggregate,
            execution_payload,
            bls_to_execution_changes,
            blob_kzg_commitments,
            execution_requests,
        };
        body.validate_after_decode()?;
        Ok(body)
    }

    fn hash_tree_root(&self) -> Result<Root> {
        let roots = self.field_roots()?;
        Ok(hash::container_root(&roots)?)
    }
}

impl BeaconBlockBody {
    /// Field encoding without the reserved-field check.
    fn write_fields(&self, out: &mut Vec<u8>) -> Result<()> {
        ensure_same(
            "execution_payload",
            self.version,
            self.execution_payload.version(),
        )?;
        let mut enc = ContainerEncoder::new(out, Self::fixed_size(self.version));
        enc.append_static(&self.randao_reveal)?;
        enc.append_static(&self.eth1_data)?;
        enc.append_static(&self.graffiti)?;
        enc.append_dynamic(|buf| {
            list::write_static_list(&self.proposer_slashings, MAX_PROPOSER_SLASHINGS, buf)
        })?;
        enc.append_dynamic(|buf| {
            list::write_static_list(&self.attester_slashings, MAX_ATTESTER_SLASHINGS, buf)
        })?;
        enc.append_dynamic(|buf| list::write_static_list(&self.attestations, MAX_ATTESTATIONS, buf))?;
        enc.append_dynamic(|buf| list::write_static_list(&self.deposits, MAX_DEPOSITS, buf))?;
        enc.append_dynamic(|buf| {
            list::write_static_list(&self.voluntary_exits, MAX_VOLUNTARY_EXITS, buf)
        })?;
        enc.append_static(&self.sync_aggregate)?;
        enc.append_dynamic(|buf| self.execution_payload.ssz_write(buf))?;
        enc.append_dynamic(|buf| {
            list::write_static_list(
                &self.bls_to_execution_changes,
                MAX_BLS_TO_EXECUTION_CHANGES,
                buf,
            )
        })?;
        enc.append_dynamic(|buf| {
            list::write_static_list(&self.blob_kzg_commitments, MAX_BLOB_COMMITMENTS_PER_BLOCK, buf)
        })?;
        if self.version.has_execution_requests() {
            let requests = self.execution_requests()?;
            enc.append_dynamic_value(requests)?;
        }
        enc.finish()?;
        Ok(())
    }

    /// Reserved-field violations and nested payload checks, reported together.
    fn validate_after_decode(&self) -> Result<()> {
        join([
            self.enforce_reserved().map_err(Error::from),
            self.execution_payload.validate(),
        ])
    }
}
