use beacon_ssz::{impl_static_container, HashTreeRoot};

use crate::constants::DOMAIN_BEACON_PROPOSER;
use crate::error::Result;
use crate::fork::{compute_signing_root, ForkData};
use crate::primitives::{BlsSignature, Root, Slot, ValidatorIndex};
use crate::signing::{BlsSigner, BlsVerifier};

/// Block metadata with the body replaced by its root. 112 bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BeaconBlockHeader {
    pub slot: Slot,
    pub proposer_index: ValidatorIndex,
    pub parent_root: Root,
    pub state_root: Root,
    pub body_root: Root,
}

impl_static_container!(BeaconBlockHeader {
    slot: Slot,
    proposer_index: ValidatorIndex,
    parent_root: Root,
    state_root: Root,
    body_root: Root,
});

impl BeaconBlockHeader {
    pub fn new(
        slot: Slot,
        proposer_index: ValidatorIndex,
        parent_root: Root,
        state_root: Root,
        body_root: Root,
    ) -> Self {
        Self {
            slot,
            proposer_index,
            parent_root,
            state_root,
            body_root,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SignedBeaconBlockHeader {
    pub header: BeaconBlockHeader,
    pub signature: BlsSignature,
}

impl_static_container!(SignedBeaconBlockHeader {
    header: BeaconBlockHeader,
    signature: BlsSignature,
});

impl SignedBeaconBlockHeader {
    /// Sign `header` under the proposer domain of `fork_data`.
    pub fn new(header: BeaconBlockHeader, fork_data: &ForkData, signer: &dyn BlsSigner) -> Result<Self> {
        let domain = fork_data.compute_domain(DOMAIN_BEACON_PROPOSER)?;
        let signing_root = compute_signing_root(header.hash_tree_root()?, domain)?;
        let signature = signer.sign(&signing_root)?;
        Ok(Self { header, signature })
    }

    pub fn verify_signature(
        &self,
        fork_data: &ForkData,
        verifier: &dyn BlsVerifier,
        pubkey: &crate::primitives::BlsPubkey,
    ) -> Result<bool> {
        let domain = fork_data.compute_domain(DOMAIN_BEACON_PROPOSER)?;
        let signing_root = compute_signing_root(self.header.hash_tree_root()?, domain)?;
        Ok(verifier.verify(pubkey, &signing_root, &self.signature))
    }
}
