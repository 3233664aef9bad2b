use beacon_ssz::{hash, ContainerDecoder, ContainerEncoder, FieldHasher, HashTreeRoot, Root};

use crate::body::BeaconBlockBody;
use crate::codec::VersionedSsz;
use crate::constants::{
    BEACON_BLOCK_FIXED_SIZE, DOMAIN_BEACON_PROPOSER, SIGNED_BEACON_BLOCK_FIXED_SIZE,
};
use crate::error::{Error, Result};
use crate::fork::{compute_signing_root, ForkData};
use crate::header::{BeaconBlockHeader, SignedBeaconBlockHeader};
use crate::primitives::{BlsPubkey, BlsSignature, Slot, ValidatorIndex};
use crate::signing::{BlsSigner, BlsVerifier};
use crate::version::{ensure_same, ensure_supported, ForkVersion};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BeaconBlock {
    version: ForkVersion,
    pub slot: Slot,
    pub proposer_index: ValidatorIndex,
    pub parent_root: Root,
    pub state_root: Root,
    pub body: BeaconBlockBody,
}

impl BeaconBlock {
    pub fn new_empty(version: ForkVersion) -> Result<Self> {
        ensure_supported(Self::TYPE_NAME, version, ForkVersion::Deneb)?;
        Ok(Self {
            version,
            slot: 0,
            proposer_index: 0,
            parent_root: Root::default(),
            state_root: Root::default(),
            body: BeaconBlockBody::new_empty(version)?,
        })
    }

    /// Wrap a body; the block takes the body's version.
    pub fn from_body(
        slot: Slot,
        proposer_index: ValidatorIndex,
        parent_root: Root,
        state_root: Root,
        body: BeaconBlockBody,
    ) -> Result<Self> {
        let version = body.version();
        ensure_supported(Self::TYPE_NAME, version, ForkVersion::Deneb)?;
        Ok(Self {
            version,
            slot,
            proposer_index,
            parent_root,
            state_root,
            body,
        })
    }

    /// Header with the body replaced by its root. Shares this block's root.
    pub fn to_header(&self) -> Result<BeaconBlockHeader> {
        Ok(BeaconBlockHeader::new(
            self.slot,
            self.proposer_index,
            self.parent_root,
            self.state_root,
            self.body_root()?,
        ))
    }

    pub fn body_root(&self) -> Result<Root> {
        ensure_same("body", self.version, self.body.version())?;
        self.body.hash_tree_root()
    }

    fn signing_root(&self, fork_data: &ForkData) -> Result<Root> {
        let domain = fork_data.compute_domain(DOMAIN_BEACON_PROPOSER)?;
        compute_signing_root(VersionedSsz::hash_tree_root(self)?, domain)
    }
}

impl VersionedSsz for BeaconBlock {
    const TYPE_NAME: &'static str = "BeaconBlock";

    fn version(&self) -> ForkVersion {
        self.version
    }

    fn ssz_size(&self) -> usize {
        BEACON_BLOCK_FIXED_SIZE + self.body.ssz_size()
    }

    fn ssz_write(&self, out: &mut Vec<u8>) -> Result<()> {
        ensure_same("body", self.version, self.body.version())?;
        let mut enc = ContainerEncoder::new(out, BEACON_BLOCK_FIXED_SIZE);
        enc.append_static(&self.slot)?;
        enc.append_static(&self.proposer_index)?;
        enc.append_static(&self.parent_root)?;
        enc.append_static(&self.state_root)?;
        enc.append_dynamic(|buf| self.body.ssz_write(buf))?;
        enc.finish()?;
        Ok(())
    }

    fn ssz_read_versioned(bytes: &[u8], version: ForkVersion) -> Result<Self> {
        ensure_supported(Self::TYPE_NAME, version, ForkVersion::Deneb)?;
        let mut dec = ContainerDecoder::new(bytes, BEACON_BLOCK_FIXED_SIZE)?;
        let slot = dec.read_static()?;
        let proposer_index = dec.read_static()?;
        let parent_root = dec.read_static()?;
        let state_root = dec.read_static()?;
        dec.read_offset()?;
        let mut fields = dec.finish()?;
        let body = BeaconBlockBody::ssz_read_versioned(fields.next_field()?, version)?;
        Ok(Self {
            version,
            slot,
            proposer_index,
            parent_root,
            state_root,
            body,
        })
    }

    fn hash_tree_root(&self) -> Result<Root> {
        let fields: [FieldHasher<'_, Error>; 5] = [
            &|| -> Result<Root> { Ok(self.slot.hash_tree_root()?) },
            &|| -> Result<Root> { Ok(self.proposer_index.hash_tree_root()?) },
            &|| -> Result<Root> { Ok(self.parent_root.hash_tree_root()?) },
            &|| -> Result<Root> { Ok(self.state_root.hash_tree_root()?) },
            &|| self.body_root(),
        ];
        hash::container_root_with(&fields)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedBeaconBlock {
    version: ForkVersion,
    pub message: BeaconBlock,
    pub signature: BlsSignature,
}

impl SignedBeaconBlock {
    /// Sign `message` under the proposer domain of `fork_data`.
    pub fn new(message: BeaconBlock, fork_data: &ForkData, signer: &dyn BlsSigner) -> Result<Self> {
        let signing_root = message.signing_root(fork_data)?;
        let signature = signer.sign(&signing_root)?;
        Ok(Self {
            version: message.version(),
            message,
            signature,
        })
    }

    /// Attach an existing signature without checking it.
    pub fn from_parts(message: BeaconBlock, signature: BlsSignature) -> Self {
        Self {
            version: message.version(),
            message,
            signature,
        }
    }

    pub fn verify_signature(
        &self,
        fork_data: &ForkData,
        verifier: &dyn BlsVerifier,
        pubkey: &BlsPubkey,
    ) -> Result<bool> {
        let signing_root = self.message.signing_root(fork_data)?;
        Ok(verifier.verify(pubkey, &signing_root, &self.signature))
    }

    /// The signature covers the block root, which equals the header root,
    /// so it carries over unchanged.
    pub fn signed_header(&self) -> Result<SignedBeaconBlockHeader> {
        Ok(SignedBeaconBlockHeader {
            header: self.message.to_header()?,
            signature: self.signature,
        })
    }
}

impl VersionedSsz for SignedBeaconBlock {
    const TYPE_NAME: &'static str = "SignedBeaconBlock";

    fn version(&self) -> ForkVersion {
        self.version
    }

    fn ssz_size(&self) -> usize {
        SIGNED_BEACON_BLOCK_FIXED_SIZE + self.message.ssz_size()
    }

    fn ssz_write(&self, out: &mut Vec<u8>) -> Result<()> {
        ensure_same("message", self.version, self.message.version())?;
        let mut enc = ContainerEncoder::new(out, SIGNED_BEACON_BLOCK_FIXED_SIZE);
        enc.append_dynamic(|buf| self.message.ssz_write(buf))?;
        enc.append_static(&self.signature)?;
        enc.finish()?;
        Ok(())
    }

    fn ssz_read_versioned(bytes: &[u8], version: ForkVersion) -> Result<Self> {
        ensure_supported(Self::TYPE_NAME, version, ForkVersion::Deneb)?;
        let mut dec = ContainerDecoder::new(bytes, SIGNED_BEACON_BLOCK_FIXED_SIZE)?;
        dec.read_offset()?;
        let signature = dec.read_static()?;
        let mut fields = dec.finish()?;
        let message = BeaconBlock::ssz_read_versioned(fields.next_field()?, version)?;
        Ok(Self {
            version,
            message,
            signature,
        })
    }

    fn hash_tree_root(&self) -> Result<Root> {
        ensure_same("message", self.version, self.message.version())?;
        Ok(hash::container_root(&[
            self.message.hash_tree_root()?,
            self.signature.hash_tree_root()?,
        ])?)
    }
}
