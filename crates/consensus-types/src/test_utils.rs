//! Deterministic stand-ins for the BLS collaborators.

use beacon_ssz::merkle::sha256;

use crate::error::Result;
use crate::primitives::{BlsPubkey, BlsSignature};
use crate::signing::{BlsSigner, BlsVerifier};

pub struct MockSigner {
    pub key: BlsPubkey,
}

pub const TEST_SIGNER: MockSigner = MockSigner {
    key: BlsPubkey::repeat_byte(0x42),
};

/// `sha256(pubkey || message)` repeated to 96 bytes.
pub fn mock_signature(pubkey: &BlsPubkey, message: &[u8]) -> BlsSignature {
    let mut preimage = pubkey.as_bytes().to_vec();
    preimage.extend_from_slice(message);
    let digest = sha256(&preimage);
    let mut sig = [0u8; 96];
    for chunk in sig.chunks_exact_mut(32) {
        chunk.copy_from_slice(&digest);
    }
    BlsSignature::new(sig)
}

impl BlsSigner for MockSigner {
    fn public_key(&self) -> BlsPubkey {
        self.key
    }

    fn sign(&self, message: &[u8]) -> Result<BlsSignature> {
        Ok(mock_signature(&self.key, message))
    }
}

pub struct MockBls;

impl BlsVerifier for MockBls {
    fn verify(&self, pubkey: &BlsPubkey, message: &[u8], signature: &BlsSignature) -> bool {
        mock_signature(pubkey, message) == *signature
    }
}
