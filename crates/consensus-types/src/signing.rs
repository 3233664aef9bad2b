//! BLS collaborators. The codec only moves signature bytes; producing and
//! checking them happens behind these traits.

use crate::error::Result;
use crate::primitives::{BlsPubkey, BlsSignature};

pub trait BlsSigner {
    fn public_key(&self) -> BlsPubkey;

    fn sign(&self, message: &[u8]) -> Result<BlsSignature>;
}

pub trait BlsVerifier {
    fn verify(&self, pubkey: &BlsPubkey, message: &[u8], signature: &BlsSignature) -> bool;
}
