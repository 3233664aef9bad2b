use beacon_ssz::{impl_static_container, HashTreeRoot};

use crate::constants::DOMAIN_DEPOSIT;
use crate::error::Result;
use crate::fork::{compute_domain, compute_signing_root};
use crate::primitives::{BlsPubkey, BlsSignature, Domain, Gwei, Root, Version};
use crate::signing::{BlsSigner, BlsVerifier};
use crate::validator::WithdrawalCredentials;

/// A deposit as queued for inclusion in a block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Deposit {
    pub pubkey: BlsPubkey,
    pub credentials: WithdrawalCredentials,
    pub amount: Gwei,
    pub signature: BlsSignature,
    pub index: u64,
}

impl_static_container!(Deposit {
    pubkey: BlsPubkey,
    credentials: WithdrawalCredentials,
    amount: Gwei,
    signature: BlsSignature,
    index: u64,
});

impl Deposit {
    pub fn message(&self) -> DepositMessage {
        DepositMessage {
            pubkey: self.pubkey,
            credentials: self.credentials,
            amount: self.amount,
        }
    }
}

/// The signed part of a deposit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DepositMessage {
    pub pubkey: BlsPubkey,
    pub credentials: WithdrawalCredentials,
    pub amount: Gwei,
}

impl_static_container!(DepositMessage {
    pubkey: BlsPubkey,
    credentials: WithdrawalCredentials,
    amount: Gwei,
});

/// Deposits are signed against the genesis fork with an empty validators root,
/// so they stay valid across forks.
fn deposit_domain(genesis_fork_version: Version) -> Result<Domain> {
    compute_domain(DOMAIN_DEPOSIT, genesis_fork_version, Root::default())
}

impl DepositMessage {
    pub fn signing_root(&self, genesis_fork_version: Version) -> Result<Root> {
        let domain = deposit_domain(genesis_fork_version)?;
        compute_signing_root(self.hash_tree_root()?, domain)
    }

    /// Build and sign a message with `signer`'s key.
    pub fn create_signed(
        signer: &dyn BlsSigner,
        credentials: WithdrawalCredentials,
        amount: Gwei,
        genesis_fork_version: Version,
    ) -> Result<(Self, BlsSignature)> {
        let msg = Self {
            pubkey: signer.public_key(),
            credentials,
            amount,
        };
        let signature = signer.sign(&msg.signing_root(genesis_fork_version)?)?;
        Ok((msg, signature))
    }

    pub fn verify(
        &self,
        signature: &BlsSignature,
        genesis_fork_version: Version,
        verifier: &dyn BlsVerifier,
    ) -> Result<bool> {
        let root = self.signing_root(genesis_fork_version)?;
        Ok(verifier.verify(&self.pubkey, &root, signature))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEPOSIT_MESSAGE_SIZE, DEPOSIT_SIZE};
    use crate::test_utils::{MockBls, TEST_SIGNER};
    use beacon_ssz::{Decode, Encode};

    #[test]
    fn sizes_and_roundtrip() {
        let d = Deposit {
            pubkey: BlsPubkey::repeat_byte(1),
            credentials: [2u8; 32],
            amount: 32_000_000_000,
            signature: BlsSignature::repeat_byte(3),
            index: 9,
        };
        let bytes = d.ssz_bytes().unwrap();
        assert_eq!(bytes.len(), DEPOSIT_SIZE);
        assert_eq!(&bytes[184..], &9u64.to_le_bytes());
        assert_eq!(Deposit::ssz_read(&bytes).unwrap(), d);

        let m = d.message().ssz_bytes().unwrap();
        assert_eq!(m.len(), DEPOSIT_MESSAGE_SIZE);
        assert_eq!(&m[..], &bytes[..DEPOSIT_MESSAGE_SIZE]);
    }

    #[test]
    fn signed_message_verifies_only_under_its_fork() {
        let (msg, sig) =
            DepositMessage::create_signed(&TEST_SIGNER, [7u8; 32], 1_000_000_000, [0, 0, 0, 0]).unwrap();
        assert_eq!(msg.pubkey, TEST_SIGNER.public_key());
        assert!(msg.verify(&sig, [0, 0, 0, 0], &MockBls).unwrap());
        assert!(!msg.verify(&sig, [4, 0, 0, 0], &MockBls).unwrap());

        let mut other = msg;
        other.amount += 1;
        assert!(!other.verify(&sig, [0, 0, 0, 0], &MockBls).unwrap());
    }
}
