use beacon_ssz::{impl_static_container, HashTreeRoot};

use crate::error::Result;
use crate::primitives::{Domain, DomainType, Epoch, Root, Version};

/// Fork schedule entry stored in the beacon state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Fork {
    pub previous_version: Version,
    pub current_version: Version,
    pub epoch: Epoch,
}

impl_static_container!(Fork {
    previous_version: Version,
    current_version: Version,
    epoch: Epoch,
});

impl Fork {
    pub fn new(previous_version: Version, current_version: Version, epoch: Epoch) -> Self {
        Self {
            previous_version,
            current_version,
            epoch,
        }
    }
}

/// Input to domain separation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ForkData {
    pub current_version: Version,
    pub genesis_validators_root: Root,
}

impl_static_container!(ForkData {
    current_version: Version,
    genesis_validators_root: Root,
});

impl ForkData {
    pub fn new(current_version: Version, genesis_validators_root: Root) -> Self {
        Self {
            current_version,
            genesis_validators_root,
        }
    }

    /// `domain_type || fork_data_root[..28]`
    pub fn compute_domain(&self, domain_type: DomainType) -> Result<Domain> {
        let root = self.hash_tree_root()?;
        let mut domain = [0u8; 32];
        domain[..4].copy_from_slice(&domain_type);
        domain[4..].copy_from_slice(&root[..28]);
        Ok(domain)
    }
}

/// What actually gets signed: an object root bound to a domain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SigningData {
    pub object_root: Root,
    pub domain: Domain,
}

impl_static_container!(SigningData {
    object_root: Root,
    domain: Domain,
});

pub fn compute_domain(
    domain_type: DomainType,
    fork_version: Version,
    genesis_validators_root: Root,
) -> Result<Domain> {
    ForkData::new(fork_version, genesis_validators_root).compute_domain(domain_type)
}

pub fn compute_signing_root(object_root: Root, domain: Domain) -> Result<Root> {
    Ok(SigningData {
        object_root,
        domain,
    }
    .hash_tree_root()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DOMAIN_DEPOSIT, FORK_SIZE};
    use beacon_ssz::merkle::hash_pair;
    use beacon_ssz::Encode;

    #[test]
    fn fork_is_sixteen_bytes() {
        let f = Fork::new([4, 0, 0, 0], [5, 0, 0, 0], 7);
        let bytes = f.ssz_bytes().unwrap();
        assert_eq!(bytes.len(), FORK_SIZE);
        assert_eq!(&bytes[..8], &[4, 0, 0, 0, 5, 0, 0, 0]);
    }

    #[test]
    fn domain_embeds_type_and_fork_root() {
        let version = [0u8; 4];
        let gvr = [0u8; 32];
        let domain = compute_domain(DOMAIN_DEPOSIT, version, gvr).unwrap();
        assert_eq!(&domain[..4], &DOMAIN_DEPOSIT);
        // Both leaves are zero chunks.
        let fork_root = hash_pair(&[0u8; 32], &[0u8; 32]);
        assert_eq!(&domain[4..], &fork_root[..28]);
    }

    #[test]
    fn signing_root_is_two_leaf_container() {
        let obj = [1u8; 32];
        let domain = [2u8; 32];
        assert_eq!(
            compute_signing_root(obj, domain).unwrap(),
            hash_pair(&obj, &domain)
        );
    }
}
