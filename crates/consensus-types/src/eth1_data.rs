use beacon_ssz::impl_static_container;

use crate::primitives::{ExecutionHash, Root};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Eth1Data {
    pub deposit_root: Root,
    pub deposit_count: u64,
    pub block_hash: ExecutionHash,
}

impl_static_container!(Eth1Data {
    deposit_root: Root,
    deposit_count: u64,
    block_hash: ExecutionHash,
});

impl Eth1Data {
    pub fn new(deposit_root: Root, deposit_count: u64, block_hash: ExecutionHash) -> Self {
        Self {
            deposit_root,
            deposit_count,
            block_hash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ETH1_DATA_SIZE;
    use beacon_ssz::merkle::zero_hash;
    use beacon_ssz::{Decode, Encode, HashTreeRoot, StaticSsz};

    #[test]
    fn empty_roundtrips_with_zero_root() {
        let e = Eth1Data::default();
        let bytes = e.ssz_bytes().unwrap();
        assert_eq!(bytes, vec![0u8; ETH1_DATA_SIZE]);
        assert_eq!(Eth1Data::ssz_read(&bytes).unwrap(), e);
        // Three zero leaves pad to a depth-2 zero tree.
        assert_eq!(e.hash_tree_root().unwrap(), zero_hash(2));
        assert_eq!(Eth1Data::SSZ_SIZE, ETH1_DATA_SIZE);
    }

    #[test]
    fn field_order_on_the_wire() {
        let e = Eth1Data::new([1u8; 32], 0x0203, [4u8; 32]);
        let bytes = e.ssz_bytes().unwrap();
        assert_eq!(&bytes[..32], &[1u8; 32]);
        assert_eq!(&bytes[32..40], &0x0203u64.to_le_bytes());
        assert_eq!(&bytes[40..], &[4u8; 32]);
        assert!(Eth1Data::ssz_read(&bytes[..71]).is_err());
    }
}
