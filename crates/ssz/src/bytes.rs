use std::fmt;

use crate::decode::{read_fixed, Decode};
use crate::encode::{Encode, StaticSsz};
use crate::error::Result;
use crate::hash::HashTreeRoot;
use crate::merkle::Root;

/// Fixed-width byte string for widths the standard library gives no
/// `Default` for (public keys, signatures, blooms).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedBytes<const N: usize>(pub [u8; N]);

impl<const N: usize> FixedBytes<N> {
    pub const ZERO: Self = Self([0u8; N]);

    #[inline]
    pub const fn new(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    /// Repeat one byte across the whole width.
    #[inline]
    pub const fn repeat_byte(b: u8) -> Self {
        Self([b; N])
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl<const N: usize> Default for FixedBytes<N> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const N: usize> From<[u8; N]> for FixedBytes<N> {
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes)
    }
}

impl<const N: usize> AsRef<[u8]> for FixedBytes<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<const N: usize> fmt::Debug for FixedBytes<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl<const N: usize> fmt::Display for FixedBytes<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl<const N: usize> Encode for FixedBytes<N> {
    #[inline]
    fn ssz_size(&self) -> usize {
        N
    }
    #[inline]
    fn ssz_write(&self, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(&self.0);
        Ok(())
    }
}

impl<const N: usize> Decode for FixedBytes<N> {
    #[inline]
    fn ssz_read(input: &[u8]) -> Result<Self> {
        read_fixed(input).map(Self)
    }
}

impl<const N: usize> StaticSsz for FixedBytes<N> {
    const SSZ_SIZE: usize = N;
}

impl<const N: usize> HashTreeRoot for FixedBytes<N> {
    #[inline]
    fn hash_tree_root(&self) -> Result<Root> {
        self.0.hash_tree_root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_is_hex() {
        let b = FixedBytes::<4>::new([0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(format!("{b:?}"), "0xdeadbeef");
        assert!(FixedBytes::<96>::default().is_zero());
        assert!(!FixedBytes::<48>::repeat_byte(1).is_zero());
    }
}
