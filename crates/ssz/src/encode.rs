use primitive_types::U256;

use crate::decode::Decode;
use crate::error::Result;

/// Width of one offset slot in a container's fixed region.
pub const BYTES_PER_LENGTH_OFFSET: usize = 4;

/// Canonical SSZ encoder.
///
/// `ssz_size` must equal the number of bytes `ssz_write` appends; containers
/// rely on it to lay out offsets before any variable content is written.
pub trait Encode {
    fn ssz_size(&self) -> usize;

    fn ssz_write(&self, out: &mut Vec<u8>) -> Result<()>;

    fn ssz_bytes(&self) -> Result<Vec<u8>> {
        let size = self.ssz_size();
        let mut v = Vec::with_capacity(size);
        self.ssz_write(&mut v)?;
        debug_assert_eq!(v.len(), size, "ssz_size disagrees with ssz_write");
        Ok(v)
    }
}

/// Types whose encoding has the same width for every value.
pub trait StaticSsz: Encode + Decode {
    const SSZ_SIZE: usize;
}

/// Basic values (unsigned integers and booleans) that pack tightly into chunks.
pub trait BasicSsz: StaticSsz {}

/* -------- Scalars -------- */

macro_rules! impl_uint_encode {
    ($($t:ty),*) => {$(
        impl Encode for $t {
            #[inline]
            fn ssz_size(&self) -> usize {
                core::mem::size_of::<$t>()
            }
            #[inline]
            fn ssz_write(&self, out: &mut Vec<u8>) -> Result<()> {
                out.extend_from_slice(&self.to_le_bytes());
                Ok(())
            }
        }
        impl StaticSsz for $t {
            const SSZ_SIZE: usize = core::mem::size_of::<$t>();
        }
        impl BasicSsz for $t {}
    )*};
}

impl_uint_encode!(u8, u16, u32, u64);

impl Encode for bool {
    #[inline]
    fn ssz_size(&self) -> usize {
        1
    }
    #[inline]
    fn ssz_write(&self, out: &mut Vec<u8>) -> Result<()> {
        out.push(u8::from(*self));
        Ok(())
    }
}
impl StaticSsz for bool {
    const SSZ_SIZE: usize = 1;
}
impl BasicSsz for bool {}

/// uint256, little-endian.
impl Encode for U256 {
    #[inline]
    fn ssz_size(&self) -> usize {
        32
    }
    fn ssz_write(&self, out: &mut Vec<u8>) -> Result<()> {
        let mut buf = [0u8; 32];
        self.to_little_endian(&mut buf);
        out.extend_from_slice(&buf);
        Ok(())
    }
}
impl StaticSsz for U256 {
    const SSZ_SIZE: usize = 32;
}
impl BasicSsz for U256 {}

/* -------- Fixed byte vectors -------- */

impl<const N: usize> Encode for [u8; N] {
    #[inline]
    fn ssz_size(&self) -> usize {
        N
    }
    #[inline]
    fn ssz_write(&self, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(self);
        Ok(())
    }
}
impl<const N: usize> StaticSsz for [u8; N] {
    const SSZ_SIZE: usize = N;
}
