use primitive_types::U256;

use crate::error::{Result, SszError};

/// Canonical SSZ decoder. `ssz_read` consumes the whole slice; the parent
/// container is responsible for slicing out exactly this value's bytes.
pub trait Decode: Sized {
    fn ssz_read(input: &[u8]) -> Result<Self>;
}

/// Copy exactly `N` bytes out of `input`, rejecting any other width.
#[inline]
pub fn read_fixed<const N: usize>(input: &[u8]) -> Result<[u8; N]> {
    if input.len() != N {
        return Err(SszError::InvalidFixedLength {
            have: input.len(),
            expected: N,
        });
    }
    let mut buf = [0u8; N];
    buf.copy_from_slice(input);
    Ok(buf)
}

/// Read a little-endian u32 offset at `pos`.
#[inline]
pub fn read_offset_at(input: &[u8], pos: usize) -> Result<usize> {
    let end = pos
        .checked_add(4)
        .ok_or(SszError::OffsetOverflow(pos))?;
    let raw = input.get(pos..end).ok_or(SszError::InsufficientBytes {
        need: end,
        have: input.len(),
    })?;
    let mut b = [0u8; 4];
    b.copy_from_slice(raw);
    Ok(u32::from_le_bytes(b) as usize)
}

/* -------- Scalars -------- */

macro_rules! impl_uint_decode {
    ($($t:ty),*) => {$(
        impl Decode for $t {
            #[inline]
            fn ssz_read(input: &[u8]) -> Result<Self> {
                Ok(<$t>::from_le_bytes(read_fixed(input)?))
            }
        }
    )*};
}

impl_uint_decode!(u8, u16, u32, u64);

impl Decode for bool {
    #[inline]
    fn ssz_read(input: &[u8]) -> Result<Self> {
        match read_fixed::<1>(input)?[0] {
            0 => Ok(false),
            1 => Ok(true),
            b => Err(SszError::InvalidBool(b)),
        }
    }
}

impl Decode for U256 {
    fn ssz_read(input: &[u8]) -> Result<Self> {
        let buf = read_fixed::<32>(input)?;
        Ok(U256::from_little_endian(&buf))
    }
}

impl<const N: usize> Decode for [u8; N] {
    #[inline]
    fn ssz_read(input: &[u8]) -> Result<Self> {
        read_fixed(input)
    }
}
