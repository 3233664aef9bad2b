//! Offset-table layout shared by every container.
//!
//! ```text
//! [static fields][u32 offset per dynamic field][dynamic contents]
//! ```
//!
//! Offsets are absolute positions from the start of the container.

use crate::decode::read_offset_at;
use crate::encode::{Encode, StaticSsz, BYTES_PER_LENGTH_OFFSET};
use crate::error::{Result, SszError};

/// Writes one container into `out`, collecting dynamic contents on the side
/// until `finish` appends them after the fixed region.
pub struct ContainerEncoder<'a> {
    out: &'a mut Vec<u8>,
    start: usize,
    fixed_len: usize,
    variable: Vec<u8>,
}

impl<'a> ContainerEncoder<'a> {
    /// `fixed_len` is the fixed region width: static field sizes plus one
    /// offset slot per dynamic field.
    pub fn new(out: &'a mut Vec<u8>, fixed_len: usize) -> Self {
        let start = out.len();
        Self {
            out,
            start,
            fixed_len,
            variable: Vec::new(),
        }
    }

    #[inline]
    pub fn append_static<T: StaticSsz>(&mut self, value: &T) -> Result<()> {
        value.ssz_write(self.out)
    }

    /// Reserve an offset slot and let `write` produce the field's contents.
    ///
    /// Generic over the error type so nested objects with richer errors can
    /// write themselves directly.
    pub fn append_dynamic<F, E>(&mut self, write: F) -> core::result::Result<(), E>
    where
        F: FnOnce(&mut Vec<u8>) -> core::result::Result<(), E>,
        E: From<SszError>,
    {
        let offset = self.fixed_len + self.variable.len();
        let slot = u32::try_from(offset).map_err(|_| SszError::OffsetOverflow(offset))?;
        self.out.extend_from_slice(&slot.to_le_bytes());
        write(&mut self.variable)
    }

    #[inline]
    pub fn append_dynamic_value<T: Encode + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.append_dynamic(|buf| value.ssz_write(buf))
    }

    pub fn finish(self) -> Result<()> {
        let written = self.out.len() - self.start;
        if written != self.fixed_len {
            return Err(SszError::FixedRegionMismatch {
                have: written,
                expected: self.fixed_len,
            });
        }
        self.out.extend_from_slice(&self.variable);
        Ok(())
    }
}

/// Reads one container's fixed region, validating each offset as it is
/// seen, then hands out the dynamic field slices in order.
pub struct ContainerDecoder<'a> {
    bytes: &'a [u8],
    fixed_len: usize,
    cursor: usize,
    offsets: Vec<usize>,
}

impl<'a> ContainerDecoder<'a> {
    pub fn new(bytes: &'a [u8], fixed_len: usize) -> Result<Self> {
        if bytes.len() < fixed_len {
            return Err(SszError::InsufficientBytes {
                need: fixed_len,
                have: bytes.len(),
            });
        }
        Ok(Self {
            bytes,
            fixed_len,
            cursor: 0,
            offsets: Vec::new(),
        })
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self.cursor + len;
        if end > self.fixed_len {
            return Err(SszError::FixedRegionMismatch {
                have: end,
                expected: self.fixed_len,
            });
        }
        let s = &self.bytes[self.cursor..end];
        self.cursor = end;
        Ok(s)
    }

    #[inline]
    pub fn read_static<T: StaticSsz>(&mut self) -> Result<T> {
        T::ssz_read(self.take(T::SSZ_SIZE)?)
    }

    /// Raw static bytes, for fields the caller decodes itself.
    #[inline]
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.take(len)
    }

    /// Read the next offset slot. Offsets must start exactly at the end of
    /// the fixed region, never decrease, and stay within the buffer.
    pub fn read_offset(&mut self) -> Result<()> {
        let pos = self.cursor;
        self.take(BYTES_PER_LENGTH_OFFSET)?;
        let offset = read_offset_at(self.bytes, pos)?;
        match self.offsets.last() {
            None if offset != self.fixed_len => {
                return Err(SszError::InvalidVariableOffset {
                    offset,
                    expected: self.fixed_len,
                })
            }
            None => {}
            Some(&prev) => {
                if offset > self.bytes.len() {
                    return Err(SszError::OffsetBeyondCapacity {
                        offset,
                        capacity: self.bytes.len(),
                    });
                }
                if offset < prev {
                    return Err(SszError::BadOffsetProgression { prev, next: offset });
                }
            }
        }
        self.offsets.push(offset);
        Ok(())
    }

    /// Close the fixed region. A container without dynamic fields must be
    /// exactly its fixed width.
    pub fn finish(self) -> Result<DynamicFields<'a>> {
        if self.cursor != self.fixed_len {
            return Err(SszError::FixedRegionMismatch {
                have: self.cursor,
                expected: self.fixed_len,
            });
        }
        if self.offsets.is_empty() && self.bytes.len() != self.fixed_len {
            return Err(SszError::InvalidFixedLength {
                have: self.bytes.len(),
                expected: self.fixed_len,
            });
        }
        Ok(DynamicFields {
            bytes: self.bytes,
            offsets: self.offsets,
            next: 0,
        })
    }
}

/// Dynamic field slices: field `i` spans `[offset_i, offset_{i+1})`, the last
/// one runs to the end of the buffer.
pub struct DynamicFields<'a> {
    bytes: &'a [u8],
    offsets: Vec<usize>,
    next: usize,
}

impl<'a> DynamicFields<'a> {
    pub fn next_field(&mut self) -> Result<&'a [u8]> {
        let i = self.next;
        let start = *self
            .offsets
            .get(i)
            .ok_or(SszError::MissingDynamicField(i))?;
        let end = self.offsets.get(i + 1).copied().unwrap_or(self.bytes.len());
        self.next += 1;
        Ok(&self.bytes[start..end])
    }

    pub fn remaining(&self) -> usize {
        self.offsets.len() - self.next
    }
}
