//! Bounded sequences.
//!
//! Every list carries an explicit maximum; encode and decode both reject a
//! sequence longer than that maximum.

use crate::decode::read_offset_at;
use crate::encode::{StaticSsz, BYTES_PER_LENGTH_OFFSET};
use crate::error::{Result, SszError};

#[inline]
pub fn check_len(len: usize, max: u64) -> Result<()> {
    if len as u64 > max {
        return Err(SszError::ListTooLong { have: len, max });
    }
    Ok(())
}

/* -------- Static elements -------- */

#[inline]
pub fn static_list_size<T: StaticSsz>(items: &[T]) -> usize {
    items.len() * T::SSZ_SIZE
}

pub fn write_static_list<T: StaticSsz>(items: &[T], max: u64, out: &mut Vec<u8>) -> Result<()> {
    check_len(items.len(), max)?;
    out.reserve(static_list_size(items));
    for item in items {
        item.ssz_write(out)?;
    }
    Ok(())
}

pub fn read_static_list<T: StaticSsz>(bytes: &[u8], max: u64) -> Result<Vec<T>> {
    let elem = T::SSZ_SIZE;
    if bytes.len() % elem != 0 {
        return Err(SszError::NotMultipleOfElementSize {
            have: bytes.len(),
            elem,
        });
    }
    check_len(bytes.len() / elem, max)?;
    bytes.chunks_exact(elem).map(T::ssz_read).collect()
}

/* -------- Byte lists -------- */

pub fn write_byte_list(bytes: &[u8], max: u64, out: &mut Vec<u8>) -> Result<()> {
    check_len(bytes.len(), max)?;
    out.extend_from_slice(bytes);
    Ok(())
}

pub fn read_byte_list(bytes: &[u8], max: u64) -> Result<Vec<u8>> {
    check_len(bytes.len(), max)?;
    Ok(bytes.to_vec())
}

/* -------- Variable-size elements -------- */

/// Encoded width of a list of variable-size elements: one offset per element
/// plus every element's contents.
pub fn dynamic_list_size<T, F>(items: &[T], size_of: F) -> usize
where
    F: Fn(&T) -> usize,
{
    items
        .iter()
        .map(|item| BYTES_PER_LENGTH_OFFSET + size_of(item))
        .sum()
}

/// Offsets are relative to the start of the list's own region.
pub fn write_dynamic_list<T, F>(items: &[T], max: u64, out: &mut Vec<u8>, write: F) -> Result<()>
where
    F: Fn(&T, &mut Vec<u8>) -> Result<()>,
{
    check_len(items.len(), max)?;
    let start = out.len();
    out.resize(start + items.len() * BYTES_PER_LENGTH_OFFSET, 0);
    for (i, item) in items.iter().enumerate() {
        let offset = out.len() - start;
        let slot = u32::try_from(offset).map_err(|_| SszError::OffsetOverflow(offset))?;
        let at = start + i * BYTES_PER_LENGTH_OFFSET;
        out[at..at + BYTES_PER_LENGTH_OFFSET].copy_from_slice(&slot.to_le_bytes());
        write(item, out)?;
    }
    Ok(())
}

/// The element count is the first offset divided by four; every offset must
/// stay inside the region and never decrease.
pub fn read_dynamic_list<T, F>(bytes: &[u8], max: u64, read: F) -> Result<Vec<T>>
where
    F: Fn(&[u8]) -> Result<T>,
{
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    let first = read_offset_at(bytes, 0)?;
    if first == 0 || first % BYTES_PER_LENGTH_OFFSET != 0 {
        return Err(SszError::InvalidVariableOffset {
            offset: first,
            expected: (first / BYTES_PER_LENGTH_OFFSET).max(1) * BYTES_PER_LENGTH_OFFSET,
        });
    }
    if first > bytes.len() {
        return Err(SszError::OffsetBeyondCapacity {
            offset: first,
            capacity: bytes.len(),
        });
    }
    let count = first / BYTES_PER_LENGTH_OFFSET;
    check_len(count, max)?;

    let mut offsets = Vec::with_capacity(count);
    offsets.push(first);
    for i in 1..count {
        let off = read_offset_at(bytes, i * BYTES_PER_LENGTH_OFFSET)?;
        if off > bytes.len() {
            return Err(SszError::OffsetBeyondCapacity {
                offset: off,
                capacity: bytes.len(),
            });
        }
        let prev = offsets[i - 1];
        if off < prev {
            return Err(SszError::BadOffsetProgression { prev, next: off });
        }
        offsets.push(off);
    }

    let mut out = Vec::with_capacity(count);
    for (i, &start) in offsets.iter().enumerate() {
        let end = offsets.get(i + 1).copied().unwrap_or(bytes.len());
        out.push(read(&bytes[start..end])?);
    }
    Ok(out)
}

/// List of byte lists (e.g. raw transactions).
pub fn byte_lists_size(items: &[Vec<u8>]) -> usize {
    dynamic_list_size(items, Vec::len)
}

pub fn write_byte_lists(
    items: &[Vec<u8>],
    max_items: u64,
    max_item_len: u64,
    out: &mut Vec<u8>,
) -> Result<()> {
    write_dynamic_list(items, max_items, out, |item, buf| {
        write_byte_list(item, max_item_len, buf)
    })
}

pub fn read_byte_lists(bytes: &[u8], max_items: u64, max_item_len: u64) -> Result<Vec<Vec<u8>>> {
    read_dynamic_list(bytes, max_items, |b| read_byte_list(b, max_item_len))
}
