//! Hash tree roots for scalars, byte vectors, lists and containers.

use primitive_types::U256;

use crate::encode::BasicSsz;
use crate::error::{Result, SszError};
use crate::merkle::{chunkify, merkleize, mix_in_length, pad_to_chunk, Root, BYTES_PER_CHUNK};

/// Merkle root of a value's structure. Never looks at encoded bytes.
pub trait HashTreeRoot {
    fn hash_tree_root(&self) -> Result<Root>;
}

/// A deferred field-root computation, shareable across worker threads.
pub type FieldHasher<'a, E = SszError> = &'a (dyn Fn() -> core::result::Result<Root, E> + Sync + 'a);

/* -------- Scalars -------- */

macro_rules! impl_uint_root {
    ($($t:ty),*) => {$(
        impl HashTreeRoot for $t {
            #[inline]
            fn hash_tree_root(&self) -> Result<Root> {
                Ok(pad_to_chunk(&self.to_le_bytes()))
            }
        }
    )*};
}

impl_uint_root!(u8, u16, u32, u64);

impl HashTreeRoot for bool {
    #[inline]
    fn hash_tree_root(&self) -> Result<Root> {
        Ok(pad_to_chunk(&[u8::from(*self)]))
    }
}

impl HashTreeRoot for U256 {
    fn hash_tree_root(&self) -> Result<Root> {
        let mut buf = [0u8; 32];
        self.to_little_endian(&mut buf);
        Ok(buf)
    }
}

/// Byte vectors up to one chunk are a single padded leaf; longer ones are
/// chunked and merkleized without a length mixin.
impl<const N: usize> HashTreeRoot for [u8; N] {
    fn hash_tree_root(&self) -> Result<Root> {
        if N <= BYTES_PER_CHUNK {
            Ok(pad_to_chunk(self))
        } else {
            merkleize(&chunkify(self), None)
        }
    }
}

/* -------- Sequences -------- */

#[inline]
fn check_len(len: usize, max: u64) -> Result<()> {
    if len as u64 > max {
        return Err(SszError::ListTooLong { have: len, max });
    }
    Ok(())
}

/// Chunk count limit for a list of `max` basic elements of `elem_size` bytes.
#[inline]
pub fn basic_chunk_limit(max: u64, elem_size: usize) -> u64 {
    max.saturating_mul(elem_size as u64)
        .saturating_add(BYTES_PER_CHUNK as u64 - 1)
        / BYTES_PER_CHUNK as u64
}

/// Pack basic values into chunks.
pub fn pack<T: BasicSsz>(items: &[T]) -> Result<Vec<Root>> {
    let mut bytes = Vec::with_capacity(items.len() * T::SSZ_SIZE);
    for item in items {
        item.ssz_write(&mut bytes)?;
    }
    Ok(chunkify(&bytes))
}

/// Root of a list of composite elements (containers, byte vectors).
pub fn list_root<T: HashTreeRoot>(items: &[T], max: u64) -> Result<Root> {
    check_len(items.len(), max)?;
    let leaves = items
        .iter()
        .map(HashTreeRoot::hash_tree_root)
        .collect::<Result<Vec<_>>>()?;
    let root = merkleize(&leaves, Some(max))?;
    Ok(mix_in_length(&root, items.len() as u64))
}

/// Root of a list of basic elements, packed into chunks.
pub fn basic_list_root<T: BasicSsz>(items: &[T], max: u64) -> Result<Root> {
    check_len(items.len(), max)?;
    let chunks = pack(items)?;
    let root = merkleize(&chunks, Some(basic_chunk_limit(max, T::SSZ_SIZE)))?;
    Ok(mix_in_length(&root, items.len() as u64))
}

/// Root of a byte list with at most `max_len` bytes; mixes in the byte length.
pub fn byte_list_root(bytes: &[u8], max_len: u64) -> Result<Root> {
    check_len(bytes.len(), max_len)?;
    let root = merkleize(&chunkify(bytes), Some(basic_chunk_limit(max_len, 1)))?;
    Ok(mix_in_length(&root, bytes.len() as u64))
}

/// Root of a fixed-length sequence of composite elements; no mixin.
pub fn vector_root<T: HashTreeRoot>(items: &[T]) -> Result<Root> {
    let leaves = items
        .iter()
        .map(HashTreeRoot::hash_tree_root)
        .collect::<Result<Vec<_>>>()?;
    merkleize(&leaves, None)
}

/* -------- Containers -------- */

/// Root of a container from its field roots, in declaration order.
#[inline]
pub fn container_root(field_roots: &[Root]) -> Result<Root> {
    crate::metrics::root_computed();
    merkleize(field_roots, None)
}

/// Evaluate every field hasher, in order.
///
/// With the `parallel` feature and the runtime hashing config allowing it,
/// the fields are hashed on the rayon pool; otherwise they run in order.
/// Both paths return the same roots.
pub fn field_roots_with<E>(fields: &[FieldHasher<'_, E>]) -> core::result::Result<Vec<Root>, E>
where
    E: Send,
{
    #[cfg(feature = "parallel")]
    {
        let cfg = crate::config::hashing();
        if cfg.parallel && fields.len() >= cfg.min_parallel_fields {
            use rayon::prelude::*;
            return fields.par_iter().map(|f| f()).collect();
        }
    }
    fields.iter().map(|f| f()).collect()
}

/// Root of a container whose field roots are computed by `fields`.
pub fn container_root_with<E>(fields: &[FieldHasher<'_, E>]) -> core::result::Result<Root, E>
where
    E: From<SszError> + Send,
{
    let leaves = field_roots_with(fields)?;
    Ok(container_root(&leaves)?)
}

/// Reference path for `container_root_with`.
pub fn container_root_sequential<E>(fields: &[FieldHasher<'_, E>]) -> core::result::Result<Root, E>
where
    E: From<SszError>,
{
    let leaves = fields
        .iter()
        .map(|f| f())
        .collect::<core::result::Result<Vec<_>, E>>()?;
    Ok(container_root(&leaves)?)
}

/// Root of a list whose element roots are already known.
pub fn list_root_from_leaves(leaves: &[Root], max: u64) -> Result<Root> {
    check_len(leaves.len(), max)?;
    let root = merkleize(leaves, Some(max))?;
    Ok(mix_in_length(&root, leaves.len() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merkle::{hash_pair, zero_hash};

    #[test]
    fn scalar_roots_are_padded_le() {
        let r = 0x0102u64.hash_tree_root().unwrap();
        assert_eq!(&r[..2], &[0x02, 0x01]);
        assert!(r[2..].iter().all(|b| *b == 0));
        assert_eq!(true.hash_tree_root().unwrap()[0], 1);
    }

    #[test]
    fn long_byte_vector_is_merkleized() {
        let sig = [0u8; 96];
        // Three zero chunks pad to four.
        assert_eq!(sig.hash_tree_root().unwrap(), zero_hash(2));
        let addr = [0xAB; 20];
        let r = addr.hash_tree_root().unwrap();
        assert_eq!(&r[..20], &[0xAB; 20]);
        assert_eq!(&r[20..], &[0u8; 12]);
    }

    #[test]
    fn empty_lists_mix_zero_length() {
        let expect = mix_in_length(&zero_hash(4), 0);
        assert_eq!(list_root::<u64>(&[], 16).unwrap(), expect);
        // 16 u64s pack into 4 chunks.
        let expect_basic = mix_in_length(&zero_hash(2), 0);
        assert_eq!(basic_list_root::<u64>(&[], 16).unwrap(), expect_basic);
        assert_eq!(
            byte_list_root(&[], 32).unwrap(),
            mix_in_length(&[0u8; 32], 0)
        );
    }

    #[test]
    fn basic_list_packs_values() {
        let root = basic_list_root(&[1u64, 2, 3, 4, 5], 1 << 40).unwrap();
        let mut c0 = [0u8; 32];
        let mut c1 = [0u8; 32];
        for (i, v) in [1u64, 2, 3, 4].iter().enumerate() {
            c0[i * 8..i * 8 + 8].copy_from_slice(&v.to_le_bytes());
        }
        c1[..8].copy_from_slice(&5u64.to_le_bytes());
        let mut data = hash_pair(&c0, &c1);
        for d in 1..38 {
            data = hash_pair(&data, &zero_hash(d));
        }
        assert_eq!(root, mix_in_length(&data, 5));
    }

    #[test]
    fn lists_reject_oversize() {
        assert!(matches!(
            list_root(&[1u64, 2, 3], 2),
            Err(SszError::ListTooLong { have: 3, max: 2 })
        ));
        assert!(byte_list_root(&[0u8; 33], 32).is_err());
    }

    #[test]
    fn concurrent_and_sequential_agree() {
        let values: Vec<u64> = (0..20).collect();
        let hashers: Vec<Box<dyn Fn() -> Result<Root> + Sync + '_>> = values
            .iter()
            .map(|v| Box::new(move || v.hash_tree_root()) as Box<dyn Fn() -> Result<Root> + Sync + '_>)
            .collect();
        let refs: Vec<FieldHasher<'_>> = hashers.iter().map(|b| b.as_ref()).collect();
        let a = container_root_with(&refs).unwrap();
        let b = container_root_sequential(&refs).unwrap();
        assert_eq!(a, b);
        let leaves: Vec<Root> = values.iter().map(|v| v.hash_tree_root().unwrap()).collect();
        assert_eq!(a, merkleize(&leaves, None).unwrap());
    }
}
