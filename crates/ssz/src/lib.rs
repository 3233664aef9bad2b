//! SSZ ("Simple Serialize") for beacon-chain data.
//!
//! * `encode` / `decode`: canonical per-type codecs with exact byte counts.
//! * `container`: fixed region, offset table, variable region.
//! * `list`: bounded sequences of static or variable-size elements.
//! * `unused`: reserved fields that must stay empty.
//! * `merkle` / `hash`: SHA-256 hash tree roots, length mixins, proofs.

pub mod bytes;
pub mod config;
pub mod container;
pub mod decode;
pub mod encode;
pub mod error;
pub mod hash;
pub mod list;
pub mod merkle;
pub mod unused;

#[cfg(feature = "metrics")]
pub mod metrics;

#[cfg(not(feature = "metrics"))]
pub mod metrics_shim;

// When the metrics feature is off, expose a unified `metrics` via the shim
#[cfg(not(feature = "metrics"))]
pub use self::metrics_shim as metrics;

pub use bytes::FixedBytes;
pub use container::{ContainerDecoder, ContainerEncoder, DynamicFields};
pub use decode::Decode;
pub use encode::{BasicSsz, Encode, StaticSsz, BYTES_PER_LENGTH_OFFSET};
pub use error::{join_errors, Result, SszError};
pub use hash::{FieldHasher, HashTreeRoot};
pub use merkle::{GeneralizedIndex, Root, BYTES_PER_CHUNK};
pub use unused::{enforce_all_unused, EnforceUnused, Unused};

/// Implement `Encode`, `Decode`, `StaticSsz` and `HashTreeRoot` for a
/// container whose fields are all static, in declaration order.
///
/// ```ignore
/// pub struct Eth1Data { pub deposit_root: Root, pub deposit_count: u64, pub block_hash: Root }
/// beacon_ssz::impl_static_container!(Eth1Data { deposit_root: Root, deposit_count: u64, block_hash: Root });
/// ```
#[macro_export]
macro_rules! impl_static_container {
    ($ty:ident { $($field:ident : $fty:ty),+ $(,)? }) => {
        impl $crate::Encode for $ty {
            #[inline]
            fn ssz_size(&self) -> usize {
                <Self as $crate::StaticSsz>::SSZ_SIZE
            }

            fn ssz_write(&self, out: &mut Vec<u8>) -> $crate::Result<()> {
                $( <$fty as $crate::Encode>::ssz_write(&self.$field, out)?; )+
                Ok(())
            }
        }

        impl $crate::Decode for $ty {
            fn ssz_read(input: &[u8]) -> $crate::Result<Self> {
                let mut dec = $crate::ContainerDecoder::new(
                    input,
                    <Self as $crate::StaticSsz>::SSZ_SIZE,
                )?;
                $( let $field = dec.read_static::<$fty>()?; )+
                dec.finish()?;
                Ok(Self { $($field),+ })
            }
        }

        impl $crate::StaticSsz for $ty {
            const SSZ_SIZE: usize = 0 $( + <$fty as $crate::StaticSsz>::SSZ_SIZE )+;
        }

        impl $crate::HashTreeRoot for $ty {
            fn hash_tree_root(&self) -> $crate::Result<$crate::Root> {
                $crate::hash::container_root(&[
                    $( <$fty as $crate::HashTreeRoot>::hash_tree_root(&self.$field)? ),+
                ])
            }
        }
    };
}
