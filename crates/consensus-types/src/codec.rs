use beacon_ssz::Root;

use crate::error::{decode_rejected, encode_rejected, Result};
use crate::version::ForkVersion;

/// SSZ for fork-versioned objects.
///
/// The version is stored on the value when it is built and must be passed
/// explicitly when decoding; it is never inferred from the bytes. Size,
/// encode and root all branch on `self.version()`.
pub trait VersionedSsz: Sized {
    const TYPE_NAME: &'static str;

    fn version(&self) -> ForkVersion;

    fn ssz_size(&self) -> usize;

    fn ssz_write(&self, out: &mut Vec<u8>) -> Result<()>;

    /// Decode exactly `bytes` under `version`, including post-decode checks.
    fn ssz_read_versioned(bytes: &[u8], version: ForkVersion) -> Result<Self>;

    fn hash_tree_root(&self) -> Result<Root>;

    fn ssz_bytes(&self) -> Result<Vec<u8>> {
        let size = self.ssz_size();
        let mut out = Vec::with_capacity(size);
        self.ssz_write(&mut out)
            .map_err(|e| encode_rejected(Self::TYPE_NAME, e))?;
        debug_assert_eq!(out.len(), size, "{} size pass disagrees", Self::TYPE_NAME);
        Ok(out)
    }

    /// Entry point for untrusted input: decode and record any rejection.
    fn from_ssz_bytes(bytes: &[u8], version: ForkVersion) -> Result<Self> {
        Self::ssz_read_versioned(bytes, version).map_err(|e| decode_rejected(Self::TYPE_NAME, e))
    }
}
