//! Reserved fields.
//!
//! A slot in the wire format held for a feature this client does not
//! implement yet. The slot always encodes as zero (or as an empty list).
//! Decoding keeps whatever bytes are there; the owning container runs
//! `enforce_all_unused` afterwards so every violation is reported at once.

use crate::decode::{read_fixed, Decode};
use crate::encode::{Encode, StaticSsz};
use crate::error::{join_errors, Result, SszError};
use crate::hash::HashTreeRoot;
use crate::merkle::Root;

/// One reserved byte. Only zero is valid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Unused(u8);

impl Unused {
    pub const fn new() -> Self {
        Self(0)
    }

    /// Wrap an arbitrary byte. Anything but zero fails to encode.
    pub const fn from_raw(b: u8) -> Self {
        Self(b)
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Encode for Unused {
    #[inline]
    fn ssz_size(&self) -> usize {
        1
    }

    fn ssz_write(&self, out: &mut Vec<u8>) -> Result<()> {
        self.enforce_unused("unused")?;
        out.push(0);
        Ok(())
    }
}

impl Decode for Unused {
    fn ssz_read(input: &[u8]) -> Result<Self> {
        let [b] = read_fixed::<1>(input)?;
        Ok(Self(b))
    }
}

impl StaticSsz for Unused {
    const SSZ_SIZE: usize = 1;
}

impl HashTreeRoot for Unused {
    fn hash_tree_root(&self) -> Result<Root> {
        let mut r = [0u8; 32];
        r[0] = self.0;
        Ok(r)
    }
}

/// Values that can prove they carry nothing.
pub trait EnforceUnused {
    fn enforce_unused(&self, field: &'static str) -> Result<()>;
}

impl EnforceUnused for Unused {
    fn enforce_unused(&self, field: &'static str) -> Result<()> {
        if self.is_zero() {
            Ok(())
        } else {
            Err(SszError::MustBeUnused { field })
        }
    }
}

/// A reserved sequence must be empty; its elements do not matter.
impl EnforceUnused for Vec<Unused> {
    fn enforce_unused(&self, field: &'static str) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(SszError::MustBeUnused { field })
        }
    }
}

/// Check every named reserved field, reporting all violations together.
pub fn enforce_all_unused(fields: &[(&'static str, &dyn EnforceUnused)]) -> Result<()> {
    join_errors(fields.iter().map(|&(name, f)| f.enforce_unused(name)))
}
