use std::fmt;

use crate::error::{Error, Result};
use crate::primitives::Version;

/// Protocol upgrade whose schema an object follows. Ordered oldest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ForkVersion {
    Phase0,
    Altair,
    Bellatrix,
    Capella,
    Deneb,
    Deneb1,
    Electra,
    Electra1,
}

impl ForkVersion {
    pub const ALL: [ForkVersion; 8] = [
        ForkVersion::Phase0,
        ForkVersion::Altair,
        ForkVersion::Bellatrix,
        ForkVersion::Capella,
        ForkVersion::Deneb,
        ForkVersion::Deneb1,
        ForkVersion::Electra,
        ForkVersion::Electra1,
    ];

    /// 4-byte wire form: major fork in byte 0, minor revision in byte 1.
    pub const fn to_bytes(self) -> Version {
        match self {
            ForkVersion::Phase0 => [0, 0, 0, 0],
            ForkVersion::Altair => [1, 0, 0, 0],
            ForkVersion::Bellatrix => [2, 0, 0, 0],
            ForkVersion::Capella => [3, 0, 0, 0],
            ForkVersion::Deneb => [4, 0, 0, 0],
            ForkVersion::Deneb1 => [4, 1, 0, 0],
            ForkVersion::Electra => [5, 0, 0, 0],
            ForkVersion::Electra1 => [5, 1, 0, 0],
        }
    }

    pub fn from_bytes(bytes: Version) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|v| v.to_bytes() == bytes)
            .ok_or(Error::UnknownVersion(bytes))
    }

    pub fn name(self) -> &'static str {
        match self {
            ForkVersion::Phase0 => "phase0",
            ForkVersion::Altair => "altair",
            ForkVersion::Bellatrix => "bellatrix",
            ForkVersion::Capella => "capella",
            ForkVersion::Deneb => "deneb",
            ForkVersion::Deneb1 => "deneb1",
            ForkVersion::Electra => "electra",
            ForkVersion::Electra1 => "electra1",
        }
    }

    #[inline]
    pub fn is_before(self, other: ForkVersion) -> bool {
        self < other
    }

    #[inline]
    pub fn equals_or_is_after(self, other: ForkVersion) -> bool {
        self >= other
    }

    /// Payloads carry withdrawals (headers a withdrawals root).
    #[inline]
    pub fn has_withdrawals(self) -> bool {
        self >= ForkVersion::Capella
    }

    /// Payloads carry blob gas accounting.
    #[inline]
    pub fn has_blob_gas(self) -> bool {
        self >= ForkVersion::Deneb
    }

    /// Bodies carry execution requests.
    #[inline]
    pub fn has_execution_requests(self) -> bool {
        self >= ForkVersion::Electra
    }

    /// States carry the pending partial withdrawal queue.
    #[inline]
    pub fn has_pending_partial_withdrawals(self) -> bool {
        self >= ForkVersion::Electra
    }
}

impl fmt::Display for ForkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<Version> for ForkVersion {
    type Error = Error;

    fn try_from(bytes: Version) -> Result<Self> {
        Self::from_bytes(bytes)
    }
}

impl From<ForkVersion> for Version {
    fn from(v: ForkVersion) -> Self {
        v.to_bytes()
    }
}

/// Fail unless `version` is at least `min`.
pub(crate) fn ensure_supported(ty: &'static str, version: ForkVersion, min: ForkVersion) -> Result<()> {
    if version.is_before(min) {
        log::warn!("{ty}: fork version {version} not supported (minimum {min})");
        return Err(Error::UnsupportedVersion { ty, version });
    }
    Ok(())
}

/// Fail unless a nested object carries its parent's version.
pub(crate) fn ensure_same(field: &'static str, parent: ForkVersion, child: ForkVersion) -> Result<()> {
    if parent != child {
        return Err(Error::VersionMismatch {
            field,
            parent,
            child,
        });
    }
    Ok(())
}
