//! Known-answer vectors for the consensus codecs.
//!
//! `vectors/consensus.json` is produced by `gen/ssz_reference.py`, a
//! schema-driven SSZ encoder that shares no code with the Rust crates. Each
//! positive vector carries the canonical bytes and expected root; each
//! negative vector carries bytes the codec must refuse and the error kind it
//! should report.

use serde::{Deserialize, Serialize};

const CONSENSUS_JSON: &str = include_str!("../vectors/consensus.json");

/// One vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SszKat {
    /// e.g. "body/electra"
    pub name: String,
    /// Rust type the bytes decode as.
    pub type_name: String,
    /// 4-byte fork version as hex, for versioned types.
    pub version: Option<String>,
    pub ssz_hex: String,
    /// Expected hash tree root; absent for negative vectors.
    pub root_hex: Option<String>,
    /// Expected `kind()` of the decode error; absent for positive vectors.
    pub expect_error: Option<String>,
}

impl SszKat {
    pub fn is_negative(&self) -> bool {
        self.expect_error.is_some()
    }

    pub fn ssz_bytes(&self) -> Result<Vec<u8>, hex::FromHexError> {
        hex_to_bytes(&self.ssz_hex)
    }

    pub fn root(&self) -> Result<Option<[u8; 32]>, hex::FromHexError> {
        self.root_hex.as_deref().map(hex_to_array::<32>).transpose()
    }

    pub fn version_bytes(&self) -> Result<Option<[u8; 4]>, hex::FromHexError> {
        self.version.as_deref().map(hex_to_array::<4>).transpose()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SszCorpus {
    pub schema: u32,
    pub generator: String,
    pub vectors: Vec<SszKat>,
}

impl SszCorpus {
    pub fn from_slice(json: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(json)
    }

    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// Vectors for one type, in file order.
    pub fn of_type<'a>(&'a self, type_name: &'a str) -> impl Iterator<Item = &'a SszKat> + 'a {
        self.vectors.iter().filter(move |v| v.type_name == type_name)
    }
}

/// The embedded consensus corpus.
pub fn consensus_corpus() -> serde_json::Result<SszCorpus> {
    SszCorpus::from_json_str(CONSENSUS_JSON)
}

/// Decode hex with or without a `0x` prefix.
pub fn hex_to_bytes(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(s.strip_prefix("0x").unwrap_or(s))
}

pub fn hex_to_array<const N: usize>(s: &str) -> Result<[u8; N], hex::FromHexError> {
    let mut out = [0u8; N];
    hex::decode_to_slice(s.strip_prefix("0x").unwrap_or(s), &mut out)?;
    Ok(out)
}
