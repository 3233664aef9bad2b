#![no_main]
use libfuzzer_sys::fuzz_target;

use beacon_consensus_types::beacon_ssz::{Decode, Encode, HashTreeRoot};
use beacon_consensus_types::{
    BeaconBlockHeader, ExecutionPayloadHeader, ForkVersion, SignedBeaconBlockHeader, VersionedSsz,
};

fuzz_target!(|data: &[u8]| {
    if let Ok(h) = BeaconBlockHeader::ssz_read(data) {
        assert_eq!(h.ssz_bytes().expect("re-encode"), data);
        assert!(h.hash_tree_root().is_ok());
    }
    if let Ok(h) = SignedBeaconBlockHeader::ssz_read(data) {
        assert_eq!(h.ssz_bytes().expect("re-encode"), data);
    }

    let Some((&sel, bytes)) = data.split_first() else { return };
    let version = match sel % 3 {
        0 => ForkVersion::Bellatrix,
        1 => ForkVersion::Capella,
        _ => ForkVersion::Deneb,
    };
    if let Ok(h) = ExecutionPayloadHeader::from_ssz_bytes(bytes, version) {
        assert_eq!(h.ssz_bytes().expect("re-encode"), bytes);
        assert_eq!(h.version(), version);
    }
});
