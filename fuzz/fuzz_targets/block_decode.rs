#![no_main]
use libfuzzer_sys::fuzz_target;

use beacon_consensus_types::{ForkVersion, SignedBeaconBlock, VersionedSsz};

// First byte picks the fork, the rest is the signed block.
fuzz_target!(|data: &[u8]| {
    let Some((&sel, bytes)) = data.split_first() else { return };
    let forks = [
        ForkVersion::Deneb,
        ForkVersion::Deneb1,
        ForkVersion::Electra,
        ForkVersion::Electra1,
    ];
    let version = forks[usize::from(sel) % forks.len()];

    if let Ok(block) = SignedBeaconBlock::from_ssz_bytes(bytes, version) {
        let enc = block.ssz_bytes().expect("decoded block re-encodes");
        assert_eq!(enc, bytes, "accepted a non-canonical encoding");
        let again = SignedBeaconBlock::from_ssz_bytes(&enc, version).expect("re-decode");
        assert_eq!(block.hash_tree_root().ok(), again.hash_tree_root().ok(), "root mismatch");
    }
});
