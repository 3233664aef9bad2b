#![no_main]
use libfuzzer_sys::fuzz_target;

use beacon_consensus_types::{ExecutionPayload, ForkVersion, VersionedSsz};

fuzz_target!(|data: &[u8]| {
    let Some((&sel, bytes)) = data.split_first() else { return };
    let forks = [
        ForkVersion::Bellatrix,
        ForkVersion::Capella,
        ForkVersion::Deneb,
        ForkVersion::Electra,
    ];
    let version = forks[usize::from(sel) % forks.len()];

    if let Ok(payload) = ExecutionPayload::from_ssz_bytes(bytes, version) {
        let enc = payload.ssz_bytes().expect("decoded payload re-encodes");
        assert_eq!(enc, bytes, "accepted a non-canonical encoding");
        // The header form must commit to the same root.
        if let (Ok(header), Ok(root)) = (payload.to_header(), payload.hash_tree_root()) {
            assert_eq!(header.hash_tree_root().ok(), Some(root));
        }
    }
});
