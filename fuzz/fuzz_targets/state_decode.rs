#![no_main]
use libfuzzer_sys::fuzz_target;

use beacon_consensus_types::{BeaconState, ForkVersion, VersionedSsz};

fuzz_target!(|data: &[u8]| {
    let Some((&sel, bytes)) = data.split_first() else { return };
    let version = if sel & 1 == 0 {
        ForkVersion::Deneb
    } else {
        ForkVersion::Electra
    };

    if let Ok(state) = BeaconState::from_ssz_bytes(bytes, version) {
        let enc = state.ssz_bytes().expect("decoded state re-encodes");
        assert_eq!(enc, bytes, "accepted a non-canonical encoding");
        let again = BeaconState::from_ssz_bytes(&enc, version).expect("re-decode");
        assert_eq!(state, again);
    }
});
