//! Known-answer vectors from the independent reference encoder.

use beacon_consensus_types::beacon_ssz::{Decode, Encode, HashTreeRoot, Root, SszError};
use beacon_consensus_types::{
    BeaconBlock, BeaconBlockBody, BeaconBlockHeader, BeaconState, Error, Eth1Data,
    ExecutionPayload, ExecutionPayloadHeader, ForkVersion, SignedBeaconBlock, Validator,
    VersionedSsz, Withdrawal,
};
use beacon_ssz_kats::{consensus_corpus, SszKat};

/// Decode, re-encode and hash. Returns the error kind on rejection.
fn run(kat: &SszKat) -> Result<(Vec<u8>, Root), &'static str> {
    let bytes = kat.ssz_bytes().expect("vector hex");
    let version = kat
        .version_bytes()
        .expect("version hex")
        .map(|v| ForkVersion::from_bytes(v).expect("known fork"));

    fn fixed<T: Decode + Encode + HashTreeRoot>(bytes: &[u8]) -> Result<(Vec<u8>, Root), &'static str> {
        let v = T::ssz_read(bytes).map_err(|e| e.kind())?;
        Ok((v.ssz_bytes().map_err(|e| e.kind())?, v.hash_tree_root().map_err(|e| e.kind())?))
    }

    fn versioned<T: VersionedSsz>(
        bytes: &[u8],
        version: Option<ForkVersion>,
    ) -> Result<(Vec<u8>, Root), &'static str> {
        let version = version.expect("versioned vector names its fork");
        let v = T::from_ssz_bytes(bytes, version).map_err(|e: Error| e.kind())?;
        assert_eq!(v.version(), version);
        Ok((v.ssz_bytes().map_err(|e| e.kind())?, v.hash_tree_root().map_err(|e| e.kind())?))
    }

    match kat.type_name.as_str() {
        "Eth1Data" => fixed::<Eth1Data>(&bytes),
        "BeaconBlockHeader" => fixed::<BeaconBlockHeader>(&bytes),
        "Validator" => fixed::<Validator>(&bytes),
        "Withdrawal" => fixed::<Withdrawal>(&bytes),
        "ExecutionPayload" => versioned::<ExecutionPayload>(&bytes, version),
        "ExecutionPayloadHeader" => versioned::<ExecutionPayloadHeader>(&bytes, version),
        "BeaconBlockBody" => versioned::<BeaconBlockBody>(&bytes, version),
        "BeaconBlock" => versioned::<BeaconBlock>(&bytes, version),
        "SignedBeaconBlock" => versioned::<SignedBeaconBlock>(&bytes, version),
        "BeaconState" => versioned::<BeaconState>(&bytes, version),
        other => panic!("no decoder for {other}"),
    }
}

#[test]
fn positive_vectors_match_bytes_and_roots() {
    let corpus = consensus_corpus().expect("corpus");
    let mut seen = 0;
    for kat in corpus.vectors.iter().filter(|v| !v.is_negative()) {
        let (bytes, root) = run(kat).unwrap_or_else(|kind| panic!("{}: rejected ({kind})", kat.name));
        assert_eq!(bytes, kat.ssz_bytes().unwrap(), "{}: re-encoding differs", kat.name);
        assert_eq!(Some(root), kat.root().unwrap(), "{}: root differs", kat.name);
        seen += 1;
    }
    assert!(seen >= 20);
}

#[test]
fn negative_vectors_fail_with_expected_kind() {
    let corpus = consensus_corpus().expect("corpus");
    for kat in corpus.vectors.iter().filter(|v| v.is_negative()) {
        let expected = kat.expect_error.as_deref().unwrap();
        match run(kat) {
            Ok(_) => panic!("{}: decoded, expected {expected}", kat.name),
            Err(kind) => assert_eq!(kind, expected, "{}", kat.name),
        }
    }
}

fn unused_fields(err: &Error, out: &mut Vec<&'static str>) {
    fn ssz(e: &SszError, out: &mut Vec<&'static str>) {
        match e {
            SszError::MustBeUnused { field } => out.push(*field),
            SszError::Multiple(v) => v.iter().for_each(|e| ssz(e, out)),
            _ => {}
        }
    }
    match err {
        Error::Ssz(e) => ssz(e, out),
        Error::Multiple(v) => v.iter().for_each(|e| unused_fields(e, out)),
        _ => {}
    }
}

fn body_decode_error(name: &str) -> Error {
    let corpus = consensus_corpus().expect("corpus");
    let kat = corpus
        .vectors
        .iter()
        .find(|k| k.name == name)
        .unwrap_or_else(|| panic!("missing vector {name}"));
    let version = ForkVersion::from_bytes(kat.version_bytes().unwrap().unwrap()).unwrap();
    BeaconBlockBody::from_ssz_bytes(&kat.ssz_bytes().unwrap(), version).unwrap_err()
}

#[test]
fn reserved_body_vectors_name_their_field() {
    for (name, field) in [
        ("body/proposer_slashings_not_empty", "proposer_slashings"),
        ("body/attester_slashings_not_empty", "attester_slashings"),
        ("body/attestations_not_empty", "attestations"),
        ("body/voluntary_exits_not_empty", "voluntary_exits"),
        ("body/sync_bits_set", "sync_aggregate"),
        ("body/sync_signature_set", "sync_aggregate"),
        ("body/bls_to_execution_changes_not_empty", "bls_to_execution_changes"),
    ] {
        let mut fields = Vec::new();
        unused_fields(&body_decode_error(name), &mut fields);
        assert_eq!(fields, [field], "{name}");
    }
}

#[test]
fn several_reserved_violations_are_all_reported() {
    let mut fields = Vec::new();
    unused_fields(&body_decode_error("body/several_reserved_set"), &mut fields);
    assert_eq!(fields, ["attestations", "voluntary_exits", "sync_aggregate"]);
}

#[test]
fn every_supported_block_fork_has_vectors() {
    let corpus = consensus_corpus().expect("corpus");
    for v in [
        ForkVersion::Deneb,
        ForkVersion::Deneb1,
        ForkVersion::Electra,
        ForkVersion::Electra1,
    ] {
        let wire = format!("0x{}", hex::encode(v.to_bytes()));
        for ty in ["BeaconBlockBody", "BeaconBlock", "BeaconState"] {
            assert!(
                corpus
                    .of_type(ty)
                    .any(|k| k.version.as_deref() == Some(wire.as_str())),
                "{ty} at {v}"
            );
        }
    }
}
