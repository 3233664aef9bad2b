use beacon_consensus_types::constants::{EFFECTIVE_BALANCE_INCREMENT, MAX_EFFECTIVE_BALANCE};
use beacon_consensus_types::primitives::{BlsPubkey, KzgCommitment};
use beacon_consensus_types::{
    BeaconBlockBody, BeaconState, ForkVersion, Validator, VersionedSsz,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn state_with(validators: usize) -> BeaconState {
    let mut state = BeaconState::new_empty(ForkVersion::Electra).unwrap();
    for i in 0..validators {
        let v = Validator::from_deposit(
            BlsPubkey::repeat_byte((i % 251) as u8),
            [(i % 256) as u8; 32],
            MAX_EFFECTIVE_BALANCE,
            EFFECTIVE_BALANCE_INCREMENT,
            MAX_EFFECTIVE_BALANCE,
        );
        state.add_validator(v, MAX_EFFECTIVE_BALANCE);
    }
    state.block_roots = vec![[7u8; 32]; 8192];
    state.state_roots = vec![[8u8; 32]; 8192];
    state
}

fn body_with(blobs: usize) -> BeaconBlockBody {
    let mut body = BeaconBlockBody::new_empty(ForkVersion::Electra).unwrap();
    body.blob_kzg_commitments = (0..blobs).map(|i| KzgCommitment::repeat_byte(i as u8)).collect();
    body.execution_payload.transactions = (0..256).map(|i| vec![i as u8; 200]).collect();
    body
}

fn bench_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("state_root");
    for n in [1_000usize, 16_384] {
        let state = state_with(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &state, |b, s| {
            b.iter(|| black_box(s.hash_tree_root().unwrap()))
        });
    }
    group.finish();
}

fn bench_body(c: &mut Criterion) {
    let body = body_with(6);
    c.bench_function("body_root", |b| b.iter(|| black_box(body.hash_tree_root().unwrap())));
    c.bench_function("body_kzg_proof", |b| {
        b.iter(|| black_box(body.kzg_commitment_inclusion_proof(3).unwrap()))
    });
    c.bench_function("body_encode", |b| b.iter(|| black_box(body.ssz_bytes().unwrap())));
}

criterion_group!(benches, bench_state, bench_body);
criterion_main!(benches);
