//! Protocol constants: list maxima, fixed sizes and signing domains.
//!
//! Read-only; nothing here is configurable at runtime.

use crate::primitives::DomainType;

/* -------- Epochs -------- */

pub const FAR_FUTURE_EPOCH: u64 = u64::MAX;
pub const GENESIS_EPOCH: u64 = 0;

/* -------- Balances (Gwei) -------- */

pub const MAX_EFFECTIVE_BALANCE: u64 = 32_000_000_000;
pub const EFFECTIVE_BALANCE_INCREMENT: u64 = 1_000_000_000;
pub const EJECTION_BALANCE: u64 = 16_000_000_000;

/* -------- Withdrawal credentials -------- */

pub const ETH1_ADDRESS_WITHDRAWAL_PREFIX: u8 = 0x01;
pub const VERSIONED_HASH_VERSION_KZG: u8 = 0x01;

/* -------- Block body -------- */

pub const MAX_PROPOSER_SLASHINGS: u64 = 16;
pub const MAX_ATTESTER_SLASHINGS: u64 = 2;
pub const MAX_ATTESTATIONS: u64 = 128;
pub const MAX_DEPOSITS: u64 = 16;
pub const MAX_VOLUNTARY_EXITS: u64 = 16;
pub const MAX_BLS_TO_EXECUTION_CHANGES: u64 = 16;
pub const MAX_BLOB_COMMITMENTS_PER_BLOCK: u64 = 4096;
pub const SYNC_COMMITTEE_BITS_LEN: usize = 64;

/* -------- Execution payload -------- */

pub const MAX_TRANSACTIONS_PER_PAYLOAD: u64 = 1_048_576;
pub const MAX_BYTES_PER_TRANSACTION: u64 = 1_073_741_824;
pub const MAX_WITHDRAWALS_PER_PAYLOAD: u64 = 16;
pub const MAX_EXTRA_DATA_BYTES: u64 = 32;
pub const LOGS_BLOOM_LEN: usize = 256;

/* -------- Execution requests (EIP-7685) -------- */

pub const MAX_DEPOSIT_REQUESTS_PER_PAYLOAD: u64 = 8192;
pub const MAX_WITHDRAWAL_REQUESTS_PER_PAYLOAD: u64 = 16;
pub const MAX_CONSOLIDATION_REQUESTS_PER_PAYLOAD: u64 = 2;

pub const DEPOSIT_REQUEST_TYPE: u8 = 0x00;
pub const WITHDRAWAL_REQUEST_TYPE: u8 = 0x01;
pub const CONSOLIDATION_REQUEST_TYPE: u8 = 0x02;

/* -------- Beacon state -------- */

pub const SLOTS_PER_HISTORICAL_ROOT: u64 = 8192;
pub const EPOCHS_PER_HISTORICAL_VECTOR: u64 = 65_536;
pub const VALIDATOR_REGISTRY_LIMIT: u64 = 1_099_511_627_776;
pub const PENDING_PARTIAL_WITHDRAWALS_LIMIT: u64 = 134_217_728;

/* -------- Fixed encoded sizes -------- */

pub const BEACON_BLOCK_HEADER_SIZE: usize = 112;
pub const SIGNED_BEACON_BLOCK_HEADER_SIZE: usize = 208;
pub const ETH1_DATA_SIZE: usize = 72;
pub const FORK_SIZE: usize = 16;
pub const VALIDATOR_SIZE: usize = 121;
pub const DEPOSIT_SIZE: usize = 192;
pub const DEPOSIT_MESSAGE_SIZE: usize = 88;
pub const WITHDRAWAL_SIZE: usize = 44;
pub const PENDING_PARTIAL_WITHDRAWAL_SIZE: usize = 24;
pub const SYNC_AGGREGATE_SIZE: usize = 160;
pub const DEPOSIT_REQUEST_SIZE: usize = 192;
pub const WITHDRAWAL_REQUEST_SIZE: usize = 76;
pub const CONSOLIDATION_REQUEST_SIZE: usize = 116;

pub const EXECUTION_PAYLOAD_BELLATRIX_SIZE: usize = 508;
pub const EXECUTION_PAYLOAD_CAPELLA_SIZE: usize = 512;
pub const EXECUTION_PAYLOAD_DENEB_SIZE: usize = 528;

pub const EXECUTION_PAYLOAD_HEADER_BELLATRIX_SIZE: usize = 536;
pub const EXECUTION_PAYLOAD_HEADER_CAPELLA_SIZE: usize = 568;
pub const EXECUTION_PAYLOAD_HEADER_DENEB_SIZE: usize = 584;

pub const BEACON_BLOCK_BODY_DENEB_SIZE: usize = 392;
pub const BEACON_BLOCK_BODY_ELECTRA_SIZE: usize = 396;

/// Fixed region of a block: four static fields and the body offset.
pub const BEACON_BLOCK_FIXED_SIZE: usize = 84;
/// Fixed region of a signed block: message offset and signature.
pub const SIGNED_BEACON_BLOCK_FIXED_SIZE: usize = 100;

pub const BEACON_STATE_DENEB_SIZE: usize = 300;
pub const BEACON_STATE_ELECTRA_SIZE: usize = 304;

/// Offset of `slashed` inside an encoded `Validator`.
pub const VALIDATOR_SLASHED_OFFSET: usize = 48 + 32 + 8;

/* -------- KZG inclusion proofs -------- */

/// Body field index of `blob_kzg_commitments`.
pub const KZG_COMMITMENTS_FIELD_INDEX: u64 = 11;
/// Leaves in the padded body tree (12 or 13 fields pad to 16).
pub const BODY_TREE_DEPTH: usize = 4;
/// log2(MAX_BLOB_COMMITMENTS_PER_BLOCK)
pub const KZG_COMMITMENTS_TREE_DEPTH: usize = 12;
/// Commitment subtree, length mixin, body tree.
pub const KZG_INCLUSION_PROOF_DEPTH: usize = KZG_COMMITMENTS_TREE_DEPTH + 1 + BODY_TREE_DEPTH;

/* -------- Signing domains -------- */

pub const DOMAIN_BEACON_PROPOSER: DomainType = [0x00, 0x00, 0x00, 0x00];
pub const DOMAIN_BEACON_ATTESTER: DomainType = [0x01, 0x00, 0x00, 0x00];
pub const DOMAIN_RANDAO: DomainType = [0x02, 0x00, 0x00, 0x00];
pub const DOMAIN_DEPOSIT: DomainType = [0x03, 0x00, 0x00, 0x00];
pub const DOMAIN_VOLUNTARY_EXIT: DomainType = [0x04, 0x00, 0x00, 0x00];
