//! Beacon-chain consensus objects over `beacon_ssz`.
//!
//! Versioned objects (payloads, headers, bodies, blocks, state) carry the
//! fork version they were built or decoded under and implement
//! [`VersionedSsz`]; decoding always names the version. Fixed-shape objects
//! implement the plain `beacon_ssz` traits.

pub mod block;
pub mod body;
pub mod codec;
pub mod constants;
pub mod deposit;
pub mod engine;
pub mod error;
pub mod eth1_data;
pub mod execution_requests;
pub mod fork;
pub mod header;
pub mod kzg;
pub mod payload;
pub mod payload_header;
pub mod primitives;
pub mod signing;
pub mod state;
pub mod sync_aggregate;
pub mod validator;
pub mod version;
pub mod withdrawal;

#[cfg(test)]
mod test_utils;

pub use block::{BeaconBlock, SignedBeaconBlock};
pub use body::BeaconBlockBody;
pub use codec::VersionedSsz;
pub use deposit::{Deposit, DepositMessage};
pub use engine::{ExecutionBlockBuilder, NewPayloadRequest};
pub use error::{Error, Result};
pub use eth1_data::Eth1Data;
pub use execution_requests::{
    ConsolidationRequest, DepositRequest, ExecutionRequests, WithdrawalRequest,
};
pub use fork::{compute_domain, compute_signing_root, Fork, ForkData, SigningData};
pub use header::{BeaconBlockHeader, SignedBeaconBlockHeader};
pub use payload::ExecutionPayload;
pub use payload_header::ExecutionPayloadHeader;
pub use signing::{BlsSigner, BlsVerifier};
pub use state::BeaconState;
pub use sync_aggregate::SyncAggregate;
pub use validator::Validator;
pub use version::ForkVersion;
pub use withdrawal::{PendingPartialWithdrawal, Withdrawal};

pub use beacon_ssz;
