use beacon_ssz::FixedBytes;

pub use beacon_ssz::Root;
pub use primitive_types::U256;

pub type Bytes32 = [u8; 32];
pub type ExecutionHash = [u8; 32];
pub type ExecutionAddress = [u8; 20];
pub type Version = [u8; 4];
pub type DomainType = [u8; 4];
pub type Domain = [u8; 32];

pub type BlsPubkey = FixedBytes<48>;
pub type BlsSignature = FixedBytes<96>;
pub type KzgCommitment = FixedBytes<48>;
pub type LogsBloom = FixedBytes<256>;
pub type SyncCommitteeBits = FixedBytes<64>;

pub type Slot = u64;
pub type Epoch = u64;
pub type ValidatorIndex = u64;
pub type WithdrawalIndex = u64;
pub type Gwei = u64;
