use beacon_ssz::impl_static_container;

use crate::constants::{ETH1_ADDRESS_WITHDRAWAL_PREFIX, FAR_FUTURE_EPOCH};
use crate::error::{Error, Result};
use crate::primitives::{BlsPubkey, Epoch, ExecutionAddress, Gwei};

pub type WithdrawalCredentials = [u8; 32];

/// `0x01 || 11 zero bytes || address`
pub fn eth1_withdrawal_credentials(address: &ExecutionAddress) -> WithdrawalCredentials {
    let mut creds = [0u8; 32];
    creds[0] = ETH1_ADDRESS_WITHDRAWAL_PREFIX;
    creds[12..].copy_from_slice(address);
    creds
}

/// Recover the execution address from eth1-style credentials.
pub fn withdrawal_address(creds: &WithdrawalCredentials) -> Result<ExecutionAddress> {
    if creds[0] != ETH1_ADDRESS_WITHDRAWAL_PREFIX || creds[1..12].iter().any(|&b| b != 0) {
        return Err(Error::InvalidWithdrawalCredentials);
    }
    let mut address = [0u8; 20];
    address.copy_from_slice(&creds[12..]);
    Ok(address)
}

/// Amount rounded down to the increment, capped at `max_effective_balance`.
pub fn compute_effective_balance(amount: Gwei, increment: Gwei, max_effective_balance: Gwei) -> Gwei {
    let rounded = if increment == 0 {
        amount
    } else {
        amount - amount % increment
    };
    rounded.min(max_effective_balance)
}

/// Registry entry. 121 bytes on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Validator {
    pub pubkey: BlsPubkey,
    pub withdrawal_credentials: WithdrawalCredentials,
    pub effective_balance: Gwei,
    pub slashed: bool,
    pub activation_eligibility_epoch: Epoch,
    pub activation_epoch: Epoch,
    pub exit_epoch: Epoch,
    pub withdrawable_epoch: Epoch,
}

impl_static_container!(Validator {
    pubkey: BlsPubkey,
    withdrawal_credentials: WithdrawalCredentials,
    effective_balance: Gwei,
    slashed: bool,
    activation_eligibility_epoch: Epoch,
    activation_epoch: Epoch,
    exit_epoch: Epoch,
    withdrawable_epoch: Epoch,
});

impl Validator {
    /// Fresh validator from a deposit: every epoch at FAR_FUTURE_EPOCH.
    pub fn from_deposit(
        pubkey: BlsPubkey,
        withdrawal_credentials: WithdrawalCredentials,
        amount: Gwei,
        effective_balance_increment: Gwei,
        max_effective_balance: Gwei,
    ) -> Self {
        Self {
            pubkey,
            withdrawal_credentials,
            effective_balance: compute_effective_balance(
                amount,
                effective_balance_increment,
                max_effective_balance,
            ),
            slashed: false,
            activation_eligibility_epoch: FAR_FUTURE_EPOCH,
            activation_epoch: FAR_FUTURE_EPOCH,
            exit_epoch: FAR_FUTURE_EPOCH,
            withdrawable_epoch: FAR_FUTURE_EPOCH,
        }
    }

    pub fn is_active(&self, epoch: Epoch) -> bool {
        self.activation_epoch <= epoch && epoch < self.exit_epoch
    }

    pub fn is_eligible_for_activation(&self, finalized_epoch: Epoch) -> bool {
        self.activation_eligibility_epoch <= finalized_epoch
            && self.activation_epoch == FAR_FUTURE_EPOCH
    }

    pub fn is_eligible_for_activation_queue(&self, threshold: Gwei) -> bool {
        self.activation_eligibility_epoch == FAR_FUTURE_EPOCH && self.effective_balance >= threshold
    }

    pub fn is_slashable(&self, epoch: Epoch) -> bool {
        !self.slashed && self.activation_epoch <= epoch && epoch < self.withdrawable_epoch
    }

    pub fn has_eth1_withdrawal_credentials(&self) -> bool {
        self.withdrawal_credentials[0] == ETH1_ADDRESS_WITHDRAWAL_PREFIX
    }

    pub fn has_max_effective_balance(&self, max_effective_balance: Gwei) -> bool {
        self.effective_balance == max_effective_balance
    }

    pub fn is_fully_withdrawable(&self, balance: Gwei, epoch: Epoch) -> bool {
        self.has_eth1_withdrawal_credentials() && self.withdrawable_epoch <= epoch && balance > 0
    }

    pub fn is_partially_withdrawable(&self, balance: Gwei, max_effective_balance: Gwei) -> bool {
        self.has_eth1_withdrawal_credentials()
            && self.has_max_effective_balance(max_effective_balance)
            && balance > max_effective_balance
    }

    pub fn withdrawal_address(&self) -> Result<ExecutionAddress> {
        withdrawal_address(&self.withdrawal_credentials)
    }
}
