use beacon_ssz::impl_static_container;

use crate::primitives::{Epoch, ExecutionAddress, Gwei, ValidatorIndex, WithdrawalIndex};

/// Execution-layer withdrawal carried in a payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Withdrawal {
    pub index: WithdrawalIndex,
    pub validator_index: ValidatorIndex,
    pub address: ExecutionAddress,
    pub amount: Gwei,
}

impl_static_container!(Withdrawal {
    index: WithdrawalIndex,
    validator_index: ValidatorIndex,
    address: ExecutionAddress,
    amount: Gwei,
});

impl Withdrawal {
    pub fn new(
        index: WithdrawalIndex,
        validator_index: ValidatorIndex,
        address: ExecutionAddress,
        amount: Gwei,
    ) -> Self {
        Self {
            index,
            validator_index,
            address,
            amount,
        }
    }
}

/// Partial withdrawal queued in the state until `withdrawable_epoch`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PendingPartialWithdrawal {
    pub validator_index: ValidatorIndex,
    pub amount: Gwei,
    pub withdrawable_epoch: Epoch,
}

impl_static_container!(PendingPartialWithdrawal {
    validator_index: ValidatorIndex,
    amount: Gwei,
    withdrawable_epoch: Epoch,
});

/// Sum of queued amounts for one validator.
pub fn pending_balance_to_withdraw(
    pending: &[PendingPartialWithdrawal],
    validator_index: ValidatorIndex,
) -> Gwei {
    pending
        .iter()
        .filter(|w| w.validator_index == validator_index)
        .fold(0, |acc: Gwei, w| acc.saturating_add(w.amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{PENDING_PARTIAL_WITHDRAWAL_SIZE, WITHDRAWAL_SIZE};
    use beacon_ssz::{Decode, Encode};

    #[test]
    fn withdrawal_layout() {
        let w = Withdrawal::new(1, 2, [3u8; 20], 4);
        let bytes = w.ssz_bytes().unwrap();
        assert_eq!(bytes.len(), WITHDRAWAL_SIZE);
        assert_eq!(&bytes[16..36], &[3u8; 20]);
        assert_eq!(Withdrawal::ssz_read(&bytes).unwrap(), w);
    }

    #[test]
    fn pending_balance_sums_per_validator() {
        let queue = [
            PendingPartialWithdrawal { validator_index: 1, amount: 5, withdrawable_epoch: 0 },
            PendingPartialWithdrawal { validator_index: 2, amount: 7, withdrawable_epoch: 0 },
            PendingPartialWithdrawal { validator_index: 1, amount: 11, withdrawable_epoch: 3 },
        ];
        assert_eq!(pending_balance_to_withdraw(&queue, 1), 16);
        assert_eq!(pending_balance_to_withdraw(&queue, 3), 0);
        assert_eq!(queue[0].ssz_bytes().unwrap().len(), PENDING_PARTIAL_WITHDRAWAL_SIZE);
    }
}
