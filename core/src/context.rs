//! Account and transaction state handed explicitly to the views that need it.

use serde::{Deserialize, Serialize};

use crate::{
    network::Network,
    reward::TimePeriodUnit,
    validator::{Validator, ValidatorMap},
};

/// A chunk of funds being unbonded
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockingBalance {
    /// Amount in planck
    pub value: u128,

    /// Era at which the chunk becomes withdrawable
    pub era: u32,
}

/// The connected account
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AccountContext {
    pub network: Network,

    /// Stash address, `None` when no wallet is connected
    pub stash_account: Option<String>,

    /// Currently bonded funds, in tokens
    pub bonded_amount: f64,
    pub unlocking_balances: Vec<UnlockingBalance>,
}

impl AccountContext {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            ..Default::default()
        }
    }

    pub fn with_stash_account(mut self, address: impl Into<String>) -> Self {
        self.stash_account = Some(address.into());
        self
    }

    pub fn with_bonded_amount(mut self, bonded_amount: f64) -> Self {
        self.bonded_amount = bonded_amount;
        self
    }

    pub fn with_unlocking_balances(mut self, unlocking_balances: Vec<UnlockingBalance>) -> Self {
        self.unlocking_balances = unlocking_balances;
        self
    }

    pub fn is_connected(&self) -> bool {
        self.stash_account
            .as_deref()
            .is_some_and(|address| !address.trim().is_empty())
    }

    /// Sum of all unlocking chunks, in tokens
    pub fn total_unlocking(&self) -> f64 {
        let planck: u128 = self
            .unlocking_balances
            .iter()
            .map(|balance| balance.value)
            .sum();
        self.network.params().planck_to_token(planck)
    }
}

/// Staking inputs carried from the calculator into the validators view
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionState {
    pub staking_amount: Option<f64>,
    pub time_period_value: Option<u32>,
    pub time_period_unit: Option<TimePeriodUnit>,

    #[serde(default)]
    pub selected_validators: Vec<Validator>,

    #[serde(default)]
    pub validator_map: ValidatorMap,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_connected() {
        assert!(!AccountContext::new(Network::Kusama).is_connected());
        assert!(!AccountContext::new(Network::Kusama)
            .with_stash_account(" ")
            .is_connected());
        assert!(AccountContext::new(Network::Kusama)
            .with_stash_account("HNZata7iMYWmk5RvZRTiAsSDhV8366zq2YGb3tLH5Upf74F")
            .is_connected());
    }

    #[test]
    fn test_total_unlocking() {
        let ctx = AccountContext::new(Network::Kusama).with_unlocking_balances(vec![
            UnlockingBalance {
                value: 1_000_000_000_000,
                era: 10,
            },
            UnlockingBalance {
                value: 250_000_000_000,
                era: 12,
            },
        ]);
        assert_eq!(ctx.total_unlocking(), 1.25);
        assert_eq!(AccountContext::default().total_unlocking(), 0.0);
    }
}
