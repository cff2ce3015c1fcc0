//! Chain parameters for the relay chains Stakescan understands.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StakescanCoreError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Kusama,
    Polkadot,
}

/// Static parameters of a network
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NetworkParams {
    /// Ticker of the native token
    pub token_symbol: &'static str,

    /// Number of decimals between a planck and one token
    pub token_decimals: u32,

    /// SS58 address prefix
    pub ss58_prefix: u16,

    /// Number of reward eras in a day
    pub eras_per_day: u32,

    /// Coin id used by the price feed
    pub price_id: &'static str,
}

const KUSAMA: NetworkParams = NetworkParams {
    token_symbol: "KSM",
    token_decimals: 12,
    ss58_prefix: 2,
    eras_per_day: 4,
    price_id: "kusama",
};

const POLKADOT: NetworkParams = NetworkParams {
    token_symbol: "DOT",
    token_decimals: 10,
    ss58_prefix: 0,
    eras_per_day: 1,
    price_id: "polkadot",
};

impl Network {
    /// Get network value
    pub fn get_network(value: &str) -> Result<Network, StakescanCoreError> {
        match value.to_lowercase().as_ref() {
            "kusama" | "ksm" | "k" => Ok(Network::Kusama),
            "polkadot" | "dot" | "p" => Ok(Network::Polkadot),
            _ => Err(StakescanCoreError::InvalidNetwork(value.to_string())),
        }
    }

    pub fn params(&self) -> &'static NetworkParams {
        match self {
            Self::Kusama => &KUSAMA,
            Self::Polkadot => &POLKADOT,
        }
    }
}

impl FromStr for Network {
    type Err = StakescanCoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::get_network(s)
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Kusama => "kusama",
                Self::Polkadot => "polkadot",
            }
        )
    }
}

impl NetworkParams {
    /// Convert an amount of planck into whole tokens
    pub fn planck_to_token(&self, planck: u128) -> f64 {
        planck as f64 / 10f64.powi(self.token_decimals as i32)
    }
}
