//! Reward projection for a nomination.
//!
//! The staking amount is split evenly across the selected validators. Each
//! share earns the validator's era pool reward, net of commission, pro rata to
//! its weight in the validator's total stake. The per-era rate is then
//! projected over the requested period, optionally compounding every era.

use std::{str::FromStr, sync::Arc};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, StakescanCoreError},
    network::{Network, NetworkParams},
    price::PriceSource,
    validator::Validator,
};

pub const DAYS_PER_MONTH: u64 = 30;
pub const DAYS_PER_YEAR: u64 = 365;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePeriodUnit {
    Days,
    #[default]
    Months,
    Years,
}

impl TimePeriodUnit {
    pub fn to_days(&self, value: u32) -> u64 {
        let value = u64::from(value);
        match self {
            Self::Days => value,
            Self::Months => value * DAYS_PER_MONTH,
            Self::Years => value * DAYS_PER_YEAR,
        }
    }
}

impl FromStr for TimePeriodUnit {
    type Err = StakescanCoreError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_ref() {
            "days" | "day" | "d" => Ok(Self::Days),
            "months" | "month" | "m" => Ok(Self::Months),
            "years" | "year" | "y" => Ok(Self::Years),
            _ => Err(StakescanCoreError::InvalidTimePeriodUnit(s.to_string())),
        }
    }
}

impl std::fmt::Display for TimePeriodUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Days => "days",
                Self::Months => "months",
                Self::Years => "years",
            }
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardQuery {
    pub selected_validators: Vec<Validator>,
    pub staking_amount: f64,
    pub time_period_value: u32,
    pub time_period_unit: TimePeriodUnit,
    pub compound: bool,
    pub bonded_amount: f64,
}

impl RewardQuery {
    pub fn validate(&self) -> Result<()> {
        if !self.staking_amount.is_finite() || self.staking_amount <= 0.0 {
            return Err(StakescanCoreError::InvalidStakingAmount(self.staking_amount));
        }
        if self.time_period_value == 0 {
            return Err(StakescanCoreError::InvalidTimePeriod);
        }
        if !self.bonded_amount.is_finite() || self.bonded_amount < 0.0 {
            return Err(StakescanCoreError::InvalidBondedAmount(self.bonded_amount));
        }
        self.selected_validators
            .iter()
            .try_for_each(Validator::validate)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Returns {
    /// Projected return in native tokens
    pub native: f64,

    /// Same return in USD, when a price source is configured
    pub fiat: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorReturn {
    pub stash_id: String,

    /// Part of the staking amount backing this validator
    pub allocated_stake: f64,

    /// Nominator reward per era from this validator
    pub era_reward: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardResult {
    pub returns: Returns,
    pub yield_percentage: f64,

    /// Reward per era relative to the staking amount
    pub era_return_rate: f64,
    pub period_days: u64,
    pub eras: u64,
    pub staking_amount: f64,

    /// Funds that still need bonding to reach the staking amount
    pub additional_bond: f64,
    pub validators: Vec<ValidatorReturn>,
}

/// Projects staking rewards for a set of validators
#[derive(Clone)]
pub struct RewardEstimator {
    network: Network,
    price_source: Option<Arc<dyn PriceSource>>,
}

impl RewardEstimator {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            price_source: None,
        }
    }

    /// Attach a price source to report returns in USD
    pub fn with_price_source(mut self, price_source: Arc<dyn PriceSource>) -> Self {
        self.price_source = Some(price_source);
        self
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// Project rewards for a nomination
    ///
    /// # Arguments
    ///
    /// * `selected_validators` - Validators backed by the nomination
    /// * `staking_amount` - Total amount to stake, in tokens
    /// * `time_period_value` - Length of the period in `time_period_unit`
    /// * `time_period_unit` - Unit of the period
    /// * `compound` - Whether rewards are restaked every era
    /// * `bonded_amount` - Amount already bonded, in tokens
    pub async fn calculate_reward(
        &self,
        selected_validators: &[Validator],
        staking_amount: f64,
        time_period_value: u32,
        time_period_unit: TimePeriodUnit,
        compound: bool,
        bonded_amount: f64,
    ) -> Result<RewardResult> {
        let query = RewardQuery {
            selected_validators: selected_validators.to_vec(),
            staking_amount,
            time_period_value,
            time_period_unit,
            compound,
            bonded_amount,
        };
        self.estimate(&query).await
    }

    pub async fn estimate(&self, query: &RewardQuery) -> Result<RewardResult> {
        let mut result = project(self.network.params(), query)?;

        if query.selected_validators.is_empty() {
            return Ok(result);
        }

        if let Some(price_source) = &self.price_source {
            let price = price_source.get_price().await?;
            debug!("{} quoted {} at {price} USD", price_source.name(), self.network);
            result.returns.fiat = Some(result.returns.native * price);
        }

        Ok(result)
    }
}

impl std::fmt::Debug for RewardEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RewardEstimator")
            .field("network", &self.network)
            .field(
                "price_source",
                &self.price_source.as_ref().map(|source| source.name()),
            )
            .finish()
    }
}

/// Pure projection without price lookup
pub fn project(params: &NetworkParams, query: &RewardQuery) -> Result<RewardResult> {
    query.validate()?;

    let period_days = query.time_period_unit.to_days(query.time_period_value);
    let eras = period_days * u64::from(params.eras_per_day);
    let additional_bond = (query.staking_amount - query.bonded_amount).max(0.0);

    if query.selected_validators.is_empty() {
        return Ok(RewardResult {
            period_days,
            eras,
            staking_amount: query.staking_amount,
            additional_bond,
            ..Default::default()
        });
    }

    let allocated_stake = query.staking_amount / query.selected_validators.len() as f64;
    let validators: Vec<ValidatorReturn> = query
        .selected_validators
        .iter()
        .map(|validator| {
            let stake_share = allocated_stake / (validator.total_stake + allocated_stake);
            let net_pool_reward =
                validator.estimated_pool_reward * (1.0 - validator.commission / 100.0);
            ValidatorReturn {
                stash_id: validator.stash_id.clone(),
                allocated_stake,
                era_reward: net_pool_reward * stake_share,
            }
        })
        .collect();

    let era_reward: f64 = validators.iter().map(|v| v.era_reward).sum();
    let era_return_rate = era_reward / query.staking_amount;

    let native = if query.compound {
        query.staking_amount * (eras as f64 * era_return_rate.ln_1p()).exp_m1()
    } else {
        query.staking_amount * era_return_rate * eras as f64
    };

    Ok(RewardResult {
        returns: Returns { native, fiat: None },
        yield_percentage: native / query.staking_amount * 100.0,
        era_return_rate,
        period_days,
        eras,
        staking_amount: query.staking_amount,
        additional_bond,
        validators,
    })
}
