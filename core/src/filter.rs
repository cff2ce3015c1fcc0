//! Filter stage of the validator pipeline.
//!
//! A validator is kept when *any* active criterion matches it. Every set bound
//! of a range is a criterion of its own, so `min` and `max` are not
//! intersected. With no active criterion the list passes through untouched.

use std::{fmt::Display, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::{
    error::{Result, StakescanCoreError},
    validator::Validator,
};

/// Upper bound (exclusive) of the low risk band
pub const LOW_RISK_CEILING: f64 = 0.33;

/// Upper bound (inclusive) of the medium risk band
pub const MEDIUM_RISK_CEILING: f64 = 0.66;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    pub fn contains(&self, score: f64) -> bool {
        match self {
            Self::Low => score < LOW_RISK_CEILING,
            Self::Medium => (LOW_RISK_CEILING..=MEDIUM_RISK_CEILING).contains(&score),
            Self::High => score > MEDIUM_RISK_CEILING,
        }
    }

    /// Band of a risk score, `None` for NaN
    pub fn classify(score: f64) -> Option<RiskBand> {
        [Self::Low, Self::Medium, Self::High]
            .into_iter()
            .find(|band| band.contains(score))
    }
}

impl FromStr for RiskBand {
    type Err = StakescanCoreError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_ref() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(StakescanCoreError::InvalidRiskBand(s.to_string())),
        }
    }
}

impl Display for RiskBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Low => "Low",
                Self::Medium => "Medium",
                Self::High => "High",
            }
        )
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBound<T> {
    Value(T),
    Text(String),
}

/// Filter forms post unset fields as `""`. Only `null`, a missing field or a
/// blank string mean "unset"; `0` is a real bound.
fn unset_as_none<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    match Option::<RawBound<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawBound::Value(value)) => Ok(Some(value)),
        Some(RawBound::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(RawBound::Text(text)) => text.trim().parse().map(Some).map_err(de::Error::custom),
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de> + FromStr, <T as FromStr>::Err: Display"))]
pub struct Range<T> {
    #[serde(default, deserialize_with = "unset_as_none")]
    pub min: Option<T>,

    #[serde(default, deserialize_with = "unset_as_none")]
    pub max: Option<T>,
}

impl<T: PartialOrd + Copy + Into<f64>> Range<T> {
    pub fn new(min: Option<T>, max: Option<T>) -> Self {
        Self { min, max }
    }

    pub fn is_set(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// True when either set bound admits `value`
    pub fn matches_any(&self, value: T) -> bool {
        self.min.is_some_and(|min| value >= min) || self.max.is_some_and(|max| value <= max)
    }

    fn validate(&self, field: &'static str) -> Result<()> {
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(StakescanCoreError::InvalidRange {
                    field,
                    min: min.into(),
                    max: max.into(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    #[serde(default)]
    pub num_of_nominators: Range<u32>,

    #[serde(default, deserialize_with = "unset_as_none")]
    pub risk_score: Option<RiskBand>,

    #[serde(default)]
    pub own_stake: Range<f64>,

    #[serde(default)]
    pub total_stake: Range<f64>,

    /// Commission ceiling in percent
    #[serde(default, deserialize_with = "unset_as_none")]
    pub commission: Option<f64>,
}

impl FilterOptions {
    pub fn with_risk_score(mut self, band: RiskBand) -> Self {
        self.risk_score = Some(band);
        self
    }

    pub fn with_commission(mut self, ceiling: f64) -> Self {
        self.commission = Some(ceiling);
        self
    }

    pub fn with_num_of_nominators(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.num_of_nominators = Range::new(min, max);
        self
    }

    pub fn with_own_stake(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.own_stake = Range::new(min, max);
        self
    }

    pub fn with_total_stake(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.total_stake = Range::new(min, max);
        self
    }

    /// Whether any criterion is set
    pub fn is_active(&self) -> bool {
        self.risk_score.is_some()
            || self.commission.is_some()
            || self.num_of_nominators.is_set()
            || self.own_stake.is_set()
            || self.total_stake.is_set()
    }

    pub fn validate(&self) -> Result<()> {
        self.num_of_nominators.validate("numOfNominators")?;
        self.own_stake.validate("ownStake")?;
        self.total_stake.validate("totalStake")?;
        Ok(())
    }

    /// Whether at least one active criterion matches the validator
    pub fn matches(&self, validator: &Validator) -> bool {
        if self
            .risk_score
            .is_some_and(|band| band.contains(validator.risk_score))
        {
            return true;
        }

        if self
            .commission
            .is_some_and(|ceiling| validator.commission <= ceiling)
        {
            return true;
        }

        self.num_of_nominators
            .matches_any(validator.num_of_nominators)
            || self.own_stake.matches_any(validator.own_stake)
            || self.total_stake.matches_any(validator.total_stake)
    }
}

pub fn filter_validators(validators: &[Validator], options: &FilterOptions) -> Vec<Validator> {
    if !options.is_active() {
        return validators.to_vec();
    }

    validators
        .iter()
        .filter(|validator| options.matches(validator))
        .cloned()
        .collect()
}
