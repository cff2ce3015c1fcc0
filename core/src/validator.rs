//! Validator candidates as served by the Stakescan API, and the sort stage of
//! the validator pipeline.

use std::{cmp::Ordering, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, StakescanCoreError},
    filter::RiskBand,
    SortOrder,
};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validator {
    /// Stash account of the validator
    pub stash_id: String,

    /// On-chain identity, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Reward pool the validator is expected to earn per era
    pub estimated_pool_reward: f64,

    /// Normalized risk in [0, 1]
    pub risk_score: f64,

    /// Commission in percent
    pub commission: f64,

    pub num_of_nominators: u32,

    /// Self bonded stake
    pub own_stake: f64,

    /// Stake backing the validator, nominations included
    pub total_stake: f64,
}

impl Validator {
    pub fn risk_band(&self) -> Option<RiskBand> {
        RiskBand::classify(self.risk_score)
    }

    /// Check that the numeric fields are usable for reward projection
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.commission) {
            return Err(StakescanCoreError::invalid_validator(
                &self.stash_id,
                format!("commission {} is outside [0, 100]", self.commission),
            ));
        }
        if !(0.0..=1.0).contains(&self.risk_score) {
            return Err(StakescanCoreError::invalid_validator(
                &self.stash_id,
                format!("risk score {} is outside [0, 1]", self.risk_score),
            ));
        }
        for (field, value) in [
            ("estimated pool reward", self.estimated_pool_reward),
            ("own stake", self.own_stake),
            ("total stake", self.total_stake),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(StakescanCoreError::invalid_validator(
                    &self.stash_id,
                    format!("{field} {value} must be a non-negative number"),
                ));
            }
        }
        Ok(())
    }
}

/// Validator sets grouped by risk preference
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidatorMap {
    #[serde(rename = "lowriskset", alias = "low", default)]
    pub low_risk: Vec<Validator>,

    #[serde(rename = "medianriskset", alias = "medium", default)]
    pub medium_risk: Vec<Validator>,

    #[serde(rename = "highriskset", alias = "high", default)]
    pub high_risk: Vec<Validator>,

    #[serde(rename = "totalset", alias = "total", default)]
    pub total: Vec<Validator>,
}

/// Column a validator list can be ordered by
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    EstimatedPoolReward,
    RiskScore,
    Commission,
    NumOfNominators,
    TotalStake,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::EstimatedPoolReward,
        SortKey::RiskScore,
        SortKey::Commission,
        SortKey::NumOfNominators,
        SortKey::TotalStake,
    ];

    /// Compare two validators on this key, ascending
    pub fn compare(&self, a: &Validator, b: &Validator) -> Ordering {
        match self {
            Self::EstimatedPoolReward => a.estimated_pool_reward.total_cmp(&b.estimated_pool_reward),
            Self::RiskScore => a.risk_score.total_cmp(&b.risk_score),
            Self::Commission => a.commission.total_cmp(&b.commission),
            Self::NumOfNominators => a.num_of_nominators.cmp(&b.num_of_nominators),
            Self::TotalStake => a.total_stake.total_cmp(&b.total_stake),
        }
    }

    /// Label shown next to the sort selector
    pub fn label(&self) -> &'static str {
        match self {
            Self::EstimatedPoolReward => "Estimated Rewards",
            Self::RiskScore => "Risk Score",
            Self::Commission => "Commission",
            Self::NumOfNominators => "Nominators",
            Self::TotalStake => "Other Stake",
        }
    }
}

impl FromStr for SortKey {
    type Err = StakescanCoreError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.replace(['-', '_'], "").to_lowercase().as_ref() {
            "estimatedpoolreward" | "reward" | "rewards" => Ok(Self::EstimatedPoolReward),
            "riskscore" | "risk" => Ok(Self::RiskScore),
            "commission" => Ok(Self::Commission),
            "numofnominators" | "nominators" => Ok(Self::NumOfNominators),
            "totalstake" | "otherstake" => Ok(Self::TotalStake),
            _ => Err(StakescanCoreError::InvalidSortKey(s.to_string())),
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::EstimatedPoolReward => "estimatedPoolReward",
                Self::RiskScore => "riskScore",
                Self::Commission => "commission",
                Self::NumOfNominators => "numOfNominators",
                Self::TotalStake => "totalStake",
            }
        )
    }
}

/// Stable in-place sort. Validators with equal keys keep their relative order
/// in both directions.
pub fn sort_validators(validators: &mut [Validator], key: SortKey, order: SortOrder) {
    match order {
        SortOrder::Asc => validators.sort_by(|a, b| key.compare(a, b)),
        SortOrder::Desc => validators.sort_by(|a, b| key.compare(b, a)),
    }
}

pub fn sorted_validators(validators: &[Validator], key: SortKey, order: SortOrder) -> Vec<Validator> {
    let mut sorted = validators.to_vec();
    sort_validators(&mut sorted, key, order);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator(stash_id: &str, reward: f64, nominators: u32) -> Validator {
        Validator {
            stash_id: stash_id.to_string(),
            estimated_pool_reward: reward,
            risk_score: 0.5,
            commission: 5.0,
            num_of_nominators: nominators,
            own_stake: 100.0,
            total_stake: 1000.0,
            ..Default::default()
        }
    }

    fn stash_ids(validators: &[Validator]) -> Vec<&str> {
        validators.iter().map(|v| v.stash_id.as_str()).collect()
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = serde_json::json!({
            "stashId": "A",
            "estimatedPoolReward": 12.5,
            "riskScore": 0.2,
            "commission": 5,
            "numOfNominators": 10,
            "ownStake": 100,
            "totalStake": 1000
        });
        let v: Validator = serde_json::from_value(json).unwrap();

        assert_eq!(v.stash_id, "A");
        assert_eq!(v.name, None);
        assert_eq!(v.commission, 5.0);
        assert_eq!(v.num_of_nominators, 10);
        assert_eq!(v.risk_band(), Some(RiskBand::Low));
    }

    #[test]
    fn test_validate_rejects_bad_commission() {
        let mut v = validator("A", 1.0, 1);
        assert!(v.validate().is_ok());

        v.commission = 101.0;
        assert!(matches!(
            v.validate(),
            Err(StakescanCoreError::InvalidValidator { .. })
        ));

        v.commission = 5.0;
        v.total_stake = f64::NAN;
        assert!(v.validate().is_err());
    }

    #[test]
    fn test_sort_key_from_str() {
        assert_eq!(
            "estimatedPoolReward".parse::<SortKey>().unwrap(),
            SortKey::EstimatedPoolReward
        );
        assert_eq!("num-of-nominators".parse::<SortKey>().unwrap(), SortKey::NumOfNominators);
        assert_eq!("other_stake".parse::<SortKey>().unwrap(), SortKey::TotalStake);
        assert!("apy".parse::<SortKey>().is_err());

        for key in SortKey::ALL {
            assert_eq!(key.to_string().parse::<SortKey>().unwrap(), key);
        }
    }

    #[test]
    fn test_sort_is_idempotent() {
        let validators = vec![
            validator("A", 3.0, 5),
            validator("B", 1.0, 7),
            validator("C", 2.0, 1),
        ];

        for key in SortKey::ALL {
            for order in [SortOrder::Asc, SortOrder::Desc] {
                let once = sorted_validators(&validators, key, order);
                let twice = sorted_validators(&once, key, order);
                assert_eq!(once, twice);
            }
        }
    }

    #[test]
    fn test_sort_orders_by_key() {
        let validators = vec![
            validator("A", 3.0, 5),
            validator("B", 1.0, 7),
            validator("C", 2.0, 1),
        ];

        let asc = sorted_validators(&validators, SortKey::EstimatedPoolReward, SortOrder::Asc);
        assert_eq!(stash_ids(&asc), vec!["B", "C", "A"]);

        let by_nominators = sorted_validators(&validators, SortKey::NumOfNominators, SortOrder::Desc);
        assert_eq!(stash_ids(&by_nominators), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_desc_reverses_asc_for_every_key() {
        let mut validators = vec![
            validator("A", 3.0, 5),
            validator("B", 1.0, 7),
            validator("C", 2.0, 1),
        ];
        for (v, (risk, commission, total)) in validators
            .iter_mut()
            .zip([(0.1, 9.0, 500.0), (0.7, 2.0, 3000.0), (0.4, 4.0, 1200.0)])
        {
            v.risk_score = risk;
            v.commission = commission;
            v.total_stake = total;
        }

        for key in SortKey::ALL {
            let asc = sorted_validators(&validators, key, SortOrder::Asc);
            let mut desc = sorted_validators(&validators, key, SortOrder::Desc);
            desc.reverse();
            assert_eq!(asc, desc, "{key} desc is not the reverse of asc");
        }
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let validators = vec![
            validator("A", 1.0, 5),
            validator("B", 1.0, 7),
            validator("C", 0.5, 1),
        ];

        let asc = sorted_validators(&validators, SortKey::EstimatedPoolReward, SortOrder::Asc);
        assert_eq!(stash_ids(&asc), vec!["C", "A", "B"]);

        let desc = sorted_validators(&validators, SortKey::EstimatedPoolReward, SortOrder::Desc);
        assert_eq!(stash_ids(&desc), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_validator_map_deserialize() {
        let json = serde_json::json!({
            "lowriskset": [],
            "totalset": [{
                "stashId": "A",
                "estimatedPoolReward": 1.0,
                "riskScore": 0.2,
                "commission": 5,
                "numOfNominators": 10,
                "ownStake": 100,
                "totalStake": 1000
            }]
        });
        let map: ValidatorMap = serde_json::from_value(json).unwrap();

        assert!(map.low_risk.is_empty());
        assert!(map.medium_risk.is_empty());
        assert_eq!(map.total.len(), 1);

        // Calculator state stores the same sets under short keys.
        let short: ValidatorMap = serde_json::from_value(serde_json::json!({
            "total": serde_json::to_value(&map.total).unwrap()
        }))
        .unwrap();
        assert_eq!(short.total, map.total);
    }
}
