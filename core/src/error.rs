use thiserror::Error;

pub type Result<T> = core::result::Result<T, StakescanCoreError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StakescanCoreError {
    #[error("Invalid network value: '{0}'. Expected 'kusama' or 'polkadot'")]
    InvalidNetwork(String),

    #[error("Invalid sort key: '{0}'")]
    InvalidSortKey(String),

    #[error("Invalid sort order: '{0}'. Expected 'asc' or 'desc'")]
    InvalidSortOrder(String),

    #[error("Invalid risk band: '{0}'. Expected 'Low', 'Medium' or 'High'")]
    InvalidRiskBand(String),

    #[error("Invalid time period unit: '{0}'. Expected 'days', 'months' or 'years'")]
    InvalidTimePeriodUnit(String),

    #[error("Invalid {field} range: min {min} is greater than max {max}")]
    InvalidRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("Staking amount must be a positive number, got {0}")]
    InvalidStakingAmount(f64),

    #[error("Time period must be greater than zero")]
    InvalidTimePeriod,

    #[error("Bonded amount must be a non-negative number, got {0}")]
    InvalidBondedAmount(f64),

    #[error("Validator {stash_id} has invalid data: {reason}")]
    InvalidValidator { stash_id: String, reason: String },

    #[error("Validator {0} is not part of the current validator set")]
    UnknownValidator(String),

    #[error("Price lookup failed: {0}")]
    PriceUnavailable(String),
}

impl StakescanCoreError {
    /// Create an invalid validator error
    pub fn invalid_validator(stash_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValidator {
            stash_id: stash_id.into(),
            reason: reason.into(),
        }
    }
}
