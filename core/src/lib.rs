use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StakescanCoreError;

pub mod context;
pub mod error;
pub mod filter;
pub mod network;
pub mod overview;
pub mod price;
pub mod reward;
pub mod selection;
pub mod validator;
pub mod view;

#[derive(Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = StakescanCoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_ref() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            _ => Err(StakescanCoreError::InvalidSortOrder(s.to_string())),
        }
    }
}
