use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use stakescan_core::overview::{UserData, NO_DATA_SENTINEL};

/// Body of `GET /user/{address}`
///
/// Accounts without nominations get a bare message instead of stats.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserDataResponse {
    Data(UserData),
    Message { message: String },
}

impl UserDataResponse {
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::Message { message } if message == NO_DATA_SENTINEL)
    }
}

/// Per-coin entry of the simple price endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct CoinGeckoPrice {
    pub usd: f64,

    #[serde(default)]
    pub last_updated_at: Option<u64>,
}

pub type CoinGeckoPriceResponse = HashMap<String, CoinGeckoPrice>;
