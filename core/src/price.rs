use async_trait::async_trait;

use crate::error::{Result, StakescanCoreError};

/// Source of the USD price of the network token
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Price of one whole token in USD
    async fn get_price(&self) -> Result<f64>;

    /// Returns the name of this price source
    fn name(&self) -> String;
}

/// Fixed price, used when no feed is reachable and in tests
#[derive(Clone, Copy, Debug)]
pub struct StaticPriceSource {
    price: f64,
}

impl StaticPriceSource {
    pub fn new(price: f64) -> Self {
        Self { price }
    }
}

#[async_trait]
impl PriceSource for StaticPriceSource {
    async fn get_price(&self) -> Result<f64> {
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(StakescanCoreError::PriceUnavailable(format!(
                "static price {} is not a valid quote",
                self.price
            )));
        }
        Ok(self.price)
    }

    fn name(&self) -> String {
        "static".to_string()
    }
}
