use std::time::Duration;

use log::{debug, warn};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use stakescan_core::{
    network::Network,
    overview::{UserData, NO_DATA_SENTINEL},
    validator::{Validator, ValidatorMap},
};

use crate::{
    address::normalize_address,
    config::Config,
    error::StakescanApiError,
    price::CoinGeckoPriceSource,
    response_type::UserDataResponse,
};

/// Main client for interacting with the Stakescan API
#[derive(Debug, Clone)]
pub struct StakescanApiClient {
    /// Reqwest client
    client: Client,
    config: Config,
}

impl StakescanApiClient {
    /// Create a new Stakescan API client with the given configuration
    pub fn new(config: Config) -> Result<Self, StakescanApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a client with Kusama defaults
    pub fn kusama() -> Result<Self, StakescanApiError> {
        Self::new(Config::kusama())
    }

    /// Create a client with Polkadot defaults
    pub fn polkadot() -> Result<Self, StakescanApiError> {
        Self::new(Config::polkadot())
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn network(&self) -> Network {
        self.config.network
    }

    /// Make a GET request
    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, StakescanApiError> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        self.request(&url).await
    }

    /// Make an HTTP request with optional retry logic
    async fn request<T: DeserializeOwned>(&self, url: &str) -> Result<T, StakescanApiError> {
        let mut retries = 0;
        let max_retries = if self.config.retry_enabled {
            self.config.max_retries
        } else {
            0
        };

        loop {
            debug!("GET {url}");
            let result = match self.client.get(url).send().await {
                Ok(response) => self.handle_response(response).await,
                Err(e) if e.is_timeout() => Err(StakescanApiError::Timeout),
                Err(e) => Err(e.into()),
            };

            match result {
                Ok(data) => return Ok(data),
                Err(e) => {
                    if retries >= max_retries || !self.should_retry(&e) {
                        return Err(e);
                    }
                    retries += 1;
                    warn!("Request to {url} failed ({e}), retry {retries}/{max_retries}");
                    let delay = backoff_delay(retries);
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Handle HTTP response
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, StakescanApiError> {
        let status = response.status();

        if status.is_success() {
            response.json::<T>().await.map_err(Into::into)
        } else {
            let status_code = status.as_u16();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            match status {
                StatusCode::NOT_FOUND => Err(StakescanApiError::NotFound(error_text)),
                StatusCode::TOO_MANY_REQUESTS => Err(StakescanApiError::RateLimitExceeded),
                StatusCode::REQUEST_TIMEOUT => Err(StakescanApiError::Timeout),
                _ => Err(StakescanApiError::api_error(status_code, error_text)),
            }
        }
    }

    /// Determine if an error should trigger a retry
    fn should_retry(&self, error: &StakescanApiError) -> bool {
        matches!(
            error,
            StakescanApiError::Timeout | StakescanApiError::HttpError(_)
        )
    }

    /// Get the staking overview of a nominator
    ///
    /// The address is re-encoded for the configured network before the
    /// lookup. Accounts without nominations yield [`StakescanApiError::NoData`].
    ///
    /// # Arguments
    ///
    /// * `address` - SS58 address of the stash account
    pub async fn get_user_data(&self, address: &str) -> Result<UserData, StakescanApiError> {
        let address = normalize_address(address, self.config.network)?;

        let response = match self.get(&format!("/user/{address}")).await {
            Ok(response) => response,
            Err(StakescanApiError::NotFound(body)) if body.contains(NO_DATA_SENTINEL) => {
                return Err(StakescanApiError::NoData(address));
            }
            Err(e) => return Err(e),
        };

        match response {
            UserDataResponse::Data(data) => Ok(data),
            response if response.is_no_data() => Err(StakescanApiError::NoData(address)),
            UserDataResponse::Message { message } => {
                Err(StakescanApiError::api_error(StatusCode::OK.as_u16(), message))
            }
        }
    }

    /// Get the validator risk sets
    pub async fn get_validator_map(&self) -> Result<ValidatorMap, StakescanApiError> {
        self.get("/rewards/risk-set").await
    }

    /// Get every validator regardless of risk band
    pub async fn get_validators(&self) -> Result<Vec<Validator>, StakescanApiError> {
        Ok(self.get_validator_map().await?.total)
    }

    /// Price source for the configured network's token
    pub fn price_source(&self) -> Result<CoinGeckoPriceSource, StakescanApiError> {
        CoinGeckoPriceSource::from_config(&self.config)
    }
}

/// Exponential backoff, capped at [`MAX_BACKOFF`]
fn backoff_delay(retries: u32) -> Duration {
    let millis = 2u64.saturating_pow(retries).saturating_mul(100);
    Duration::from_millis(millis).min(MAX_BACKOFF)
}

const MAX_BACKOFF: Duration = Duration::from_secs(30);
