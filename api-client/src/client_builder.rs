use std::time::Duration;

use stakescan_core::network::Network;

use crate::{client::StakescanApiClient, config::Config, error::StakescanApiError};

/// Builder for creating a StakescanApiClient with custom configuration
pub struct StakescanApiClientBuilder {
    config: Config,
}

impl StakescanApiClientBuilder {
    /// Create a new builder with Kusama defaults
    pub fn new() -> Self {
        Self {
            config: Config::kusama(),
        }
    }

    /// Start from the defaults of a network
    pub fn for_network(network: Network) -> Self {
        Self {
            config: Config::for_network(network),
        }
    }

    /// Set the base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Set the price API URL
    pub fn price_api_url(mut self, price_api_url: impl Into<String>) -> Self {
        self.config.price_api_url = price_api_url.into();
        self
    }

    /// Set the network, keeping the base URL
    pub fn network(mut self, network: Network) -> Self {
        self.config.network = network;
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Enable or disable retries
    pub fn retry(mut self, enabled: bool) -> Self {
        self.config.retry_enabled = enabled;
        self
    }

    /// Set maximum number of retries
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = max_retries;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<StakescanApiClient, StakescanApiError> {
        StakescanApiClient::new(self.config)
    }
}

impl Default for StakescanApiClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
