use std::time::Duration;

use stakescan_core::network::Network;

/// Configuration for the Stakescan API client
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL for the API
    pub base_url: String,

    /// Base URL of the price API
    pub price_api_url: String,

    /// Network the API serves
    pub network: Network,

    /// Request timeout in seconds
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,

    /// Enable retry on failure
    pub retry_enabled: bool,

    /// Maximum number of retries
    pub max_retries: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self::kusama()
    }
}

impl Config {
    /// Create a new configuration with Kusama defaults
    pub fn kusama() -> Self {
        Self::custom(crate::KUSAMA_BASE_URL)
    }

    /// Create a new configuration with Polkadot defaults
    pub fn polkadot() -> Self {
        Self::custom(crate::POLKADOT_BASE_URL).with_network(Network::Polkadot)
    }

    /// Default configuration for a network
    pub fn for_network(network: Network) -> Self {
        match network {
            Network::Kusama => Self::kusama(),
            Network::Polkadot => Self::polkadot(),
        }
    }

    /// Create a custom configuration
    pub fn custom(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            price_api_url: crate::COINGECKO_BASE_URL.to_string(),
            network: Network::Kusama,
            timeout: Duration::from_secs(30),
            user_agent: format!("stakescan-api-client/{}", env!("CARGO_PKG_VERSION")),
            retry_enabled: true,
            max_retries: 3,
        }
    }

    /// Set the network
    pub fn with_network(mut self, network: Network) -> Self {
        self.network = network;
        self
    }

    /// Set the price API URL
    pub fn with_price_api_url(mut self, price_api_url: impl Into<String>) -> Self {
        self.price_api_url = price_api_url.into();
        self
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Enable or disable retries
    pub fn with_retry(mut self, enabled: bool) -> Self {
        self.retry_enabled = enabled;
        self
    }

    /// Set maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}
