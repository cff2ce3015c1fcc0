use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use stakescan_core::{
    error::{Result as CoreResult, StakescanCoreError},
    network::Network,
    price::PriceSource,
};
use url::Url;

use crate::{config::Config, error::StakescanApiError, response_type::CoinGeckoPriceResponse};

const SIMPLE_PRICE_PATH: &str = "/api/v3/simple/price";

/// USD quote of the network token from CoinGecko's simple price endpoint
#[derive(Debug, Clone)]
pub struct CoinGeckoPriceSource {
    client: Client,
    api_url: Url,
    network: Network,
}

impl CoinGeckoPriceSource {
    pub fn new(network: Network, timeout: Duration) -> Result<Self, StakescanApiError> {
        let api_url = parse_url(crate::COINGECKO_BASE_URL)?;

        let client = Client::builder()
            .timeout(timeout)
            // The free tier rejects requests without a user agent
            .user_agent(format!("stakescan-api-client/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_url,
            network,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, StakescanApiError> {
        let source = Self::new(config.network, config.timeout)?;
        Ok(source.with_api_url(parse_url(&config.price_api_url)?))
    }

    /// Point at another host, e.g. a mock server
    pub fn with_api_url(mut self, url: Url) -> Self {
        self.api_url = url;
        self
    }

    async fn fetch_price(&self) -> Result<f64, StakescanApiError> {
        let coin = self.network.params().price_id;

        let mut url = self.api_url.clone();
        url.set_path(SIMPLE_PRICE_PATH);
        url.query_pairs_mut()
            .append_pair("ids", coin)
            .append_pair("vs_currencies", "usd")
            .append_pair("include_last_updated_at", "true");

        let response = self.client.get(url).send().await?.error_for_status()?;
        let data: CoinGeckoPriceResponse = response.json().await?;

        let quote = data
            .get(coin)
            .ok_or_else(|| StakescanApiError::Other(format!("coin {coin} not found in response")))?;
        debug!("{coin} quoted at {} USD (updated {:?})", quote.usd, quote.last_updated_at);

        Ok(quote.usd)
    }
}

#[async_trait]
impl PriceSource for CoinGeckoPriceSource {
    async fn get_price(&self) -> CoreResult<f64> {
        let price = self.fetch_price().await?;
        if !price.is_finite() || price < 0.0 {
            return Err(StakescanCoreError::PriceUnavailable(format!(
                "invalid quote {price}"
            )));
        }
        Ok(price)
    }

    fn name(&self) -> String {
        format!("CoinGeckoPriceSource({})", self.network.params().token_symbol)
    }
}

fn parse_url(url: &str) -> Result<Url, StakescanApiError> {
    Url::parse(url).map_err(|e| StakescanApiError::InvalidUrl(format!("{url}: {e}")))
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;

    use super::*;

    fn source_for(server: &MockServer, network: Network) -> CoinGeckoPriceSource {
        CoinGeckoPriceSource::new(network, Duration::from_secs(10))
            .unwrap()
            .with_api_url(server.base_url().parse().unwrap())
    }

    #[tokio::test]
    async fn test_ksm_price_success() {
        let server = MockServer::start();

        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v3/simple/price")
                .query_param("ids", "kusama")
                .query_param("vs_currencies", "usd");
            then.status(200).json_body(serde_json::json!({
                "kusama": {"usd": 27.35, "last_updated_at": 1706547200}
            }));
        });

        let price = source_for(&server, Network::Kusama).get_price().await.unwrap();

        mock.assert();
        assert_eq!(price, 27.35);
    }

    #[tokio::test]
    async fn test_dot_price_uses_polkadot_id() {
        let server = MockServer::start();

        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v3/simple/price")
                .query_param("ids", "polkadot");
            then.status(200)
                .json_body(serde_json::json!({"polkadot": {"usd": 6.1}}));
        });

        let source = source_for(&server, Network::Polkadot);
        assert_eq!(source.get_price().await.unwrap(), 6.1);
        assert_eq!(source.name(), "CoinGeckoPriceSource(DOT)");
        mock.assert();
    }

    #[tokio::test]
    async fn test_handles_http_error() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/api/v3/simple/price");
            then.status(500);
        });

        let result = source_for(&server, Network::Kusama).get_price().await;
        assert!(matches!(result, Err(StakescanCoreError::PriceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_handles_missing_coin_data() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/api/v3/simple/price");
            then.status(200)
                .json_body(serde_json::json!({"bitcoin": {"usd": 50000.0}}));
        });

        let err = source_for(&server, Network::Kusama).get_price().await.unwrap_err();
        assert!(err.to_string().contains("coin kusama not found"));
    }

    #[test]
    fn test_from_config_rejects_bad_url() {
        let config = Config::kusama().with_price_api_url("not a url");
        assert!(matches!(
            CoinGeckoPriceSource::from_config(&config),
            Err(StakescanApiError::InvalidUrl(_))
        ));
    }
}
