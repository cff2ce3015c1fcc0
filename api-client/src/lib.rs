pub mod address;
pub mod client;
pub mod client_builder;
pub mod config;
pub mod error;
pub mod price;
pub mod response_type;

/// Default base URL for the Kusama Stakescan API
pub const KUSAMA_BASE_URL: &str = "https://kusama.api.stakescan.network";

/// Default base URL for the Polkadot Stakescan API
pub const POLKADOT_BASE_URL: &str = "https://polkadot.api.stakescan.network";

/// Default base URL for the CoinGecko price API
pub const COINGECKO_BASE_URL: &str = "https://api.coingecko.com";
