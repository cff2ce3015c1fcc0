use stakescan_core::{error::StakescanCoreError, overview::FetchFailure};
use thiserror::Error;

/// Error types for Stakescan API client
#[derive(Error, Debug)]
pub enum StakescanApiError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error: {status_code} - {message}")]
    ApiError { status_code: u16, message: String },

    /// The account has no active nominations
    #[error("No data found for account {0}")]
    NoData(String),

    /// Address is not valid SS58
    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimitExceeded,

    /// Timeout error
    #[error("Request timed out")]
    Timeout,

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Other errors
    #[error("An error occurred: {0}")]
    Other(String),
}

impl StakescanApiError {
    /// Create an API error from status code and message
    pub fn api_error(status_code: u16, message: impl Into<String>) -> Self {
        StakescanApiError::ApiError {
            status_code,
            message: message.into(),
        }
    }

    /// Create an invalid address error
    pub fn invalid_address(address: impl Into<String>, reason: impl Into<String>) -> Self {
        StakescanApiError::InvalidAddress {
            address: address.into(),
            reason: reason.into(),
        }
    }

    /// Check if error is a rate limit error
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, StakescanApiError::RateLimitExceeded)
    }

    /// Check if the account simply has no nominations
    pub fn is_no_data(&self) -> bool {
        matches!(self, StakescanApiError::NoData(_))
    }
}

impl From<StakescanApiError> for FetchFailure {
    fn from(err: StakescanApiError) -> Self {
        match err {
            StakescanApiError::NoData(_) => FetchFailure::NoData,
            err => FetchFailure::Failed(err.to_string()),
        }
    }
}

impl From<StakescanApiError> for StakescanCoreError {
    fn from(err: StakescanApiError) -> Self {
        StakescanCoreError::PriceUnavailable(err.to_string())
    }
}
