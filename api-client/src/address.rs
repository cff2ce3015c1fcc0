use sp_core::crypto::{AccountId32, Ss58AddressFormat, Ss58Codec};
use stakescan_core::network::Network;

use crate::error::StakescanApiError;

/// Re-encode an SS58 address with the network's prefix.
///
/// The API indexes accounts by their network-specific encoding, so an address
/// copied from a generic (prefix 42) wallet would otherwise miss.
pub fn normalize_address(address: &str, network: Network) -> Result<String, StakescanApiError> {
    let trimmed = address.trim();
    let (account, _) = AccountId32::from_ss58check_with_version(trimmed)
        .map_err(|e| StakescanApiError::invalid_address(trimmed, format!("{e:?}")))?;

    let format = Ss58AddressFormat::custom(network.params().ss58_prefix);
    Ok(account.to_ss58check_with_version(format))
}
