//! Application configuration loaded from environment variables.

use std::fmt;
use std::str::FromStr;

use crate::errors::{ListingError, Result};
use crate::types::ObjectId;

/// Largest page the fullnode accepts for `suix_getOwnedObjects`.
pub const MAX_PAGE_SIZE: usize = 50;

/// The fixed set of ledger environments a deployment can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Testnet,
    Devnet,
    Localnet,
}

impl Network {
    /// Fullnode JSON-RPC endpoint for this environment.
    pub fn fullnode_url(&self) -> &'static str {
        match self {
            Self::Mainnet => "https://fullnode.mainnet.sui.io:443",
            Self::Testnet => "https://fullnode.testnet.sui.io:443",
            Self::Devnet => "https://fullnode.devnet.sui.io:443",
            Self::Localnet => "http://127.0.0.1:9000",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Devnet => "devnet",
            Self::Localnet => "localnet",
        }
    }
}

impl FromStr for Network {
    type Err = ListingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            "devnet" => Ok(Self::Devnet),
            "localnet" => Ok(Self::Localnet),
            other => Err(ListingError::Config(format!(
                "Unknown network '{other}' (expected mainnet, testnet, devnet or localnet)"
            ))),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Package id of the published property contract
    pub package_id: ObjectId,
    /// Which ledger environment to talk to
    pub network: Network,
    /// Port for the REST API server
    pub api_port: u16,
    /// Timeout applied to every ledger request
    pub request_timeout_secs: u64,
    /// Page size used when listing an owner's objects
    pub owned_objects_page_size: usize,
}

impl Config {
    pub fn new(package_id: ObjectId, network: Network) -> Self {
        Config {
            package_id,
            network,
            api_port: 3001,
            request_timeout_secs: 30,
            owned_objects_page_size: MAX_PAGE_SIZE,
        }
    }

    pub fn from_env() -> Result<Self> {
        let package_id = env_var("LISTINGS_PACKAGE_ID")
            .map_err(|_| {
                ListingError::Config("LISTINGS_PACKAGE_ID environment variable is required".to_string())
            })?
            .parse::<ObjectId>()
            .map_err(|e| ListingError::Config(format!("Invalid LISTINGS_PACKAGE_ID: {e}")))?;

        let owned_objects_page_size: usize = env_var("OWNED_OBJECTS_PAGE_SIZE")
            .unwrap_or_else(|_| MAX_PAGE_SIZE.to_string())
            .parse()
            .map_err(|_| ListingError::Config("Invalid OWNED_OBJECTS_PAGE_SIZE".to_string()))?;
        if owned_objects_page_size == 0 || owned_objects_page_size > MAX_PAGE_SIZE {
            return Err(ListingError::Config(format!(
                "OWNED_OBJECTS_PAGE_SIZE must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        Ok(Config {
            package_id,
            network: env_var("SUI_NETWORK")
                .unwrap_or_else(|_| "testnet".to_string())
                .parse()?,
            api_port: env_var("API_PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .map_err(|_| ListingError::Config("Invalid API_PORT".to_string()))?,
            request_timeout_secs: env_var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| ListingError::Config("Invalid REQUEST_TIMEOUT_SECS".to_string()))?,
            owned_objects_page_size,
        })
    }

    /// Endpoint resolved from the configured network.
    pub fn rpc_url(&self) -> &'static str {
        self.network.fullnode_url()
    }
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| ListingError::Config(format!("Missing env var: {key}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_from_str() {
        assert_eq!("mainnet".parse::<Network>().unwrap(), Network::Mainnet);
        assert_eq!("Testnet".parse::<Network>().unwrap(), Network::Testnet);
        assert_eq!(" devnet ".parse::<Network>().unwrap(), Network::Devnet);
        assert_eq!("localnet".parse::<Network>().unwrap(), Network::Localnet);
        assert!(matches!(
            "moonnet".parse::<Network>(),
            Err(ListingError::Config(_))
        ));
    }

    #[test]
    fn testnet_endpoint() {
        let config = Config::new("0x2".parse().unwrap(), Network::Testnet);
        assert_eq!(config.rpc_url(), "https://fullnode.testnet.sui.io:443");
        assert_eq!(config.owned_objects_page_size, MAX_PAGE_SIZE);
    }
}
