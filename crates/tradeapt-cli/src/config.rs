//! Dashboard configuration.
//!
//! Built from environment variables at startup, then overridden by
//! command-line flags in `main`. Invalid values are rejected before the
//! terminal is taken over.

use std::time::Duration;

use tradeapt_models::{ModelError, Network, WalletAddress, WalletName};
use tradeapt_sdk::DEFAULT_RECONNECT_DELAY;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_WALLET: &str = "Petra";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: {source}")]
    Invalid {
        var: &'static str,
        #[source]
        source: ModelError,
    },

    #[error("{var}: expected a delay in milliseconds, got `{value}`")]
    InvalidDelay { var: &'static str, value: String },

    #[error("{var}: expected an http:// or https:// URL, got `{value}`")]
    InvalidUrl { var: &'static str, value: String },
}

/// Runtime configuration for the dashboard.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Backend base URL.
    pub api_url: String,
    /// Target network. Only devnet exists.
    pub network: Network,
    /// Optional fullnode API key.
    pub aptos_api_key: Option<String>,
    /// Deployed trading contract, shown on the wallet page.
    pub module_address: Option<WalletAddress>,
    /// Wallet available on this machine.
    pub wallet_name: WalletName,
    /// Address that wallet exposes; without it no wallet is installed.
    pub wallet_address: Option<WalletAddress>,
    /// Price stream retry delay.
    pub reconnect_delay: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            network: Network::Devnet,
            aptos_api_key: None,
            module_address: None,
            wallet_name: WalletName::new(DEFAULT_WALLET),
            wallet_address: None,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }
}

impl AppConfig {
    /// Build the configuration from environment variables.
    ///
    /// | Variable                  | Default                 | Description                     |
    /// |---------------------------|-------------------------|---------------------------------|
    /// | `TRADEAPT_API_URL`        | `http://localhost:8000` | backend base URL                |
    /// | `TRADEAPT_NETWORK`        | `devnet`                | network (only `devnet`)         |
    /// | `APTOS_API_KEY`           | unset                   | fullnode API key                |
    /// | `TRADEAPT_MODULE_ADDRESS` | unset                   | deployed contract address       |
    /// | `TRADEAPT_WALLET`         | `Petra`                 | locally available wallet        |
    /// | `TRADEAPT_WALLET_ADDRESS` | unset                   | account exposed by that wallet  |
    /// | `TRADEAPT_RECONNECT_MS`   | `3000`                  | price stream retry delay        |
    ///
    /// Empty values count as unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(url) = get("TRADEAPT_API_URL") {
            config.api_url = validate_url("TRADEAPT_API_URL", url)?;
        }
        if let Some(network) = get("TRADEAPT_NETWORK") {
            config.network = network.parse().map_err(|source| ConfigError::Invalid {
                var: "TRADEAPT_NETWORK",
                source,
            })?;
        }
        config.aptos_api_key = get("APTOS_API_KEY");
        if let Some(addr) = get("TRADEAPT_MODULE_ADDRESS") {
            config.module_address = Some(parse_address("TRADEAPT_MODULE_ADDRESS", &addr)?);
        }
        if let Some(name) = get("TRADEAPT_WALLET") {
            config.wallet_name = WalletName::new(&name);
        }
        if let Some(addr) = get("TRADEAPT_WALLET_ADDRESS") {
            config.wallet_address = Some(parse_address("TRADEAPT_WALLET_ADDRESS", &addr)?);
        }
        if let Some(ms) = get("TRADEAPT_RECONNECT_MS") {
            config.reconnect_delay = parse_delay("TRADEAPT_RECONNECT_MS", &ms)?;
        }
        Ok(config)
    }
}

pub fn validate_url(var: &'static str, value: String) -> Result<String, ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(value)
    } else {
        Err(ConfigError::InvalidUrl { var, value })
    }
}

fn parse_address(var: &'static str, value: &str) -> Result<WalletAddress, ConfigError> {
    WalletAddress::new(value).map_err(|source| ConfigError::Invalid { var, source })
}

fn parse_delay(var: &'static str, value: &str) -> Result<Duration, ConfigError> {
    value
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::InvalidDelay {
            var,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.api_url, "http://localhost:8000");
        assert_eq!(cfg.network, Network::Devnet);
        assert_eq!(cfg.wallet_name.as_str(), "Petra");
        assert!(cfg.wallet_address.is_none());
        assert_eq!(cfg.reconnect_delay, Duration::from_secs(3));
    }

    #[test]
    fn reads_every_variable() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("TRADEAPT_API_URL", "https://api.example.test"),
            ("TRADEAPT_NETWORK", "devnet"),
            ("APTOS_API_KEY", "key"),
            ("TRADEAPT_MODULE_ADDRESS", "0xC0FFEE"),
            ("TRADEAPT_WALLET", "Martian"),
            ("TRADEAPT_WALLET_ADDRESS", "0xabc"),
            ("TRADEAPT_RECONNECT_MS", "250"),
        ]))
        .unwrap();
        assert_eq!(cfg.api_url, "https://api.example.test");
        assert_eq!(cfg.aptos_api_key.as_deref(), Some("key"));
        assert_eq!(cfg.module_address.unwrap().as_str(), "0xc0ffee");
        assert_eq!(cfg.wallet_name.as_str(), "Martian");
        assert_eq!(cfg.wallet_address.unwrap().as_str(), "0xabc");
        assert_eq!(cfg.reconnect_delay, Duration::from_millis(250));
    }

    #[test]
    fn blank_values_are_unset() {
        let cfg = AppConfig::from_lookup(lookup(&[("APTOS_API_KEY", "  "), ("TRADEAPT_WALLET", "")]))
            .unwrap();
        assert!(cfg.aptos_api_key.is_none());
        assert_eq!(cfg.wallet_name.as_str(), "Petra");
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("TRADEAPT_NETWORK", "mainnet")])),
            Err(ConfigError::Invalid { var: "TRADEAPT_NETWORK", .. })
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("TRADEAPT_RECONNECT_MS", "soon")])),
            Err(ConfigError::InvalidDelay { .. })
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("TRADEAPT_MODULE_ADDRESS", "c0ffee")])),
            Err(ConfigError::Invalid { var: "TRADEAPT_MODULE_ADDRESS", .. })
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("TRADEAPT_API_URL", "localhost:8000")])),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }
}
