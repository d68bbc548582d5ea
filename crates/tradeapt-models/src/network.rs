//! Network selection and wallet identity.
//!
//! The dashboard runs against a single disposable test network. A
//! [`Network`] value carries every URL that depends on that choice, so
//! switching networks later means adding a variant here and nowhere else.
//!
//! Wallets are identified by a [`WalletName`] (the extension's display
//! name) and expose a [`WalletAddress`] once connected.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::units::format_address;

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

/// The blockchain network the dashboard talks to.
///
/// # Examples
///
/// ```
/// use tradeapt_models::Network;
///
/// let network: Network = "devnet".parse().unwrap();
/// assert_eq!(network.to_string(), "devnet");
/// assert!("mainnet".parse::<Network>().is_err());
/// ```
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Network {
    /// Disposable development network; tokens have no value.
    #[default]
    Devnet,
}

impl Network {
    /// Fullnode REST API base URL.
    pub fn fullnode_url(self) -> &'static str {
        match self {
            Network::Devnet => "https://api.devnet.aptoslabs.com/v1",
        }
    }

    /// Block explorer landing page for this network.
    pub fn explorer_url(self) -> &'static str {
        match self {
            Network::Devnet => "https://explorer.aptoslabs.com/?network=devnet",
        }
    }

    /// Explorer page for a single account.
    pub fn explorer_account_url(self, address: &WalletAddress) -> String {
        match self {
            Network::Devnet => {
                format!("https://explorer.aptoslabs.com/account/{address}?network=devnet")
            }
        }
    }

    /// Official web faucet for this network.
    pub fn faucet_page_url(self) -> &'static str {
        match self {
            Network::Devnet => "https://aptoslabs.com/testnet-faucet",
        }
    }

    /// Human-readable label used in badges (`Devnet`).
    pub fn label(self) -> &'static str {
        match self {
            Network::Devnet => "Devnet",
        }
    }
}

impl FromStr for Network {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "devnet" => Ok(Network::Devnet),
            _ => Err(ModelError::UnsupportedNetwork {
                value: s.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// WalletAddress
// ---------------------------------------------------------------------------

/// An account address: `0x` followed by 1 to 64 hex digits, stored
/// lower-cased.
///
/// # Examples
///
/// ```
/// use tradeapt_models::WalletAddress;
///
/// let addr: WalletAddress = "0xABCDEF0123456789".parse().unwrap();
/// assert_eq!(addr.as_str(), "0xabcdef0123456789");
/// assert_eq!(addr.short(4), "0xabcd...6789");
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Validate and normalise an address.
    pub fn new(value: &str) -> Result<Self, ModelError> {
        let trimmed = value.trim();
        let Some(hex) = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        else {
            return Err(ModelError::InvalidAddress {
                value: value.to_string(),
                reason: "must start with 0x".into(),
            });
        };
        if hex.is_empty() || hex.len() > 64 {
            return Err(ModelError::InvalidAddress {
                value: value.to_string(),
                reason: "must have between 1 and 64 hex digits".into(),
            });
        }
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ModelError::InvalidAddress {
                value: value.to_string(),
                reason: "must contain only hex digits after 0x".into(),
            });
        }
        Ok(Self(format!("0x{}", hex.to_ascii_lowercase())))
    }

    /// Return the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened form for headers and badges.
    pub fn short(&self, chars: usize) -> String {
        format_address(&self.0, chars)
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for WalletAddress {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.0
    }
}

// ---------------------------------------------------------------------------
// WalletName / WalletInfo
// ---------------------------------------------------------------------------

/// Display name of a browser or desktop wallet (e.g. `Petra`).
///
/// Comparison is case-sensitive, matching how wallet adapters key their
/// registries.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct WalletName(String);

impl WalletName {
    /// Create a new wallet name.
    pub fn new(name: &str) -> Self {
        Self(name.to_string())
    }

    /// Return the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WalletName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl FromStr for WalletName {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

/// Whether a wallet can be used right now.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString,
)]
pub enum WalletReadyState {
    /// The wallet is present and can be connected.
    Installed,
    /// The wallet was not found; it must be installed first.
    NotDetected,
}

/// A wallet known to the adapter, with its install page and readiness.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WalletInfo {
    /// Display name.
    pub name: WalletName,
    /// Install / homepage URL.
    pub url: String,
    /// Current readiness.
    pub ready_state: WalletReadyState,
}

impl WalletInfo {
    /// `true` when the wallet can be connected without installing anything.
    pub fn is_installed(&self) -> bool {
        self.ready_state == WalletReadyState::Installed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_devnet_is_accepted() {
        assert_eq!("devnet".parse::<Network>().unwrap(), Network::Devnet);
        assert_eq!(" DEVNET ".parse::<Network>().unwrap(), Network::Devnet);
        assert!(matches!(
            "testnet".parse::<Network>(),
            Err(ModelError::UnsupportedNetwork { .. })
        ));
    }

    #[test]
    fn network_serialises_lowercase() {
        assert_eq!(serde_json::to_string(&Network::Devnet).unwrap(), "\"devnet\"");
        assert_eq!(Network::Devnet.label(), "Devnet");
    }

    #[test]
    fn address_validation() {
        assert!(WalletAddress::new("0x1").is_ok());
        assert!(WalletAddress::new("1234").is_err());
        assert!(WalletAddress::new("0x").is_err());
        assert!(WalletAddress::new("0xnothex").is_err());
        assert!(WalletAddress::new(&format!("0x{}", "a".repeat(65))).is_err());
    }

    #[test]
    fn address_serde_validates() {
        let ok: WalletAddress = serde_json::from_str("\"0xABC\"").unwrap();
        assert_eq!(ok.as_str(), "0xabc");
        assert!(serde_json::from_str::<WalletAddress>("\"abc\"").is_err());
    }

    #[test]
    fn explorer_account_link() {
        let addr = WalletAddress::new("0xabc").unwrap();
        assert_eq!(
            Network::Devnet.explorer_account_url(&addr),
            "https://explorer.aptoslabs.com/account/0xabc?network=devnet"
        );
    }

    #[test]
    fn ready_state_parses() {
        assert_eq!(
            "NotDetected".parse::<WalletReadyState>().unwrap(),
            WalletReadyState::NotDetected
        );
        assert_eq!(WalletReadyState::Installed.to_string(), "Installed");
        assert!("Loadable".parse::<WalletReadyState>().is_err());
    }
}
