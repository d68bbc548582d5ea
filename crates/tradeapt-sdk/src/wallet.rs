//! Wallet adapter boundary.
//!
//! The dashboard never talks to a wallet directly; it goes through a
//! [`WalletAdapter`], which lists the wallets it knows about, connects one
//! of them and reports the connected account. At most one account is
//! connected at a time.
//!
//! [`WatchOnlyWallet`] is the bundled adapter for terminal use. It exposes
//! one configured address under one configured wallet name and can observe
//! that account but cannot sign for it.

use tradeapt_models::{Network, WalletAddress, WalletInfo, WalletName, WalletReadyState};

/// Wallets the adapter can point users to, with their install pages.
pub const KNOWN_WALLETS: [(&str, &str); 3] = [
    ("Petra", "https://petra.app"),
    ("Pontem", "https://pontem.network/pontem-wallet"),
    ("Martian", "https://martianwallet.xyz"),
];

/// Wallet suggested when the user has none.
const RECOMMENDED: (&str, &str) = KNOWN_WALLETS[0];

/// The connected account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    /// Account address.
    pub address: WalletAddress,
    /// Wallet that exposed it.
    pub wallet: WalletName,
    /// Network the account lives on.
    pub network: Network,
}

/// Errors raised by a [`WalletAdapter`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    /// The wallet is known but not available on this machine.
    #[error("{name} wallet is not installed")]
    NotInstalled {
        /// Wallet name.
        name: WalletName,
        /// Install page.
        url: String,
    },

    /// No wallet with this name exists.
    #[error("unknown wallet `{0}`")]
    UnknownWallet(WalletName),

    /// The operation needs a connected wallet.
    #[error("no wallet connected")]
    NotConnected,
}

impl WalletError {
    /// Text shown to the user in the chat panel.
    pub fn install_hint(&self) -> String {
        let (rec_name, rec_url) = RECOMMENDED;
        match self {
            WalletError::NotInstalled { name, url } if !url.is_empty() => format!(
                "{name} wallet is not installed. Install the {name} extension from {url} and try again."
            ),
            WalletError::NotInstalled { name, .. } => format!(
                "{name} wallet is not installed. Install a wallet extension such as {rec_name} ({rec_url}) and try again."
            ),
            WalletError::UnknownWallet(name) => format!(
                "No wallet called {name} was found. Install a wallet extension such as {rec_name} ({rec_url}) and try again."
            ),
            WalletError::NotConnected => format!(
                "No wallet is connected. Install a wallet extension such as {rec_name} ({rec_url}), then connect it."
            ),
        }
    }
}

/// Connect / disconnect / current-account boundary to a wallet provider.
pub trait WalletAdapter: Send {
    /// Every wallet the adapter knows about, with readiness.
    fn wallets(&self) -> Vec<WalletInfo>;

    /// Connect `name` and return its account.
    ///
    /// Connecting the wallet that is already connected returns the same
    /// account.
    fn connect(&mut self, name: &WalletName) -> Result<AccountInfo, WalletError>;

    /// Drop the current connection.
    fn disconnect(&mut self) -> Result<(), WalletError>;

    /// Currently connected account, if any.
    fn account(&self) -> Option<AccountInfo>;

    /// `true` while an account is connected.
    fn is_connected(&self) -> bool {
        self.account().is_some()
    }
}

/// Adapter exposing one configured, read-only account.
#[derive(Debug, Clone)]
pub struct WatchOnlyWallet {
    name: WalletName,
    address: Option<WalletAddress>,
    network: Network,
    connected: Option<AccountInfo>,
}

impl WatchOnlyWallet {
    /// Adapter for wallet `name`, installed only when `address` is set.
    pub fn new(name: WalletName, address: Option<WalletAddress>, network: Network) -> Self {
        Self {
            name,
            address,
            network,
            connected: None,
        }
    }

    fn install_url(name: &WalletName) -> Option<&'static str> {
        KNOWN_WALLETS
            .iter()
            .find(|(known, _)| *known == name.as_str())
            .map(|(_, url)| *url)
    }

    fn ready_state(&self, name: &WalletName) -> WalletReadyState {
        if *name == self.name && self.address.is_some() {
            WalletReadyState::Installed
        } else {
            WalletReadyState::NotDetected
        }
    }
}

impl WalletAdapter for WatchOnlyWallet {
    fn wallets(&self) -> Vec<WalletInfo> {
        let mut wallets: Vec<WalletInfo> = KNOWN_WALLETS
            .iter()
            .map(|(name, url)| {
                let name = WalletName::new(name);
                WalletInfo {
                    ready_state: self.ready_state(&name),
                    name,
                    url: (*url).to_string(),
                }
            })
            .collect();
        if Self::install_url(&self.name).is_none() {
            wallets.push(WalletInfo {
                name: self.name.clone(),
                url: String::new(),
                ready_state: self.ready_state(&self.name),
            });
        }
        wallets
    }

    fn connect(&mut self, name: &WalletName) -> Result<AccountInfo, WalletError> {
        if *name == self.name {
            let Some(address) = self.address.clone() else {
                return Err(WalletError::NotInstalled {
                    name: name.clone(),
                    url: Self::install_url(name).unwrap_or_default().to_string(),
                });
            };
            let account = AccountInfo {
                address,
                wallet: name.clone(),
                network: self.network,
            };
            self.connected = Some(account.clone());
            return Ok(account);
        }
        match Self::install_url(name) {
            Some(url) => Err(WalletError::NotInstalled {
                name: name.clone(),
                url: url.to_string(),
            }),
            None => Err(WalletError::UnknownWallet(name.clone())),
        }
    }

    fn disconnect(&mut self) -> Result<(), WalletError> {
        self.connected
            .take()
            .map(|_| ())
            .ok_or(WalletError::NotConnected)
    }

    fn account(&self) -> Option<AccountInfo> {
        self.connected.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn petra_with_address() -> WatchOnlyWallet {
        WatchOnlyWallet::new(
            WalletName::new("Petra"),
            Some(WalletAddress::new("0xa11ce").unwrap()),
            Network::Devnet,
        )
    }

    #[test]
    fn configured_wallet_is_installed() {
        let wallet = petra_with_address();
        let wallets = wallet.wallets();
        assert_eq!(wallets.len(), 3);
        assert!(wallets[0].is_installed());
        assert_eq!(wallets[0].url, "https://petra.app");
        assert!(wallets[1..].iter().all(|w| !w.is_installed()));
    }

    #[test]
    fn no_address_means_nothing_installed() {
        let wallet = WatchOnlyWallet::new(WalletName::new("Petra"), None, Network::Devnet);
        assert!(wallet.wallets().iter().all(|w| !w.is_installed()));
    }

    #[test]
    fn unknown_configured_wallet_is_listed() {
        let wallet = WatchOnlyWallet::new(
            WalletName::new("Nightly"),
            Some(WalletAddress::new("0x1").unwrap()),
            Network::Devnet,
        );
        let wallets = wallet.wallets();
        assert_eq!(wallets.len(), 4);
        let nightly = wallets.last().unwrap();
        assert_eq!(nightly.name.as_str(), "Nightly");
        assert!(nightly.is_installed());
        assert!(nightly.url.is_empty());
    }

    #[test]
    fn connect_and_disconnect() {
        let mut wallet = petra_with_address();
        assert!(!wallet.is_connected());

        let account = wallet.connect(&WalletName::new("Petra")).unwrap();
        assert_eq!(account.address.as_str(), "0xa11ce");
        assert_eq!(wallet.account(), Some(account.clone()));

        // reconnecting keeps the single session
        assert_eq!(wallet.connect(&WalletName::new("Petra")).unwrap(), account);

        wallet.disconnect().unwrap();
        assert!(wallet.account().is_none());
        assert_eq!(wallet.disconnect(), Err(WalletError::NotConnected));
    }

    #[test]
    fn connect_errors() {
        let mut wallet = petra_with_address();
        assert_eq!(
            wallet.connect(&WalletName::new("Martian")),
            Err(WalletError::NotInstalled {
                name: WalletName::new("Martian"),
                url: "https://martianwallet.xyz".into(),
            })
        );
        assert_eq!(
            wallet.connect(&WalletName::new("Nope")),
            Err(WalletError::UnknownWallet(WalletName::new("Nope")))
        );

        let mut bare = WatchOnlyWallet::new(WalletName::new("Petra"), None, Network::Devnet);
        assert!(matches!(
            bare.connect(&WalletName::new("Petra")),
            Err(WalletError::NotInstalled { .. })
        ));
        assert!(!bare.is_connected());
    }

    #[test]
    fn hints_suggest_installing() {
        let not_installed = WalletError::NotInstalled {
            name: WalletName::new("Pontem"),
            url: "https://pontem.network/pontem-wallet".into(),
        };
        assert_eq!(
            not_installed.install_hint(),
            "Pontem wallet is not installed. Install the Pontem extension from https://pontem.network/pontem-wallet and try again."
        );
        assert!(WalletError::UnknownWallet(WalletName::new("X"))
            .install_hint()
            .contains("https://petra.app"));
        assert!(WalletError::NotConnected
            .install_hint()
            .starts_with("No wallet is connected."));
    }
}
