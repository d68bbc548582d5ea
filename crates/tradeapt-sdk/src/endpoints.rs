//! Canonical URL definitions for the backend and the fullnode API.
//!
//! Every URL the dashboard requests is built through [`Endpoints`], so the
//! clients, the tests and the development backend agree on one layout.
//!
//! # Layout
//!
//! ```text
//! {api}/api/ai/parse                     ← POST free text, get a TradeIntent
//! {api}/api/prices/stream                ← GET server-sent price events
//! {api}/wallet/faucet                    ← POST devnet funding request
//! {fullnode}/accounts/{address}          ← GET account info
//! {fullnode}/accounts/{address}/resources ← GET account resources
//! ```

use tradeapt_models::WalletAddress;

/// Resource type holding an account's APT balance.
pub const APT_COIN_STORE: &str = "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>";

/// Path of the intent parsing endpoint.
pub const AI_PARSE_PATH: &str = "/api/ai/parse";
/// Path of the price event stream.
pub const PRICE_STREAM_PATH: &str = "/api/prices/stream";
/// Path of the faucet endpoint.
pub const FAUCET_PATH: &str = "/wallet/faucet";

/// Central authority for every URL used by the SDK.
///
/// # Examples
///
/// ```
/// use tradeapt_models::WalletAddress;
/// use tradeapt_sdk::Endpoints;
///
/// assert_eq!(
///     Endpoints::ai_parse("http://localhost:8000/"),
///     "http://localhost:8000/api/ai/parse",
/// );
///
/// let addr = WalletAddress::new("0xabc").unwrap();
/// assert_eq!(
///     Endpoints::account_resources("https://node/v1", &addr),
///     "https://node/v1/accounts/0xabc/resources",
/// );
/// ```
pub struct Endpoints;

impl Endpoints {
    /// `POST` target for free-text intent parsing.
    pub fn ai_parse(api_base: &str) -> String {
        join(api_base, AI_PARSE_PATH)
    }

    /// `GET` target for the server-sent price stream.
    pub fn price_stream(api_base: &str) -> String {
        join(api_base, PRICE_STREAM_PATH)
    }

    /// `POST` target for faucet requests.
    pub fn faucet(api_base: &str) -> String {
        join(api_base, FAUCET_PATH)
    }

    /// Fullnode account info.
    pub fn account(fullnode: &str, address: &WalletAddress) -> String {
        join(fullnode, &format!("/accounts/{address}"))
    }

    /// Fullnode account resource listing.
    pub fn account_resources(fullnode: &str, address: &WalletAddress) -> String {
        join(fullnode, &format!("/accounts/{address}/resources"))
    }
}

fn join(base: &str, path: &str) -> String {
    format!("{}{path}", base.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_paths() {
        let base = "http://localhost:8000";
        assert_eq!(Endpoints::price_stream(base), "http://localhost:8000/api/prices/stream");
        assert_eq!(Endpoints::faucet(base), "http://localhost:8000/wallet/faucet");
    }

    #[test]
    fn trailing_slashes_are_collapsed() {
        assert_eq!(Endpoints::faucet("http://api//"), "http://api/wallet/faucet");
    }

    #[test]
    fn account_paths() {
        let addr = WalletAddress::new("0xABC").unwrap();
        assert_eq!(
            Endpoints::account("https://api.devnet.aptoslabs.com/v1", &addr),
            "https://api.devnet.aptoslabs.com/v1/accounts/0xabc"
        );
    }
}
