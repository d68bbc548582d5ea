//! Read-only access to the fullnode REST API.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use tradeapt_models::{octas_to_apt, Network, WalletAddress};

use crate::endpoints::{Endpoints, APT_COIN_STORE};
use crate::error::{excerpt, SdkError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// One entry of `GET /accounts/{address}/resources`.
#[derive(Deserialize, Debug)]
struct AccountResource {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

/// Client for balance and account lookups on one network's fullnode.
#[derive(Clone, Debug)]
pub struct ChainClient {
    http: reqwest::Client,
    fullnode: String,
    api_key: Option<String>,
}

impl ChainClient {
    /// Client for the public fullnode of `network`.
    pub fn new(network: Network, api_key: Option<String>) -> Result<Self, SdkError> {
        Self::with_fullnode(network.fullnode_url(), api_key)
    }

    /// Client for an explicit fullnode base URL (tests, private nodes).
    pub fn with_fullnode(fullnode: &str, api_key: Option<String>) -> Result<Self, SdkError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            fullnode: fullnode.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.is_empty()),
        })
    }

    /// Fullnode base URL.
    pub fn fullnode(&self) -> &str {
        &self.fullnode
    }

    /// APT balance of `address`.
    ///
    /// An account the chain has never seen holds `0.0` APT, as does one
    /// without a coin store.
    pub async fn account_balance(&self, address: &WalletAddress) -> Result<f64, SdkError> {
        let url = Endpoints::account_resources(&self.fullnode, address);
        debug!(url = %url, "fetching account resources");

        let res = self.get(&url).send().await?;
        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(0.0);
        }
        let body = res.text().await?;
        if !status.is_success() {
            return Err(SdkError::Backend {
                status: status.as_u16(),
                message: excerpt(&body),
            });
        }

        let resources: Vec<AccountResource> = serde_json::from_str(&body)?;
        let octas = resources
            .iter()
            .find(|resource| resource.kind == APT_COIN_STORE)
            .map(coin_value)
            .transpose()?
            .unwrap_or(0);
        Ok(octas_to_apt(octas))
    }

    /// `true` if the account exists on chain.
    pub async fn account_exists(&self, address: &WalletAddress) -> Result<bool, SdkError> {
        let url = Endpoints::account(&self.fullnode, address);
        let res = self.get(&url).send().await?;
        match res.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(SdkError::Backend {
                status: status.as_u16(),
                message: excerpt(&res.text().await?),
            }),
        }
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.http.get(url);
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

/// The fullnode encodes u64 amounts as decimal strings.
fn coin_value(resource: &AccountResource) -> Result<u64, SdkError> {
    let raw = &resource.data["coin"]["value"];
    let parsed = match raw {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    };
    parsed.ok_or_else(|| SdkError::Backend {
        status: 200,
        message: format!("unexpected coin value: {raw}"),
    })
}
