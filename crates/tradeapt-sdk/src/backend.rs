//! HTTP client for the trading backend.
//!
//! [`BackendClient`] wraps the two request/response endpoints the dashboard
//! uses: free-text intent parsing and devnet faucet funding. Neither call
//! is retried; the caller turns failures into user-facing text.

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;
use tradeapt_models::{FaucetRequest, FaucetResponse, ParseRequest, ParseResponse};

use crate::endpoints::Endpoints;
use crate::error::{excerpt, SdkError};

/// Fallback error text for a failed faucet call without a backend message.
pub const FAUCET_FAILED: &str = "Faucet request failed";

/// Timeout applied to every request/response call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the backend's request/response API.
#[derive(Clone, Debug)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a client for the backend at `base_url` (e.g.
    /// `http://localhost:8000`).
    pub fn new(base_url: &str) -> Result<Self, SdkError> {
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(SdkError::Config(format!(
                "backend URL must start with http:// or https://, got `{base_url}`"
            )));
        }
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the server-sent price stream on this backend.
    pub fn price_stream_url(&self) -> String {
        Endpoints::price_stream(&self.base_url)
    }

    /// Send user text verbatim to `POST /api/ai/parse`.
    ///
    /// The JSON body is decoded whatever the HTTP status, because the
    /// backend reports parse failures as `{ success: false, error }`.
    pub async fn parse_intent(&self, text: &str) -> Result<ParseResponse, SdkError> {
        let url = Endpoints::ai_parse(&self.base_url);
        debug!(url = %url, chars = text.len(), "sending parse request");

        let res = self
            .http
            .post(url)
            .json(&ParseRequest {
                text: text.to_string(),
            })
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        decode_body(status, &body)
    }

    /// Ask `POST /wallet/faucet` to fund an account.
    ///
    /// Success requires both a 2xx status and `success: true`; anything
    /// else comes back as a failed [`FaucetResponse`] carrying the backend
    /// error text or [`FAUCET_FAILED`].
    pub async fn request_faucet(&self, request: &FaucetRequest) -> Result<FaucetResponse, SdkError> {
        let url = Endpoints::faucet(&self.base_url);
        debug!(url = %url, address = %request.address, amount_apt = request.amount_apt, "sending faucet request");

        let res = self.http.post(url).json(request).send().await?;
        let status = res.status();
        let body = res.text().await?;

        let mut reply: FaucetResponse = decode_body(status, &body)?;
        if !status.is_success() || !reply.success {
            reply.success = false;
            reply.error.get_or_insert_with(|| FAUCET_FAILED.to_string());
        }
        Ok(reply)
    }
}

fn decode_body<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, SdkError> {
    serde_json::from_str(body).map_err(|_| SdkError::Backend {
        status: status.as_u16(),
        message: excerpt(body),
    })
}
