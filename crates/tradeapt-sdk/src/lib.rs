//! # Trade.apt SDK
//!
//! Client-side plumbing for the **Trade.apt** dashboard.
//!
//! The SDK provides:
//!
//! * [`BackendClient`]: intent parsing and devnet faucet calls against
//!   the trading backend.
//! * [`ChainClient`]: account balance lookups on the fullnode REST API.
//! * [`PriceStream`]: a single owned server-sent-event connection with
//!   fixed-delay reconnect, folded into a
//!   [`PriceBook`](tradeapt_models::PriceBook) by the caller.
//! * [`WalletAdapter`]: the wallet boundary, with the bundled
//!   [`WatchOnlyWallet`].
//! * [`TradeSigner`]: the approve-and-sign seam, with the bundled
//!   [`SimulatedSigner`].
//! * [`Endpoints`]: canonical URL construction.
//! * [`SdkError`]: unified error type for all network operations.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use tradeapt_sdk::BackendClient;
//!
//! # async fn run() -> Result<(), tradeapt_sdk::SdkError> {
//! let backend = BackendClient::new("http://localhost:8000")?;
//! let reply = backend.parse_intent("buy $20 APT if price drops to $7").await?;
//! if let Some(intent) = reply.intent() {
//!     println!("{}", intent.summary());
//! }
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod chain;
pub mod endpoints;
pub mod error;
pub mod price_stream;
pub mod signer;
pub mod wallet;

pub use backend::{BackendClient, FAUCET_FAILED};
pub use chain::ChainClient;
pub use endpoints::Endpoints;
pub use error::SdkError;
pub use price_stream::{
    ConnectionPhase, PriceFeedEvent, PriceStream, PriceStreamHandle, ReconnectState, SseDecoder,
    DEFAULT_RECONNECT_DELAY,
};
pub use signer::{SignOutcome, SimulatedSigner, TradeSigner, SIMULATED_SIGN_DELAY};
pub use wallet::{AccountInfo, WalletAdapter, WalletError, WatchOnlyWallet};

#[cfg(test)]
pub(crate) mod test_support {
    /// Serve `app` on an ephemeral local port and return its base URL.
    pub(crate) async fn serve(app: axum::Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }
}
