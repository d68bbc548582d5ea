mod fixtures;
mod market;

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{
        sse::{Event, Sse},
        IntoResponse, Json,
    },
    routing::{get, post},
    Router,
};
use clap::Parser;
use futures::Stream;
use serde::Deserialize;
use tracing::{info, warn};
use tradeapt_models::{FaucetResponse, Network, ParseRequest, ParseResponse, WalletAddress};

const TICK: Duration = Duration::from_secs(1);
const MAX_FAUCET_APT: f64 = 10.0;

#[derive(Parser, Debug)]
#[command(name = "mock-backend")]
#[command(about = "Development backend for the Trade.apt dashboard")]
struct Args {
    /// Port to listen on
    #[arg(long, default_value_t = 8000)]
    port: u16,
}

fn app() -> Router {
    Router::new()
        .route("/api/ai/parse", post(parse))
        .route("/api/prices/stream", get(prices))
        .route("/wallet/faucet", post(faucet))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port)).await?;
    info!(port = args.port, "mock backend listening");
    axum::serve(listener, app()).await?;
    Ok(())
}

// --- Endpoints ---

async fn parse(Json(request): Json<ParseRequest>) -> Json<ParseResponse> {
    match fixtures::intent_for(&request.text) {
        Some(intent) => {
            info!(text = %request.text, "matched canned intent");
            Json(ParseResponse {
                success: true,
                parsed: Some(intent),
                message: None,
                error: None,
            })
        }
        None => {
            info!(text = %request.text, "no canned intent");
            Json(ParseResponse {
                success: false,
                error: Some(fixtures::UNKNOWN_PHRASE.to_string()),
                ..ParseResponse::default()
            })
        }
    }
}

async fn prices() -> Sse<impl Stream<Item = Result<Event, std::convert::Infallible>>> {
    info!("price stream subscriber connected");
    Sse::new(market::price_events(TICK))
}

/// Loosely typed so bad input gets a readable error instead of a 422.
#[derive(Deserialize, Debug)]
struct FaucetBody {
    address: String,
    amount_apt: f64,
    network: String,
}

fn check_faucet(body: &FaucetBody) -> Result<WalletAddress, String> {
    let address = WalletAddress::new(&body.address).map_err(|e| e.to_string())?;
    if body.network.parse::<Network>() != Ok(Network::Devnet) {
        return Err(format!("Faucet is only available on devnet, not {}", body.network));
    }
    if !(body.amount_apt > 0.0 && body.amount_apt <= MAX_FAUCET_APT) {
        return Err(format!("amount_apt must be between 0 and {MAX_FAUCET_APT}"));
    }
    Ok(address)
}

async fn faucet(Json(body): Json<FaucetBody>) -> impl IntoResponse {
    match check_faucet(&body) {
        Ok(address) => {
            info!(address = %address, amount_apt = body.amount_apt, "faucet request granted");
            (
                StatusCode::OK,
                Json(FaucetResponse {
                    success: true,
                    error: None,
                }),
            )
        }
        Err(error) => {
            warn!(address = %body.address, error = %error, "faucet request rejected");
            (
                StatusCode::BAD_REQUEST,
                Json(FaucetResponse {
                    success: false,
                    error: Some(error),
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tradeapt_models::FaucetRequest;
    use tradeapt_sdk::{BackendClient, PriceFeedEvent, PriceStream};

    async fn serve() -> BackendClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app()).await.unwrap();
        });
        BackendClient::new(&format!("http://{addr}")).unwrap()
    }

    fn body(address: &str, amount_apt: f64, network: &str) -> FaucetBody {
        FaucetBody {
            address: address.into(),
            amount_apt,
            network: network.into(),
        }
    }

    #[tokio::test]
    async fn parse_answers_fixture_phrase() {
        let client = serve().await;
        let reply = client
            .parse_intent("buy $20 APT if price drops to $7")
            .await
            .unwrap();
        let intent = reply.intent().unwrap();
        assert_eq!(intent.headline(), "BUY $20 USDC → APT (<= $7)");
    }

    #[tokio::test]
    async fn parse_rejects_unknown_phrase() {
        let client = serve().await;
        let reply = client.parse_intent("sell everything").await.unwrap();
        assert!(reply.intent().is_none());
        assert_eq!(reply.error.as_deref(), Some(fixtures::UNKNOWN_PHRASE));
    }

    #[tokio::test]
    async fn faucet_grants_devnet_requests() {
        let client = serve().await;
        let reply = client
            .request_faucet(&FaucetRequest {
                address: WalletAddress::new("0xabc").unwrap(),
                amount_apt: 1.0,
                network: Network::Devnet,
            })
            .await
            .unwrap();
        assert!(reply.success);

        let reply = client
            .request_faucet(&FaucetRequest {
                address: WalletAddress::new("0xabc").unwrap(),
                amount_apt: 50.0,
                network: Network::Devnet,
            })
            .await
            .unwrap();
        assert!(!reply.success);
        assert_eq!(reply.error.as_deref(), Some("amount_apt must be between 0 and 10"));
    }

    #[test]
    fn faucet_validation() {
        assert!(check_faucet(&body("0xabc", 1.0, "devnet")).is_ok());
        assert!(check_faucet(&body("not-an-address", 1.0, "devnet")).is_err());
        assert!(check_faucet(&body("0xabc", 1.0, "mainnet"))
            .unwrap_err()
            .contains("only available on devnet"));
        assert!(check_faucet(&body("0xabc", 0.0, "devnet")).is_err());
    }

    #[tokio::test]
    async fn stream_opens_with_snapshot() {
        let client = serve().await;
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let handle = PriceStream::spawn(client.price_stream_url(), Duration::from_secs(3), move |e| {
            tx.send(e).is_ok()
        });

        let first = rx.recv().await.unwrap();
        assert_eq!(first, PriceFeedEvent::Connected);
        match rx.recv().await.unwrap() {
            PriceFeedEvent::Event(tradeapt_models::PriceEvent::Initial {
                prices: Some(prices),
                ..
            }) => assert!(prices.contains_key("APT")),
            other => panic!("expected snapshot, got {other:?}"),
        }
        handle.close();
    }
}
