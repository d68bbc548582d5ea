//! Approve-and-sign seam.
//!
//! When the user approves a [`TradeIntent`], the dashboard hands it to a
//! [`TradeSigner`]. The bundled [`SimulatedSigner`] waits a fixed delay and
//! reports success; it builds no transaction and submits nothing.

use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::info;
use tradeapt_models::TradeIntent;

use crate::error::SdkError;

/// Delay the simulated signer waits before reporting success.
pub const SIMULATED_SIGN_DELAY: Duration = Duration::from_millis(1500);

/// Result of a completed signing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignOutcome {
    /// One-line description of what was signed.
    pub summary: String,
    /// `true` when no real transaction was produced.
    pub simulated: bool,
}

/// Something that can turn an approved intent into a signed trade.
pub trait TradeSigner: Send + Sync {
    /// Sign `intent`. The future owns everything it needs.
    fn sign(&self, intent: &TradeIntent) -> BoxFuture<'static, Result<SignOutcome, SdkError>>;
}

/// Stand-in signer that always succeeds after a fixed delay.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedSigner {
    delay: Duration,
}

impl SimulatedSigner {
    /// Signer waiting `delay` before succeeding.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedSigner {
    fn default() -> Self {
        Self::new(SIMULATED_SIGN_DELAY)
    }
}

impl TradeSigner for SimulatedSigner {
    fn sign(&self, intent: &TradeIntent) -> BoxFuture<'static, Result<SignOutcome, SdkError>> {
        let delay = self.delay;
        let summary = intent.headline();
        async move {
            tokio::time::sleep(delay).await;
            info!(trade = %summary, "simulated trade signed");
            Ok(SignOutcome {
                summary,
                simulated: true,
            })
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tradeapt_models::TradeCondition;

    fn intent() -> TradeIntent {
        TradeIntent {
            action: "sell".into(),
            token_from: "APT".into(),
            token_to: "USDC".into(),
            amount_usd: 50.0,
            conditions: TradeCondition::immediate(),
        }
    }

    #[test]
    fn default_delay() {
        assert_eq!(SimulatedSigner::default().delay, Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn simulated_signer_always_succeeds_after_delay() {
        let signer = SimulatedSigner::new(Duration::from_millis(40));
        let started = Instant::now();

        let outcome = signer.sign(&intent()).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(40));
        assert!(outcome.simulated);
        assert_eq!(outcome.summary, "SELL $50 APT → USDC (Execute immediately)");
    }

    #[tokio::test]
    async fn usable_as_trait_object() {
        let signer: Box<dyn TradeSigner> = Box::new(SimulatedSigner::new(Duration::ZERO));
        let pending = signer.sign(&intent());
        drop(signer);
        assert!(pending.await.is_ok());
    }
}
