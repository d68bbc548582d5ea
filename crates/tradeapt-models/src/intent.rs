//! Trade intents and the request/response bodies of the backend API.
//!
//! A [`TradeIntent`] is produced entirely by the external parsing service
//! from free text. The dashboard treats its fields as opaque: it only
//! renders them and, on approval, hands the intent to a signer.

use serde::{Deserialize, Serialize};

use crate::network::{Network, WalletAddress};
use crate::units::format_usd;

/// Condition type meaning "execute as soon as approved".
pub const IMMEDIATE_CONDITION: &str = "immediate";

/// Structured trade request returned by `POST /api/ai/parse`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TradeIntent {
    /// Backend action keyword (`buy`, `sell`, `swap`, ...).
    pub action: String,
    /// Token spent.
    pub token_from: String,
    /// Token received.
    pub token_to: String,
    /// Notional amount in USD.
    pub amount_usd: f64,
    /// Trigger condition.
    pub conditions: TradeCondition,
}

/// When a [`TradeIntent`] should execute.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TradeCondition {
    /// `immediate`, or a price trigger such as `price_below`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Comparison operator for price triggers (e.g. `<=`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    /// Threshold in USD for price triggers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl TradeCondition {
    /// An unconditional condition.
    pub fn immediate() -> Self {
        Self {
            kind: IMMEDIATE_CONDITION.to_string(),
            operator: None,
            value: None,
        }
    }

    /// A price-triggered condition.
    pub fn price_trigger(kind: &str, operator: &str, value: f64) -> Self {
        Self {
            kind: kind.to_string(),
            operator: Some(operator.to_string()),
            value: Some(value),
        }
    }

    /// `true` for `immediate` conditions.
    pub fn is_immediate(&self) -> bool {
        self.kind == IMMEDIATE_CONDITION
    }

    /// One-line description, e.g. `Execute immediately` or `<= $7`.
    pub fn describe(&self) -> String {
        if self.is_immediate() {
            return "Execute immediately".to_string();
        }
        let operator = self.operator.as_deref().unwrap_or(&self.kind);
        match self.value {
            Some(value) => format!("{operator} {}", format_usd(value)),
            None => operator.to_string(),
        }
    }
}

impl TradeIntent {
    /// The upper-cased action keyword (`BUY`).
    pub fn action_label(&self) -> String {
        self.action.to_uppercase()
    }

    /// Multi-line summary the assistant replies with.
    ///
    /// # Examples
    ///
    /// ```
    /// use tradeapt_models::{TradeCondition, TradeIntent};
    ///
    /// let intent = TradeIntent {
    ///     action: "buy".into(),
    ///     token_from: "USDC".into(),
    ///     token_to: "APT".into(),
    ///     amount_usd: 20.0,
    ///     conditions: TradeCondition::price_trigger("price_below", "<=", 7.0),
    /// };
    /// assert!(intent.summary().contains("• Condition: <= $7"));
    /// ```
    pub fn summary(&self) -> String {
        format!(
            "I understood your request:\n• Action: {}\n• From: {}\n• To: {}\n• Amount: {}\n• Condition: {}",
            self.action_label(),
            self.token_from,
            self.token_to,
            format_usd(self.amount_usd),
            self.conditions.describe(),
        )
    }

    /// Compact one-line form used in approval prompts and audit entries.
    pub fn headline(&self) -> String {
        format!(
            "{} {} {} → {} ({})",
            self.action_label(),
            format_usd(self.amount_usd),
            self.token_from,
            self.token_to,
            self.conditions.describe(),
        )
    }
}

// ---------------------------------------------------------------------------
// Backend request / response bodies
// ---------------------------------------------------------------------------

/// Body of `POST /api/ai/parse`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ParseRequest {
    /// Free text exactly as the user typed it.
    pub text: String,
}

/// Response of `POST /api/ai/parse`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ParseResponse {
    /// Whether the backend understood the request.
    #[serde(default)]
    pub success: bool,
    /// Structured intent, when one was recognised.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed: Option<TradeIntent>,
    /// Human-readable reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Error text when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ParseResponse {
    /// The intent, only when the backend reported success.
    pub fn intent(&self) -> Option<&TradeIntent> {
        if self.success {
            self.parsed.as_ref()
        } else {
            None
        }
    }
}

/// Body of `POST /wallet/faucet`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FaucetRequest {
    /// Account to fund.
    pub address: WalletAddress,
    /// Amount in APT.
    pub amount_apt: f64,
    /// Target network.
    pub network: Network,
}

/// Response of `POST /wallet/faucet`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct FaucetResponse {
    /// Whether the funding succeeded.
    #[serde(default)]
    pub success: bool,
    /// Error text when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TradeIntent {
        TradeIntent {
            action: "buy".into(),
            token_from: "USDC".into(),
            token_to: "APT".into(),
            amount_usd: 20.0,
            conditions: TradeCondition::price_trigger("price_below", "<=", 7.0),
        }
    }

    #[test]
    fn summary_matches_assistant_format() {
        assert_eq!(
            sample().summary(),
            "I understood your request:\n• Action: BUY\n• From: USDC\n• To: APT\n• Amount: $20\n• Condition: <= $7"
        );
    }

    #[test]
    fn immediate_condition_description() {
        let mut intent = sample();
        intent.conditions = TradeCondition::immediate();
        assert!(intent.summary().ends_with("• Condition: Execute immediately"));
        assert_eq!(intent.headline(), "BUY $20 USDC → APT (Execute immediately)");
    }

    #[test]
    fn intent_uses_camel_case_on_the_wire() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["tokenFrom"], "USDC");
        assert_eq!(json["amountUsd"], 20.0);
        assert_eq!(json["conditions"]["type"], "price_below");
    }

    #[test]
    fn parse_response_requires_success_for_intent() {
        let raw = r#"{"success":false,"parsed":{"action":"buy","tokenFrom":"USDC","tokenTo":"APT","amountUsd":5,"conditions":{"type":"immediate"}},"error":"nope"}"#;
        let resp: ParseResponse = serde_json::from_str(raw).unwrap();
        assert!(resp.intent().is_none());
        assert_eq!(resp.error.as_deref(), Some("nope"));
    }

    #[test]
    fn faucet_request_shape() {
        let req = FaucetRequest {
            address: WalletAddress::new("0xabc").unwrap(),
            amount_apt: 1.0,
            network: Network::Devnet,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "address": "0xabc", "amount_apt": 1.0, "network": "devnet" })
        );
    }
}
