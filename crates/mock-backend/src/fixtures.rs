//! Canned data: known chat phrases and the starting price snapshot.

use std::collections::HashMap;

use tradeapt_models::{PriceData, TradeCondition, TradeIntent};

pub const UNKNOWN_PHRASE: &str =
    "The mock backend only knows a few fixed phrases, e.g. \"buy $20 APT if price drops to $7\".";

/// Intent for `text`, matched case- and whitespace-insensitively.
pub fn intent_for(text: &str) -> Option<TradeIntent> {
    let key = text.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    let intent = match key.as_str() {
        "buy $20 apt if price drops to $7" => TradeIntent {
            action: "buy".into(),
            token_from: "USDC".into(),
            token_to: "APT".into(),
            amount_usd: 20.0,
            conditions: TradeCondition::price_trigger("price_below", "<=", 7.0),
        },
        "buy $10 apt" | "buy 10 dollars of apt" => TradeIntent {
            action: "buy".into(),
            token_from: "USDC".into(),
            token_to: "APT".into(),
            amount_usd: 10.0,
            conditions: TradeCondition::immediate(),
        },
        "sell $50 apt if price rises above $10" => TradeIntent {
            action: "sell".into(),
            token_from: "APT".into(),
            token_to: "USDC".into(),
            amount_usd: 50.0,
            conditions: TradeCondition::price_trigger("price_above", ">=", 10.0),
        },
        "swap $25 usdc for btc" => TradeIntent {
            action: "swap".into(),
            token_from: "USDC".into(),
            token_to: "BTC".into(),
            amount_usd: 25.0,
            conditions: TradeCondition::immediate(),
        },
        _ => return None,
    };
    Some(intent)
}

fn quote(symbol: &str, price: f64, change_24h: f64, volume_24h: f64, now: &str) -> PriceData {
    PriceData {
        symbol: symbol.to_string(),
        price,
        change_24h,
        high_24h: price * 1.04,
        low_24h: price * 0.96,
        volume_24h,
        last_update: now.to_string(),
        source: "mock".to_string(),
        is_stale: false,
    }
}

/// Starting snapshot keyed by symbol.
pub fn initial_prices(now: &str) -> HashMap<String, PriceData> {
    [
        quote("APT", 8.42, 2.15, 182_000_000.0, now),
        quote("BTC", 65_432.1, -0.84, 28_500_000_000.0, now),
        quote("ETH", 3_150.75, 1.12, 14_200_000_000.0, now),
        quote("USDC", 1.0, 0.0, 6_100_000_000.0, now),
    ]
    .into_iter()
    .map(|data| (data.symbol.clone(), data))
    .collect()
}
