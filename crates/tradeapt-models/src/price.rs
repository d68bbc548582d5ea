//! Live price records and the in-memory price map.
//!
//! The backend pushes [`PriceEvent`]s over a server-sent event stream. A
//! [`PriceBook`] folds them into the current symbol → [`PriceData`] map:
//!
//! * `initial` replaces the whole map,
//! * `update` overwrites a single symbol (last write wins),
//! * `heartbeat` only proves the connection is alive.
//!
//! No history is kept.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::units::format_price;

/// Latest known market data for one symbol.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PriceData {
    /// Ticker symbol (e.g. `APT`).
    pub symbol: String,
    /// Last traded price in USD.
    pub price: f64,
    /// 24h change in percent.
    pub change_24h: f64,
    /// 24h high in USD.
    pub high_24h: f64,
    /// 24h low in USD.
    pub low_24h: f64,
    /// 24h traded volume in USD.
    pub volume_24h: f64,
    /// Source-side timestamp of the quote (ISO 8601).
    pub last_update: String,
    /// Name of the upstream price source.
    pub source: String,
    /// Set by the backend when the quote is older than its freshness window.
    #[serde(default)]
    pub is_stale: bool,
}

/// One message from the price stream.
///
/// The wire shape is `{ "type": "initial" | "update" | "heartbeat", ... }`.
/// Payload fields are optional on the wire; an event missing its payload
/// is ignored by [`PriceBook::apply`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PriceEvent {
    /// Full snapshot of every tracked symbol.
    Initial {
        /// Snapshot keyed by symbol.
        #[serde(skip_serializing_if = "Option::is_none")]
        prices: Option<HashMap<String, PriceData>>,
        /// Server timestamp.
        #[serde(skip_serializing_if = "Option::is_none")]
        timestamp: Option<String>,
    },
    /// Delta for a single symbol.
    Update {
        /// Symbol being updated.
        #[serde(skip_serializing_if = "Option::is_none")]
        symbol: Option<String>,
        /// New record for that symbol.
        #[serde(skip_serializing_if = "Option::is_none")]
        price: Option<PriceData>,
        /// Server timestamp.
        #[serde(skip_serializing_if = "Option::is_none")]
        timestamp: Option<String>,
    },
    /// Liveness signal; carries no price data.
    Heartbeat {
        /// Server timestamp.
        #[serde(skip_serializing_if = "Option::is_none")]
        timestamp: Option<String>,
    },
}

/// Direction of the 24h change, used to colour prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum PriceTrend {
    /// Positive 24h change.
    Up,
    /// Negative 24h change.
    Down,
    /// No change, or no data.
    Flat,
}

impl PriceTrend {
    /// Classify a 24h change percentage.
    pub fn from_change(change_24h: f64) -> Self {
        if change_24h > 0.0 {
            PriceTrend::Up
        } else if change_24h < 0.0 {
            PriceTrend::Down
        } else {
            PriceTrend::Flat
        }
    }
}

/// Current symbol → price map.
///
/// Keys are always upper-case symbols; lookups upper-case their argument.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use tradeapt_models::{PriceBook, PriceEvent};
///
/// let mut book = PriceBook::default();
/// book.apply(PriceEvent::Heartbeat { timestamp: None }, Utc::now());
/// assert!(book.is_empty());
/// assert!(book.last_update().is_some());
/// assert_eq!(book.formatted_price("apt"), "---");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceBook {
    prices: BTreeMap<String, PriceData>,
    last_update: Option<DateTime<Utc>>,
}

impl PriceBook {
    /// Fold one stream event into the book.
    ///
    /// Returns `true` if the event was applied (including heartbeats),
    /// `false` if it lacked the payload its type requires.
    pub fn apply(&mut self, event: PriceEvent, now: DateTime<Utc>) -> bool {
        match event {
            PriceEvent::Initial {
                prices: Some(prices),
                ..
            } => {
                self.prices = prices
                    .into_iter()
                    .map(|(symbol, data)| (symbol.to_uppercase(), data))
                    .collect();
            }
            PriceEvent::Update {
                symbol: Some(symbol),
                price: Some(data),
                ..
            } => {
                self.prices.insert(symbol.to_uppercase(), data);
            }
            PriceEvent::Heartbeat { .. } => {}
            PriceEvent::Initial { .. } | PriceEvent::Update { .. } => return false,
        }
        self.last_update = Some(now);
        true
    }

    /// Record for `symbol`, case-insensitive.
    pub fn get(&self, symbol: &str) -> Option<&PriceData> {
        self.prices.get(&symbol.to_uppercase())
    }

    /// Last price for `symbol`, if known.
    pub fn price(&self, symbol: &str) -> Option<f64> {
        self.get(symbol).map(|data| data.price)
    }

    /// Display string for `symbol`'s price (`---` when unknown).
    pub fn formatted_price(&self, symbol: &str) -> String {
        format_price(self.price(symbol))
    }

    /// Trend of `symbol` over 24h (`Flat` when unknown).
    pub fn trend(&self, symbol: &str) -> PriceTrend {
        self.get(symbol)
            .map_or(PriceTrend::Flat, |data| PriceTrend::from_change(data.change_24h))
    }

    /// All records, ordered by symbol.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &PriceData)> {
        self.prices.iter()
    }

    /// Number of tracked symbols.
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// `true` when no symbol is tracked.
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Local time of the last applied event (heartbeats included).
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }
}
