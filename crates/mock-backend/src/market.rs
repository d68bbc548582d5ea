//! Random-walk price feed served over SSE.
//!
//! Every connection gets its own walk: an `initial` snapshot, then one
//! `update` per tick for a random symbol, plus a `heartbeat` every
//! `HEARTBEAT_EVERY` ticks.

use std::collections::{HashMap, VecDeque};
use std::convert::Infallible;
use std::time::Duration;

use axum::response::sse::Event;
use chrono::Utc;
use futures::stream::{self, Stream};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::warn;
use tradeapt_models::{PriceData, PriceEvent};

use crate::fixtures;

pub const HEARTBEAT_EVERY: u64 = 15;
/// Largest relative move per tick.
const MAX_STEP: f64 = 0.005;

pub struct Walk {
    prices: HashMap<String, PriceData>,
    pending: VecDeque<PriceEvent>,
    rng: StdRng,
    ticks: u64,
}

impl Walk {
    pub fn new() -> Self {
        let now = Utc::now().to_rfc3339();
        let prices = fixtures::initial_prices(&now);
        let initial = PriceEvent::Initial {
            prices: Some(prices.clone()),
            timestamp: Some(now),
        };
        Self {
            prices,
            pending: VecDeque::from([initial]),
            rng: StdRng::from_entropy(),
            ticks: 0,
        }
    }

    /// Advance one tick, queueing an update and maybe a heartbeat.
    pub fn tick(&mut self) {
        self.ticks += 1;
        let now = Utc::now().to_rfc3339();

        let mut symbols: Vec<&String> = self.prices.keys().collect();
        symbols.sort();
        let symbol = symbols[self.rng.gen_range(0..symbols.len())].clone();
        let step = self.rng.gen_range(-MAX_STEP..MAX_STEP);

        if let Some(data) = self.prices.get_mut(&symbol) {
            data.price = (data.price * (1.0 + step)).max(0.000_001);
            data.high_24h = data.high_24h.max(data.price);
            data.low_24h = data.low_24h.min(data.price);
            data.change_24h += step * 100.0;
            data.last_update.clone_from(&now);
            self.pending.push_back(PriceEvent::Update {
                symbol: Some(symbol),
                price: Some(data.clone()),
                timestamp: Some(now.clone()),
            });
        }
        if self.ticks % HEARTBEAT_EVERY == 0 {
            self.pending.push_back(PriceEvent::Heartbeat {
                timestamp: Some(now),
            });
        }
    }

    pub fn next_queued(&mut self) -> Option<PriceEvent> {
        self.pending.pop_front()
    }
}

fn to_sse(event: &PriceEvent) -> Event {
    Event::default().json_data(event).unwrap_or_else(|e| {
        warn!(error = %e, "failed to encode price event");
        Event::default().comment("encode error")
    })
}

/// Endless SSE stream for one subscriber.
pub fn price_events(interval: Duration) -> impl Stream<Item = Result<Event, Infallible>> {
    stream::unfold(Walk::new(), move |mut walk| async move {
        loop {
            if let Some(event) = walk.next_queued() {
                return Some((Ok(to_sse(&event)), walk));
            }
            tokio::time::sleep(interval).await;
            walk.tick();
        }
    })
}
