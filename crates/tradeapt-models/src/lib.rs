#![deny(missing_docs)]

//! # Trade.apt Models
//!
//! Core data types shared by the Trade.apt dashboard, its SDK and the
//! development backend.
//!
//! ## Data flow
//!
//! ```text
//! backend ──POST /api/ai/parse──▶ ParseResponse { parsed: TradeIntent }
//! backend ──GET /api/prices/stream──▶ PriceEvent ──apply──▶ PriceBook
//! backend ──POST /wallet/faucet──▶ FaucetResponse
//! fullnode ──resources──▶ balance (octas ──octas_to_apt──▶ APT)
//! ```
//!
//! ## Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`network`] | `Network`, wallet addresses, wallet names and readiness |
//! | [`price`] | `PriceData`, stream `PriceEvent`s and the `PriceBook` |
//! | [`intent`] | `TradeIntent` and the parse / faucet request-response pairs |
//! | [`units`] | Unit conversion and display formatting helpers |

pub mod error;
pub mod intent;
pub mod network;
pub mod price;
pub mod units;

// Re-export all public types at crate root for convenience.
pub use error::*;
pub use intent::*;
pub use network::*;
pub use price::*;
pub use units::*;
