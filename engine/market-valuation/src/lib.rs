//! Market Valuation
//!
//! Estimates what a player is worth on the open market, how likely they are to
//! accept an offer, and what they would fetch in a trade. Multipliers are exact
//! decimals; results are truncated to whole currency units.

pub mod calculator;
pub mod config;
pub mod error;
pub mod models;

pub use calculator::MarketValuation;
pub use error::{Result, ValuationError};
pub use config::{AcceptanceParameters, BandedMultiplier, MultiplierBand, TradeParameters, ValuationConfig};
pub use models::*;
