//! Cap Engine - league cap table, cap-hit derivation and team cap accounting
//!
//! Team cap usage reconciles to the sum of active contracts' cap hits plus the
//! dead money left by released contracts for the same league year.

pub mod config;
pub mod engine;
pub mod error;
pub mod summary;

pub use config::LeagueCapTable;
pub use engine::{derive_cap_hits, CapEngine};
pub use error::{CapEngineError, Result};
pub use summary::{
    CapEfficiency, CapFlexibility, CapHealth, ContractCapLine, DeadMoneyLine, TeamCapSummary,
};
