//! # Contract Ledger
//!
//! Contract records and the storage abstraction for the franchise cap simulator.
//!
//! - **Contract**: a player contract with fixed per-year terms (salary, cap hit, dead money)
//! - **ContractLedger**: async trait every storage backend implements; writes are
//!   committed as atomic batches
//! - **InMemoryLedger**: the in-process backend used by the service and tests
//! - **PlayerDirectory**: read-only access to player attributes owned elsewhere

pub mod error;
pub mod ledger;
pub mod player;
pub mod types;

pub use error::{LedgerError, Result};
pub use ledger::{ContractLedger, InMemoryLedger, LedgerWrite};
pub use player::{InMemoryPlayerDirectory, PlayerDirectory, PlayerProfile};
pub use types::{
    Contract, ContractId, ContractType, PlayerId, TeamId, YearTerms, MAX_CONTRACT_YEARS,
};
