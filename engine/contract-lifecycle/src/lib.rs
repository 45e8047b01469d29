//! # Contract Lifecycle
//!
//! Creates, extends, restructures, releases and tags player contracts, keeping the
//! ledger's financial invariants intact across every change:
//!
//! - cap hits always equal salary plus signing-bonus proration
//! - dead money appears only on released contracts
//! - a player holds at most one active contract
//!
//! Mutations are serialized through one write gate and committed as a single
//! ledger batch each. The read-side reports live in [`reports`].

pub mod config;
pub mod error;
pub mod models;
pub mod reports;
pub mod service;

pub use config::LifecycleConfig;
pub use error::{LifecycleError, Result};
pub use models::{
    FranchiseTagOutcome, NegotiationOutcome, ReleaseOutcome, RestructureOutcome, VeteranTerms,
};
pub use reports::{
    AnnualTerms, ContractAnalysis, LeagueOverview, TeamCapLine, TeamCapReport,
    TeamContractSummary, ValueBreakdown,
};
pub use service::{ContractLifecycle, NegotiationRng};
