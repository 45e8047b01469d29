//! Requests and outcomes of lifecycle operations

use crate::error::{LifecycleError, Result};
use contract_ledger::{ContractId, MAX_CONTRACT_YEARS};
use serde::{Deserialize, Serialize};

/// Offer terms for a veteran deal or an extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VeteranTerms {
    /// First-year salary; later years escalate from it
    pub base_salary: i64,
    pub years: u8,
    #[serde(default)]
    pub signing_bonus: i64,
    #[serde(default)]
    pub roster_bonus: i64,
}

impl VeteranTerms {
    pub fn new(base_salary: i64, years: u8) -> Self {
        Self { base_salary, years, signing_bonus: 0, roster_bonus: 0 }
    }

    pub fn with_signing_bonus(mut self, signing_bonus: i64) -> Self {
        self.signing_bonus = signing_bonus;
        self
    }

    pub fn with_roster_bonus(mut self, roster_bonus: i64) -> Self {
        self.roster_bonus = roster_bonus;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_CONTRACT_YEARS as u8).contains(&self.years) {
            return Err(LifecycleError::InvalidContractTerms(format!(
                "contract length must be 1-{} years, got {}",
                MAX_CONTRACT_YEARS, self.years
            )));
        }

        if self.base_salary < 0 || self.signing_bonus < 0 || self.roster_bonus < 0 {
            return Err(LifecycleError::InvalidContractTerms(
                "salary and bonuses must not be negative".to_string(),
            ));
        }

        Ok(())
    }
}

/// Result of an extension negotiation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NegotiationOutcome {
    Accepted {
        contract_id: ContractId,
        total_value: i64,
        cap_hit_year_1: i64,
    },
    /// The player turned the offer down; nothing was written
    Rejected {
        market_value: i64,
        acceptance_chance: f64,
    },
}

impl NegotiationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, NegotiationOutcome::Accepted { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestructureOutcome {
    pub contract_id: ContractId,
    pub cap_savings: i64,
    pub new_cap_hit: i64,
    pub restructure_amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseOutcome {
    pub contract_id: ContractId,
    pub cap_savings: i64,
    pub dead_money_current: i64,
    pub dead_money_next: i64,
    pub post_june_1: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FranchiseTagOutcome {
    pub contract_id: ContractId,
    pub franchise_tag_amount: i64,
    pub cap_hit: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terms_validation() {
        assert!(VeteranTerms::new(5_000_000, 3).validate().is_ok());
        assert!(VeteranTerms::new(5_000_000, 0).validate().is_err());
        assert!(VeteranTerms::new(5_000_000, 6).validate().is_err());
        assert!(VeteranTerms::new(5_000_000, 2).with_signing_bonus(-1).validate().is_err());
    }

    #[test]
    fn test_negotiation_outcome_is_tagged() {
        let outcome = NegotiationOutcome::Rejected { market_value: 10, acceptance_chance: 0.25 };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "rejected");
        assert!(!outcome.is_accepted());
    }
}
