//! Contract records and per-year contract terms
//!
//! Amounts are whole currency units (1 unit = $1, no fractional cents).
//! Per-year terms live in a fixed array of [`MAX_CONTRACT_YEARS`] entries and are
//! addressed 1-based through the accessor methods on [`Contract`].

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Player identifier (owned by the external player repository)
pub type PlayerId = i64;

/// Team identifier
pub type TeamId = i64;

/// Longest contract the league allows
pub const MAX_CONTRACT_YEARS: usize = 5;

/// Contract ID wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContractId(pub u64);

impl std::fmt::Display for ContractId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a contract came into existence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    Rookie,
    Veteran,
    FranchiseTag,
    Extension,
}

impl ContractType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContractType::Rookie => "rookie",
            ContractType::Veteran => "veteran",
            ContractType::FranchiseTag => "franchise_tag",
            ContractType::Extension => "extension",
        }
    }
}

impl std::fmt::Display for ContractType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Salary, cap hit and dead money for one contract year
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearTerms {
    pub salary: i64,
    pub cap_hit: i64,
    pub dead_money: i64,
}

/// A player contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    pub player_id: PlayerId,
    pub team_id: TeamId,

    pub total_value: i64,
    pub guaranteed_money: i64,
    pub years: u8,
    pub signing_bonus: i64,
    #[serde(default)]
    pub roster_bonus: i64,

    /// Year 1 is `terms[0]`; entries past `years` stay zero
    #[serde(default)]
    pub terms: [YearTerms; MAX_CONTRACT_YEARS],

    pub contract_type: ContractType,
    #[serde(default)]
    pub is_rookie_contract: bool,
    #[serde(default)]
    pub rookie_scale_year: Option<u8>,

    pub is_active: bool,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
}

impl Contract {
    /// Create an active contract with empty terms
    pub fn new(
        id: ContractId,
        player_id: PlayerId,
        team_id: TeamId,
        contract_type: ContractType,
        years: u8,
        start_date: NaiveDateTime,
        end_date: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            player_id,
            team_id,
            total_value: 0,
            guaranteed_money: 0,
            years,
            signing_bonus: 0,
            roster_bonus: 0,
            terms: [YearTerms::default(); MAX_CONTRACT_YEARS],
            contract_type,
            is_rookie_contract: false,
            rookie_scale_year: None,
            is_active: true,
            start_date,
            end_date,
        }
    }

    /// Terms for a 1-based contract year; zero outside 1..=MAX_CONTRACT_YEARS
    pub fn year(&self, year: usize) -> YearTerms {
        if (1..=MAX_CONTRACT_YEARS).contains(&year) {
            self.terms[year - 1]
        } else {
            YearTerms::default()
        }
    }

    /// Mutable terms for a 1-based contract year
    pub fn year_mut(&mut self, year: usize) -> Option<&mut YearTerms> {
        if (1..=MAX_CONTRACT_YEARS).contains(&year) {
            Some(&mut self.terms[year - 1])
        } else {
            None
        }
    }

    pub fn salary(&self, year: usize) -> i64 {
        self.year(year).salary
    }

    pub fn cap_hit(&self, year: usize) -> i64 {
        self.year(year).cap_hit
    }

    pub fn dead_money(&self, year: usize) -> i64 {
        self.year(year).dead_money
    }

    /// Terms for the declared years only
    pub fn active_years(&self) -> &[YearTerms] {
        let len = (self.years as usize).min(MAX_CONTRACT_YEARS);
        &self.terms[..len]
    }

    /// Signing bonus spread evenly over the declared years (floor division)
    pub fn proration(&self) -> Option<i64> {
        if self.years == 0 {
            None
        } else {
            Some(self.signing_bonus / i64::from(self.years))
        }
    }

    pub fn total_cap_hit(&self) -> i64 {
        self.active_years().iter().map(|t| t.cap_hit).sum()
    }

    pub fn total_salary(&self) -> i64 {
        self.active_years().iter().map(|t| t.salary).sum()
    }

    pub fn total_dead_money(&self) -> i64 {
        self.terms.iter().map(|t| t.dead_money).sum()
    }

    /// True when any declared year's cap hit is not `salary + proration`
    ///
    /// Seeded records often omit cap hits entirely; this also catches back-loaded
    /// deals whose first year carries no money.
    pub fn cap_hits_pending(&self) -> bool {
        let Some(proration) = self.proration() else {
            return false;
        };
        self.active_years().iter().any(|terms| terms.cap_hit != terms.salary + proration)
    }

    /// Check the record-level invariants every stored contract must satisfy
    pub fn validate(&self) -> std::result::Result<(), String> {
        let years = self.years as usize;
        if !(1..=MAX_CONTRACT_YEARS).contains(&years) {
            return Err(format!("contract {} has {} years (expected 1-5)", self.id, self.years));
        }

        if self.guaranteed_money > self.total_value {
            return Err(format!(
                "contract {} guarantees {} of a {} total value",
                self.id, self.guaranteed_money, self.total_value
            ));
        }

        if self.terms[years..].iter().any(|t| *t != YearTerms::default()) {
            return Err(format!("contract {} carries terms past year {}", self.id, years));
        }

        if self.is_active && self.total_dead_money() != 0 {
            return Err(format!("active contract {} carries dead money", self.id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(year: i32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn sample_contract() -> Contract {
        let mut contract =
            Contract::new(ContractId(1), 10, 3, ContractType::Veteran, 3, date(2024), date(2027));
        contract.total_value = 15_000_000;
        contract.signing_bonus = 3_000_000;
        contract.guaranteed_money = 3_000_000;
        for year in 1..=3 {
            contract.year_mut(year).unwrap().salary = 4_000_000;
        }
        contract
    }

    #[test]
    fn test_year_accessors_are_one_based() {
        let contract = sample_contract();
        assert_eq!(contract.salary(1), 4_000_000);
        assert_eq!(contract.salary(3), 4_000_000);
        assert_eq!(contract.salary(4), 0);
        assert_eq!(contract.salary(0), 0);
        assert_eq!(contract.salary(9), 0);
        assert_eq!(contract.active_years().len(), 3);
    }

    #[test]
    fn test_proration() {
        let contract = sample_contract();
        assert_eq!(contract.proration(), Some(1_000_000));

        let mut empty = contract.clone();
        empty.years = 0;
        assert_eq!(empty.proration(), None);
    }

    #[test]
    fn test_validate() {
        let contract = sample_contract();
        assert!(contract.validate().is_ok());

        let mut overflow = contract.clone();
        overflow.year_mut(5).unwrap().salary = 1;
        assert!(overflow.validate().is_err());

        let mut dead = contract.clone();
        dead.year_mut(1).unwrap().dead_money = 500;
        assert!(dead.validate().is_err());
        dead.is_active = false;
        assert!(dead.validate().is_ok());

        let mut overguaranteed = contract;
        overguaranteed.guaranteed_money = overguaranteed.total_value + 1;
        assert!(overguaranteed.validate().is_err());
    }

    #[test]
    fn test_cap_hits_pending() {
        let mut contract = sample_contract();
        assert!(contract.cap_hits_pending());
        for year in 1..=3 {
            contract.year_mut(year).unwrap().cap_hit = 5_000_000;
        }
        assert!(!contract.cap_hits_pending());

        contract.year_mut(3).unwrap().cap_hit = 4_000_000;
        assert!(contract.cap_hits_pending());
    }

    #[test]
    fn test_back_loaded_contract_is_pending() {
        let mut contract =
            Contract::new(ContractId(2), 11, 3, ContractType::Veteran, 2, date(2024), date(2026));
        contract.total_value = 5_000_000;
        contract.year_mut(2).unwrap().salary = 5_000_000;
        assert!(contract.cap_hits_pending());
    }

    #[test]
    fn test_contract_type_serde() {
        let json = serde_json::to_string(&ContractType::FranchiseTag).unwrap();
        assert_eq!(json, "\"franchise_tag\"");
        assert_eq!(ContractType::Extension.to_string(), "extension");
    }
}
