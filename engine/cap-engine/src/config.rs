//! League cap table: cap figures and the rookie wage scale for one league year

use crate::error::{CapEngineError, Result};
use contract_ledger::MAX_CONTRACT_YEARS;
use serde::{Deserialize, Serialize};

/// Last drafted round; later picks and undrafted players use its scale
pub const ROOKIE_SCALE_ROUNDS: u32 = 7;

/// League-wide cap constants for a given year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueCapTable {
    /// League year these figures apply to
    pub year: i32,

    /// Base salary cap in whole currency units
    pub base_cap: i64,

    /// Minimum team spend
    pub minimum_spend: i64,

    /// Estimated rookie pool
    pub rookie_pool: i64,

    /// Rookie wage scale: row = draft round 1..=7, column = rookie year 1..=5
    pub rookie_scale: Vec<[i64; MAX_CONTRACT_YEARS]>,
}

impl Default for LeagueCapTable {
    fn default() -> Self {
        Self {
            year: 2024,
            base_cap: 255_400_000,
            minimum_spend: 230_000_000, // ~90% of base cap
            rookie_pool: 10_000_000,
            rookie_scale: vec![
                [10_000_000, 12_000_000, 14_000_000, 18_000_000, 22_000_000],
                [8_000_000, 9_000_000, 10_000_000, 12_000_000, 14_000_000],
                [6_000_000, 7_000_000, 8_000_000, 9_000_000, 10_000_000],
                [4_000_000, 4_500_000, 5_000_000, 5_500_000, 6_000_000],
                [3_000_000, 3_200_000, 3_400_000, 3_600_000, 3_800_000],
                [2_500_000, 2_600_000, 2_700_000, 2_800_000, 2_900_000],
                [2_000_000, 2_100_000, 2_200_000, 2_300_000, 2_400_000],
            ],
        }
    }
}

impl LeagueCapTable {
    /// Load the default table with environment overrides
    pub fn from_env() -> Result<Self> {
        let mut table = Self::default();

        if let Ok(year) = std::env::var("CAP_YEAR") {
            table.year = parse_env("CAP_YEAR", &year)?;
        }

        if let Ok(base_cap) = std::env::var("CAP_BASE") {
            table.base_cap = parse_env("CAP_BASE", &base_cap)?;
        }

        if let Ok(minimum_spend) = std::env::var("CAP_MINIMUM_SPEND") {
            table.minimum_spend = parse_env("CAP_MINIMUM_SPEND", &minimum_spend)?;
        }

        if let Ok(rookie_pool) = std::env::var("CAP_ROOKIE_POOL") {
            table.rookie_pool = parse_env("CAP_ROOKIE_POOL", &rookie_pool)?;
        }

        table.validate()?;
        Ok(table)
    }

    /// Validate the table
    pub fn validate(&self) -> Result<()> {
        if self.base_cap <= 0 {
            return Err(invalid("base_cap must be positive"));
        }

        if self.minimum_spend < 0 || self.minimum_spend > self.base_cap {
            return Err(invalid("minimum_spend must be between 0 and base_cap"));
        }

        if self.rookie_scale.len() != ROOKIE_SCALE_ROUNDS as usize {
            return Err(invalid(format!(
                "rookie_scale needs {} rounds, found {}",
                ROOKIE_SCALE_ROUNDS,
                self.rookie_scale.len()
            )));
        }

        if self.rookie_scale.iter().flatten().any(|salary| *salary <= 0) {
            return Err(invalid("rookie_scale salaries must be positive"));
        }

        Ok(())
    }

    /// Rookie salary for a draft round and rookie year
    ///
    /// Rounds past the last drafted round clamp to it; round 0 reads as round 1.
    pub fn rookie_base_salary(&self, draft_round: u32, rookie_year: u32) -> i64 {
        let round = draft_round.clamp(1, ROOKIE_SCALE_ROUNDS) as usize;
        let year = rookie_year.clamp(1, MAX_CONTRACT_YEARS as u32) as usize;
        self.rookie_scale.get(round - 1).map_or(0, |row| row[year - 1])
    }

    /// 1-based contract-year offset of a league year, if it falls inside a contract window
    pub fn year_index(&self, year: i32) -> Option<usize> {
        let index = i64::from(year) - i64::from(self.year) + 1;
        if (1..=MAX_CONTRACT_YEARS as i64).contains(&index) {
            Some(index as usize)
        } else {
            None
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.parse::<T>().map_err(|_| invalid(format!("Invalid {name}")))
}

fn invalid(message: impl Into<String>) -> CapEngineError {
    CapEngineError::InvalidConfig { message: message.into() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid() {
        let table = LeagueCapTable::default();
        assert!(table.validate().is_ok());
        assert_eq!(table.base_cap, 255_400_000);
    }

    #[test]
    fn test_rookie_scale_lookup() {
        let table = LeagueCapTable::default();
        assert_eq!(table.rookie_base_salary(1, 1), 10_000_000);
        assert_eq!(table.rookie_base_salary(3, 2), 7_000_000);
        // Undrafted players sign at the round 7 scale
        assert_eq!(table.rookie_base_salary(9, 1), 2_000_000);
        assert_eq!(table.rookie_base_salary(0, 1), 10_000_000);
    }

    #[test]
    fn test_year_index() {
        let table = LeagueCapTable::default();
        assert_eq!(table.year_index(2024), Some(1));
        assert_eq!(table.year_index(2028), Some(5));
        assert_eq!(table.year_index(2029), None);
        assert_eq!(table.year_index(2023), None);
    }

    #[test]
    fn test_validate_rejects_bad_tables() {
        let table = LeagueCapTable { minimum_spend: 300_000_000, ..Default::default() };
        assert!(table.validate().is_err());

        let mut table = LeagueCapTable::default();
        table.rookie_scale.pop();
        assert!(matches!(table.validate(), Err(CapEngineError::InvalidConfig { .. })));
    }
}
