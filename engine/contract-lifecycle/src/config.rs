//! Configuration for contract lifecycle operations

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration for the contract lifecycle service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Franchise tag amount before the position multiplier
    pub base_tag_amount: i64,

    /// Franchise tag multipliers by position code
    pub tag_multipliers: HashMap<String, Decimal>,

    /// Multiplier for positions not listed
    pub default_tag_multiplier: Decimal,

    /// Length of a rookie deal when the caller does not choose one
    pub rookie_contract_years: u8,

    /// Seed for the negotiation RNG; entropy-seeded when unset
    pub negotiation_seed: Option<u64>,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        let mut tag_multipliers = HashMap::new();
        tag_multipliers.insert("QB".to_string(), Decimal::TWO);
        tag_multipliers.insert("DE".to_string(), Decimal::new(15, 1));
        tag_multipliers.insert("WR".to_string(), Decimal::new(13, 1));
        tag_multipliers.insert("CB".to_string(), Decimal::new(12, 1));
        tag_multipliers.insert("LT".to_string(), Decimal::new(14, 1));
        tag_multipliers.insert("TE".to_string(), Decimal::ONE);
        tag_multipliers.insert("RB".to_string(), Decimal::new(8, 1));
        tag_multipliers.insert("ILB".to_string(), Decimal::new(9, 1));

        Self {
            base_tag_amount: 20_000_000,
            tag_multipliers,
            default_tag_multiplier: Decimal::ONE,
            rookie_contract_years: 4,
            negotiation_seed: None,
        }
    }
}

impl LifecycleConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Ok(amount) = std::env::var("LIFECYCLE_BASE_TAG_AMOUNT") {
            config.base_tag_amount = amount
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid LIFECYCLE_BASE_TAG_AMOUNT"))?;
        }

        if let Ok(years) = std::env::var("LIFECYCLE_ROOKIE_YEARS") {
            config.rookie_contract_years =
                years.parse().map_err(|_| anyhow::anyhow!("Invalid LIFECYCLE_ROOKIE_YEARS"))?;
        }

        if let Ok(seed) = std::env::var("LIFECYCLE_NEGOTIATION_SEED") {
            config.negotiation_seed = Some(
                seed.parse().map_err(|_| anyhow::anyhow!("Invalid LIFECYCLE_NEGOTIATION_SEED"))?,
            );
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.base_tag_amount <= 0 {
            anyhow::bail!("base_tag_amount must be positive");
        }

        if !(1..=contract_ledger::MAX_CONTRACT_YEARS as u8).contains(&self.rookie_contract_years) {
            anyhow::bail!(
                "rookie_contract_years must be 1-{}, got {}",
                contract_ledger::MAX_CONTRACT_YEARS,
                self.rookie_contract_years
            );
        }

        if self.tag_multipliers.values().any(|m| m.is_sign_negative()) {
            anyhow::bail!("tag multipliers must not be negative");
        }

        Ok(())
    }

    /// Get the franchise tag multiplier for a position code
    pub fn tag_multiplier(&self, position: &str) -> Decimal {
        self.tag_multipliers
            .iter()
            .find(|(code, _)| code.eq_ignore_ascii_case(position))
            .map_or(self.default_tag_multiplier, |(_, multiplier)| *multiplier)
    }
}
