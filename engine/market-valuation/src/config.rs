use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration for market valuation and offer acceptance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationConfig {
    /// Market value per overall rating point, in whole currency units
    pub value_per_rating_point: i64,

    /// Position multipliers shared by market value and trade value
    pub position_multipliers: HashMap<String, Decimal>,

    /// Multiplier for positions not listed
    pub default_position_multiplier: Decimal,

    /// Age adjustment for market value
    pub age: BandedMultiplier,

    /// Years-pro adjustment for market value
    pub experience: BandedMultiplier,

    /// Offer acceptance parameters
    pub acceptance: AcceptanceParameters,

    /// Trade value parameters
    pub trade: TradeParameters,
}

/// Upper-inclusive band: values up to `up_to` use `multiplier`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplierBand {
    pub up_to: u32,
    pub multiplier: Decimal,
}

/// Ordered bands with a multiplier for values past the last band
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandedMultiplier {
    pub bands: Vec<MultiplierBand>,
    pub otherwise: Decimal,
}

impl BandedMultiplier {
    pub fn new(bands: &[(u32, Decimal)], otherwise: Decimal) -> Self {
        Self {
            bands: bands
                .iter()
                .map(|&(up_to, multiplier)| MultiplierBand { up_to, multiplier })
                .collect(),
            otherwise,
        }
    }

    /// Multiplier of the first band containing `value`
    pub fn lookup(&self, value: u32) -> Decimal {
        self.bands
            .iter()
            .find(|band| value <= band.up_to)
            .map_or(self.otherwise, |band| band.multiplier)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcceptanceParameters {
    pub base_chance: f64,
    /// Floor on the offer/market ratio for below-market offers
    pub min_salary_factor: f64,
    /// Applied when the player's current contract is with their current team
    pub loyalty_factor: f64,
    /// Work ethic factor = base + (work_ethic / 100) * span
    pub work_ethic_base: f64,
    pub work_ethic_span: f64,
    pub min_chance: f64,
    pub max_chance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeParameters {
    pub age: BandedMultiplier,
    /// Players with more years pro than this take the veteran discount
    pub veteran_years_pro: u32,
    pub veteran_multiplier: Decimal,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        let mut position_multipliers = HashMap::new();
        position_multipliers.insert("QB".to_string(), Decimal::new(15, 1));
        position_multipliers.insert("DE".to_string(), Decimal::new(13, 1));
        position_multipliers.insert("WR".to_string(), Decimal::new(12, 1));
        position_multipliers.insert("CB".to_string(), Decimal::new(11, 1));
        position_multipliers.insert("LT".to_string(), Decimal::new(12, 1));
        position_multipliers.insert("TE".to_string(), Decimal::ONE);
        position_multipliers.insert("RB".to_string(), Decimal::new(9, 1));
        position_multipliers.insert("ILB".to_string(), Decimal::new(9, 1));

        Self {
            value_per_rating_point: 1_000_000, // $1M per overall point
            position_multipliers,
            default_position_multiplier: Decimal::ONE,
            age: BandedMultiplier::new(
                &[
                    (25, Decimal::new(13, 1)),
                    (28, Decimal::new(11, 1)),
                    (31, Decimal::ONE),
                    (34, Decimal::new(8, 1)),
                ],
                Decimal::new(6, 1),
            ),
            experience: BandedMultiplier::new(
                &[(3, Decimal::new(12, 1)), (6, Decimal::ONE)],
                Decimal::new(9, 1),
            ),
            acceptance: AcceptanceParameters::default(),
            trade: TradeParameters::default(),
        }
    }
}

impl Default for AcceptanceParameters {
    fn default() -> Self {
        Self {
            base_chance: 0.5,
            min_salary_factor: 0.1,
            loyalty_factor: 1.2,
            work_ethic_base: 0.8,
            work_ethic_span: 0.4,
            min_chance: 0.05,
            max_chance: 0.95,
        }
    }
}

impl Default for TradeParameters {
    fn default() -> Self {
        Self {
            age: BandedMultiplier::new(
                &[
                    (25, Decimal::new(15, 1)),
                    (28, Decimal::new(12, 1)),
                    (31, Decimal::ONE),
                    (34, Decimal::new(7, 1)),
                ],
                Decimal::new(4, 1),
            ),
            veteran_years_pro: 8,
            veteran_multiplier: Decimal::new(8, 1),
        }
    }
}

impl ValuationConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Ok(per_point) = std::env::var("VALUATION_VALUE_PER_POINT") {
            config.value_per_rating_point = per_point.parse().unwrap_or(1_000_000);
        }

        if let Ok(base_chance) = std::env::var("VALUATION_BASE_CHANCE") {
            config.acceptance.base_chance = base_chance.parse().unwrap_or(0.5);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.value_per_rating_point <= 0 {
            anyhow::bail!("value_per_rating_point must be positive");
        }

        let acceptance = &self.acceptance;
        if !(0.0..=1.0).contains(&acceptance.min_chance)
            || !(0.0..=1.0).contains(&acceptance.max_chance)
            || acceptance.min_chance > acceptance.max_chance
        {
            anyhow::bail!(
                "acceptance bounds must satisfy 0 <= min ({}) <= max ({}) <= 1",
                acceptance.min_chance,
                acceptance.max_chance
            );
        }

        if self.position_multipliers.values().any(|m| m.is_sign_negative()) {
            anyhow::bail!("position multipliers must not be negative");
        }

        Ok(())
    }

    /// Get the multiplier for a position code
    ///
    /// Codes compare case-insensitively; file-based config sources lowercase map keys.
    pub fn position_multiplier(&self, position: &str) -> Decimal {
        self.position_multipliers
            .iter()
            .find(|(code, _)| code.eq_ignore_ascii_case(position))
            .map_or(self.default_position_multiplier, |(_, multiplier)| *multiplier)
    }
}
