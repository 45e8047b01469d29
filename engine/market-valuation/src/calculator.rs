use crate::config::ValuationConfig;
use crate::error::{Result, ValuationError};
use crate::models::TradeValue;
use contract_ledger::{PlayerProfile, TeamId};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

/// Market valuation calculator
///
/// Deterministic apart from the caller's random draw against
/// [`acceptance_chance`](MarketValuation::acceptance_chance).
#[derive(Debug, Clone)]
pub struct MarketValuation {
    config: ValuationConfig,
}

impl MarketValuation {
    /// Create a new market valuation calculator
    pub fn new(config: ValuationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValuationConfig {
        &self.config
    }

    /// Estimated market salary for a player
    ///
    /// `overall × per-point value × position × age × experience`, truncated to whole
    /// units. The offer terms are accepted for API symmetry but are not weighted.
    pub fn market_value(&self, player: &PlayerProfile, _offered_salary: i64, _years: u8) -> Result<i64> {
        let position = self.config.position_multiplier(&player.position);
        let age = self.config.age.lookup(player.age);
        let experience = self.config.experience.lookup(player.years_pro);

        let value = self.whole_units(player, "market value", &[position, age, experience])?;

        debug!(
            "Market value for player {}: {} (position {}, age {}, experience {})",
            player.id, value, position, age, experience
        );

        Ok(value)
    }

    /// Probability that a player accepts an offer, clamped to the configured bounds
    ///
    /// `current_contract_team` is the team of the player's active contract, if any;
    /// a player under contract with their current team gets the loyalty factor.
    pub fn acceptance_chance(
        &self,
        player: &PlayerProfile,
        market_value: i64,
        offered_salary: i64,
        current_contract_team: Option<TeamId>,
    ) -> f64 {
        let params = &self.config.acceptance;

        let salary_factor = if offered_salary >= market_value || market_value <= 0 {
            1.0
        } else {
            (offered_salary as f64 / market_value as f64).max(params.min_salary_factor)
        };

        let loyal = current_contract_team.is_some() && current_contract_team == player.team_id;
        let loyalty_factor = if loyal { params.loyalty_factor } else { 1.0 };

        let work_ethic_factor =
            params.work_ethic_base + (player.work_ethic as f64 / 100.0) * params.work_ethic_span;

        let chance = params.base_chance * salary_factor * loyalty_factor * work_ethic_factor;
        let clamped = chance.clamp(params.min_chance, params.max_chance);

        debug!(
            "Acceptance chance for player {}: {:.3} (salary {:.3}, loyalty {}, work ethic {:.3})",
            player.id, clamped, salary_factor, loyalty_factor, work_ethic_factor
        );

        clamped
    }

    /// Trade value estimate for a player
    pub fn trade_value(&self, player: &PlayerProfile) -> Result<TradeValue> {
        let trade = &self.config.trade;

        let age_multiplier = trade.age.lookup(player.age);
        let contract_multiplier = if player.years_pro > trade.veteran_years_pro {
            trade.veteran_multiplier
        } else {
            Decimal::ONE
        };
        let position_multiplier = self.config.position_multiplier(&player.position);

        let estimated_value = self.whole_units(
            player,
            "trade value",
            &[age_multiplier, contract_multiplier, position_multiplier],
        )?;

        Ok(TradeValue { estimated_value, age_multiplier, position_multiplier, contract_multiplier })
    }

    /// `overall × per-point value × multipliers`, truncated; overflow is an error
    fn whole_units(
        &self,
        player: &PlayerProfile,
        kind: &'static str,
        multipliers: &[Decimal],
    ) -> Result<i64> {
        Decimal::from(player.overall_rating)
            .checked_mul(Decimal::from(self.config.value_per_rating_point))
            .and_then(|base| multipliers.iter().try_fold(base, |value, m| value.checked_mul(*m)))
            .and_then(|value| value.trunc().to_i64())
            .ok_or(ValuationError::OutOfRange { player_id: player.id, kind })
    }
}

impl Default for MarketValuation {
    fn default() -> Self {
        Self::new(ValuationConfig::default())
    }
}
