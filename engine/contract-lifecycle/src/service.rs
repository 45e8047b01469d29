//! Contract lifecycle: signing, extension, restructure, release and franchise tags
//!
//! Every mutating operation follows the same shape: read the current records,
//! build the result on private copies, re-derive cap hits, then hand the whole
//! change to the ledger as one batch. A rejected request or a failed commit leaves
//! the ledger exactly as it was.

use crate::config::LifecycleConfig;
use crate::error::{LifecycleError, Result};
use crate::models::{
    FranchiseTagOutcome, NegotiationOutcome, ReleaseOutcome, RestructureOutcome, VeteranTerms,
};
use cap_engine::{derive_cap_hits, CapEngine, LeagueCapTable};
use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};
use contract_ledger::{
    Contract, ContractId, ContractLedger, ContractType, LedgerWrite, PlayerDirectory, PlayerId,
    PlayerProfile, TeamId,
};
use market_valuation::MarketValuation;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Random source for offer acceptance draws
pub type NegotiationRng = Box<dyn RngCore + Send>;

/// Salary escalation per contract year, in percent of the first-year salary
const VETERAN_ESCALATION_PERCENT: [i64; 5] = [100, 105, 110, 115, 120];

/// Contract lifecycle service
pub struct ContractLifecycle {
    config: LifecycleConfig,
    ledger: Arc<dyn ContractLedger>,
    players: Arc<dyn PlayerDirectory>,
    cap_engine: CapEngine,
    valuation: MarketValuation,
    rng: Mutex<NegotiationRng>,
    /// Serializes mutating operations; reads never take it
    write_gate: Mutex<()>,
}

impl ContractLifecycle {
    /// Create a new lifecycle service
    ///
    /// The negotiation RNG is seeded from `config.negotiation_seed` when set.
    pub fn new(
        config: LifecycleConfig,
        ledger: Arc<dyn ContractLedger>,
        players: Arc<dyn PlayerDirectory>,
        league: LeagueCapTable,
        valuation: MarketValuation,
    ) -> Self {
        let rng: NegotiationRng = match config.negotiation_seed {
            Some(seed) => Box::new(ChaCha8Rng::seed_from_u64(seed)),
            None => Box::new(StdRng::from_entropy()),
        };

        Self {
            cap_engine: CapEngine::new(ledger.clone(), league),
            config,
            ledger,
            players,
            valuation,
            rng: Mutex::new(rng),
            write_gate: Mutex::new(()),
        }
    }

    /// Replace the negotiation RNG
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Mutex::new(Box::new(rng));
        self
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Arc<dyn ContractLedger> {
        &self.ledger
    }

    pub fn players(&self) -> &Arc<dyn PlayerDirectory> {
        &self.players
    }

    pub fn cap_engine(&self) -> &CapEngine {
        &self.cap_engine
    }

    pub fn valuation(&self) -> &MarketValuation {
        &self.valuation
    }

    /// Current active contract of a player
    pub async fn player_contract(&self, player_id: PlayerId) -> Result<Option<Contract>> {
        Ok(self.ledger.active_for_player(player_id).await?)
    }

    /// Every contract a player has held, newest first
    pub async fn player_contract_history(&self, player_id: PlayerId) -> Result<Vec<Contract>> {
        Ok(self.ledger.for_player(player_id).await?)
    }

    /// Sign a drafted player to the rookie wage scale
    ///
    /// Every declared year pays the round's first-year scale salary; `years`
    /// defaults to the configured rookie contract length.
    pub async fn create_rookie_contract(
        &self,
        player_id: PlayerId,
        team_id: TeamId,
        draft_round: u32,
        years: Option<u8>,
    ) -> Result<Contract> {
        let _gate = self.write_gate.lock().await;

        let player = self.require_player(player_id).await?;
        self.require_no_active_contract(player_id).await?;

        let id = self.ledger.allocate_id().await?;
        let years = years.unwrap_or(self.config.rookie_contract_years);
        let contract = self.build_rookie_contract(id, player.id, team_id, draft_round, years)?;

        self.ledger.commit(vec![LedgerWrite::Insert(contract.clone())]).await?;

        info!(
            "Signed rookie contract {} for player {} (round {}, {} years, {} total)",
            contract.id, player_id, draft_round, years, contract.total_value
        );
        Ok(contract)
    }

    /// Sign a player to an escalating veteran deal
    pub async fn create_veteran_contract(
        &self,
        player_id: PlayerId,
        team_id: TeamId,
        terms: VeteranTerms,
    ) -> Result<Contract> {
        let _gate = self.write_gate.lock().await;

        let player = self.require_player(player_id).await?;
        self.require_no_active_contract(player_id).await?;
        terms.validate()?;

        let id = self.ledger.allocate_id().await?;
        let contract =
            self.build_veteran_contract(id, player.id, team_id, ContractType::Veteran, terms)?;

        self.ledger.commit(vec![LedgerWrite::Insert(contract.clone())]).await?;

        info!(
            "Signed veteran contract {} for player {} ({} years, {} total)",
            contract.id, player_id, terms.years, contract.total_value
        );
        Ok(contract)
    }

    /// Offer a player a new deal and let the player decide
    ///
    /// A rejection writes nothing. An acceptance supersedes the player's current
    /// deal with the same team (if any) and inserts the new contract in one batch.
    pub async fn negotiate_extension(
        &self,
        player_id: PlayerId,
        team_id: TeamId,
        terms: VeteranTerms,
    ) -> Result<NegotiationOutcome> {
        let _gate = self.write_gate.lock().await;

        let player = self.require_player(player_id).await?;
        let existing = self.ledger.active_for_player(player_id).await?;
        if let Some(current) = &existing {
            if current.team_id != team_id {
                return Err(LifecycleError::ConflictingContract {
                    player_id,
                    team_id: current.team_id,
                });
            }
        }
        terms.validate()?;

        let market_value = self.valuation.market_value(&player, terms.base_salary, terms.years)?;
        let acceptance_chance = self.valuation.acceptance_chance(
            &player,
            market_value,
            terms.base_salary,
            existing.as_ref().map(|contract| contract.team_id),
        );
        let draw: f64 = self.rng.lock().await.gen();

        if draw >= acceptance_chance {
            info!(
                "Player {} rejected offer of {} (market value {}, chance {:.3})",
                player_id, terms.base_salary, market_value, acceptance_chance
            );
            return Ok(NegotiationOutcome::Rejected { market_value, acceptance_chance });
        }

        let contract_type =
            if existing.is_some() { ContractType::Extension } else { ContractType::Veteran };
        let id = self.ledger.allocate_id().await?;
        let contract = self.build_veteran_contract(id, player_id, team_id, contract_type, terms)?;

        let mut writes = Vec::with_capacity(2);
        if let Some(mut superseded) = existing {
            debug!("Contract {} superseded by {}", superseded.id, contract.id);
            superseded.is_active = false;
            writes.push(LedgerWrite::Update(superseded));
        }
        writes.push(LedgerWrite::Insert(contract.clone()));
        self.ledger.commit(writes).await?;

        info!(
            "Player {} accepted {} contract {} ({} total)",
            player_id, contract_type, contract.id, contract.total_value
        );
        Ok(NegotiationOutcome::Accepted {
            contract_id: contract.id,
            total_value: contract.total_value,
            cap_hit_year_1: contract.cap_hit(1),
        })
    }

    /// Convert part of the first-year salary into signing bonus
    pub async fn restructure_contract(
        &self,
        contract_id: ContractId,
        amount: i64,
    ) -> Result<RestructureOutcome> {
        let _gate = self.write_gate.lock().await;

        let mut contract = self.require_active_contract(contract_id).await?;
        if amount < 0 {
            return Err(LifecycleError::InvalidContractTerms(format!(
                "restructure amount must not be negative, got {amount}"
            )));
        }

        let salary = contract.salary(1);
        if amount > salary {
            return Err(LifecycleError::ExceedsSalary { amount, salary });
        }

        derive_cap_hits(&mut contract)?;
        let old_cap_hit = contract.cap_hit(1);

        contract.terms[0].salary = salary - amount;
        contract.signing_bonus += amount;
        derive_cap_hits(&mut contract)?;
        let new_cap_hit = contract.cap_hit(1);

        self.ledger.commit(vec![LedgerWrite::Update(contract)]).await?;

        let cap_savings = old_cap_hit - new_cap_hit;
        info!(
            "Restructured contract {}: moved {} to bonus, cap hit {} -> {}",
            contract_id, amount, old_cap_hit, new_cap_hit
        );
        Ok(RestructureOutcome {
            contract_id,
            cap_savings,
            new_cap_hit,
            restructure_amount: amount,
        })
    }

    /// Release a player and charge the remaining signing bonus as dead money
    ///
    /// Before June 1 the whole bonus lands in year one. After June 1 year one takes
    /// one year's proration and the remainder moves to year two.
    pub async fn release_player(
        &self,
        contract_id: ContractId,
        post_june_1: bool,
    ) -> Result<ReleaseOutcome> {
        let _gate = self.write_gate.lock().await;

        let mut contract = self.require_active_contract(contract_id).await?;
        if contract.cap_hits_pending() {
            derive_cap_hits(&mut contract)?;
        }

        let bonus = contract.signing_bonus;
        let years_remaining = i64::from(contract.years);
        if years_remaining == 0 {
            return Err(LifecycleError::InvalidContractTerms(format!(
                "contract {contract_id} has no contract years"
            )));
        }

        let (dead_money_current, dead_money_next) = if post_june_1 {
            let current = bonus / years_remaining;
            (current, bonus - current)
        } else {
            (bonus, 0)
        };

        contract.is_active = false;
        contract.terms[0].dead_money = dead_money_current;
        if let Some(next) = contract.year_mut(2) {
            next.dead_money = dead_money_next;
        }

        let cap_savings = contract.cap_hit(1) - dead_money_current;
        let player_id = contract.player_id;
        self.ledger.commit(vec![LedgerWrite::Update(contract)]).await?;

        info!(
            "Released player {} from contract {} (dead money {} + {}, post June 1: {})",
            player_id, contract_id, dead_money_current, dead_money_next, post_june_1
        );
        Ok(ReleaseOutcome {
            contract_id,
            cap_savings,
            dead_money_current,
            dead_money_next,
            post_june_1,
        })
    }

    /// Place the franchise tag: a one-year, fully guaranteed deal
    pub async fn franchise_tag(
        &self,
        player_id: PlayerId,
        team_id: TeamId,
    ) -> Result<FranchiseTagOutcome> {
        let _gate = self.write_gate.lock().await;

        let player = self.require_player(player_id).await?;
        self.require_no_active_contract(player_id).await?;

        let amount = self.franchise_tag_amount(&player.position)?;
        let id = self.ledger.allocate_id().await?;
        let start = now();

        let mut contract = Contract::new(
            id,
            player_id,
            team_id,
            ContractType::FranchiseTag,
            1,
            start,
            start + Duration::days(365),
        );
        contract.total_value = amount;
        contract.guaranteed_money = amount;
        contract.terms[0].salary = amount;
        derive_cap_hits(&mut contract)?;

        let cap_hit = contract.cap_hit(1);
        self.ledger.commit(vec![LedgerWrite::Insert(contract)]).await?;

        info!("Franchise tagged player {} ({}) for {}", player_id, player.position, amount);
        Ok(FranchiseTagOutcome { contract_id: id, franchise_tag_amount: amount, cap_hit })
    }

    /// Tag amount for a position: base amount times the position multiplier
    pub fn franchise_tag_amount(&self, position: &str) -> Result<i64> {
        let multiplier = self.config.tag_multiplier(position);
        (Decimal::from(self.config.base_tag_amount) * multiplier)
            .trunc()
            .to_i64()
            .ok_or_else(|| {
                LifecycleError::InvalidContractTerms(format!(
                    "franchise tag amount for {position} is out of range"
                ))
            })
    }

    /// Build a rookie-scale contract without touching the ledger
    pub fn build_rookie_contract(
        &self,
        id: ContractId,
        player_id: PlayerId,
        team_id: TeamId,
        draft_round: u32,
        years: u8,
    ) -> Result<Contract> {
        let league = self.cap_engine.league();
        let base_salary = league.rookie_base_salary(draft_round, 1);
        let start = now();

        let mut contract = Contract::new(
            id,
            player_id,
            team_id,
            ContractType::Rookie,
            years,
            start,
            season_end(league.year, years, start),
        );
        for year in 1..=usize::from(years) {
            if let Some(terms) = contract.year_mut(year) {
                terms.salary = base_salary;
            }
        }
        contract.total_value = base_salary * i64::from(years);
        contract.guaranteed_money = base_salary;
        contract.is_rookie_contract = true;
        contract.rookie_scale_year = Some(1);

        derive_cap_hits(&mut contract)?;
        Ok(contract)
    }

    /// Build an escalating veteran contract without touching the ledger
    ///
    /// Salaries rise 5% of the first-year salary per year. Total value counts the
    /// first-year salary once per year plus both bonuses; only the signing bonus
    /// is guaranteed.
    pub fn build_veteran_contract(
        &self,
        id: ContractId,
        player_id: PlayerId,
        team_id: TeamId,
        contract_type: ContractType,
        terms: VeteranTerms,
    ) -> Result<Contract> {
        terms.validate()?;

        let overflow =
            || LifecycleError::InvalidContractTerms("contract amounts overflow".to_string());
        let years = i64::from(terms.years);
        let total_value = terms
            .base_salary
            .checked_mul(years)
            .and_then(|salaries| salaries.checked_add(terms.signing_bonus))
            .and_then(|total| total.checked_add(terms.roster_bonus))
            .ok_or_else(overflow)?;

        let start = now();
        let mut contract = Contract::new(
            id,
            player_id,
            team_id,
            contract_type,
            terms.years,
            start,
            season_end(self.cap_engine.league().year, terms.years, start),
        );
        for (index, percent) in VETERAN_ESCALATION_PERCENT
            .iter()
            .take(usize::from(terms.years))
            .enumerate()
        {
            contract.terms[index].salary =
                terms.base_salary.checked_mul(*percent).ok_or_else(overflow)? / 100;
        }
        contract.total_value = total_value;
        contract.guaranteed_money = terms.signing_bonus;
        contract.signing_bonus = terms.signing_bonus;
        contract.roster_bonus = terms.roster_bonus;

        derive_cap_hits(&mut contract)?;
        Ok(contract)
    }

    async fn require_player(&self, player_id: PlayerId) -> Result<PlayerProfile> {
        self.players
            .get_player(player_id)
            .await?
            .ok_or(LifecycleError::PlayerNotFound(player_id))
    }

    async fn require_no_active_contract(&self, player_id: PlayerId) -> Result<()> {
        match self.ledger.active_for_player(player_id).await? {
            Some(current) => {
                warn!("Player {} already holds active contract {}", player_id, current.id);
                Err(LifecycleError::AlreadyUnderContract { player_id, contract_id: current.id })
            }
            None => Ok(()),
        }
    }

    async fn require_active_contract(&self, contract_id: ContractId) -> Result<Contract> {
        let contract = self
            .ledger
            .get(contract_id)
            .await?
            .ok_or(LifecycleError::ContractNotFound(contract_id))?;
        if !contract.is_active {
            return Err(LifecycleError::NotActive(contract_id));
        }
        Ok(contract)
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// March 1 of the league year the contract runs out in
fn season_end(league_year: i32, years: u8, start: NaiveDateTime) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(league_year + i32::from(years), 3, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_else(|| start + Duration::days(365 * i64::from(years)))
}
