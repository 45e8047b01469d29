//! Cap-hit derivation and team cap accounting

use crate::config::LeagueCapTable;
use crate::error::{CapEngineError, Result};
use crate::summary::{CapEfficiency, ContractCapLine, DeadMoneyLine, TeamCapSummary};
use contract_ledger::{Contract, ContractLedger, TeamId, MAX_CONTRACT_YEARS};
use std::sync::Arc;
use tracing::debug;

/// Derive per-year cap hits from salary and signing-bonus proration
///
/// `cap_hit[y] = salary[y] + floor(signing_bonus / years)` for each declared year;
/// years past the contract length are zeroed. Returns the derived cap hits.
pub fn derive_cap_hits(contract: &mut Contract) -> Result<[i64; MAX_CONTRACT_YEARS]> {
    let years = contract.years as usize;
    if years == 0 || years > MAX_CONTRACT_YEARS {
        return Err(CapEngineError::InvalidContractTerms {
            contract_id: contract.id,
            reason: format!("contract length must be 1-{MAX_CONTRACT_YEARS} years, got {years}"),
        });
    }

    let proration = contract.signing_bonus / years as i64;
    let mut cap_hits = [0i64; MAX_CONTRACT_YEARS];
    for (index, terms) in contract.terms.iter_mut().enumerate() {
        terms.cap_hit = if index < years { terms.salary + proration } else { 0 };
        cap_hits[index] = terms.cap_hit;
    }

    Ok(cap_hits)
}

/// Cap engine: per-contract cap hits and team-level cap usage
pub struct CapEngine {
    ledger: Arc<dyn ContractLedger>,
    league: LeagueCapTable,
}

impl CapEngine {
    /// Create a new cap engine over a ledger and a league year
    pub fn new(ledger: Arc<dyn ContractLedger>, league: LeagueCapTable) -> Self {
        Self { ledger, league }
    }

    pub fn league(&self) -> &LeagueCapTable {
        &self.league
    }

    /// Cap position of a team for a league year
    pub async fn team_cap_summary(&self, team_id: TeamId, year: i32) -> Result<TeamCapSummary> {
        let year_index = self.league.year_index(year);
        let active = self.ledger.for_team(team_id, Some(true)).await?;

        let mut total_cap_used = 0i64;
        let mut contracts = Vec::new();
        for mut contract in active {
            // Records seeded without cap hits are derived on this copy only
            if contract.cap_hits_pending() {
                derive_cap_hits(&mut contract)?;
            }

            let terms = year_index.map(|index| contract.year(index)).unwrap_or_default();
            if terms.cap_hit > 0 {
                total_cap_used += terms.cap_hit;
                contracts.push(ContractCapLine {
                    contract_id: contract.id,
                    player_id: contract.player_id,
                    cap_hit: terms.cap_hit,
                    base_salary: terms.salary,
                    contract_type: contract.contract_type,
                });
            }
        }

        let dead_money_breakdown = self.team_dead_money(team_id, year).await?;
        let dead_money: i64 = dead_money_breakdown.iter().map(|line| line.amount).sum();

        // All active contracts count; the top-51 offseason rule is not applied
        let top_51_cap_used = total_cap_used;
        let adjusted_cap = self.league.base_cap;
        let cap_space = adjusted_cap - top_51_cap_used - dead_money;
        let cap_percentage = if adjusted_cap > 0 {
            top_51_cap_used as f64 / adjusted_cap as f64 * 100.0
        } else {
            0.0
        };

        debug!(
            "Team {} cap for {}: used {}, dead {}, space {}",
            team_id, year, total_cap_used, dead_money, cap_space
        );

        Ok(TeamCapSummary {
            team_id,
            year,
            adjusted_cap,
            total_cap_used,
            top_51_cap_used,
            dead_money,
            cap_space,
            cap_percentage,
            contracts,
            dead_money_breakdown,
        })
    }

    /// Cap position for the current league year
    pub async fn current_team_cap_summary(&self, team_id: TeamId) -> Result<TeamCapSummary> {
        self.team_cap_summary(team_id, self.league.year).await
    }

    /// Dead money charged to a team in a league year, per released contract
    pub async fn team_dead_money(&self, team_id: TeamId, year: i32) -> Result<Vec<DeadMoneyLine>> {
        let Some(year_index) = self.league.year_index(year) else {
            return Ok(Vec::new());
        };

        let released = self.ledger.for_team(team_id, Some(false)).await?;
        Ok(released
            .into_iter()
            .filter_map(|contract| {
                let amount = contract.dead_money(year_index);
                (amount > 0).then_some(DeadMoneyLine {
                    contract_id: contract.id,
                    player_id: contract.player_id,
                    amount,
                })
            })
            .collect())
    }

    /// Grade a summary's cap utilization
    pub fn cap_efficiency(&self, summary: &TeamCapSummary) -> CapEfficiency {
        CapEfficiency::from_summary(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use contract_ledger::{ContractId, ContractType, InMemoryLedger, LedgerWrite};

    fn date(year: i32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn contract(id: u64, player_id: i64, salaries: &[i64], signing_bonus: i64) -> Contract {
        let years = salaries.len() as u8;
        let mut contract = Contract::new(
            ContractId(id),
            player_id,
            1,
            ContractType::Veteran,
            years,
            date(2024),
            date(2024 + i32::from(years)),
        );
        for (index, salary) in salaries.iter().enumerate() {
            contract.terms[index].salary = *salary;
        }
        contract.signing_bonus = signing_bonus;
        contract.guaranteed_money = signing_bonus;
        contract.total_value = salaries.iter().sum::<i64>() + signing_bonus;
        contract
    }

    #[test]
    fn test_derive_cap_hits_prorates_bonus() {
        let mut c = contract(1, 1, &[5_000_000, 5_250_000, 5_500_000], 3_000_000);
        let hits = derive_cap_hits(&mut c).unwrap();

        assert_eq!(hits, [6_000_000, 6_250_000, 6_500_000, 0, 0]);
        assert_eq!(c.cap_hit(1), 6_000_000);
        assert_eq!(c.cap_hit(2), 6_250_000);
        assert_eq!(c.cap_hit(4), 0);
    }

    #[test]
    fn test_derive_cap_hits_is_idempotent() {
        let mut c = contract(1, 1, &[3_000_000, 4_000_000, 5_000_000], 2_000_000);
        let first = derive_cap_hits(&mut c).unwrap();
        let snapshot = c.clone();
        let second = derive_cap_hits(&mut c).unwrap();

        assert_eq!(first, second);
        assert_eq!(c, snapshot);
    }

    #[test]
    fn test_derive_cap_hits_rejects_zero_years() {
        let mut c = contract(1, 1, &[1_000_000], 0);
        c.years = 0;
        let result = derive_cap_hits(&mut c);
        assert!(matches!(result, Err(CapEngineError::InvalidContractTerms { .. })));
    }

    #[tokio::test]
    async fn test_team_cap_summary_reconciles() {
        let ledger = Arc::new(InMemoryLedger::new());

        let mut first = contract(1, 10, &[5_000_000, 5_000_000], 2_000_000);
        derive_cap_hits(&mut first).unwrap();
        let mut second = contract(2, 11, &[3_000_000], 0);
        derive_cap_hits(&mut second).unwrap();
        let mut released = contract(3, 12, &[4_000_000, 4_000_000], 4_000_000);
        derive_cap_hits(&mut released).unwrap();
        released.is_active = false;
        released.terms[0].dead_money = 2_000_000;
        released.terms[1].dead_money = 2_000_000;

        ledger
            .commit(vec![
                LedgerWrite::Insert(first),
                LedgerWrite::Insert(second),
                LedgerWrite::Insert(released),
            ])
            .await
            .unwrap();

        let engine = CapEngine::new(ledger, LeagueCapTable::default());
        let summary = engine.team_cap_summary(1, 2024).await.unwrap();

        assert_eq!(summary.total_cap_used, 6_000_000 + 3_000_000);
        assert_eq!(summary.top_51_cap_used, summary.total_cap_used);
        assert_eq!(summary.dead_money, 2_000_000);
        assert_eq!(summary.cap_space, 255_400_000 - 9_000_000 - 2_000_000);
        assert_eq!(summary.contracts.len(), 2);
        assert_eq!(summary.dead_money_breakdown.len(), 1);

        // Second league year: only the two-year deal is still on the books
        let next = engine.team_cap_summary(1, 2025).await.unwrap();
        assert_eq!(next.total_cap_used, 6_000_000);
        assert_eq!(next.dead_money, 2_000_000);

        // Outside every contract window nothing counts
        let far = engine.team_cap_summary(1, 2031).await.unwrap();
        assert_eq!(far.total_cap_used, 0);
        assert_eq!(far.dead_money, 0);
        assert_eq!(far.cap_space, 255_400_000);
    }

    #[tokio::test]
    async fn test_summary_derives_pending_cap_hits() {
        let ledger = Arc::new(InMemoryLedger::new());
        ledger
            .commit(vec![LedgerWrite::Insert(contract(1, 10, &[2_000_000, 2_000_000], 1_000_000))])
            .await
            .unwrap();

        let engine = CapEngine::new(ledger.clone(), LeagueCapTable::default());
        let summary = engine.current_team_cap_summary(1).await.unwrap();
        assert_eq!(summary.total_cap_used, 2_500_000);

        // The read path never writes back
        let stored = ledger.get(ContractId(1)).await.unwrap().unwrap();
        assert_eq!(stored.cap_hit(1), 0);
    }

    #[tokio::test]
    async fn test_summary_derives_back_loaded_seed() {
        let ledger =
            Arc::new(InMemoryLedger::from_contracts(vec![contract(1, 10, &[0, 5_000_000], 0)]).unwrap());
        let engine = CapEngine::new(ledger, LeagueCapTable::default());

        let first = engine.team_cap_summary(1, 2024).await.unwrap();
        assert_eq!(first.total_cap_used, 0);
        assert!(first.contracts.is_empty());

        let second = engine.team_cap_summary(1, 2025).await.unwrap();
        assert_eq!(second.total_cap_used, 5_000_000);
        assert_eq!(second.contracts[0].base_salary, 5_000_000);
    }

    #[tokio::test]
    async fn test_cap_percentage_zero_cap() {
        let ledger = Arc::new(InMemoryLedger::new());
        let league = LeagueCapTable { base_cap: 0, ..Default::default() };
        let engine = CapEngine::new(ledger, league);
        let summary = engine.team_cap_summary(1, 2024).await.unwrap();
        assert_eq!(summary.cap_percentage, 0.0);
    }
}
