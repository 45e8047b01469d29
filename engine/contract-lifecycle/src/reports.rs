//! Read-side contract and cap reports
//!
//! Reports never take the write gate; they read whatever the ledger holds at the
//! time and derive missing cap hits on copies.

use crate::error::{LifecycleError, Result};
use crate::service::ContractLifecycle;
use cap_engine::{derive_cap_hits, CapEfficiency, ContractCapLine, LeagueCapTable, TeamCapSummary};
use contract_ledger::{ContractId, ContractType, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// How many contracts a team cap report lists
const TOP_CONTRACTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualTerms {
    pub year: u8,
    pub base_salary: i64,
    pub cap_hit: i64,
    pub dead_money: i64,
}

/// Year-by-year view of one contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractAnalysis {
    pub contract_id: ContractId,
    pub player_name: String,
    pub position: String,
    pub team_id: TeamId,
    pub contract_type: ContractType,
    pub total_value: i64,
    pub guaranteed_money: i64,
    pub years: u8,
    pub annual_breakdown: Vec<AnnualTerms>,
    pub total_cap_hit: i64,
    pub average_cap_hit: i64,
    pub guaranteed_percentage: f64,
    pub total_dead_money: i64,
    pub dead_money_percentage: f64,
}

/// Count and value of a group of contracts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueBreakdown {
    pub count: usize,
    pub total_value: i64,
}

impl ValueBreakdown {
    fn add(&mut self, value: i64) {
        self.count += 1;
        self.total_value += value;
    }
}

/// Totals over a team's active contracts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamContractSummary {
    pub team_id: TeamId,
    pub total_contracts: usize,
    pub total_value: i64,
    pub total_guaranteed: i64,
    pub guaranteed_percentage: f64,
    /// Keyed by contract type name
    pub contract_types: BTreeMap<String, ValueBreakdown>,
    /// Keyed by position code; contracts of unknown players are left out
    pub position_breakdown: BTreeMap<String, ValueBreakdown>,
    pub average_contract_value: i64,
}

/// Cap summary plus the largest charges and a position split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamCapReport {
    pub summary: TeamCapSummary,
    pub top_contracts: Vec<ContractCapLine>,
    pub position_breakdown: BTreeMap<String, i64>,
    pub cap_efficiency: CapEfficiency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamCapLine {
    pub team_id: TeamId,
    pub cap_used: i64,
    pub cap_space: i64,
    pub cap_percentage: f64,
}

/// League cap table and every team's position against it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueOverview {
    pub total_teams: usize,
    pub salary_cap: LeagueCapTable,
    pub teams: Vec<TeamCapLine>,
}

fn percentage(part: i64, whole: i64) -> f64 {
    if whole > 0 {
        part as f64 / whole as f64 * 100.0
    } else {
        0.0
    }
}

impl ContractLifecycle {
    /// Per-year breakdown and money ratios of a contract
    pub async fn contract_analysis(&self, contract_id: ContractId) -> Result<ContractAnalysis> {
        let mut contract = self
            .ledger()
            .get(contract_id)
            .await?
            .ok_or(LifecycleError::ContractNotFound(contract_id))?;
        let player = self
            .players()
            .get_player(contract.player_id)
            .await?
            .ok_or(LifecycleError::PlayerNotFound(contract.player_id))?;

        if contract.cap_hits_pending() {
            derive_cap_hits(&mut contract)?;
        }

        let annual_breakdown: Vec<AnnualTerms> = contract
            .active_years()
            .iter()
            .zip(1u8..)
            .map(|(terms, year)| AnnualTerms {
                year,
                base_salary: terms.salary,
                cap_hit: terms.cap_hit,
                dead_money: terms.dead_money,
            })
            .collect();

        let total_cap_hit = contract.total_cap_hit();
        let total_dead_money: i64 = annual_breakdown.iter().map(|year| year.dead_money).sum();
        let average_cap_hit = if contract.years > 0 {
            total_cap_hit / i64::from(contract.years)
        } else {
            0
        };

        Ok(ContractAnalysis {
            contract_id,
            player_name: player.full_name(),
            position: player.position,
            team_id: contract.team_id,
            contract_type: contract.contract_type,
            total_value: contract.total_value,
            guaranteed_money: contract.guaranteed_money,
            years: contract.years,
            annual_breakdown,
            total_cap_hit,
            average_cap_hit,
            guaranteed_percentage: percentage(contract.guaranteed_money, contract.total_value),
            total_dead_money,
            dead_money_percentage: percentage(total_dead_money, contract.total_value),
        })
    }

    /// Totals and breakdowns over a team's active contracts
    pub async fn team_contract_summary(&self, team_id: TeamId) -> Result<TeamContractSummary> {
        let contracts = self.ledger().for_team(team_id, Some(true)).await?;
        if contracts.is_empty() {
            return Err(LifecycleError::NoActiveContracts(team_id));
        }

        let mut contract_types: BTreeMap<String, ValueBreakdown> = BTreeMap::new();
        let mut position_breakdown: BTreeMap<String, ValueBreakdown> = BTreeMap::new();
        for contract in &contracts {
            contract_types
                .entry(contract.contract_type.as_str().to_string())
                .or_default()
                .add(contract.total_value);

            match self.players().get_player(contract.player_id).await? {
                Some(player) => {
                    position_breakdown.entry(player.position).or_default().add(contract.total_value)
                }
                None => debug!("No player record for contract {}", contract.id),
            }
        }

        let total_contracts = contracts.len();
        let total_value: i64 = contracts.iter().map(|c| c.total_value).sum();
        let total_guaranteed: i64 = contracts.iter().map(|c| c.guaranteed_money).sum();

        Ok(TeamContractSummary {
            team_id,
            total_contracts,
            total_value,
            total_guaranteed,
            guaranteed_percentage: percentage(total_guaranteed, total_value),
            contract_types,
            position_breakdown,
            average_contract_value: total_value / total_contracts as i64,
        })
    }

    /// Current-year cap summary with top contracts, position split and grading
    pub async fn team_cap_report(&self, team_id: TeamId) -> Result<TeamCapReport> {
        let summary = self.cap_engine().current_team_cap_summary(team_id).await?;

        let mut top_contracts = summary.contracts.clone();
        top_contracts.sort_by(|a, b| b.cap_hit.cmp(&a.cap_hit));
        top_contracts.truncate(TOP_CONTRACTS);

        let mut position_breakdown: BTreeMap<String, i64> = BTreeMap::new();
        for line in &summary.contracts {
            if let Some(player) = self.players().get_player(line.player_id).await? {
                *position_breakdown.entry(player.position).or_default() += line.cap_hit;
            }
        }

        let cap_efficiency = self.cap_engine().cap_efficiency(&summary);
        Ok(TeamCapReport { summary, top_contracts, position_breakdown, cap_efficiency })
    }

    /// Cap position of every listed team for the current league year
    ///
    /// A team whose summary cannot be built is logged and left out.
    pub async fn league_overview(&self, team_ids: &[TeamId]) -> Result<LeagueOverview> {
        let mut teams = Vec::with_capacity(team_ids.len());
        for &team_id in team_ids {
            match self.cap_engine().current_team_cap_summary(team_id).await {
                Ok(summary) => teams.push(TeamCapLine {
                    team_id,
                    cap_used: summary.total_cap_used,
                    cap_space: summary.cap_space,
                    cap_percentage: summary.cap_percentage,
                }),
                Err(err) => warn!("Skipping team {} in league overview: {}", team_id, err),
            }
        }

        Ok(LeagueOverview {
            total_teams: team_ids.len(),
            salary_cap: self.cap_engine().league().clone(),
            teams,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LifecycleConfig;
    use crate::models::VeteranTerms;
    use contract_ledger::{InMemoryLedger, InMemoryPlayerDirectory, PlayerProfile};
    use market_valuation::MarketValuation;
    use rand::rngs::mock::StepRng;
    use std::sync::Arc;

    fn player(id: i64, position: &str) -> PlayerProfile {
        PlayerProfile {
            id,
            first_name: "Sam".to_string(),
            last_name: format!("Player{id}"),
            position: position.to_string(),
            age: 27,
            years_pro: 5,
            overall_rating: 80,
            potential: 80,
            work_ethic: 70,
            team_id: Some(7),
        }
    }

    fn lifecycle() -> ContractLifecycle {
        let players = InMemoryPlayerDirectory::from_players(
            (1..=12).map(|id| player(id, if id % 2 == 0 { "WR" } else { "CB" })),
        );
        ContractLifecycle::new(
            LifecycleConfig::default(),
            Arc::new(InMemoryLedger::new()),
            Arc::new(players),
            LeagueCapTable::default(),
            MarketValuation::default(),
        )
        .with_rng(StepRng::new(0, 0))
    }

    #[tokio::test]
    async fn test_contract_analysis() {
        let lifecycle = lifecycle();
        let terms = VeteranTerms::new(5_000_000, 3).with_signing_bonus(3_000_000);
        let contract = lifecycle.create_veteran_contract(1, 7, terms).await.unwrap();

        let analysis = lifecycle.contract_analysis(contract.id).await.unwrap();
        assert_eq!(analysis.player_name, "Sam Player1");
        assert_eq!(analysis.position, "CB");
        assert_eq!(analysis.annual_breakdown.len(), 3);
        assert_eq!(analysis.annual_breakdown[1].base_salary, 5_250_000);
        assert_eq!(analysis.total_cap_hit, 6_000_000 + 6_250_000 + 6_500_000);
        assert_eq!(analysis.average_cap_hit, 6_250_000);
        assert!((analysis.guaranteed_percentage - 3.0 / 18.0 * 100.0).abs() < 1e-9);
        assert_eq!(analysis.total_dead_money, 0);

        lifecycle.release_player(contract.id, true).await.unwrap();
        let released = lifecycle.contract_analysis(contract.id).await.unwrap();
        assert_eq!(released.total_dead_money, 3_000_000);
        assert_eq!(released.annual_breakdown[0].dead_money, 1_000_000);
    }

    #[tokio::test]
    async fn test_contract_analysis_missing_contract() {
        let err = lifecycle().contract_analysis(ContractId(5)).await.unwrap_err();
        assert_eq!(err, LifecycleError::ContractNotFound(ContractId(5)));
    }

    #[tokio::test]
    async fn test_team_contract_summary() {
        let lifecycle = lifecycle();
        lifecycle.create_rookie_contract(1, 7, 1, None).await.unwrap();
        lifecycle
            .create_veteran_contract(2, 7, VeteranTerms::new(5_000_000, 2).with_signing_bonus(2_000_000))
            .await
            .unwrap();
        lifecycle.franchise_tag(4, 7).await.unwrap();

        let summary = lifecycle.team_contract_summary(7).await.unwrap();
        assert_eq!(summary.total_contracts, 3);
        assert_eq!(summary.total_value, 40_000_000 + 12_000_000 + 26_000_000);
        assert_eq!(summary.total_guaranteed, 10_000_000 + 2_000_000 + 26_000_000);
        assert_eq!(summary.contract_types["rookie"].count, 1);
        assert_eq!(summary.contract_types["franchise_tag"].total_value, 26_000_000);
        assert_eq!(summary.position_breakdown["WR"].count, 2);
        assert_eq!(summary.position_breakdown["CB"].count, 1);
        assert_eq!(summary.average_contract_value, 78_000_000 / 3);

        let err = lifecycle.team_contract_summary(99).await.unwrap_err();
        assert_eq!(err, LifecycleError::NoActiveContracts(99));
        assert_eq!(err.to_string(), "Team 99 has no active contracts");
    }

    #[tokio::test]
    async fn test_team_cap_report_lists_top_ten() {
        let lifecycle = lifecycle();
        for id in 1..=12 {
            lifecycle
                .create_veteran_contract(id, 7, VeteranTerms::new(id * 1_000_000, 1))
                .await
                .unwrap();
        }

        let report = lifecycle.team_cap_report(7).await.unwrap();
        assert_eq!(report.summary.contracts.len(), 12);
        assert_eq!(report.top_contracts.len(), 10);
        assert_eq!(report.top_contracts[0].cap_hit, 12_000_000);
        assert_eq!(report.top_contracts[9].cap_hit, 3_000_000);

        let total: i64 = report.position_breakdown.values().sum();
        assert_eq!(total, report.summary.total_cap_used);
        assert_eq!(report.position_breakdown["WR"], 2_000_000 + 4_000_000 + 6_000_000 + 8_000_000 + 10_000_000 + 12_000_000);
        assert_eq!(report.cap_efficiency.health, cap_engine::CapHealth::Excellent);
    }

    #[tokio::test]
    async fn test_league_overview() {
        let lifecycle = lifecycle();
        lifecycle.franchise_tag(1, 7).await.unwrap();
        lifecycle.franchise_tag(2, 8).await.unwrap();

        let overview = lifecycle.league_overview(&[7, 8, 9]).await.unwrap();
        assert_eq!(overview.total_teams, 3);
        assert_eq!(overview.salary_cap.base_cap, 255_400_000);
        assert_eq!(overview.teams.len(), 3);
        assert_eq!(overview.teams[0].cap_used, 24_000_000);
        assert_eq!(overview.teams[1].cap_used, 26_000_000);
        assert_eq!(overview.teams[2].cap_space, 255_400_000);
    }
}
