//! Team cap views produced by the cap engine

use contract_ledger::{ContractId, ContractType, PlayerId, TeamId};
use serde::{Deserialize, Serialize};

/// One active contract's charge in the summarized year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCapLine {
    pub contract_id: ContractId,
    pub player_id: PlayerId,
    pub cap_hit: i64,
    pub base_salary: i64,
    pub contract_type: ContractType,
}

/// Dead money a released contract leaves in the summarized year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadMoneyLine {
    pub contract_id: ContractId,
    pub player_id: PlayerId,
    pub amount: i64,
}

/// A team's cap position for one league year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamCapSummary {
    pub team_id: TeamId,
    pub year: i32,
    /// Base cap today; carryover and penalties would adjust it
    pub adjusted_cap: i64,
    pub total_cap_used: i64,
    /// Equal to `total_cap_used`: every active contract counts, no top-51 cut
    pub top_51_cap_used: i64,
    pub dead_money: i64,
    pub cap_space: i64,
    pub cap_percentage: f64,
    pub contracts: Vec<ContractCapLine>,
    pub dead_money_breakdown: Vec<DeadMoneyLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapHealth {
    Excellent,
    Good,
    Fair,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapFlexibility {
    High,
    Medium,
    Low,
}

/// Utilization grading of a cap summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapEfficiency {
    /// Percent of the adjusted cap used, one decimal
    pub utilization_percentage: f64,
    pub health: CapHealth,
    pub flexibility: CapFlexibility,
}

impl CapEfficiency {
    /// Grade a team's cap usage
    pub fn from_summary(summary: &TeamCapSummary) -> Self {
        let utilization = if summary.adjusted_cap > 0 {
            summary.total_cap_used as f64 / summary.adjusted_cap as f64 * 100.0
        } else {
            0.0
        };

        let health = if utilization < 80.0 {
            CapHealth::Excellent
        } else if utilization < 90.0 {
            CapHealth::Good
        } else if utilization < 95.0 {
            CapHealth::Fair
        } else {
            CapHealth::Critical
        };

        let flexibility = if utilization < 85.0 {
            CapFlexibility::High
        } else if utilization < 92.0 {
            CapFlexibility::Medium
        } else {
            CapFlexibility::Low
        };

        Self { utilization_percentage: (utilization * 10.0).round() / 10.0, health, flexibility }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(used: i64) -> TeamCapSummary {
        TeamCapSummary {
            team_id: 1,
            year: 2024,
            adjusted_cap: 200_000_000,
            total_cap_used: used,
            top_51_cap_used: used,
            dead_money: 0,
            cap_space: 200_000_000 - used,
            cap_percentage: 0.0,
            contracts: Vec::new(),
            dead_money_breakdown: Vec::new(),
        }
    }

    #[test]
    fn test_efficiency_bands() {
        let low = CapEfficiency::from_summary(&summary(100_000_000));
        assert_eq!(low.utilization_percentage, 50.0);
        assert_eq!(low.health, CapHealth::Excellent);
        assert_eq!(low.flexibility, CapFlexibility::High);

        let mid = CapEfficiency::from_summary(&summary(176_000_000));
        assert_eq!(mid.health, CapHealth::Good);
        assert_eq!(mid.flexibility, CapFlexibility::Medium);

        let tight = CapEfficiency::from_summary(&summary(186_000_000));
        assert_eq!(tight.health, CapHealth::Fair);
        assert_eq!(tight.flexibility, CapFlexibility::Low);

        let over = CapEfficiency::from_summary(&summary(199_000_000));
        assert_eq!(over.health, CapHealth::Critical);
    }

    #[test]
    fn test_efficiency_zero_cap() {
        let mut empty = summary(0);
        empty.adjusted_cap = 0;
        assert_eq!(CapEfficiency::from_summary(&empty).utilization_percentage, 0.0);
    }
}
