//! Seed data: players and contracts loaded from a JSON document
//!
//! ```json
//! { "players": [ { "id": 1, "first_name": "...", "position": "QB", ... } ],
//!   "contracts": [ { "id": 1, "player_id": 1, "team_id": 3, "years": 4, ... } ] }
//! ```
//!
//! Dates are naive ISO-8601 timestamps (`2024-03-01T00:00:00`). Contracts may omit
//! cap hits; they are derived when read.

use contract_ledger::{Contract, InMemoryLedger, InMemoryPlayerDirectory, LedgerError, PlayerProfile};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Failed to access seed file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid seed document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate player id in seed: {0}")]
    DuplicatePlayer(i64),

    #[error("Seed contracts rejected by ledger: {0}")]
    Ledger(#[from] LedgerError),
}

/// Players and contracts to start a simulation from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub players: Vec<PlayerProfile>,
    #[serde(default)]
    pub contracts: Vec<Contract>,
}

impl SeedData {
    /// Parse a seed document
    pub fn from_json(json: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a seed document from disk
    pub fn load(path: &Path) -> Result<Self, SeedError> {
        let json = std::fs::read_to_string(path)
            .map_err(|source| SeedError::Io { path: path.display().to_string(), source })?;
        let seed = Self::from_json(&json)?;
        info!(
            "Loaded seed {:?}: {} players, {} contracts",
            path,
            seed.players.len(),
            seed.contracts.len()
        );
        Ok(seed)
    }

    /// Write the seed document to disk
    pub fn save(&self, path: &Path) -> Result<(), SeedError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .map_err(|source| SeedError::Io { path: path.display().to_string(), source })?;
        info!("Saved {} contracts to {:?}", self.contracts.len(), path);
        Ok(())
    }

    /// Build the in-memory stores, validating every contract
    pub fn into_stores(self) -> Result<(InMemoryLedger, InMemoryPlayerDirectory), SeedError> {
        let mut seen = HashSet::new();
        if let Some(duplicate) = self.players.iter().find(|player| !seen.insert(player.id)) {
            return Err(SeedError::DuplicatePlayer(duplicate.id));
        }

        let ledger = InMemoryLedger::from_contracts(self.contracts)?;
        let players = InMemoryPlayerDirectory::from_players(self.players);
        Ok((ledger, players))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contract_ledger::{ContractId, ContractLedger};

    const SEED: &str = r#"{
        "players": [
            { "id": 1, "first_name": "Marcus", "last_name": "Bell", "position": "QB",
              "age": 27, "years_pro": 5, "overall_rating": 88, "potential": 90,
              "work_ethic": 75, "team_id": 3 },
            { "id": 2, "first_name": "Theo", "position": "RB",
              "age": 23, "years_pro": 1, "overall_rating": 70, "potential": 84,
              "work_ethic": 60, "team_id": null }
        ],
        "contracts": [
            { "id": 4, "player_id": 1, "team_id": 3, "total_value": 60000000,
              "guaranteed_money": 12000000, "years": 3, "signing_bonus": 12000000,
              "terms": [
                  { "salary": 16000000, "cap_hit": 0, "dead_money": 0 },
                  { "salary": 16000000, "cap_hit": 0, "dead_money": 0 },
                  { "salary": 16000000, "cap_hit": 0, "dead_money": 0 },
                  { "salary": 0, "cap_hit": 0, "dead_money": 0 },
                  { "salary": 0, "cap_hit": 0, "dead_money": 0 }
              ],
              "contract_type": "veteran", "is_active": true,
              "start_date": "2024-03-01T00:00:00", "end_date": "2027-03-01T00:00:00" }
        ]
    }"#;

    #[tokio::test]
    async fn test_seed_builds_stores() {
        let seed = SeedData::from_json(SEED).unwrap();
        assert_eq!(seed.players[1].last_name, "");

        let (ledger, players) = seed.into_stores().unwrap();
        assert_eq!(players.len(), 2);
        let contract = ledger.get(ContractId(4)).await.unwrap().unwrap();
        assert!(contract.cap_hits_pending());
        assert_eq!(ledger.allocate_id().await.unwrap(), ContractId(5));
    }

    #[test]
    fn test_seed_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");

        let seed = SeedData::from_json(SEED).unwrap();
        seed.save(&path).unwrap();
        assert_eq!(SeedData::load(&path).unwrap(), seed);
    }

    #[test]
    fn test_seed_rejects_duplicates_and_bad_contracts() {
        let mut seed = SeedData::from_json(SEED).unwrap();
        seed.players.push(seed.players[0].clone());
        assert!(matches!(seed.into_stores(), Err(SeedError::DuplicatePlayer(1))));

        let mut seed = SeedData::from_json(SEED).unwrap();
        let mut second = seed.contracts[0].clone();
        second.id = ContractId(5);
        seed.contracts.push(second);
        assert!(matches!(seed.into_stores(), Err(SeedError::Ledger(_))));
    }

    #[test]
    fn test_missing_seed_file() {
        let err = SeedData::load(Path::new("/nonexistent/seed.json")).unwrap_err();
        assert!(matches!(err, SeedError::Io { .. }));
    }
}
