//! Service state: wires the ledger, player directory and lifecycle together

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;

use contract_ledger::{InMemoryLedger, InMemoryPlayerDirectory, TeamId};
use contract_lifecycle::ContractLifecycle;
use market_valuation::MarketValuation;

use crate::config::ServiceConfig;
use crate::seed::SeedData;

/// Running simulator state
pub struct ServiceState {
    config: ServiceConfig,
    ledger: Arc<InMemoryLedger>,
    players: Arc<InMemoryPlayerDirectory>,
    lifecycle: ContractLifecycle,
}

impl ServiceState {
    /// Create service state, loading the configured seed file if any
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let seed = match &config.service.seed_file {
            Some(path) => SeedData::load(path)
                .with_context(|| format!("Failed to load seed data from {:?}", path))?,
            None => SeedData::default(),
        };
        Self::from_seed(config, seed)
    }

    /// Create service state from in-memory seed data
    pub fn from_seed(config: ServiceConfig, seed: SeedData) -> Result<Self> {
        let (ledger, players) = seed.into_stores().context("Invalid seed data")?;
        let ledger = Arc::new(ledger);
        let players = Arc::new(players);

        let lifecycle = ContractLifecycle::new(
            config.lifecycle.clone(),
            ledger.clone(),
            players.clone(),
            config.league.clone(),
            MarketValuation::new(config.valuation.clone()),
        );

        info!("Service state initialized with {} players", players.len());
        Ok(Self { config, ledger, players, lifecycle })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn lifecycle(&self) -> &ContractLifecycle {
        &self.lifecycle
    }

    /// Every team that rosters a player or holds a contract, ascending
    pub async fn team_ids(&self) -> Vec<TeamId> {
        let mut teams: BTreeSet<TeamId> = self.players.team_ids().into_iter().collect();
        teams.extend(self.ledger.snapshot().await.iter().map(|contract| contract.team_id));
        teams.into_iter().collect()
    }

    /// Current players and contracts as a seed document
    pub async fn snapshot(&self) -> SeedData {
        SeedData { players: self.players.players(), contracts: self.ledger.snapshot().await }
    }

    /// Write the ledger back to the seed file when write-back is enabled
    pub async fn persist(&self) -> Result<bool> {
        let Some(path) = self.config.service.seed_file.as_ref() else {
            return Ok(false);
        };
        if !self.config.service.write_back {
            return Ok(false);
        }

        self.snapshot()
            .await
            .save(path)
            .with_context(|| format!("Failed to write seed data to {:?}", path))?;
        Ok(true)
    }
}
