//! Player attribute input from the external player repository
//!
//! The cap engine only reads these values; ratings are produced elsewhere.

use crate::error::Result;
use crate::types::{PlayerId, TeamId};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Attributes the contract engine consumes for a player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub id: PlayerId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Short position code (QB, WR, LT, ...)
    pub position: String,
    pub age: u32,
    pub years_pro: u32,
    pub overall_rating: u32,
    pub potential: u32,
    pub work_ethic: u32,
    /// Team the player is currently rostered on
    pub team_id: Option<TeamId>,
}

impl PlayerProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Read access to player attributes
#[async_trait::async_trait]
pub trait PlayerDirectory: Send + Sync {
    /// Get a player by ID
    async fn get_player(&self, player_id: PlayerId) -> Result<Option<PlayerProfile>>;
}

/// In-memory player directory
#[derive(Debug, Default)]
pub struct InMemoryPlayerDirectory {
    players: DashMap<PlayerId, PlayerProfile>,
}

impl InMemoryPlayerDirectory {
    pub fn new() -> Self {
        Self { players: DashMap::new() }
    }

    pub fn from_players(players: impl IntoIterator<Item = PlayerProfile>) -> Self {
        let directory = Self::new();
        for player in players {
            directory.upsert(player);
        }
        directory
    }

    /// Insert or replace a player
    pub fn upsert(&self, player: PlayerProfile) {
        self.players.insert(player.id, player);
    }

    /// All players ordered by id
    pub fn players(&self) -> Vec<PlayerProfile> {
        let mut players: Vec<PlayerProfile> =
            self.players.iter().map(|entry| entry.value().clone()).collect();
        players.sort_by_key(|p| p.id);
        players
    }

    /// Distinct team ids referenced by rostered players
    pub fn team_ids(&self) -> Vec<TeamId> {
        let mut teams: Vec<TeamId> =
            self.players.iter().filter_map(|entry| entry.value().team_id).collect();
        teams.sort_unstable();
        teams.dedup();
        teams
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[async_trait::async_trait]
impl PlayerDirectory for InMemoryPlayerDirectory {
    async fn get_player(&self, player_id: PlayerId) -> Result<Option<PlayerProfile>> {
        Ok(self.players.get(&player_id).map(|entry| entry.value().clone()))
    }
}
