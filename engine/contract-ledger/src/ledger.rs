//! Contract ledger trait and the in-memory implementation

use crate::error::{LedgerError, Result};
use crate::types::{Contract, ContractId, PlayerId, TeamId};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// A single write inside a ledger batch
#[derive(Debug, Clone)]
pub enum LedgerWrite {
    /// Store a new contract (its id must come from [`ContractLedger::allocate_id`])
    Insert(Contract),
    /// Replace an existing contract record
    Update(Contract),
}

impl LedgerWrite {
    pub fn contract(&self) -> &Contract {
        match self {
            LedgerWrite::Insert(contract) | LedgerWrite::Update(contract) => contract,
        }
    }
}

/// Abstract store for contract records
///
/// `commit` is the only write path. A backend must apply a batch completely or not
/// at all, and must refuse batches that leave a player with more than one active
/// contract.
#[async_trait::async_trait]
pub trait ContractLedger: Send + Sync {
    /// Reserve a fresh contract id
    async fn allocate_id(&self) -> Result<ContractId>;

    /// Get a contract by ID
    async fn get(&self, contract_id: ContractId) -> Result<Option<Contract>>;

    /// Get the active contract for a player, if any
    async fn active_for_player(&self, player_id: PlayerId) -> Result<Option<Contract>>;

    /// All contracts for a player, newest start date first
    async fn for_player(&self, player_id: PlayerId) -> Result<Vec<Contract>>;

    /// Contracts for a team, optionally filtered on the active flag
    async fn for_team(&self, team_id: TeamId, active: Option<bool>) -> Result<Vec<Contract>>;

    /// Apply a batch of writes atomically
    async fn commit(&self, writes: Vec<LedgerWrite>) -> Result<()>;
}

/// In-memory ledger backend
#[derive(Debug)]
pub struct InMemoryLedger {
    contracts: RwLock<HashMap<ContractId, Contract>>,
    next_id: AtomicU64,
}

impl InMemoryLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self { contracts: RwLock::new(HashMap::new()), next_id: AtomicU64::new(1) }
    }

    /// Build a ledger from existing records (e.g. seed data)
    pub fn from_contracts(contracts: Vec<Contract>) -> Result<Self> {
        let mut map = HashMap::with_capacity(contracts.len());
        for contract in contracts {
            contract.validate().map_err(LedgerError::InvariantViolation)?;
            if map.insert(contract.id, contract.clone()).is_some() {
                return Err(LedgerError::AlreadyExists(contract.id));
            }
        }
        check_single_active(&map)?;

        let next_id = map.keys().map(|id| id.0).max().unwrap_or(0) + 1;
        tracing::info!("Contract ledger loaded with {} contracts", map.len());

        Ok(Self { contracts: RwLock::new(map), next_id: AtomicU64::new(next_id) })
    }

    /// Copy of every stored contract ordered by id
    pub async fn snapshot(&self) -> Vec<Contract> {
        let contracts = self.contracts.read().await;
        let mut all: Vec<Contract> = contracts.values().cloned().collect();
        all.sort_by_key(|c| c.id);
        all
    }

    /// Number of stored contracts
    pub async fn len(&self) -> usize {
        self.contracts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.contracts.read().await.is_empty()
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ContractLedger for InMemoryLedger {
    async fn allocate_id(&self) -> Result<ContractId> {
        Ok(ContractId(self.next_id.fetch_add(1, Ordering::SeqCst)))
    }

    async fn get(&self, contract_id: ContractId) -> Result<Option<Contract>> {
        let contracts = self.contracts.read().await;
        Ok(contracts.get(&contract_id).cloned())
    }

    async fn active_for_player(&self, player_id: PlayerId) -> Result<Option<Contract>> {
        let contracts = self.contracts.read().await;
        Ok(contracts.values().find(|c| c.player_id == player_id && c.is_active).cloned())
    }

    async fn for_player(&self, player_id: PlayerId) -> Result<Vec<Contract>> {
        let contracts = self.contracts.read().await;
        let mut history: Vec<Contract> =
            contracts.values().filter(|c| c.player_id == player_id).cloned().collect();
        history.sort_by(|a, b| b.start_date.cmp(&a.start_date).then(b.id.cmp(&a.id)));
        Ok(history)
    }

    async fn for_team(&self, team_id: TeamId, active: Option<bool>) -> Result<Vec<Contract>> {
        let contracts = self.contracts.read().await;
        let mut matching: Vec<Contract> = contracts
            .values()
            .filter(|c| c.team_id == team_id && active.map_or(true, |flag| c.is_active == flag))
            .cloned()
            .collect();
        matching.sort_by_key(|c| c.id);
        Ok(matching)
    }

    async fn commit(&self, writes: Vec<LedgerWrite>) -> Result<()> {
        let mut contracts = self.contracts.write().await;

        // Stage the batch on a copy so a rejected write leaves nothing behind
        let mut staged: HashMap<ContractId, Contract> = HashMap::new();
        for write in &writes {
            let contract = write.contract();
            contract.validate().map_err(LedgerError::InvariantViolation)?;
            match write {
                LedgerWrite::Insert(_) => {
                    if contracts.contains_key(&contract.id) || staged.contains_key(&contract.id) {
                        return Err(LedgerError::AlreadyExists(contract.id));
                    }
                }
                LedgerWrite::Update(_) => {
                    if !contracts.contains_key(&contract.id) {
                        return Err(LedgerError::NotFound(contract.id));
                    }
                }
            }
            staged.insert(contract.id, contract.clone());
        }

        let mut merged = contracts.clone();
        merged.extend(staged);
        check_single_active(&merged)?;

        tracing::debug!("Committed {} ledger writes", writes.len());
        *contracts = merged;
        Ok(())
    }
}

fn check_single_active(contracts: &HashMap<ContractId, Contract>) -> Result<()> {
    let mut seen = HashSet::new();
    for contract in contracts.values().filter(|c| c.is_active) {
        if !seen.insert(contract.player_id) {
            return Err(LedgerError::invariant(format!(
                "player {} would hold more than one active contract",
                contract.player_id
            )));
        }
    }
    Ok(())
}
