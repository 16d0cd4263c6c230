use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::{RwLock, RwLockReadGuard},
};

use uuid::Uuid;

use crate::errors::{LedgerError, Result};
use crate::ledger::{Budget, PeriodKey, Transaction};

use super::{LedgerState, LedgerStore, TransactionQuery};

const TMP_SUFFIX: &str = "tmp";

/// File-backed store that keeps the whole ledger in one JSON document.
///
/// Mutations are applied to a copy, written to disk, and only then published
/// in memory, so a failed write leaves both views on the previous state.
#[derive(Debug)]
pub struct JsonLedgerStore {
    path: PathBuf,
    state: RwLock<LedgerState>,
}

impl JsonLedgerStore {
    /// Opens `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = if path.exists() {
            load_state_from_path(&path)?
        } else {
            LedgerState::default()
        };
        tracing::debug!(
            path = %path.display(),
            transactions = state.transactions.len(),
            budgets = state.budgets.len(),
            "opened json ledger store"
        );
        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, LedgerState>> {
        self.state
            .read()
            .map_err(|_| LedgerError::Storage("ledger state lock poisoned".into()))
    }

    fn mutate<T, F>(&self, change: F) -> Result<T>
    where
        F: FnOnce(&mut LedgerState) -> Result<T>,
    {
        let mut guard = self
            .state
            .write()
            .map_err(|_| LedgerError::Storage("ledger state lock poisoned".into()))?;
        let mut next = guard.clone();
        let outcome = change(&mut next)?;
        save_state_to_path(&next, &self.path)?;
        *guard = next;
        Ok(outcome)
    }
}

impl LedgerStore for JsonLedgerStore {
    fn insert_transaction(&self, transaction: Transaction) -> Result<Transaction> {
        self.mutate(|state| Ok(state.insert_transaction(transaction)))
    }

    fn update_transaction(&self, transaction: Transaction) -> Result<Transaction> {
        self.mutate(|state| state.update_transaction(transaction))
    }

    fn delete_transaction(&self, owner_id: Uuid, id: Uuid) -> Result<Transaction> {
        self.mutate(|state| state.delete_transaction(owner_id, id))
    }

    fn get_transaction(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Transaction>> {
        Ok(self.read()?.get_transaction(owner_id, id))
    }

    fn query_transactions(&self, query: &TransactionQuery) -> Result<Vec<Transaction>> {
        Ok(query.apply(&self.read()?.transactions))
    }

    fn insert_budget(&self, budget: Budget) -> Result<Budget> {
        self.mutate(|state| Ok(state.insert_budget(budget)))
    }

    fn delete_budget(&self, owner_id: Uuid, id: Uuid) -> Result<Budget> {
        self.mutate(|state| state.delete_budget(owner_id, id))
    }

    fn list_budgets(&self, owner_id: Uuid, period: Option<PeriodKey>) -> Result<Vec<Budget>> {
        Ok(self.read()?.list_budgets(owner_id, period))
    }
}

/// Writes the ledger state to disk atomically by staging to a temporary file.
pub fn save_state_to_path(state: &LedgerState, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(state)?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Loads a ledger state snapshot, rejecting schema versions newer than this build.
pub fn load_state_from_path(path: &Path) -> Result<LedgerState> {
    let data = fs::read_to_string(path)?;
    let state: LedgerState = serde_json::from_str(&data)?;
    if state.schema_version > LedgerState::CURRENT_SCHEMA_VERSION {
        return Err(LedgerError::Storage(format!(
            "ledger schema v{} is newer than supported v{}",
            state.schema_version,
            LedgerState::CURRENT_SCHEMA_VERSION
        )));
    }
    Ok(state)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
