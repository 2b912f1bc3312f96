//! JSON-document store persisted to disk.
//!
//! Wraps a [`MemoryStore`] and writes the full snapshot document to a
//! single JSON file, the same layout the backup export uses. Each mutation
//! is written ahead of the in-memory apply, so a failed write leaves both
//! the file and the delivered state unchanged.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::info;

use crate::domain::models::{Budget, TransactionRecord};
use crate::storage::memory::MemoryStore;
use crate::storage::traits::{
    BookkeepingStore, BudgetWatcher, StoreSnapshot, TransactionsWatcher, WatchHandle,
};

/// Store backed by one JSON document on disk.
pub struct JsonFileStore {
    inner: MemoryStore,
    path: PathBuf,
}

impl JsonFileStore {
    /// Open the store at `path`, loading an existing document. A missing
    /// file opens as the empty store; the file is only created on the first
    /// mutation.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let snapshot = if path.exists() {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read store file {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Malformed store file {}", path.display()))?
        } else {
            StoreSnapshot::default()
        };
        info!("Opened bookkeeping store at {}", path.display());
        Ok(Self {
            inner: MemoryStore::with_snapshot(snapshot),
            path,
        })
    }

    /// Open the store in the default data location,
    /// `Documents/Restaurant Ledger/ledger.json` (falling back to the home
    /// directory when no Documents directory exists).
    pub fn open_default() -> Result<Self> {
        let base = dirs::document_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| anyhow!("Could not determine a data directory"))?;
        Self::open(base.join("Restaurant Ledger").join("ledger.json"))
    }

    /// Location of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_document(&self, snapshot: &StoreSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create store directory {}", parent.display())
            })?;
        }
        let text = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, text)
            .with_context(|| format!("Failed to write store file {}", self.path.display()))
    }

    /// Persist a prospective snapshot, then apply it to the in-memory state
    /// (which delivers it to the watchers).
    async fn commit(&self, snapshot: StoreSnapshot) -> Result<()> {
        self.write_document(&snapshot)?;
        self.inner.restore_all(snapshot).await
    }
}

#[async_trait]
impl BookkeepingStore for JsonFileStore {
    fn watch_transactions(&self, on_change: TransactionsWatcher) -> WatchHandle {
        self.inner.watch_transactions(on_change)
    }

    fn watch_budget(&self, on_change: BudgetWatcher) -> WatchHandle {
        self.inner.watch_budget(on_change)
    }

    async fn create_transaction(&self, record: TransactionRecord) -> Result<String> {
        let mut snapshot = self.inner.snapshot();
        let id = MemoryStore::allocate_id(&snapshot.transactions);
        snapshot.transactions.insert(id.clone(), record);
        self.commit(snapshot).await?;
        Ok(id)
    }

    async fn delete_transaction(&self, id: &str) -> Result<()> {
        let mut snapshot = self.inner.snapshot();
        if snapshot.transactions.remove(id).is_none() {
            return Ok(());
        }
        self.commit(snapshot).await
    }

    async fn put_budget(&self, budget: &Budget) -> Result<()> {
        let mut snapshot = self.inner.snapshot();
        snapshot.budget = Some(budget.clone());
        self.commit(snapshot).await
    }

    async fn wipe_all(&self) -> Result<()> {
        self.commit(StoreSnapshot::default()).await
    }

    async fn restore_all(&self, snapshot: StoreSnapshot) -> Result<()> {
        self.commit(snapshot).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::TransactionKind;
    use tempfile::TempDir;

    fn record(amount: f64) -> TransactionRecord {
        TransactionRecord {
            kind: TransactionKind::Expense,
            date: "2024-05-01".parse().unwrap(),
            category: "ค่าวัตถุดิบ".to_string(),
            amount,
            description: "ตลาดเช้า".to_string(),
        }
    }

    fn store_path(dir: &TempDir) -> PathBuf {
        dir.path().join("ledger.json")
    }

    #[tokio::test]
    async fn test_missing_file_opens_as_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(store_path(&dir)).unwrap();
        assert_eq!(store.inner.snapshot(), StoreSnapshot::default());
        assert!(!store_path(&dir).exists());
    }

    #[tokio::test]
    async fn test_reopen_sees_identical_state() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(store_path(&dir)).unwrap();
        let id = store.create_transaction(record(120.5)).await.unwrap();
        let budget = Budget {
            monthly_expense_budget: 30000.0,
            ..Budget::default()
        };
        store.put_budget(&budget).await.unwrap();
        let before = store.inner.snapshot();

        let reopened = JsonFileStore::open(store_path(&dir)).unwrap();
        assert_eq!(reopened.inner.snapshot(), before);
        assert!(reopened.inner.snapshot().transactions.contains_key(&id));
    }

    #[tokio::test]
    async fn test_malformed_file_is_rejected_on_open() {
        let dir = TempDir::new().unwrap();
        fs::write(store_path(&dir), "not json at all").unwrap();
        assert!(JsonFileStore::open(store_path(&dir)).is_err());
    }

    #[tokio::test]
    async fn test_wipe_persists_the_empty_document() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(store_path(&dir)).unwrap();
        store.create_transaction(record(100.0)).await.unwrap();
        store.wipe_all().await.unwrap();

        let reopened = JsonFileStore::open(store_path(&dir)).unwrap();
        assert_eq!(reopened.inner.snapshot(), StoreSnapshot::default());
    }

    #[tokio::test]
    async fn test_delete_of_absent_id_does_not_touch_the_file() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(store_path(&dir)).unwrap();
        store.delete_transaction("txn-0-dead").await.unwrap();
        assert!(!store_path(&dir).exists());
    }

    #[tokio::test]
    async fn test_watchers_see_committed_mutations() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(store_path(&dir)).unwrap();
        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = std::sync::Arc::clone(&seen);
        let _handle = store.watch_transactions(Box::new(move |transactions| {
            sink.lock().unwrap().push(transactions.len());
        }));

        store.create_transaction(record(10.0)).await.unwrap();
        store.create_transaction(record(20.0)).await.unwrap();
        assert_eq!(seen.lock().unwrap().as_slice(), &[0, 1, 2]);
    }
}
