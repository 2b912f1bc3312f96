//! In-memory bookkeeping store.
//!
//! Reference implementation of [`BookkeepingStore`]: state lives behind a
//! shared mutex and every mutation re-delivers the full snapshot to the
//! live watchers, reproducing the push behavior of the remote store.
//! Callbacks are invoked after the state lock is released, so a watcher may
//! call back into the store.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use log::info;

use crate::domain::models::{Budget, Transaction, TransactionRecord};
use crate::storage::traits::{
    BookkeepingStore, BudgetWatcher, StoreSnapshot, TransactionsWatcher, WatchHandle,
};

type WatcherRegistry<T> = Arc<Mutex<HashMap<u64, Arc<dyn Fn(T) + Send + Sync>>>>;

/// In-process store with full-snapshot watch delivery.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<StoreSnapshot>>,
    transaction_watchers: WatcherRegistry<Vec<Transaction>>,
    budget_watchers: WatcherRegistry<Budget>,
    next_watch_id: Arc<AtomicU64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a store pre-populated with an existing snapshot.
    pub fn with_snapshot(snapshot: StoreSnapshot) -> Self {
        let store = Self::new();
        *store.state.lock().unwrap() = snapshot;
        store
    }

    /// Copy of the full current state.
    pub fn snapshot(&self) -> StoreSnapshot {
        self.state.lock().unwrap().clone()
    }

    /// Allocate a store id for a new transaction.
    ///
    /// Format: `txn-<epoch_millis>-<hex suffix>`, which keeps ids sortable
    /// by creation time. The suffix is bumped on the rare same-millisecond
    /// collision.
    pub(crate) fn allocate_id(taken: &BTreeMap<String, TransactionRecord>) -> String {
        let millis = Utc::now().timestamp_millis();
        let mut seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Time went backwards")
            .subsec_nanos() as u64;
        loop {
            let id = format!("txn-{}-{:04x}", millis, seed & 0xffff);
            if !taken.contains_key(&id) {
                return id;
            }
            seed = seed.wrapping_add(1);
        }
    }

    fn notify_transaction_watchers(&self) {
        let transactions = self.state.lock().unwrap().materialize_transactions();
        let watchers: Vec<_> = self
            .transaction_watchers
            .lock()
            .unwrap()
            .values()
            .cloned()
            .collect();
        for watcher in watchers {
            watcher(transactions.clone());
        }
    }

    fn notify_budget_watchers(&self) {
        let budget = self.state.lock().unwrap().budget_or_default();
        let watchers: Vec<_> = self
            .budget_watchers
            .lock()
            .unwrap()
            .values()
            .cloned()
            .collect();
        for watcher in watchers {
            watcher(budget.clone());
        }
    }

    fn register<T: 'static>(
        registry: &WatcherRegistry<T>,
        id: u64,
        watcher: Arc<dyn Fn(T) + Send + Sync>,
    ) -> WatchHandle {
        registry.lock().unwrap().insert(id, watcher);
        let registry: Weak<_> = Arc::downgrade(registry);
        WatchHandle::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry.lock().unwrap().remove(&id);
            }
        })
    }
}

#[async_trait]
impl BookkeepingStore for MemoryStore {
    fn watch_transactions(&self, on_change: TransactionsWatcher) -> WatchHandle {
        let watcher: Arc<dyn Fn(Vec<Transaction>) + Send + Sync> = Arc::from(on_change);
        let id = self.next_watch_id.fetch_add(1, Ordering::Relaxed);
        let handle = Self::register(&self.transaction_watchers, id, watcher.clone());
        // Initial snapshot, delivered immediately like the remote store
        // does on subscribe.
        watcher(self.state.lock().unwrap().materialize_transactions());
        handle
    }

    fn watch_budget(&self, on_change: BudgetWatcher) -> WatchHandle {
        let watcher: Arc<dyn Fn(Budget) + Send + Sync> = Arc::from(on_change);
        let id = self.next_watch_id.fetch_add(1, Ordering::Relaxed);
        let handle = Self::register(&self.budget_watchers, id, watcher.clone());
        watcher(self.state.lock().unwrap().budget_or_default());
        handle
    }

    async fn create_transaction(&self, record: TransactionRecord) -> Result<String> {
        let id = {
            let mut state = self.state.lock().unwrap();
            let id = Self::allocate_id(&state.transactions);
            state.transactions.insert(id.clone(), record);
            id
        };
        info!("Stored transaction {}", id);
        self.notify_transaction_watchers();
        Ok(id)
    }

    async fn delete_transaction(&self, id: &str) -> Result<()> {
        let removed = self.state.lock().unwrap().transactions.remove(id).is_some();
        if removed {
            info!("Deleted transaction {}", id);
            self.notify_transaction_watchers();
        }
        Ok(())
    }

    async fn put_budget(&self, budget: &Budget) -> Result<()> {
        self.state.lock().unwrap().budget = Some(budget.clone());
        self.notify_budget_watchers();
        Ok(())
    }

    async fn wipe_all(&self) -> Result<()> {
        *self.state.lock().unwrap() = StoreSnapshot::default();
        info!("Wiped all store data");
        self.notify_transaction_watchers();
        self.notify_budget_watchers();
        Ok(())
    }

    async fn restore_all(&self, snapshot: StoreSnapshot) -> Result<()> {
        let count = snapshot.transactions.len();
        *self.state.lock().unwrap() = snapshot;
        info!("Restored store state with {} transactions", count);
        self.notify_transaction_watchers();
        self.notify_budget_watchers();
        Ok(())
    }
}
