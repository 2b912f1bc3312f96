//! Storage abstraction for the bookkeeping store.
//!
//! The remote store owns all persisted state; the application only mirrors
//! it. Watches deliver the *full* current value of their collection on every
//! change (including an initial snapshot on subscribe): replacement
//! semantics, never deltas. The two watch streams carry no ordering
//! guarantee relative to each other. Mutations are asynchronous; completion
//! of a mutation does not imply its watch notification has been delivered
//! yet.

use std::collections::BTreeMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::models::{Budget, Transaction, TransactionRecord};

/// Callback receiving the full transaction list after every store change.
pub type TransactionsWatcher = Box<dyn Fn(Vec<Transaction>) + Send + Sync>;

/// Callback receiving the current budget after every store change.
pub type BudgetWatcher = Box<dyn Fn(Budget) + Send + Sync>;

/// Handle to a live watch subscription.
///
/// Calling [`unsubscribe`](WatchHandle::unsubscribe) stops delivery and
/// releases the subscription; further calls are no-ops.
pub struct WatchHandle {
    cancel: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl WatchHandle {
    /// Wrap the cancellation action for a new subscription.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Mutex::new(Some(Box::new(cancel))),
        }
    }

    /// Stop delivery. Safe to call more than once.
    pub fn unsubscribe(&self) {
        if let Some(cancel) = self.cancel.lock().unwrap().take() {
            cancel();
        }
    }
}

/// The full store state: a map of transaction records keyed by store id plus
/// the singleton budget.
///
/// The persisted layout, the watch materialization source and the backup
/// document are all this one shape; both keys are optional when parsing an
/// imported document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub transactions: BTreeMap<String, TransactionRecord>,
    #[serde(default)]
    pub budget: Option<Budget>,
}

impl StoreSnapshot {
    /// Materialize the transactions map into the domain list form, in id
    /// order. Ids sort by creation time by convention, so this approximates
    /// insertion order.
    pub fn materialize_transactions(&self) -> Vec<Transaction> {
        self.transactions
            .iter()
            .map(|(id, record)| Transaction::from_record(id.clone(), record.clone()))
            .collect()
    }

    /// The budget record, or the zero-valued default when absent.
    pub fn budget_or_default(&self) -> Budget {
        self.budget.clone().unwrap_or_default()
    }
}

/// Contract with the bookkeeping store.
///
/// Implementations must tolerate an empty or absent collection (an empty
/// list / default budget, never an error) and must propagate mutation
/// failures to the caller; there is no automatic retry at this layer.
#[async_trait]
pub trait BookkeepingStore: Send + Sync {
    /// Subscribe to the transaction collection. The callback fires with the
    /// current full list immediately and again after every change.
    fn watch_transactions(&self, on_change: TransactionsWatcher) -> WatchHandle;

    /// Subscribe to the budget record. Absent data is delivered as the
    /// default budget.
    fn watch_budget(&self, on_change: BudgetWatcher) -> WatchHandle;

    /// Persist a new transaction under a store-assigned id and return the
    /// id once durably accepted.
    async fn create_transaction(&self, record: TransactionRecord) -> Result<String>;

    /// Remove the record at `id`. Deleting an absent id succeeds.
    async fn delete_transaction(&self, id: &str) -> Result<()>;

    /// Fully overwrite the singleton budget record.
    async fn put_budget(&self, budget: &Budget) -> Result<()>;

    /// Irreversibly delete every transaction and the budget record.
    async fn wipe_all(&self) -> Result<()>;

    /// Overwrite the entire store state with the snapshot. Anything absent
    /// from the snapshot is deleted.
    async fn restore_all(&self, snapshot: StoreSnapshot) -> Result<()>;
}
