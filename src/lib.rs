//! Restaurant bookkeeping core.
//!
//! Income/expense transaction log, monthly budget record, and the
//! aggregation behind a bookkeeping dashboard for a small restaurant.
//! Persistence belongs to a store behind [`storage::BookkeepingStore`]; a
//! host constructs a backend, hands it to [`domain::AppService`], and renders
//! the mirrored state through the pure services in [`domain`].

pub mod domain;
pub mod storage;

pub use domain::models::{
    Budget, Notification, NotificationLevel, Transaction, TransactionKind, TransactionRecord,
    ValidationError,
};
pub use domain::{AppService, BackupService, ReportService, SummaryService};
pub use storage::{BookkeepingStore, JsonFileStore, MemoryStore, StoreSnapshot, WatchHandle};
