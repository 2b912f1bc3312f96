//! Application state controller.
//!
//! Owns the in-memory mirror of the store's transactions and budget. The
//! mirror is written only by watch delivery: a user intent goes to the store,
//! and its effect becomes visible once the store's change notification
//! round-trips. Intents never mutate the mirror optimistically, so a failed
//! mutation leaves displayed state untouched.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Result;
use log::{error, info, warn};

use crate::domain::backup_service::BackupService;
use crate::domain::models::{
    Budget, Notification, NotificationLevel, Transaction, TransactionKind, TransactionRecord,
};
use crate::storage::traits::{BookkeepingStore, StoreSnapshot, WatchHandle};

/// How long a notification stays visible before it is pruned.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// The locally cached copy of remote state.
#[derive(Debug)]
struct Mirror {
    transactions: Vec<Transaction>,
    budget: Budget,
    /// True until the first transaction snapshot arrives.
    loading: bool,
}

struct PostedNotification {
    notification: Notification,
    posted_at: Instant,
}

/// State controller over an injected store backend.
///
/// Construct with the backend, call [`start`](AppService::start) to subscribe
/// to the store's watches, and [`shutdown`](AppService::shutdown) when done.
/// The two watch streams are independent; each delivery fully replaces its
/// slice of the mirror.
pub struct AppService<S: BookkeepingStore> {
    store: Arc<S>,
    mirror: Arc<Mutex<Mirror>>,
    notifications: Arc<Mutex<Vec<PostedNotification>>>,
    watches: Mutex<Vec<WatchHandle>>,
    notification_ttl: Duration,
}

impl<S: BookkeepingStore> AppService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            mirror: Arc::new(Mutex::new(Mirror {
                transactions: Vec::new(),
                budget: Budget::default(),
                loading: true,
            })),
            notifications: Arc::new(Mutex::new(Vec::new())),
            watches: Mutex::new(Vec::new()),
            notification_ttl: NOTIFICATION_TTL,
        }
    }

    /// Subscribe to both store watches. Until the first transaction delivery
    /// the mirror reports [`is_loading`](AppService::is_loading).
    pub fn start(&self) {
        let mut watches = self.watches.lock().unwrap();
        if !watches.is_empty() {
            return;
        }
        let mirror = Arc::clone(&self.mirror);
        watches.push(self.store.watch_transactions(Box::new(move |transactions| {
            let mut mirror = mirror.lock().unwrap();
            mirror.transactions = transactions;
            mirror.loading = false;
        })));
        let mirror = Arc::clone(&self.mirror);
        watches.push(self.store.watch_budget(Box::new(move |budget| {
            mirror.lock().unwrap().budget = budget;
        })));
        info!("Subscribed to store watches");
    }

    /// Unsubscribe both watches. Safe to call repeatedly.
    pub fn shutdown(&self) {
        for watch in self.watches.lock().unwrap().drain(..) {
            watch.unsubscribe();
        }
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.mirror.lock().unwrap().transactions.clone()
    }

    pub fn budget(&self) -> Budget {
        self.mirror.lock().unwrap().budget.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.mirror.lock().unwrap().loading
    }

    /// Live notifications, oldest first. Expired entries are pruned here.
    pub fn notifications(&self) -> Vec<Notification> {
        let mut posted = self.notifications.lock().unwrap();
        let ttl = self.notification_ttl;
        posted.retain(|entry| entry.posted_at.elapsed() < ttl);
        posted
            .iter()
            .map(|entry| entry.notification.clone())
            .collect()
    }

    /// The mirrored state as a backup document source.
    pub fn export_snapshot(&self) -> StoreSnapshot {
        let mirror = self.mirror.lock().unwrap();
        StoreSnapshot {
            transactions: mirror
                .transactions
                .iter()
                .map(|transaction| (transaction.id.clone(), transaction.to_record()))
                .collect(),
            budget: Some(mirror.budget.clone()),
        }
    }

    /// Validate and persist a new transaction, returning its store id.
    pub async fn add_transaction(&self, record: TransactionRecord) -> Result<String> {
        if let Err(validation) = record.validate() {
            warn!("Rejected transaction input: {}", validation);
            self.notify("กรุณากรอกข้อมูลให้ครบถ้วน", NotificationLevel::Warning);
            return Err(validation.into());
        }
        let noun = match record.kind {
            TransactionKind::Income => "รายรับ",
            TransactionKind::Expense => "รายจ่าย",
        };
        match self.store.create_transaction(record).await {
            Ok(id) => {
                self.notify(
                    format!("บันทึก{}เรียบร้อย!", noun),
                    NotificationLevel::Success,
                );
                Ok(id)
            }
            Err(err) => {
                error!("Failed to store transaction: {:#}", err);
                self.notify("เกิดข้อผิดพลาดในการบันทึก", NotificationLevel::Danger);
                Err(err)
            }
        }
    }

    pub async fn delete_transaction(&self, id: &str) -> Result<()> {
        match self.store.delete_transaction(id).await {
            Ok(()) => {
                self.notify("ลบรายการเรียบร้อย!", NotificationLevel::Success);
                Ok(())
            }
            Err(err) => {
                error!("Failed to delete transaction {}: {:#}", id, err);
                self.notify("เกิดข้อผิดพลาดในการลบ", NotificationLevel::Danger);
                Err(err)
            }
        }
    }

    /// Overwrite the budget record whole.
    pub async fn set_budget(&self, budget: Budget) -> Result<()> {
        match self.store.put_budget(&budget).await {
            Ok(()) => {
                self.notify("บันทึกงบประมาณเรียบร้อย!", NotificationLevel::Success);
                Ok(())
            }
            Err(err) => {
                error!("Failed to store budget: {:#}", err);
                self.notify(
                    "เกิดข้อผิดพลาดในการบันทึกงบประมาณ",
                    NotificationLevel::Danger,
                );
                Err(err)
            }
        }
    }

    /// Irreversibly clear every transaction and the budget. Confirmation is
    /// a presentation concern; callers ask first.
    pub async fn wipe_all(&self) -> Result<()> {
        match self.store.wipe_all().await {
            Ok(()) => {
                self.notify("ล้างข้อมูลทั้งหมดเรียบร้อย!", NotificationLevel::Success);
                Ok(())
            }
            Err(err) => {
                error!("Failed to wipe store: {:#}", err);
                self.notify("เกิดข้อผิดพลาดในการล้างข้อมูล", NotificationLevel::Danger);
                Err(err)
            }
        }
    }

    /// Parse a backup document and restore it as the entire store state.
    /// A document that fails to parse never reaches the store.
    pub async fn restore_from_json(&self, text: &str) -> Result<()> {
        let snapshot = match BackupService::new().parse_backup(text) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!("Rejected backup document: {:#}", err);
                self.notify(
                    "ไฟล์ไม่ถูกต้องหรือไม่สามารถอ่านข้อมูลได้",
                    NotificationLevel::Danger,
                );
                return Err(err);
            }
        };
        match self.store.restore_all(snapshot).await {
            Ok(()) => {
                self.notify("กู้คืนข้อมูลเรียบร้อย!", NotificationLevel::Success);
                Ok(())
            }
            Err(err) => {
                error!("Failed to restore store state: {:#}", err);
                self.notify("เกิดข้อผิดพลาดในการกู้คืนข้อมูล", NotificationLevel::Danger);
                Err(err)
            }
        }
    }

    fn notify(&self, message: impl Into<String>, level: NotificationLevel) {
        self.notifications.lock().unwrap().push(PostedNotification {
            notification: Notification::new(message, level),
            posted_at: Instant::now(),
        });
    }
}
