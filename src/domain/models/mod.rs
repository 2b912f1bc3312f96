//! Domain model types shared across services and the presentation layer.

pub mod budget;
pub mod category;
pub mod notification;
pub mod transaction;

pub use budget::Budget;
pub use category::{expense_categories, income_categories, CategoryGroup, CategorySource};
pub use notification::{Notification, NotificationLevel};
pub use transaction::{parse_date, Transaction, TransactionKind, TransactionRecord};

use thiserror::Error;

/// Validation failures raised before any store call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Amount must be greater than zero")]
    AmountNotPositive,
    #[error("Category is required")]
    MissingCategory,
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Custom reports need both a start and an end date")]
    MissingDateRange,
}
