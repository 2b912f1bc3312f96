//! Storage backends and the store-adapter contract.

pub mod file;
pub mod memory;
pub mod traits;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use traits::{
    BookkeepingStore, BudgetWatcher, StoreSnapshot, TransactionsWatcher, WatchHandle,
};
