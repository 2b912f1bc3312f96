//! Backup export and import.
//!
//! The backup document is the [`StoreSnapshot`] layout serialized as JSON,
//! so a restore is a byte-for-byte round trip of an export. Parsing is typed:
//! a document that does not deserialize cleanly is rejected before it can
//! reach the store. The service also renders the transaction log as CSV for
//! spreadsheet use.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use log::info;

use crate::domain::format::local_today;
use crate::domain::models::Transaction;
use crate::storage::traits::StoreSnapshot;

/// Handles backup documents and CSV exports of the transaction log.
#[derive(Debug, Clone, Default)]
pub struct BackupService;

impl BackupService {
    pub fn new() -> Self {
        Self
    }

    /// Serialize the full store state as the backup document.
    pub fn export_json(&self, snapshot: &StoreSnapshot) -> Result<String> {
        serde_json::to_string_pretty(snapshot).context("Failed to serialize backup document")
    }

    /// Parse a backup document. Both top-level keys are optional; anything
    /// structurally invalid (bad dates, non-numeric amounts, unknown kinds)
    /// is rejected here, leaving the store untouched.
    pub fn parse_backup(&self, text: &str) -> Result<StoreSnapshot> {
        serde_json::from_str(text).context("Malformed backup document")
    }

    /// File name for a backup taken on `date`.
    pub fn backup_filename(date: NaiveDate) -> String {
        format!("restaurant_backup_{}.json", date.format("%Y-%m-%d"))
    }

    /// Write the backup document into `directory`, or into the user's
    /// Documents directory (falling back to the home directory) when none is
    /// given. Returns the full path of the written file.
    pub fn export_backup_file(
        &self,
        snapshot: &StoreSnapshot,
        directory: Option<&Path>,
    ) -> Result<PathBuf> {
        let directory = match directory {
            Some(directory) => directory.to_path_buf(),
            None => dirs::document_dir()
                .or_else(dirs::home_dir)
                .ok_or_else(|| anyhow!("Could not determine an export directory"))?,
        };
        fs::create_dir_all(&directory).with_context(|| {
            format!("Failed to create export directory {}", directory.display())
        })?;

        let path = directory.join(Self::backup_filename(local_today()));
        let document = self.export_json(snapshot)?;
        fs::write(&path, document)
            .with_context(|| format!("Failed to write backup file {}", path.display()))?;
        info!(
            "Exported backup with {} transactions to {}",
            snapshot.transactions.len(),
            path.display()
        );
        Ok(path)
    }

    /// Render the transaction log as CSV, oldest first. Quoting is handled
    /// by the writer, so free-text descriptions survive commas and quotes.
    pub fn export_transactions_csv(&self, transactions: &[Transaction]) -> Result<String> {
        let mut ordered = transactions.to_vec();
        ordered.sort_by(|a, b| a.date.cmp(&b.date));

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["id", "date", "kind", "category", "amount", "description"])?;
        for transaction in &ordered {
            let date = transaction.date.to_string();
            let amount = format!("{:.2}", transaction.amount);
            writer.write_record([
                transaction.id.as_str(),
                date.as_str(),
                transaction.kind.as_str(),
                transaction.category.as_str(),
                amount.as_str(),
                transaction.description.as_str(),
            ])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| anyhow!("Failed to finish CSV export: {}", err))?;
        Ok(String::from_utf8(bytes)?)
    }
}
