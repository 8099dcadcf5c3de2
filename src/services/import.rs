//! Import service
//!
//! Previews parsed statement rows against existing transactions and
//! imports the new ones.

use std::collections::{HashMap, HashSet};

use crate::audit::{AuditEntry, EntityType};
use crate::error::{FintrackError, FintrackResult};
use crate::import::{self, ImportFormat, ParsedRow, RowResult};
use crate::models::{AccountId, CategoryId, Transaction, TransactionId, TransactionSource};
use crate::storage::Storage;

/// Status of a row in the import preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportStatus {
    /// Will be imported
    New,
    /// Already present; skipped
    Duplicate,
    /// Could not be parsed or validated
    Error(String),
}

#[derive(Debug, Clone)]
pub struct ImportPreviewEntry {
    pub row_number: usize,
    /// `None` for rows that failed to parse
    pub row: Option<ParsedRow>,
    /// Duplicate detection key
    pub import_id: String,
    pub status: ImportStatus,
    /// The transaction a duplicate matched
    pub existing_id: Option<TransactionId>,
}

#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Category for rows that do not get one from the file
    pub default_category_id: Option<CategoryId>,
    /// Match the file's category column against category names
    pub guess_categories: bool,
}

/// Result of a completed import
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: Vec<Transaction>,
    pub duplicates_skipped: usize,
    /// Row number and reason for every rejected row
    pub errors: Vec<(usize, String)>,
}

pub struct ImportService<'a> {
    storage: &'a Storage,
}

impl<'a> ImportService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Parse content and build the preview for an account
    pub fn preview(
        &self,
        content: &str,
        format: ImportFormat,
        account_id: AccountId,
    ) -> FintrackResult<Vec<ImportPreviewEntry>> {
        let rows = import::parse(content, format)?;
        self.generate_preview(&rows, account_id)
    }

    /// Mark each row new, duplicate or error
    ///
    /// The key is the bank's FITID when present, otherwise a hash of date,
    /// amount and description. Identical rows within one file get an
    /// occurrence suffix so two equal purchases on the same day both import.
    pub fn generate_preview(
        &self,
        rows: &[RowResult],
        account_id: AccountId,
    ) -> FintrackResult<Vec<ImportPreviewEntry>> {
        let existing: HashMap<String, TransactionId> = self
            .storage
            .transactions
            .get_by_account(account_id)?
            .into_iter()
            .filter_map(|t| t.import_id.map(|id| (id, t.id)))
            .collect();

        let mut occurrences: HashMap<String, usize> = HashMap::new();
        let mut preview = Vec::with_capacity(rows.len());

        for row in rows {
            let entry = match row {
                Ok(row) => {
                    let import_id = match &row.external_id {
                        Some(fitid) => fitid.clone(),
                        None => {
                            let base = import_id_for(row);
                            let seen = occurrences.entry(base.clone()).or_insert(0);
                            *seen += 1;
                            if *seen == 1 {
                                base
                            } else {
                                format!("{}-{}", base, seen)
                            }
                        }
                    };

                    let existing_id = existing.get(&import_id).copied();
                    let status = if existing_id.is_some() {
                        ImportStatus::Duplicate
                    } else if row.amount.is_zero() {
                        ImportStatus::Error("Amount is zero".to_string())
                    } else {
                        ImportStatus::New
                    };

                    ImportPreviewEntry {
                        row_number: row.row_number,
                        row: Some(row.clone()),
                        import_id,
                        status,
                        existing_id,
                    }
                }
                Err((row_number, message)) => ImportPreviewEntry {
                    row_number: *row_number,
                    row: None,
                    import_id: String::new(),
                    status: ImportStatus::Error(message.clone()),
                    existing_id: None,
                },
            };
            preview.push(entry);
        }

        Ok(preview)
    }

    /// Import every `New` entry of a preview into an account
    pub fn import_from_preview(
        &self,
        preview: &[ImportPreviewEntry],
        account_id: AccountId,
        options: &ImportOptions,
    ) -> FintrackResult<ImportResult> {
        let account = self
            .storage
            .accounts
            .get(account_id)?
            .ok_or_else(|| FintrackError::account_not_found(account_id.to_string()))?;
        if account.archived {
            return Err(FintrackError::Import(format!(
                "Cannot import into archived account '{}'",
                account.name
            )));
        }

        let mut result = ImportResult::default();
        let mut entries = Vec::new();
        let mut imported_ids = HashSet::new();

        for entry in preview {
            let row = match (&entry.status, &entry.row) {
                (ImportStatus::New, Some(row)) => row,
                (ImportStatus::Duplicate, _) => {
                    result.duplicates_skipped += 1;
                    continue;
                }
                (ImportStatus::Error(message), _) => {
                    result.errors.push((entry.row_number, message.clone()));
                    continue;
                }
                (ImportStatus::New, None) => continue,
            };

            // A preview may be imported twice; the second pass finds the ids
            if !imported_ids.insert(entry.import_id.clone())
                || self
                    .storage
                    .transactions
                    .find_by_import_id(&entry.import_id)?
                    .is_some_and(|t| t.account_id == account_id)
            {
                result.duplicates_skipped += 1;
                continue;
            }

            let category_id = match (&row.category, options.guess_categories) {
                (Some(name), true) => self
                    .storage
                    .categories
                    .get_by_name(name)?
                    .map(|c| c.id)
                    .or(options.default_category_id),
                _ => options.default_category_id,
            };

            let mut txn = Transaction::with_details(
                account_id,
                row.date,
                row.amount,
                row.description.trim(),
                category_id,
                row.memo.trim(),
            );
            txn.source = TransactionSource::Import;
            txn.import_id = Some(entry.import_id.clone());

            if let Err(e) = txn.validate() {
                result.errors.push((entry.row_number, e.to_string()));
                continue;
            }

            self.storage.transactions.upsert(txn.clone())?;
            entries.push(AuditEntry::create(
                EntityType::Transaction,
                txn.id.to_string(),
                Some(format!("{} {}", txn.date, txn.description)),
                &txn,
            ));
            result.imported.push(txn);
        }

        if !result.imported.is_empty() {
            self.storage.transactions.save()?;
            self.storage.log_batch(&entries)?;
        }

        tracing::info!(
            account = %account.name,
            imported = result.imported.len(),
            duplicates = result.duplicates_skipped,
            errors = result.errors.len(),
            "statement imported"
        );

        Ok(result)
    }
}

fn import_id_for(row: &ParsedRow) -> String {
    let mut probe = Transaction::new(AccountId::new(), row.date, row.amount);
    probe.description = row.description.clone();
    probe.generate_import_id()
}
