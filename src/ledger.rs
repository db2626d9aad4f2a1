//! Append-only transaction and error logs
//!
//! The ledger owns exclusive access to both log files and offers a
//! serialized-append contract: each record is fully written and flushed
//! before the call returns, so the caller can rely on the ledger
//! reflecting a transaction's outcome synchronously. Records are never
//! rewritten or reordered.

use crate::error::{Error, Result};
use crate::types::TransactionRecord;
use chrono::Utc;
use std::fs::{File, OpenOptions};
use std::io::{LineWriter, Write};
use std::path::Path;
use std::sync::Mutex;

/// Header of the transaction log CSV
pub const TRANSACTION_LOG_HEADER: [&str; 5] = [
    "timestamp",
    "vehicle_id",
    "payment_method",
    "amount",
    "balance_remaining",
];

/// Append-only ledger over a transaction log and an error log
pub struct Ledger {
    transactions: Mutex<csv::Writer<File>>,
    errors: Mutex<LineWriter<File>>,
}

impl Ledger {
    /// Open both logs in append mode, writing the CSV header when the
    /// transaction log is new. Failure to open either file is fatal:
    /// without the logs the durability guarantee cannot be met.
    pub fn open(transaction_path: &Path, error_path: &Path) -> Result<Self> {
        let transaction_file = open_append(transaction_path)?;
        let needs_header = transaction_file
            .metadata()
            .map(|m| m.len() == 0)
            .unwrap_or(true);

        let mut transactions = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(transaction_file);
        if needs_header {
            transactions.write_record(TRANSACTION_LOG_HEADER)?;
            transactions.flush()?;
        }

        let errors = LineWriter::new(open_append(error_path)?);

        Ok(Self {
            transactions: Mutex::new(transactions),
            errors: Mutex::new(errors),
        })
    }
}

/// The serialized-append contract offered to the processor: each record
/// is durable before the call returns. The concrete [`Ledger`] appends
/// to disk; tests substitute a failing sink to exercise the write-failure
/// path.
pub trait TransactionLog {
    /// Append one transaction record, flushed before returning
    fn record_transaction(&self, record: &TransactionRecord) -> Result<()>;

    /// Append one timestamped line to the error log, flushed before
    /// returning
    fn record_error(&self, message: &str) -> Result<()>;
}

impl TransactionLog for Ledger {
    fn record_transaction(&self, record: &TransactionRecord) -> Result<()> {
        let mut writer = self
            .transactions
            .lock()
            .map_err(|_| poisoned("transaction log"))?;
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }

    fn record_error(&self, message: &str) -> Result<()> {
        let mut writer = self.errors.lock().map_err(|_| poisoned("error log"))?;
        writeln!(writer, "{}: {}", Utc::now().to_rfc3339(), message)?;
        writer.flush()?;
        Ok(())
    }
}

fn poisoned(which: &str) -> Error {
    Error::PersistenceUnavailable(format!("{} writer lock poisoned", which))
}

fn open_append(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::PersistenceUnavailable(format!("{}: {}", path.display(), e)))
}
