use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::TransactionService;
use crate::domain::Transaction;

/// Full snapshot written by the JSON export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub transactions: Vec<Transaction>,
}

/// Column order shared by CSV export and import.
pub const CSV_HEADER: [&str; 6] = ["id", "date", "amount", "type", "category", "content"];

/// Exporter for converting transactions to CSV or JSON
pub struct Exporter<'a> {
    service: &'a TransactionService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a TransactionService) -> Self {
        Self { service }
    }

    /// Export transactions to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(CSV_HEADER)?;

        let mut count = 0;
        for transaction in self.service.transactions() {
            let date = transaction.date.format("%Y-%m-%d").to_string();
            let amount = transaction.amount.to_string();
            csv_writer.write_record([
                transaction.id.as_str(),
                date.as_str(),
                amount.as_str(),
                transaction.kind.as_str(),
                transaction.category.as_str(),
                transaction.content.as_str(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        tracing::debug!(count, "exported transactions as csv");
        Ok(count)
    }

    /// Export every transaction as a JSON snapshot
    pub fn export_json<W: Write>(&self, mut writer: W) -> Result<TransactionSnapshot> {
        let snapshot = TransactionSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            transactions: self.service.transactions().to_vec(),
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
