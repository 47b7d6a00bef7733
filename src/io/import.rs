use anyhow::Result;
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;

use crate::application::TransactionService;
use crate::domain::{
    parse_amount, Category, NewTransaction, Transaction, TransactionType, ValidationError,
};

/// Result of an import operation
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<ImportError>,
}

/// Error that occurred during import
#[derive(Debug, Clone)]
pub struct ImportError {
    pub line: usize,
    pub field: Option<String>,
    pub error: String,
}

/// Options for import operations
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub dry_run: bool,
    pub skip_duplicates: bool,
}

/// A CSV row as read, before any validation. Extra columns such as `id`
/// are ignored; the store assigns fresh ids.
#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    amount: String,
    #[serde(rename = "type")]
    kind: String,
    category: String,
    #[serde(default)]
    content: String,
}

/// Importer for loading transactions into the store
pub struct Importer<'a> {
    service: &'a mut TransactionService,
}

impl<'a> Importer<'a> {
    pub fn new(service: &'a mut TransactionService) -> Self {
        Self { service }
    }

    /// Import transactions from CSV with a header row.
    /// Invalid rows are reported and skipped; valid rows are still imported.
    pub async fn import_csv<R: Read>(
        &mut self,
        reader: R,
        options: ImportOptions,
    ) -> Result<ImportResult> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut result = ImportResult::default();
        let mut accepted: Vec<NewTransaction> = Vec::new();

        for (line_num, row) in csv_reader.deserialize::<CsvRow>().enumerate() {
            let line = line_num + 2; // +2 for header and 0-indexing

            let row = match row {
                Ok(r) => r,
                Err(e) => {
                    result.errors.push(ImportError {
                        line,
                        field: None,
                        error: format!("CSV parse error: {}", e),
                    });
                    continue;
                }
            };

            let new = match parse_row(&row) {
                Ok(new) => new,
                Err((field, error)) => {
                    tracing::warn!(line, field, %error, "rejected import row");
                    result.errors.push(ImportError {
                        line,
                        field: Some(field.to_string()),
                        error,
                    });
                    continue;
                }
            };

            if options.skip_duplicates
                && (self.service.transactions().iter().any(|t| is_duplicate(t, &new))
                    || accepted.contains(&new))
            {
                result.skipped += 1;
                continue;
            }

            if !options.dry_run {
                self.service.add_transaction(new.clone()).await?;
            }
            accepted.push(new);
            result.imported += 1;
        }

        Ok(result)
    }
}

fn parse_row(row: &CsvRow) -> std::result::Result<NewTransaction, (&'static str, String)> {
    let date = NaiveDate::parse_from_str(row.date.trim(), "%Y-%m-%d")
        .map_err(|e| ("date", format!("Invalid date '{}': {}", row.date, e)))?;
    let amount = parse_amount(&row.amount)
        .map_err(|e| ("amount", format!("Invalid amount '{}': {}", row.amount, e)))?;
    let kind: TransactionType = row.kind.parse().map_err(|e| ("type", format!("{}", e)))?;
    let category: Category = row
        .category
        .parse()
        .map_err(|e| ("category", format!("{}", e)))?;

    let new = NewTransaction {
        date,
        amount,
        kind,
        category,
        content: row.content.clone(),
    };
    new.validate().map_err(|e| match e {
        ValidationError::NegativeAmount(_) | ValidationError::AmountTooLarge(_) => {
            ("amount", e.to_string())
        }
        _ => ("category", e.to_string()),
    })?;

    Ok(new)
}

fn is_duplicate(existing: &Transaction, new: &NewTransaction) -> bool {
    existing.date == new.date
        && existing.amount == new.amount
        && existing.kind == new.kind
        && existing.category == new.category
        && existing.content == new.content
}
