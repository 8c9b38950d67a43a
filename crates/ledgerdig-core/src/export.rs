//! Writing recovered records to disk.
//!
//! Output layout:
//!
//! - `extracted_data.json`: every list, always written
//! - `chart_of_accounts.csv`, `balances.csv`, `customers.csv`, `vendors.csv`:
//!   one table per non-empty list
//! - `import_ready.json`: accounts with their balance joined in, plus the
//!   customer and vendor lists

use crate::error::{Error, Result};
use crate::records::{AccountType, ExtractionResult, NameRecord};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

/// Aggregate JSON file name
pub const AGGREGATE_FILE: &str = "extracted_data.json";
/// Import-ready JSON file name
pub const IMPORT_FILE: &str = "import_ready.json";
/// Chart of accounts table
pub const ACCOUNTS_CSV: &str = "chart_of_accounts.csv";
/// Balances table
pub const BALANCES_CSV: &str = "balances.csv";
/// Customers table
pub const CUSTOMERS_CSV: &str = "customers.csv";
/// Vendors table
pub const VENDORS_CSV: &str = "vendors.csv";

/// Balance used for accounts with no recovered balance
const DEFAULT_BALANCE: &str = "0";

/// Balance column of the import file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ImportBalance {
    /// Recovered balance
    Amount(f64),
    /// No balance was linked to the account
    Missing(&'static str),
}

/// One account in the import file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportAccount<'a> {
    /// Account number
    pub account_number: &'a str,
    /// Account name
    pub account_name: &'a str,
    /// Account category
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Joined balance
    pub balance: ImportBalance,
}

/// The import-ready document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportDocument<'a> {
    /// Accounts with balances
    pub accounts: Vec<ImportAccount<'a>>,
    /// Customers
    pub customers: &'a [NameRecord],
    /// Vendors
    pub vendors: &'a [NameRecord],
}

impl<'a> ImportDocument<'a> {
    /// Left-joins balances onto accounts by account number
    pub fn build(result: &'a ExtractionResult) -> Self {
        let mut by_account: HashMap<&str, f64> = HashMap::new();
        for record in &result.balances {
            if let Some(number) = record.account_number.as_deref() {
                by_account.entry(number).or_insert(record.balance);
            }
        }

        let accounts = result
            .chart_of_accounts
            .iter()
            .map(|account| ImportAccount {
                account_number: &account.account_number,
                account_name: &account.account_name,
                account_type: account.account_type,
                balance: by_account
                    .get(account.account_number.as_str())
                    .map_or(ImportBalance::Missing(DEFAULT_BALANCE), |&b| {
                        ImportBalance::Amount(b)
                    }),
            })
            .collect();

        Self {
            accounts,
            customers: &result.customers,
            vendors: &result.vendors,
        }
    }
}

/// Files produced by one export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Paths written, in write order
    pub written: Vec<PathBuf>,
}

/// Writes an [`ExtractionResult`] into an output directory
#[derive(Debug, Clone)]
pub struct Exporter {
    dir: PathBuf,
}

impl Exporter {
    /// Creates an exporter targeting `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Writes every output file
    pub fn write(&self, result: &ExtractionResult) -> Result<ExportSummary> {
        fs::create_dir_all(&self.dir).map_err(|e| Error::directory_create(&self.dir, e))?;

        let mut summary = ExportSummary::default();

        summary.written.push(self.write_json(AGGREGATE_FILE, result)?);

        let tables = [
            self.write_csv(ACCOUNTS_CSV, &result.chart_of_accounts)?,
            self.write_csv(BALANCES_CSV, &result.balances)?,
            self.write_csv(CUSTOMERS_CSV, &result.customers)?,
            self.write_csv(VENDORS_CSV, &result.vendors)?,
        ];
        summary.written.extend(tables.into_iter().flatten());

        summary
            .written
            .push(self.write_json(IMPORT_FILE, &ImportDocument::build(result))?);

        info!("Wrote {} files to {}", summary.written.len(), self.dir.display());
        Ok(summary)
    }

    fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<PathBuf> {
        let path = self.dir.join(name);
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json).map_err(|e| Error::file_write(&path, e))?;
        debug!("Wrote {}", path.display());
        Ok(path)
    }

    /// Writes a table; empty lists produce no file
    fn write_csv<T: Serialize>(&self, name: &str, records: &[T]) -> Result<Option<PathBuf>> {
        if records.is_empty() {
            debug!("Skipping {}: nothing recovered", name);
            return Ok(None);
        }

        let path = self.dir.join(name);
        let file = fs::File::create(&path).map_err(|e| Error::file_write(&path, e))?;
        let mut writer = csv::Writer::from_writer(file);
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush().map_err(|e| Error::file_write(&path, e))?;

        debug!("Wrote {} ({} rows)", path.display(), records.len());
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{AccountRecord, BalanceRecord};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample() -> ExtractionResult {
        ExtractionResult {
            chart_of_accounts: vec![
                AccountRecord::new("1000", "Cash on hand"),
                AccountRecord::new("2000", "Accounts Payable"),
            ],
            balances: vec![
                BalanceRecord::new(Some("1000".into()), 1500.25),
                BalanceRecord::new(None, 42.0),
            ],
            customers: vec![NameRecord::new("Northwind Traders")],
            vendors: vec![],
        }
    }

    #[test]
    fn test_import_document_left_join() {
        let result = sample();
        let doc = ImportDocument::build(&result);

        assert_eq!(doc.accounts.len(), 2);
        assert_eq!(doc.accounts[0].balance, ImportBalance::Amount(1500.25));
        assert_eq!(doc.accounts[1].balance, ImportBalance::Missing("0"));
        assert_eq!(doc.customers.len(), 1);

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["accounts"][0]["balance"], serde_json::json!(1500.25));
        assert_eq!(json["accounts"][1]["balance"], serde_json::json!("0"));
        assert_eq!(json["accounts"][1]["type"], serde_json::json!("LIABILITY"));
    }

    #[test]
    fn test_write_outputs() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("nested").join("out");
        let summary = Exporter::new(&out).write(&sample()).unwrap();

        let names: Vec<_> = summary
            .written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                AGGREGATE_FILE,
                ACCOUNTS_CSV,
                BALANCES_CSV,
                CUSTOMERS_CSV,
                IMPORT_FILE
            ]
        );
        assert!(!out.join(VENDORS_CSV).exists());

        let accounts = fs::read_to_string(out.join(ACCOUNTS_CSV)).unwrap();
        assert_eq!(
            accounts,
            "account_number,account_name,type\n1000,Cash on hand,ASSET\n2000,Accounts Payable,LIABILITY\n"
        );

        let balances = fs::read_to_string(out.join(BALANCES_CSV)).unwrap();
        assert_eq!(balances, "account_number,balance\n1000,1500.25\n,42.0\n");

        let customers = fs::read_to_string(out.join(CUSTOMERS_CSV)).unwrap();
        assert_eq!(customers, "name\nNorthwind Traders\n");

        let aggregate: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join(AGGREGATE_FILE)).unwrap()).unwrap();
        assert_eq!(aggregate["vendors"], serde_json::json!([]));
        assert_eq!(aggregate["balances"][1]["account_number"], serde_json::Value::Null);
        assert_eq!(
            aggregate["chart_of_accounts"][0]["account_name"],
            serde_json::json!("Cash on hand")
        );
    }

    #[test]
    fn test_write_empty_result() {
        let dir = TempDir::new().unwrap();
        let summary = Exporter::new(dir.path())
            .write(&ExtractionResult::default())
            .unwrap();
        assert_eq!(summary.written.len(), 2);
    }
}
