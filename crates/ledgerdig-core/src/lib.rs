//! # ledgerdig-core
//!
//! A library for recovering accounting records from indexed-file database
//! dumps whose schema is not available.
//!
//! This crate provides the core functionality for:
//! - Scanning raw `.DAT` bytes for account, balance and name records
//! - Merging the noisy output of several independent strategies
//! - Exporting the recovered records as CSV and JSON
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`scanner`]: Printable runs, file headers and the record strategies
//! - [`records`]: Record types, account classification and reconciliation
//! - [`names`]: Customer and vendor name filtering
//! - [`extract`]: Per-directory extraction and source fallback
//! - [`export`]: CSV and JSON output
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```no_run
//! use ledgerdig_core::{Exporter, PatternSource, RecordSource, SourceSet};
//!
//! let sources = SourceSet::in_dir("./company-data");
//! let result = PatternSource::new(sources).extract()?;
//!
//! for account in &result.chart_of_accounts {
//!     println!("{} {} {}", account.account_number, account.account_name, account.account_type);
//! }
//!
//! Exporter::new("./output").write(&result)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Extensibility
//!
//! - [`ScanStrategy`]: Add account strategies or replace a scanner
//! - [`RecordSource`]: Plug in a schema-aware source tried before the engine

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod error;
pub mod export;
pub mod extract;
pub mod names;
pub mod records;
pub mod scanner;

// Re-export primary types for convenience
pub use error::{Error, Result};
pub use export::{ExportSummary, Exporter, ImportDocument};
pub use extract::{extract_with_fallback, PatternSource, RecordSource, SourceKind, SourceSet};
pub use names::{NameFilter, NameKind};
pub use records::{
    reconcile, AccountRecord, AccountType, BalanceRecord, ExtractionResult, Keyed, NameRecord,
    Reconciler,
};
pub use scanner::{AccountScanner, BalanceScanner, FileHeader, ScanStrategy, ScannerConfig};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
