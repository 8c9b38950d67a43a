//! Per-directory extraction.
//!
//! A [`RecordSource`] turns one input directory into an [`ExtractionResult`].
//! [`PatternSource`] is the heuristic engine; a schema-aware source (for
//! example a database driver) can be tried first with
//! [`extract_with_fallback`].

use crate::error::{Error, Result};
use crate::names::{NameFilter, NameKind};
use crate::records::{reconcile, ExtractionResult};
use crate::scanner::{AccountScanner, BalanceScanner, FileHeader, ScanStrategy, ScannerConfig};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// The data files the engine knows how to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Chart of accounts
    Chart,
    /// Account activity holding balances
    ChartAr,
    /// Customer master
    Customer,
    /// Vendor master
    Vendor,
}

impl SourceKind {
    /// All kinds in extraction order
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Chart,
        SourceKind::ChartAr,
        SourceKind::Customer,
        SourceKind::Vendor,
    ];

    /// Canonical file name
    pub fn file_name(&self) -> &'static str {
        match self {
            SourceKind::Chart => "CHART.DAT",
            SourceKind::ChartAr => "CHARTAR.DAT",
            SourceKind::Customer => "CUSTOMER.DAT",
            SourceKind::Vendor => "VENDOR.DAT",
        }
    }

    /// Matches a file name case-insensitively
    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.file_name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Located input files, one optional path per kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSet {
    chart: Option<PathBuf>,
    chartar: Option<PathBuf>,
    customer: Option<PathBuf>,
    vendor: Option<PathBuf>,
}

impl SourceSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from the canonical file names inside `dir`, keeping only
    /// files that exist
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let mut set = Self::new();
        for kind in SourceKind::ALL {
            let path = dir.join(kind.file_name());
            if path.is_file() {
                set.insert(kind, path);
            }
        }
        set
    }

    fn slot(&mut self, kind: SourceKind) -> &mut Option<PathBuf> {
        match kind {
            SourceKind::Chart => &mut self.chart,
            SourceKind::ChartAr => &mut self.chartar,
            SourceKind::Customer => &mut self.customer,
            SourceKind::Vendor => &mut self.vendor,
        }
    }

    /// Records the path for a kind, replacing any earlier one
    pub fn insert(&mut self, kind: SourceKind, path: impl Into<PathBuf>) {
        *self.slot(kind) = Some(path.into());
    }

    /// Path for a kind, if present
    pub fn get(&self, kind: SourceKind) -> Option<&Path> {
        match kind {
            SourceKind::Chart => self.chart.as_deref(),
            SourceKind::ChartAr => self.chartar.as_deref(),
            SourceKind::Customer => self.customer.as_deref(),
            SourceKind::Vendor => self.vendor.as_deref(),
        }
    }

    /// Present kinds with their paths, in extraction order
    pub fn iter(&self) -> impl Iterator<Item = (SourceKind, &Path)> {
        SourceKind::ALL
            .into_iter()
            .filter_map(move |kind| self.get(kind).map(|path| (kind, path)))
    }

    /// Number of present files
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns true if no file is present
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Something that can produce the full result set for an input directory
pub trait RecordSource {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Produce every entity list
    fn extract(&self) -> Result<ExtractionResult>;
}

/// The heuristic engine over a set of raw files
#[derive(Debug)]
pub struct PatternSource {
    sources: SourceSet,
    accounts: AccountScanner,
    balances: BalanceScanner,
    customers: NameFilter,
    vendors: NameFilter,
}

impl PatternSource {
    /// Creates the engine with default tuning
    pub fn new(sources: SourceSet) -> Self {
        Self::with_config(sources, &ScannerConfig::default())
    }

    /// Creates the engine with custom tuning
    pub fn with_config(sources: SourceSet, config: &ScannerConfig) -> Self {
        Self {
            sources,
            accounts: AccountScanner::with_config(config),
            balances: BalanceScanner::new(config.lookback),
            customers: NameFilter::new(NameKind::Customer),
            vendors: NameFilter::new(NameKind::Vendor),
        }
    }

    /// Loads one file. Missing or unreadable files give `None` and a warning.
    fn load(&self, kind: SourceKind) -> Option<Vec<u8>> {
        let Some(path) = self.sources.get(kind) else {
            warn!("{} not found, skipping", kind);
            return None;
        };

        match read_source(path) {
            Ok(data) => {
                match FileHeader::parse(&data) {
                    Ok(header) => info!("{}: {} records declared", kind, header.record_count),
                    Err(e) => debug!("{}: no usable header: {}", kind, e),
                }
                Some(data)
            }
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }

    fn run<S: ScanStrategy>(&self, kind: SourceKind, scanner: &S) -> Vec<S::Record> {
        let Some(data) = self.load(kind) else {
            return Vec::new();
        };
        let records = scanner.scan(&data);
        info!("{}: extracted {} records", kind, records.len());
        records
    }

    /// Runs the engine over every present file
    pub fn extract_all(&self) -> ExtractionResult {
        ExtractionResult {
            chart_of_accounts: self.run(SourceKind::Chart, &self.accounts),
            balances: reconcile(self.run(SourceKind::ChartAr, &self.balances)),
            customers: self.run(SourceKind::Customer, &self.customers),
            vendors: self.run(SourceKind::Vendor, &self.vendors),
        }
    }
}

impl RecordSource for PatternSource {
    fn name(&self) -> &str {
        "pattern"
    }

    fn extract(&self) -> Result<ExtractionResult> {
        Ok(self.extract_all())
    }
}

/// Reads a whole input file
pub fn read_source(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| Error::file_read(path, e))
}

/// Tries `primary` first and falls back to `fallback` if it is absent or fails
pub fn extract_with_fallback(
    primary: Option<&dyn RecordSource>,
    fallback: &dyn RecordSource,
) -> Result<ExtractionResult> {
    if let Some(source) = primary {
        info!("Attempting {} extraction", source.name());
        match source.extract() {
            Ok(result) => return Ok(result),
            Err(e) if e.is_recoverable() => warn!(
                "{} extraction failed: {}; falling back to {}",
                source.name(),
                e,
                fallback.name()
            ),
            Err(e) => error!(
                "{} extraction error: {}; falling back to {}",
                source.name(),
                e,
                fallback.name()
            ),
        }
    }

    info!("Using {} extraction", fallback.name());
    fallback.extract()
}
