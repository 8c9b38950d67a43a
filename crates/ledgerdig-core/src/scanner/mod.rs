//! Heuristic record scanning over raw file bytes.
//!
//! No schema is available for the files this module reads. Record boundaries
//! are guessed from byte content alone, so every strategy is expected to
//! produce false candidates and to miss real ones.
//!
//! ## Algorithm Overview
//!
//! Account records come from four independent strategies run over the same
//! buffer:
//!
//! 1. [`LengthPrefixedPairing`]: a length-prefixed account number followed by a
//!    length-prefixed name
//! 2. [`MarkerAnchored`]: a `04 00` tag, four ASCII digits, then a nearby
//!    length-prefixed name
//! 3. [`KnownAnchor`]: a well-known account name with a four-digit number a
//!    little before it
//! 4. [`AdjacencyPairing`]: a numeric printable run followed closely by an
//!    alphabetic one
//!
//! Their outputs are concatenated in that order and merged by
//! [`reconcile`](crate::records::reconcile), so earlier strategies win key
//! collisions. Balances come from the separate [`BalanceScanner`].
//!
//! ## Extensibility
//!
//! The [`ScanStrategy`] trait allows extra strategies to be appended:
//!
//! ```no_run
//! use ledgerdig_core::scanner::{AccountScanner, ScanStrategy};
//! use ledgerdig_core::AccountRecord;
//!
//! struct FixedSlots;
//!
//! impl ScanStrategy for FixedSlots {
//!     type Record = AccountRecord;
//!
//!     fn name(&self) -> &'static str {
//!         "fixed-slots"
//!     }
//!
//!     fn scan(&self, data: &[u8]) -> Vec<AccountRecord> {
//!         // Custom scanning logic
//!         vec![]
//!     }
//! }
//!
//! let scanner = AccountScanner::new().with_strategy(FixedSlots);
//! ```

mod balance;
mod header;
mod runs;
mod strategies;

use crate::records::{reconcile, AccountRecord};
use std::fmt;
use tracing::debug;

pub use balance::{BalanceScanner, BALANCE_MARKER};
pub use header::{FileHeader, HEADER_BLOCK_SIZE};
pub use runs::{
    alpha_count, decode_printable, extract_strings, is_account_number, is_digits, is_printable,
    length_prefixed, PrintableRuns, Token,
};
pub use strategies::{
    AdjacencyPairing, KnownAnchor, LengthPrefixedPairing, MarkerAnchored, KNOWN_ACCOUNT_NAMES,
};

/// Tuning knobs for the scanners
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Bytes after an account number searched for its name (strategy A)
    pub name_search_window: usize,
    /// Bytes after a `04 00` marker searched for a name length (strategy B)
    pub marker_search_window: usize,
    /// Bytes before an anchor or balance searched for an account number
    pub lookback: usize,
    /// Longest name taken from an anchor occurrence (strategy C)
    pub anchor_name_cap: usize,
    /// Printable runs after a number considered as its name (strategy D)
    pub adjacency_lookahead: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            name_search_window: 100,
            marker_search_window: 80,
            lookback: 50,
            anchor_name_cap: 45,
            adjacency_lookahead: 4,
        }
    }
}

impl ScannerConfig {
    /// Creates a new scanner config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name search window for length-prefixed pairing
    pub fn name_search_window(mut self, bytes: usize) -> Self {
        self.name_search_window = bytes;
        self
    }

    /// Sets the name search window after a marker
    pub fn marker_search_window(mut self, bytes: usize) -> Self {
        self.marker_search_window = bytes;
        self
    }

    /// Sets the backward search distance for account numbers
    pub fn lookback(mut self, bytes: usize) -> Self {
        self.lookback = bytes;
        self
    }

    /// Sets the maximum anchor name length
    pub fn anchor_name_cap(mut self, bytes: usize) -> Self {
        self.anchor_name_cap = bytes;
        self
    }

    /// Sets how many following runs adjacency pairing considers
    pub fn adjacency_lookahead(mut self, runs: usize) -> Self {
        self.adjacency_lookahead = runs;
        self
    }
}

/// A single, independent scanning pass over a read-only buffer.
///
/// Implementations must be pure: the same bytes always give the same
/// candidates in the same order. A candidate that fails to decode is simply
/// skipped.
pub trait ScanStrategy: Send + Sync {
    /// Kind of record this strategy produces
    type Record;

    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Scan the buffer and return candidates in discovery order
    fn scan(&self, data: &[u8]) -> Vec<Self::Record>;
}

/// Runs every account strategy and reconciles their findings
pub struct AccountScanner {
    strategies: Vec<Box<dyn ScanStrategy<Record = AccountRecord>>>,
}

impl Default for AccountScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AccountScanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.strategies.iter().map(|s| s.name()))
            .finish()
    }
}

impl AccountScanner {
    /// Creates a scanner with the four built-in strategies and default tuning
    pub fn new() -> Self {
        Self::with_config(&ScannerConfig::default())
    }

    /// Creates a scanner with the four built-in strategies
    pub fn with_config(config: &ScannerConfig) -> Self {
        Self {
            strategies: vec![
                Box::new(LengthPrefixedPairing::new(config.name_search_window)),
                Box::new(MarkerAnchored::new(config.marker_search_window)),
                Box::new(KnownAnchor::new(config.lookback, config.anchor_name_cap)),
                Box::new(AdjacencyPairing::new(config.adjacency_lookahead)),
            ],
        }
    }

    /// Appends a strategy; it ranks below every strategy already present
    pub fn with_strategy<S>(mut self, strategy: S) -> Self
    where
        S: ScanStrategy<Record = AccountRecord> + 'static,
    {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Names of the strategies in priority order
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Raw candidates of every strategy, concatenated in priority order
    pub fn candidates(&self, data: &[u8]) -> Vec<AccountRecord> {
        let mut all = Vec::new();
        for strategy in &self.strategies {
            let found = strategy.scan(data);
            debug!("Strategy {} produced {} candidates", strategy.name(), found.len());
            all.extend(found);
        }
        all
    }

    /// Scans the buffer and returns one account per account number
    pub fn scan(&self, data: &[u8]) -> Vec<AccountRecord> {
        debug!("Starting account scan of {} bytes", data.len());
        let candidates = self.candidates(data);
        let total = candidates.len();
        let accounts = reconcile(candidates);
        debug!(
            "Account scan complete: {} accounts from {} candidates",
            accounts.len(),
            total
        );
        accounts
    }
}

impl ScanStrategy for AccountScanner {
    type Record = AccountRecord;

    fn name(&self) -> &'static str {
        "accounts"
    }

    fn scan(&self, data: &[u8]) -> Vec<AccountRecord> {
        AccountScanner::scan(self, data)
    }
}

/// Find a subsequence within a byte slice
pub(crate) fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
