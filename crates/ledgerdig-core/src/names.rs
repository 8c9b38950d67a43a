//! Customer and vendor name recovery.
//!
//! Name files carry little structure worth decoding, so names are taken from
//! the printable runs that survive a denylist and a few shape checks.

use crate::records::{reconcile, NameRecord};
use crate::scanner::{alpha_count, extract_strings, ScanStrategy};
use tracing::debug;

/// Noise tokens seen in customer files
pub const CUSTOMER_JUNK: &[&str] = &[
    "AirborneQ", "DupF", "Fv1b", "QC7P", "THx", "A1Ww", "ArvB", "DIXT",
];

/// Noise tokens seen in vendor files, including account labels stored there
pub const VENDOR_JUNK: &[&str] = &[
    "AirborneQ",
    "DupF",
    "Fv1b",
    "QC7P",
    "THx",
    "A1Ww",
    "Airborne'",
    "ArvB",
    "DIXT",
    "Employee",
    "Payment",
    "Supplies",
    "Cost",
    "Inventory",
];

/// Fragments that mark file names, extensions and report identifiers
const STRUCTURAL_FRAGMENTS: [&str; 4] = ["dat", "ptb", ".", "rpt"];

const MIN_NAME_LEN: usize = 4;
const MAX_RUN_LEN: usize = 50;
const MIN_NAME_ALPHA: usize = 3;

/// Which name list is being extracted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// Customer names
    Customer,
    /// Vendor names
    Vendor,
}

impl NameKind {
    /// Record label, always rejected as a name
    pub fn label(&self) -> &'static str {
        match self {
            NameKind::Customer => "customer",
            NameKind::Vendor => "vendor",
        }
    }

    /// Built-in junk table for this kind
    pub fn default_junk(&self) -> &'static [&'static str] {
        match self {
            NameKind::Customer => CUSTOMER_JUNK,
            NameKind::Vendor => VENDOR_JUNK,
        }
    }
}

/// Denylist plus shape checks over printable runs
#[derive(Debug, Clone)]
pub struct NameFilter {
    kind: NameKind,
    junk: Vec<String>,
}

impl NameFilter {
    /// Creates a filter with the kind's built-in junk table
    pub fn new(kind: NameKind) -> Self {
        Self::with_junk(kind, kind.default_junk())
    }

    /// Creates a filter with a custom junk table
    pub fn with_junk<I, S>(kind: NameKind, junk: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut junk: Vec<String> = junk
            .into_iter()
            .map(|j| j.as_ref().to_lowercase())
            .filter(|j| !j.is_empty())
            .collect();
        junk.push(kind.label().to_string());
        Self { kind, junk }
    }

    /// Returns true if the token looks like a name
    pub fn accepts(&self, token: &str) -> bool {
        let name = token.trim();
        let lower = name.to_lowercase();

        if self.junk.iter().any(|j| lower.contains(j.as_str())) {
            return false;
        }

        name.len() >= MIN_NAME_LEN
            && name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
            && alpha_count(name) >= MIN_NAME_ALPHA
            && !STRUCTURAL_FRAGMENTS.iter().any(|f| lower.contains(f))
    }

    /// Filters tokens and deduplicates survivors case-insensitively
    pub fn filter<'a>(&self, tokens: impl IntoIterator<Item = &'a str>) -> Vec<NameRecord> {
        reconcile(
            tokens
                .into_iter()
                .filter(|t| self.accepts(t))
                .map(|t| NameRecord::new(t.trim())),
        )
    }
}

impl ScanStrategy for NameFilter {
    type Record = NameRecord;

    fn name(&self) -> &'static str {
        "name-list"
    }

    fn scan(&self, data: &[u8]) -> Vec<NameRecord> {
        let names = self.filter(extract_strings(data, MIN_NAME_LEN, MAX_RUN_LEN).map(|t| t.text));
        debug!("Recovered {} {} names", names.len(), self.kind.label());
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(records: &[NameRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_filter_shape_rules() {
        let empty: [&str; 0] = [];
        let filter = NameFilter::with_junk(NameKind::Customer, empty);
        let kept = filter.filter(["Customer", "ABC Corp", "dat file", "XY"]);
        assert_eq!(names(&kept), vec!["ABC Corp"]);
    }

    #[test]
    fn test_structural_fragments() {
        let filter = NameFilter::new(NameKind::Customer);
        assert!(!filter.accepts("Backup.PTB"));
        assert!(!filter.accepts("DATA Systems"));
        assert!(!filter.accepts("Qrpt Holdings"));
        assert!(!filter.accepts("J. Smith"));
        assert!(filter.accepts("Jane Smith"));
    }

    #[test]
    fn test_shape_checks() {
        let filter = NameFilter::new(NameKind::Vendor);
        assert!(!filter.accepts("acme"));
        assert!(!filter.accepts("A1 2"));
        assert!(!filter.accepts("Abc"));
        assert!(!filter.accepts("1234 Main"));
        assert!(filter.accepts("Abcd"));
    }

    #[test]
    fn test_junk_is_case_insensitive_substring() {
        let filter = NameFilter::new(NameKind::Customer);
        assert!(!filter.accepts("XdixtY Holdings"));
        assert!(!filter.accepts("Airborneq Ltd"));
        assert!(!filter.accepts("New Customers"));
        // Vendor-only junk does not affect customers
        assert!(filter.accepts("Office Supplies Co"));
        assert!(!NameFilter::new(NameKind::Vendor).accepts("Office Supplies Co"));
    }

    #[test]
    fn test_dedup_first_wins_in_scan_order() {
        let filter = NameFilter::new(NameKind::Vendor);
        let kept = filter.filter(["Zeta Parts", "Acme Tools", "ZETA PARTS", "  Acme Tools  "]);
        assert_eq!(names(&kept), vec!["Zeta Parts", "Acme Tools"]);
    }

    #[test]
    fn test_scan_buffer() {
        let data = b"\x00\x00Harbor Freight\x00\x12THx9\x00Vendor List\x00harbor freight\x00Blue Ridge Supply Co\x00";
        let filter = NameFilter::with_junk(NameKind::Vendor, ["THx"]);
        assert_eq!(
            names(&filter.scan(data)),
            vec!["Harbor Freight", "Blue Ridge Supply Co"]
        );
    }
}
