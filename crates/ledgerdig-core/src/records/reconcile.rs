//! First-writer-wins merging of candidate records.
//!
//! Scanners overlap heavily and disagree often. The merge law is fixed: the
//! first record seen for a key is kept, every later record with the same key
//! is dropped, and survivors keep the order in which their key first appeared.
//! Callers control priority purely through the order in which they offer
//! candidates.

use std::borrow::Cow;
use std::collections::HashMap;

/// A record with a natural deduplication key
pub trait Keyed {
    /// Returns the key used to detect duplicates
    fn key(&self) -> Cow<'_, str>;
}

/// Accumulates records, keeping the first one per key
#[derive(Debug, Clone)]
pub struct Reconciler<T> {
    index: HashMap<String, usize>,
    records: Vec<T>,
    discarded: usize,
}

impl<T> Default for Reconciler<T> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            records: Vec::new(),
            discarded: 0,
        }
    }
}

impl<T: Keyed> Reconciler<T> {
    /// Creates an empty reconciler
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers a record. Returns true if it was kept.
    pub fn offer(&mut self, record: T) -> bool {
        let key = record.key().into_owned();
        if self.index.contains_key(&key) {
            self.discarded += 1;
            return false;
        }
        self.index.insert(key, self.records.len());
        self.records.push(record);
        true
    }

    /// Returns true if a record with this key has been kept
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the kept record for a key
    pub fn get(&self, key: &str) -> Option<&T> {
        self.index.get(key).map(|&i| &self.records[i])
    }

    /// Number of kept records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing has been kept
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of duplicates dropped so far
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Consumes the reconciler, returning survivors in first-seen order
    pub fn into_vec(self) -> Vec<T> {
        self.records
    }
}

impl<T: Keyed> Extend<T> for Reconciler<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for record in iter {
            self.offer(record);
        }
    }
}

/// Merges candidates, keeping the first record per key in iteration order
pub fn reconcile<T: Keyed>(candidates: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut reconciler = Reconciler::new();
    reconciler.extend(candidates);
    reconciler.into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{AccountRecord, BalanceRecord, NameRecord};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_occurrence_wins() {
        let merged = reconcile(vec![
            AccountRecord::new("1200", "Petty Cash"),
            AccountRecord::new("4000", "Sales"),
            AccountRecord::new("1200", "Garbage Name"),
            AccountRecord::new("2000", "Accounts Payable"),
            AccountRecord::new("4000", "Sales Returns"),
        ]);

        assert_eq!(
            merged,
            vec![
                AccountRecord::new("1200", "Petty Cash"),
                AccountRecord::new("4000", "Sales"),
                AccountRecord::new("2000", "Accounts Payable"),
            ]
        );
    }

    #[test]
    fn test_order_decides_the_winner() {
        let a = AccountRecord::new("1000", "Cash on hand");
        let b = AccountRecord::new("1000", "Cash");

        let forward = reconcile(vec![a.clone(), b.clone()]);
        let backward = reconcile(vec![b.clone(), a.clone()]);

        assert_eq!(forward, vec![a]);
        assert_eq!(backward, vec![b]);
    }

    #[test]
    fn test_orphan_balances_dedupe_by_value() {
        let merged = reconcile(vec![
            BalanceRecord::new(None, 50.0),
            BalanceRecord::new(Some("1100".into()), 50.0),
            BalanceRecord::new(None, 50.004),
            BalanceRecord::new(None, 75.25),
        ]);

        assert_eq!(
            merged,
            vec![
                BalanceRecord::new(None, 50.0),
                BalanceRecord::new(Some("1100".into()), 50.0),
                BalanceRecord::new(None, 75.25),
            ]
        );
    }

    #[test]
    fn test_names_merge_case_insensitively() {
        let merged = reconcile(vec![
            NameRecord::new("Acme Supply"),
            NameRecord::new("ACME SUPPLY"),
            NameRecord::new("acme supply"),
            NameRecord::new("Blue Ridge"),
        ]);
        assert_eq!(
            merged,
            vec![NameRecord::new("Acme Supply"), NameRecord::new("Blue Ridge")]
        );
    }

    #[test]
    fn test_reconciler_bookkeeping() {
        let mut reconciler = Reconciler::new();
        assert!(reconciler.offer(NameRecord::new("Delta Freight")));
        assert!(!reconciler.offer(NameRecord::new("delta freight")));
        assert!(reconciler.contains_key("delta freight"));
        assert_eq!(reconciler.get("delta freight").unwrap().name, "Delta Freight");
        assert_eq!(reconciler.len(), 1);
        assert_eq!(reconciler.discarded(), 1);
    }
}
