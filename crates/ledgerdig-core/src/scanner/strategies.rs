//! The four account-recovery strategies.
//!
//! Each strategy sees the whole buffer, reports every candidate it finds and
//! knows nothing about the others. Overlap is expected and left to the
//! reconciler.

use super::runs::{
    alpha_count, decode_printable, is_account_number, is_digits, is_printable, length_prefixed,
    PrintableRuns,
};
use super::{find_subsequence, ScanStrategy};
use crate::records::AccountRecord;
use std::ops::RangeInclusive;
use tracing::trace;

/// Declared lengths accepted for an account-number token
const NUMBER_LENGTHS: RangeInclusive<usize> = 4..=50;

/// Declared lengths accepted for an account-name token
const NAME_LENGTHS: RangeInclusive<usize> = 5..=45;

/// Minimum letters for a string to count as a name
const MIN_NAME_ALPHA: usize = 3;

/// Tag preceding a four-digit account number in some record layouts
const ACCOUNT_MARKER: [u8; 2] = [0x04, 0x00];

/// Offset from the marker at which the name-length search starts
const MARKER_NAME_FIRST: usize = 8;

/// Name starts tried past a name-length byte
const MARKER_NAME_OFFSETS: RangeInclusive<usize> = 1..=4;

/// Account-name fragments common enough to anchor a search
pub const KNOWN_ACCOUNT_NAMES: &[&str] = &[
    "Cash on hand",
    "Petty cash",
    "Bank",
    "Accounts Receivable",
    "Accounts Payable",
    "Sales",
    "Office",
    "Equipment",
    "Inventory",
    "Rent",
];

fn is_name(text: &str) -> bool {
    alpha_count(text) >= MIN_NAME_ALPHA
}

/// Strategy A: length-prefixed account number, then a length-prefixed name.
///
/// Every offset is tried as a length byte. When the token there is an
/// account number, the following window is searched for the first
/// length-prefixed token that reads as a name.
#[derive(Debug, Clone)]
pub struct LengthPrefixedPairing {
    window: usize,
}

impl LengthPrefixedPairing {
    /// Creates the strategy with the given name search window
    pub fn new(window: usize) -> Self {
        Self { window }
    }
}

impl ScanStrategy for LengthPrefixedPairing {
    type Record = AccountRecord;

    fn name(&self) -> &'static str {
        "length-prefixed"
    }

    fn scan(&self, data: &[u8]) -> Vec<AccountRecord> {
        let mut found = Vec::new();

        for i in 0..data.len() {
            let Some(number) = length_prefixed(data, i, NUMBER_LENGTHS, data.len()) else {
                continue;
            };
            if !is_account_number(number.text) {
                continue;
            }

            let window_start = i + 1 + number.declared_length.unwrap_or_default();
            let window_end = (window_start + self.window).min(data.len());

            let name = (window_start..window_end)
                .filter_map(|j| length_prefixed(data, j, NAME_LENGTHS, window_end))
                .find(|token| is_name(token.text));

            if let Some(name) = name {
                trace!("Paired {} with {:?} at offset {}", number.text, name.text, i);
                found.push(AccountRecord::new(number.text, name.text));
            }
        }

        found
    }
}

/// Strategy B: `04 00` marker, four ASCII digits, then a nearby name.
///
/// The first byte in the name-length range after the digits is taken as the
/// name length; the name may start one to four bytes past it.
#[derive(Debug, Clone)]
pub struct MarkerAnchored {
    window: usize,
}

impl MarkerAnchored {
    /// Creates the strategy with the given search window after the marker
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    fn name_after(&self, data: &[u8], marker: usize) -> Option<String> {
        let search_end = (marker + self.window).min(data.len());
        let length_pos = (marker + MARKER_NAME_FIRST..search_end)
            .find(|&p| NAME_LENGTHS.contains(&(data[p] as usize)))?;
        let declared = data[length_pos] as usize;

        MARKER_NAME_OFFSETS.into_iter().find_map(|offset| {
            let start = length_pos + offset;
            let bytes = data.get(start..start + declared)?;
            let text = decode_printable(bytes)?;
            is_name(text).then(|| text.trim().to_string())
        })
    }
}

impl ScanStrategy for MarkerAnchored {
    type Record = AccountRecord;

    fn name(&self) -> &'static str {
        "marker-anchored"
    }

    fn scan(&self, data: &[u8]) -> Vec<AccountRecord> {
        let mut found = Vec::new();

        for (i, pair) in data.windows(ACCOUNT_MARKER.len()).enumerate() {
            if pair != ACCOUNT_MARKER {
                continue;
            }
            let Some(digits) = data.get(i + 2..i + 6) else {
                continue;
            };
            if !is_digits(digits) {
                continue;
            }
            let Ok(number) = std::str::from_utf8(digits) else {
                continue;
            };

            if let Some(name) = self.name_after(data, i) {
                trace!("Marker at {} gave {} {:?}", i, number, name);
                found.push(AccountRecord::new(number, name));
            }
        }

        found
    }
}

/// Strategy C: a known account name with a four-digit number shortly before.
///
/// Every occurrence of every anchor is examined. Walking backwards from the
/// anchor, the first four-byte all-digit window is taken as the account
/// number. The lookback window's first byte is never a window start, so a
/// number sitting exactly at the edge of the lookback is not recovered.
#[derive(Debug, Clone)]
pub struct KnownAnchor {
    anchors: Vec<String>,
    lookback: usize,
    name_cap: usize,
}

impl KnownAnchor {
    /// Creates the strategy with the built-in anchor list
    pub fn new(lookback: usize, name_cap: usize) -> Self {
        Self::with_anchors(KNOWN_ACCOUNT_NAMES.iter().copied(), lookback, name_cap)
    }

    /// Creates the strategy with a custom anchor list
    pub fn with_anchors<I, S>(anchors: I, lookback: usize, name_cap: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            anchors: anchors
                .into_iter()
                .map(Into::into)
                .filter(|a: &String| !a.is_empty())
                .collect(),
            lookback,
            name_cap,
        }
    }

    fn number_before<'a>(&self, data: &'a [u8], pos: usize) -> Option<&'a str> {
        let window = &data[pos.saturating_sub(self.lookback)..pos];
        let start = (1..window.len())
            .rev()
            .find(|&b| b + 4 <= window.len() && is_digits(&window[b..b + 4]))?;
        std::str::from_utf8(&window[start..start + 4]).ok()
    }

    fn name_at<'a>(&self, data: &'a [u8], pos: usize) -> Option<&'a str> {
        let cap = (pos + self.name_cap).min(data.len());
        let end = data[pos..cap]
            .iter()
            .position(|&b| !is_printable(b))
            .map_or(cap, |n| pos + n);
        let name = std::str::from_utf8(&data[pos..end]).ok()?.trim();
        (!name.is_empty()).then_some(name)
    }
}

impl ScanStrategy for KnownAnchor {
    type Record = AccountRecord;

    fn name(&self) -> &'static str {
        "known-anchor"
    }

    fn scan(&self, data: &[u8]) -> Vec<AccountRecord> {
        let mut found = Vec::new();

        for anchor in &self.anchors {
            let needle = anchor.as_bytes();
            let mut from = 0;

            while let Some(relative) = find_subsequence(&data[from..], needle) {
                let pos = from + relative;
                from = pos + 1;

                let Some(number) = self.number_before(data, pos) else {
                    continue;
                };
                if let Some(name) = self.name_at(data, pos) {
                    trace!("Anchor {:?} at {} gave {} {:?}", anchor, pos, number, name);
                    found.push(AccountRecord::new(number, name));
                }
            }
        }

        found
    }
}

/// Strategy D: a numeric printable run followed closely by a name run.
#[derive(Debug, Clone)]
pub struct AdjacencyPairing {
    lookahead: usize,
}

impl AdjacencyPairing {
    /// Creates the strategy considering `lookahead` runs after each number
    pub fn new(lookahead: usize) -> Self {
        Self { lookahead }
    }
}

impl ScanStrategy for AdjacencyPairing {
    type Record = AccountRecord;

    fn name(&self) -> &'static str {
        "adjacency"
    }

    fn scan(&self, data: &[u8]) -> Vec<AccountRecord> {
        let runs: Vec<_> = PrintableRuns::new(data, 4).collect();
        let mut found = Vec::new();

        for (idx, run) in runs.iter().enumerate() {
            if !is_account_number(run.text) {
                continue;
            }
            let name = runs[idx + 1..]
                .iter()
                .take(self.lookahead)
                .find(|next| is_name(next.text) && !is_account_number(next.text));

            if let Some(name) = name {
                found.push(AccountRecord::new(run.text, name.text));
            }
        }

        found
    }
}
