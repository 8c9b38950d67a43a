//! Balance recovery from the account-activity file.
//!
//! Balances are stored as little-endian doubles behind a fixed marker:
//!
//! ```text
//! FF FF FF FF FF FF  11|15  00  <f64 LE>
//! ```
//!
//! The account number, when present, is the last run of four ASCII digits
//! shortly before the marker.

use super::runs::is_digits;
use super::ScanStrategy;
use crate::records::BalanceRecord;
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;
use tracing::trace;

/// Fill bytes that open a balance slot
pub const BALANCE_MARKER: [u8; 6] = [0xFF; 6];

/// Discriminator values seen after the marker
const DISCRIMINATORS: [u8; 2] = [0x11, 0x15];

/// Marker, discriminator, pad byte and the double itself
const SLOT_LEN: usize = 16;

/// Exclusive bounds on a plausible balance magnitude
const MIN_MAGNITUDE: f64 = 1.0;
const MAX_MAGNITUDE: f64 = 100_000_000.0;

/// Scans for marker-prefixed balance values
#[derive(Debug, Clone)]
pub struct BalanceScanner {
    lookback: usize,
}

impl Default for BalanceScanner {
    fn default() -> Self {
        Self::new(50)
    }
}

impl BalanceScanner {
    /// Creates a scanner that searches `lookback` bytes for an account number
    pub fn new(lookback: usize) -> Self {
        Self { lookback }
    }

    fn is_slot(slot: &[u8]) -> bool {
        slot[..6] == BALANCE_MARKER && DISCRIMINATORS.contains(&slot[6]) && slot[7] == 0x00
    }

    fn account_before(&self, data: &[u8], end: usize) -> Option<String> {
        let window = &data[end.saturating_sub(self.lookback)..end];
        let start = window.windows(4).rposition(is_digits)?;
        std::str::from_utf8(&window[start..start + 4])
            .ok()
            .map(str::to_string)
    }
}

/// Decodes a balance, rejecting NaN and implausible magnitudes
fn decode_balance(bytes: &[u8]) -> Option<f64> {
    let value = Cursor::new(bytes).read_f64::<LittleEndian>().ok()?;
    if value.is_nan() {
        return None;
    }
    let magnitude = value.abs();
    (magnitude > MIN_MAGNITUDE && magnitude < MAX_MAGNITUDE).then_some(value)
}

impl ScanStrategy for BalanceScanner {
    type Record = BalanceRecord;

    fn name(&self) -> &'static str {
        "balance-marker"
    }

    fn scan(&self, data: &[u8]) -> Vec<BalanceRecord> {
        let mut found = Vec::new();
        let mut position = 0;

        while position + SLOT_LEN <= data.len() {
            let slot = &data[position..position + SLOT_LEN];
            if !Self::is_slot(slot) {
                position += 1;
                continue;
            }

            if let Some(value) = decode_balance(&slot[8..]) {
                let account = self.account_before(data, position);
                trace!("Balance {} at {} for {:?}", value, position, account);
                found.push(BalanceRecord::new(account, value));
            }

            position += SLOT_LEN;
        }

        found
    }
}
