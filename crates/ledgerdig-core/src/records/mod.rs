//! Recovered business records.
//!
//! Every record is built through a total constructor and never mutated
//! afterwards. Deduplication lives in [`reconcile`]: it only decides which
//! records survive, it never edits one.

mod reconcile;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

pub use reconcile::{reconcile, Keyed, Reconciler};

/// Account category, derived from the leading digits of an account number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    /// 1000-1999, and the fallback for anything unclassifiable
    Asset,
    /// 2000-2999
    Liability,
    /// 3000-3999
    Equity,
    /// 4000-4999
    Revenue,
    /// 5000-9999
    Expense,
}

impl AccountType {
    /// Classifies an account number by range.
    ///
    /// Separators (`.` and `-`) are removed, the first four remaining
    /// characters are parsed as an unsigned integer and mapped by half-open
    /// range. Anything that does not parse lands in [`AccountType::Asset`].
    pub fn classify(account_number: &str) -> Self {
        let digits: String = account_number
            .chars()
            .filter(|c| *c != '.' && *c != '-')
            .take(4)
            .collect();

        match digits.parse::<u32>() {
            Ok(1000..=1999) => AccountType::Asset,
            Ok(2000..=2999) => AccountType::Liability,
            Ok(3000..=3999) => AccountType::Equity,
            Ok(4000..=4999) => AccountType::Revenue,
            Ok(5000..=9999) => AccountType::Expense,
            _ => AccountType::Asset,
        }
    }

    /// Returns the upper-case label used in exports
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Asset => "ASSET",
            AccountType::Liability => "LIABILITY",
            AccountType::Equity => "EQUITY",
            AccountType::Revenue => "REVENUE",
            AccountType::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chart-of-accounts entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Account number, 4-6 digits with an optional `.digits` suffix
    pub account_number: String,
    /// Account name as recovered from the file
    pub account_name: String,
    /// Category derived from `account_number`
    #[serde(rename = "type")]
    pub account_type: AccountType,
}

impl AccountRecord {
    /// Creates an account record, deriving its type from the number
    pub fn new(account_number: impl Into<String>, account_name: impl Into<String>) -> Self {
        let account_number = account_number.into();
        let account_type = AccountType::classify(&account_number);
        Self {
            account_number,
            account_name: account_name.into(),
            account_type,
        }
    }
}

impl Keyed for AccountRecord {
    fn key(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.account_number)
    }
}

/// A balance value, optionally linked to an account number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceRecord {
    /// Nearby account number, when one could be found
    pub account_number: Option<String>,
    /// Balance rounded to two decimal places
    pub balance: f64,
}

impl BalanceRecord {
    /// Creates a balance record, rounding the value to cents
    pub fn new(account_number: Option<String>, value: f64) -> Self {
        Self {
            account_number,
            balance: round_cents(value),
        }
    }
}

impl Keyed for BalanceRecord {
    fn key(&self) -> Cow<'_, str> {
        match &self.account_number {
            Some(number) => Cow::Borrowed(number),
            // Always carries a fractional part, so never equals an account number
            None => Cow::Owned(format!("{:?}", self.balance)),
        }
    }
}

/// A customer or vendor name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    /// Trimmed name
    pub name: String,
}

impl NameRecord {
    /// Creates a name record from a trimmed name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Keyed for NameRecord {
    fn key(&self) -> Cow<'_, str> {
        Cow::Owned(self.name.trim().to_lowercase())
    }
}

/// Everything recovered from one input directory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Chart of accounts
    pub chart_of_accounts: Vec<AccountRecord>,
    /// Account balances
    pub balances: Vec<BalanceRecord>,
    /// Customer names
    pub customers: Vec<NameRecord>,
    /// Vendor names
    pub vendors: Vec<NameRecord>,
}

impl ExtractionResult {
    /// Returns true if nothing at all was recovered
    pub fn is_empty(&self) -> bool {
        self.chart_of_accounts.is_empty()
            && self.balances.is_empty()
            && self.customers.is_empty()
            && self.vendors.is_empty()
    }
}

/// Rounds to two decimal places, exact halves to even
pub(crate) fn round_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
