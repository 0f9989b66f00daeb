//! Cell locators
//!
//! A [`CellLocator`] names one cell for its whole life, independent of where
//! the cell currently sits in the document. Moving or deleting other cells
//! never changes it.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable identifier of a cell (e.g., "c7")
///
/// Locators are allocated by the [`CellStore`](crate::CellStore) and are
/// unique within a document. The string form is `c` followed by the decimal
/// id without leading zeros; [`FromStr`] accepts exactly the strings
/// [`Display`](fmt::Display) produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellLocator(u64);

impl CellLocator {
    /// Create a locator from its raw id
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw id
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Parse a locator from its string form
    ///
    /// # Examples
    /// ```
    /// use cellbook_core::CellLocator;
    ///
    /// let loc = CellLocator::parse("c42").unwrap();
    /// assert_eq!(loc.raw(), 42);
    /// assert_eq!(loc.to_string(), "c42");
    ///
    /// assert!(CellLocator::parse("c042").is_err());
    /// assert!(CellLocator::parse("42").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let digits = s
            .strip_prefix('c')
            .ok_or_else(|| Error::InvalidLocator(s.into()))?;

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidLocator(s.into()));
        }
        // Leading zeros would give a second spelling of the same locator
        if digits.len() > 1 && digits.starts_with('0') {
            return Err(Error::InvalidLocator(s.into()));
        }

        digits
            .parse::<u64>()
            .map(Self)
            .map_err(|_| Error::InvalidLocator(s.into()))
    }
}

impl fmt::Display for CellLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl FromStr for CellLocator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
