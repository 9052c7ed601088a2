//! Page/limit validation for order listings
//!
//! Raw query values are checked in two stages. First both values must be
//! integers; a failure names every offending field in one error. Then both
//! must be at least 1, again reported together.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which pagination inputs an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationField {
    Page,
    Limit,
    Both,
}

impl PaginationField {
    fn from_flags(page: bool, limit: bool) -> Option<Self> {
        match (page, limit) {
            (true, true) => Some(PaginationField::Both),
            (true, false) => Some(PaginationField::Page),
            (false, true) => Some(PaginationField::Limit),
            (false, false) => None,
        }
    }
}

impl fmt::Display for PaginationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaginationField::Page => f.write_str("Page"),
            PaginationField::Limit => f.write_str("Limit"),
            PaginationField::Both => f.write_str("Page and limit"),
        }
    }
}

/// Rejected pagination input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("Invalid integer input: {0}")]
    InvalidInteger(PaginationField),

    #[error("Page number must start with 1")]
    PageOutOfRange,

    #[error("Limit must start with 1")]
    LimitOutOfRange,

    #[error("Page number and limit must start with 1")]
    BothOutOfRange,
}

impl PaginationError {
    /// Returns the fields this error refers to
    pub fn field(&self) -> PaginationField {
        match self {
            PaginationError::InvalidInteger(field) => *field,
            PaginationError::PageOutOfRange => PaginationField::Page,
            PaginationError::LimitOutOfRange => PaginationField::Limit,
            PaginationError::BothOutOfRange => PaginationField::Both,
        }
    }
}

/// A validated page request (both values at least 1)
///
/// Values are unbounded above; a page past the end of the table is simply
/// empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    /// Creates a page request from integer inputs
    pub fn new(page: i64, limit: i64) -> Result<Self, PaginationError> {
        match (u64::try_from(page), u64::try_from(limit)) {
            (Ok(page), Ok(limit)) if page >= 1 && limit >= 1 => Ok(Self { page, limit }),
            (page, limit) => {
                let page_bad = !matches!(page, Ok(p) if p >= 1);
                let limit_bad = !matches!(limit, Ok(l) if l >= 1);
                Err(match (page_bad, limit_bad) {
                    (true, true) => PaginationError::BothOutOfRange,
                    (true, false) => PaginationError::PageOutOfRange,
                    _ => PaginationError::LimitOutOfRange,
                })
            }
        }
    }

    /// Validates raw query-string values
    ///
    /// A missing or empty value counts as "not an integer". Decimal notation
    /// with a zero fraction (`"2.0"`) is accepted; `"1.2"` is not. Integers
    /// too large for `i64` saturate rather than fail.
    pub fn parse(raw_page: Option<&str>, raw_limit: Option<&str>) -> Result<Self, PaginationError> {
        let page = raw_page.and_then(parse_integer);
        let limit = raw_limit.and_then(parse_integer);

        match (page, limit) {
            (Some(page), Some(limit)) => Self::new(page, limit),
            (page, limit) => Err(PaginationError::InvalidInteger(
                PaginationField::from_flags(page.is_none(), limit.is_none())
                    .unwrap_or(PaginationField::Both),
            )),
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Number of rows to skip: `(page - 1) * limit`, saturating at `u64::MAX`
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

fn parse_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<i64>() {
        return Some(value);
    }

    let digits = raw.strip_prefix(&['+', '-'][..]).unwrap_or(raw);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return Some(if raw.starts_with('-') { i64::MIN } else { i64::MAX });
    }

    let value = raw.parse::<f64>().ok()?;
    if !value.is_finite() || value.fract() != 0.0 {
        None
    } else if value >= i64::MAX as f64 {
        Some(i64::MAX)
    } else if value <= i64::MIN as f64 {
        Some(i64::MIN)
    } else {
        Some(value as i64)
    }
}
