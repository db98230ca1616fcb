use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    Author, CopyCount, Isbn, LendCopyError, MergeCopiesError, ReturnCopyError, Title,
};

/// Shelf state of a catalog entry, derived from its copy count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockState {
    /// At least one copy can be lent
    InStock,
    /// Zero copies; lending is rejected until a copy comes back
    OutOfStock,
}

impl StockState {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockState::InStock => "in_stock",
            StockState::OutOfStock => "out_of_stock",
        }
    }
}

/// Catalog entry - one book title tracked by the library, keyed by ISBN.
///
/// Availability is not stored: `is_available()` is computed from
/// `copy_count`, so `available == (copy_count > 0)` holds for every value
/// of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub isbn: Isbn,
    pub title: Title,
    pub author: Author,
    pub copy_count: CopyCount,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CatalogEntry {
    pub fn is_available(&self) -> bool {
        self.copy_count.is_positive()
    }

    pub fn stock_state(&self) -> StockState {
        if self.is_available() {
            StockState::InStock
        } else {
            StockState::OutOfStock
        }
    }
}

impl std::fmt::Display for CatalogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = if self.is_available() {
            "available"
        } else {
            "not available"
        };
        write!(
            f,
            "{:<32} {:<24} ISBN {:<20} copies: {:<6} {}",
            self.title.as_str(),
            self.author.as_str(),
            self.isbn.as_str(),
            self.copy_count,
            status
        )
    }
}

/// Pure function: register a new entry.
pub fn register_entry(
    isbn: Isbn,
    title: Title,
    author: Author,
    copy_count: CopyCount,
    registered_at: DateTime<Utc>,
) -> CatalogEntry {
    CatalogEntry {
        isbn,
        title,
        author,
        copy_count,
        created_at: registered_at,
        updated_at: registered_at,
    }
}

/// Pure function: merge newly acquired copies into an existing entry.
///
/// Only the count accumulates; title and author of the existing entry are
/// kept as they are.
pub fn merge_copies(
    entry: &CatalogEntry,
    additional: CopyCount,
    merged_at: DateTime<Utc>,
) -> Result<CatalogEntry, MergeCopiesError> {
    let copy_count = entry.copy_count.checked_add(additional)?;

    Ok(CatalogEntry {
        copy_count,
        updated_at: merged_at,
        ..entry.clone()
    })
}

/// Pure function: lend one copy.
///
/// Rejected when no copy is left; the count never goes below zero.
pub fn lend_copy(
    entry: &CatalogEntry,
    lent_at: DateTime<Utc>,
) -> Result<CatalogEntry, LendCopyError> {
    let copy_count = entry
        .copy_count
        .decrement()
        .ok_or(LendCopyError::OutOfStock)?;

    Ok(CatalogEntry {
        copy_count,
        updated_at: lent_at,
        ..entry.clone()
    })
}

/// Pure function: take one copy back. There is no upper bound other than
/// the storable range.
pub fn return_copy(
    entry: &CatalogEntry,
    returned_at: DateTime<Utc>,
) -> Result<CatalogEntry, ReturnCopyError> {
    let copy_count = entry.copy_count.increment()?;

    Ok(CatalogEntry {
        copy_count,
        updated_at: returned_at,
        ..entry.clone()
    })
}

/// Pure function: replace every mutable field of an entry.
///
/// ISBN and `created_at` are carried over from `entry`.
pub fn revise_entry(
    entry: &CatalogEntry,
    title: Title,
    author: Author,
    copy_count: CopyCount,
    revised_at: DateTime<Utc>,
) -> CatalogEntry {
    CatalogEntry {
        title,
        author,
        copy_count,
        updated_at: revised_at,
        ..entry.clone()
    }
}
