use crate::domain::{CatalogEntry, CopyCount, Isbn, SearchTerm};
use async_trait::async_trait;
use thiserror::Error;

/// Store-level failure.
///
/// `DuplicateKey` and `NotFound` are answers about the catalog's contents;
/// `Unavailable` means the backing storage could not be reached or failed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("an entry with ISBN {0} already exists")]
    DuplicateKey(Isbn),

    #[error("no entry with ISBN {0}")]
    NotFound(Isbn),

    /// The adjusted copy count would not fit the storage column.
    #[error("copy count for ISBN {0} would exceed the storable maximum")]
    OutOfRange(Isbn),

    #[error("inventory store unavailable")]
    Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Outcome of the atomic "lend one copy" operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LendOutcome {
    /// One copy was taken; carries the entry after the decrement
    Decremented(CatalogEntry),
    /// The entry exists but has no copy left; nothing changed
    OutOfStock,
    NotFound,
}

/// Outcome of the atomic "return one copy" operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnOutcome {
    /// Carries the entry after the increment
    Incremented(CatalogEntry),
    NotFound,
}

/// Outcome of the atomic "add copies" upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// The ISBN was unknown; carries the entry as inserted
    Created(CatalogEntry),
    /// The ISBN was known; carries the entry after the copies were added
    Merged(CatalogEntry),
}

/// Inventory store port
///
/// Keyed persistence for catalog entries. Implementations must make
/// `add_copies`, `lend_copy`, `return_copy` and `merge_copies` atomic per
/// ISBN so that concurrent callers can never drive a copy count below zero
/// or lose an increment.
///
/// Listings are ordered by the lowercased title compared code point by
/// code point, then by ISBN, independent of any database collation.
/// Search lowercases both sides; for non-ASCII letters the exact folding
/// is the backend's (Rust `to_lowercase` in memory, `ILIKE` on PostgreSQL).
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Look an entry up by ISBN. Absence is `Ok(None)`, not an error.
    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<CatalogEntry>>;

    /// Every entry, ordered by title.
    async fn find_all(&self) -> Result<Vec<CatalogEntry>>;

    /// Entries whose title or author contains `term`, ignoring case.
    /// Ordered by title.
    async fn search(&self, term: &SearchTerm) -> Result<Vec<CatalogEntry>>;

    /// Entries with at least one copy, ordered by title.
    async fn find_available(&self) -> Result<Vec<CatalogEntry>>;

    /// Entries with zero copies, ordered by title.
    async fn find_unavailable(&self) -> Result<Vec<CatalogEntry>>;

    /// Insert a new entry. Fails with `DuplicateKey` if the ISBN is taken.
    async fn insert(&self, entry: &CatalogEntry) -> Result<()>;

    /// Insert `entry`, or add its copy count to the existing entry with the
    /// same ISBN. Title and author of an existing entry are kept.
    ///
    /// One atomic step: `DuplicateKey` is never returned.
    async fn add_copies(&self, entry: &CatalogEntry) -> Result<AddOutcome>;

    /// Replace title, author and copy count of an existing entry.
    ///
    /// Fails with `NotFound` if the ISBN is unknown. Returns the entry as
    /// stored.
    async fn update(&self, entry: &CatalogEntry) -> Result<CatalogEntry>;

    /// Delete an entry. `false` when there was nothing to delete.
    async fn remove(&self, isbn: &Isbn) -> Result<bool>;

    async fn exists(&self, isbn: &Isbn) -> Result<bool>;

    /// Number of entries in the catalog (not copies).
    async fn count(&self) -> Result<u64>;

    /// Atomically take one copy if any is left.
    async fn lend_copy(&self, isbn: &Isbn) -> Result<LendOutcome>;

    /// Atomically put one copy back.
    async fn return_copy(&self, isbn: &Isbn) -> Result<ReturnOutcome>;

    /// Atomically add `additional` copies to an existing entry.
    ///
    /// `Ok(None)` when the ISBN is unknown.
    async fn merge_copies(
        &self,
        isbn: &Isbn,
        additional: CopyCount,
    ) -> Result<Option<CatalogEntry>>;
}
