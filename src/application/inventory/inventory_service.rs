use crate::domain::{
    self, Author, CatalogEntry, CopyCount, Isbn, SearchTerm, Title, commands::*,
};
use crate::ports::{AddOutcome, InventoryStore, LendOutcome, ReturnOutcome, StoreError};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::errors::{InventoryApplicationError, Result};
use super::operation_result::OperationResult;

/// Service dependencies
///
/// The store is injected rather than reached through global state; every
/// operation below takes the dependencies explicitly.
#[derive(Clone)]
pub struct ServiceDependencies {
    pub store: Arc<dyn InventoryStore>,
}

/// Payload of add_or_merge: whether the ISBN was new.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "entry", rename_all = "snake_case")]
pub enum AddedEntry {
    Created(CatalogEntry),
    Merged(CatalogEntry),
}

impl AddedEntry {
    pub fn entry(&self) -> &CatalogEntry {
        match self {
            AddedEntry::Created(entry) | AddedEntry::Merged(entry) => entry,
        }
    }

    pub fn into_entry(self) -> CatalogEntry {
        match self {
            AddedEntry::Created(entry) | AddedEntry::Merged(entry) => entry,
        }
    }
}

/// Turn an error into a failed result, logging store failures.
fn reject<T>(operation: &'static str, err: InventoryApplicationError) -> OperationResult<T> {
    match &err {
        InventoryApplicationError::StoreUnavailable(source) => {
            tracing::error!(operation = operation, error = %source, "inventory store failure");
        }
        _ => {
            tracing::debug!(operation = operation, reason = %err, "inventory operation rejected");
        }
    }
    OperationResult::from(&err)
}

fn parse_isbn(raw: &str) -> Result<Isbn> {
    Ok(Isbn::parse(raw)?)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("1 {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Add copies of a book.
///
/// Business rules:
/// - an unknown ISBN is inserted as a new entry
/// - a known ISBN is merged: its copy count grows by the incoming count,
///   title and author stay as first recorded
/// - insert-or-merge is a single atomic store operation, so concurrent adds
///   and deletes of the same ISBN never surface a duplicate key
pub async fn add_or_merge(
    deps: &ServiceDependencies,
    cmd: AddCopies,
) -> OperationResult<AddedEntry> {
    match try_add_or_merge(deps, cmd).await {
        Ok(AddedEntry::Created(entry)) => {
            tracing::info!(
                isbn = %entry.isbn,
                copies = entry.copy_count.value(),
                "catalog entry created"
            );
            let message = format!(
                "New entry created: \"{}\" (ISBN {}), copies: {}",
                entry.title, entry.isbn, entry.copy_count
            );
            OperationResult::ok(message, AddedEntry::Created(entry))
        }
        Ok(AddedEntry::Merged(entry)) => {
            tracing::info!(
                isbn = %entry.isbn,
                copies = entry.copy_count.value(),
                "copies merged into existing entry"
            );
            let message = format!(
                "ISBN {} already in the catalog; copies increased to {}",
                entry.isbn, entry.copy_count
            );
            OperationResult::ok(message, AddedEntry::Merged(entry))
        }
        Err(err) => reject("add_or_merge", err),
    }
}

async fn try_add_or_merge(deps: &ServiceDependencies, cmd: AddCopies) -> Result<AddedEntry> {
    // 1. Validate every field before touching the store
    let isbn = Isbn::parse(&cmd.isbn)?;
    let title = Title::parse(&cmd.title)?;
    let author = Author::parse(&cmd.author)?;
    let copy_count = CopyCount::try_from(cmd.copy_count)?;

    let entry = domain::book::register_entry(isbn, title, author, copy_count, Utc::now());

    // 2. Insert or merge in one atomic store step
    match deps.store.add_copies(&entry).await? {
        AddOutcome::Created(created) => Ok(AddedEntry::Created(created)),
        AddOutcome::Merged(merged) => Ok(AddedEntry::Merged(merged)),
    }
}

/// Lend one copy.
///
/// Business rules:
/// - the entry must exist
/// - at least one copy must be left; at zero the request is rejected and
///   nothing changes
/// - decrement and check happen in one atomic store operation
pub async fn lend(deps: &ServiceDependencies, isbn: &str) -> OperationResult<CatalogEntry> {
    match try_lend(deps, isbn).await {
        Ok(entry) => {
            tracing::info!(isbn = %entry.isbn, remaining = entry.copy_count.value(), "copy lent");
            let message = format!("Book lent. Remaining copies: {}", entry.copy_count);
            OperationResult::ok(message, entry)
        }
        Err(err) => reject("lend", err),
    }
}

async fn try_lend(deps: &ServiceDependencies, isbn: &str) -> Result<CatalogEntry> {
    let isbn = parse_isbn(isbn)?;

    match deps.store.lend_copy(&isbn).await? {
        LendOutcome::Decremented(entry) => Ok(entry),
        LendOutcome::OutOfStock => Err(InventoryApplicationError::OutOfStock(isbn)),
        LendOutcome::NotFound => Err(InventoryApplicationError::NotFound(isbn)),
    }
}

/// Take one copy back.
///
/// Business rules:
/// - the entry must exist
/// - the count grows by exactly one and the entry is available afterwards
pub async fn return_copy(deps: &ServiceDependencies, isbn: &str) -> OperationResult<CatalogEntry> {
    match try_return_copy(deps, isbn).await {
        Ok(entry) => {
            tracing::info!(isbn = %entry.isbn, copies = entry.copy_count.value(), "copy returned");
            let message = format!("Book returned. Current copies: {}", entry.copy_count);
            OperationResult::ok(message, entry)
        }
        Err(err) => reject("return_copy", err),
    }
}

async fn try_return_copy(deps: &ServiceDependencies, isbn: &str) -> Result<CatalogEntry> {
    let isbn = parse_isbn(isbn)?;

    match deps.store.return_copy(&isbn).await? {
        ReturnOutcome::Incremented(entry) => Ok(entry),
        ReturnOutcome::NotFound => Err(InventoryApplicationError::NotFound(isbn)),
    }
}

/// Replace title, author and copy count of an existing entry.
pub async fn update(deps: &ServiceDependencies, cmd: UpdateEntry) -> OperationResult<CatalogEntry> {
    match try_update(deps, cmd).await {
        Ok(entry) => {
            tracing::info!(
                isbn = %entry.isbn,
                copies = entry.copy_count.value(),
                "catalog entry updated"
            );
            let message = format!("Entry {} updated; copies: {}", entry.isbn, entry.copy_count);
            OperationResult::ok(message, entry)
        }
        Err(err) => reject("update", err),
    }
}

async fn try_update(deps: &ServiceDependencies, cmd: UpdateEntry) -> Result<CatalogEntry> {
    let isbn = Isbn::parse(&cmd.isbn)?;
    let title = Title::parse(&cmd.title)?;
    let author = Author::parse(&cmd.author)?;
    let copy_count = CopyCount::try_from(cmd.copy_count)?;

    // created_at is ignored by the store on update
    let now = Utc::now();
    let replacement = domain::book::register_entry(isbn, title, author, copy_count, now);

    Ok(deps.store.update(&replacement).await?)
}

/// Delete an entry.
///
/// Deleting an unknown ISBN is a successful no-op; the payload tells the
/// caller whether anything was removed.
pub async fn delete(deps: &ServiceDependencies, isbn: &str) -> OperationResult<bool> {
    let isbn = match parse_isbn(isbn) {
        Ok(isbn) => isbn,
        Err(err) => return reject("delete", err),
    };

    match deps.store.remove(&isbn).await {
        Ok(true) => {
            tracing::info!(isbn = %isbn, "catalog entry deleted");
            OperationResult::ok(format!("Entry {isbn} deleted"), true)
        }
        Ok(false) => OperationResult::ok(
            format!("No entry with ISBN {isbn}; nothing deleted"),
            false,
        ),
        Err(err) => reject("delete", err.into()),
    }
}

/// Look a single entry up. An unknown ISBN is a NotFound failure.
pub async fn find_entry(deps: &ServiceDependencies, isbn: &str) -> OperationResult<CatalogEntry> {
    match try_find_entry(deps, isbn).await {
        Ok(entry) => OperationResult::ok(format!("Found {}", entry.isbn), entry),
        Err(err) => reject("find_entry", err),
    }
}

async fn try_find_entry(deps: &ServiceDependencies, isbn: &str) -> Result<CatalogEntry> {
    let isbn = parse_isbn(isbn)?;
    deps.store
        .find_by_isbn(&isbn)
        .await?
        .ok_or(InventoryApplicationError::NotFound(isbn))
}

/// Search titles and authors, ignoring case. An empty term is rejected.
pub async fn search(deps: &ServiceDependencies, term: &str) -> OperationResult<Vec<CatalogEntry>> {
    let term = match SearchTerm::parse(term) {
        Ok(term) => term,
        Err(err) => return reject("search", err.into()),
    };

    match deps.store.search(&term).await {
        Ok(entries) if entries.is_empty() => {
            OperationResult::ok(format!("No matches for \"{}\"", term.as_str()), entries)
        }
        Ok(entries) => {
            let message = format!(
                "{} for \"{}\"",
                plural(entries.len(), "result", "results"),
                term.as_str()
            );
            OperationResult::ok(message, entries)
        }
        Err(err) => reject("search", err.into()),
    }
}

/// Every entry, ordered by title.
pub async fn list_all(deps: &ServiceDependencies) -> OperationResult<Vec<CatalogEntry>> {
    list(deps.store.find_all().await, "list_all", "The catalog is empty")
}

/// Entries with at least one copy on the shelf.
pub async fn list_available(deps: &ServiceDependencies) -> OperationResult<Vec<CatalogEntry>> {
    list(
        deps.store.find_available().await,
        "list_available",
        "No books are available",
    )
}

/// Entries with no copy left.
pub async fn list_unavailable(deps: &ServiceDependencies) -> OperationResult<Vec<CatalogEntry>> {
    list(
        deps.store.find_unavailable().await,
        "list_unavailable",
        "Every book is available",
    )
}

fn list(
    result: std::result::Result<Vec<CatalogEntry>, StoreError>,
    operation: &'static str,
    empty_message: &str,
) -> OperationResult<Vec<CatalogEntry>> {
    match result {
        Ok(entries) if entries.is_empty() => OperationResult::ok(empty_message, entries),
        Ok(entries) => {
            let message = plural(entries.len(), "entry", "entries");
            OperationResult::ok(message, entries)
        }
        Err(err) => reject(operation, err.into()),
    }
}

/// Number of entries (distinct ISBNs) in the catalog.
pub async fn catalog_size(deps: &ServiceDependencies) -> OperationResult<u64> {
    match deps.store.count().await {
        Ok(count) => OperationResult::ok(format!("The catalog holds {count} entries"), count),
        Err(err) => reject("catalog_size", err.into()),
    }
}
