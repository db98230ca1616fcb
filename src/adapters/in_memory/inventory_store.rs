use crate::domain::{self, CatalogEntry, CopyCount, Isbn, SearchTerm};
use crate::ports::inventory_store::{
    AddOutcome, InventoryStore as InventoryStoreTrait, LendOutcome, Result, ReturnOutcome,
    StoreError,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, btree_map};
use std::sync::{Mutex, MutexGuard};

/// In-memory implementation of InventoryStore
///
/// Every operation runs under a single mutex, which makes each
/// read-modify-write atomic. Search is case-insensitive, matching the
/// PostgreSQL adapter's `ILIKE`.
#[derive(Default)]
pub struct InventoryStore {
    entries: Mutex<BTreeMap<Isbn, CatalogEntry>>,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing entries (test setup).
    pub fn with_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| (entry.isbn.clone(), entry))
            .collect();
        Self {
            entries: Mutex::new(entries),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<Isbn, CatalogEntry>>> {
        self.entries
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string().into()))
    }

    fn sorted_by_title<'a>(
        entries: impl Iterator<Item = &'a CatalogEntry>,
    ) -> Vec<CatalogEntry> {
        let mut entries: Vec<CatalogEntry> = entries.cloned().collect();
        entries.sort_by_cached_key(|entry| {
            (entry.title.as_str().to_lowercase(), entry.isbn.clone())
        });
        entries
    }
}

#[async_trait]
impl InventoryStoreTrait for InventoryStore {
    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<CatalogEntry>> {
        Ok(self.lock()?.get(isbn).cloned())
    }

    async fn find_all(&self) -> Result<Vec<CatalogEntry>> {
        let entries = self.lock()?;
        Ok(Self::sorted_by_title(entries.values()))
    }

    async fn search(&self, term: &SearchTerm) -> Result<Vec<CatalogEntry>> {
        let needle = term.as_str().to_lowercase();
        let entries = self.lock()?;
        Ok(Self::sorted_by_title(entries.values().filter(|entry| {
            entry.title.as_str().to_lowercase().contains(&needle)
                || entry.author.as_str().to_lowercase().contains(&needle)
        })))
    }

    async fn find_available(&self) -> Result<Vec<CatalogEntry>> {
        let entries = self.lock()?;
        Ok(Self::sorted_by_title(
            entries.values().filter(|entry| entry.is_available()),
        ))
    }

    async fn find_unavailable(&self) -> Result<Vec<CatalogEntry>> {
        let entries = self.lock()?;
        Ok(Self::sorted_by_title(
            entries.values().filter(|entry| !entry.is_available()),
        ))
    }

    async fn insert(&self, entry: &CatalogEntry) -> Result<()> {
        let mut entries = self.lock()?;
        if entries.contains_key(&entry.isbn) {
            return Err(StoreError::DuplicateKey(entry.isbn.clone()));
        }
        entries.insert(entry.isbn.clone(), entry.clone());
        Ok(())
    }

    async fn add_copies(&self, entry: &CatalogEntry) -> Result<AddOutcome> {
        let mut entries = self.lock()?;
        match entries.entry(entry.isbn.clone()) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(entry.clone());
                Ok(AddOutcome::Created(entry.clone()))
            }
            btree_map::Entry::Occupied(mut slot) => {
                let merged =
                    domain::book::merge_copies(slot.get(), entry.copy_count, entry.updated_at)
                        .map_err(|_| StoreError::OutOfRange(entry.isbn.clone()))?;
                slot.insert(merged.clone());
                Ok(AddOutcome::Merged(merged))
            }
        }
    }

    async fn update(&self, entry: &CatalogEntry) -> Result<CatalogEntry> {
        let mut entries = self.lock()?;
        let existing = entries
            .get_mut(&entry.isbn)
            .ok_or_else(|| StoreError::NotFound(entry.isbn.clone()))?;

        *existing = domain::book::revise_entry(
            existing,
            entry.title.clone(),
            entry.author.clone(),
            entry.copy_count,
            entry.updated_at,
        );
        Ok(existing.clone())
    }

    async fn remove(&self, isbn: &Isbn) -> Result<bool> {
        Ok(self.lock()?.remove(isbn).is_some())
    }

    async fn exists(&self, isbn: &Isbn) -> Result<bool> {
        Ok(self.lock()?.contains_key(isbn))
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.lock()?.len() as u64)
    }

    async fn lend_copy(&self, isbn: &Isbn) -> Result<LendOutcome> {
        let mut entries = self.lock()?;
        let Some(existing) = entries.get_mut(isbn) else {
            return Ok(LendOutcome::NotFound);
        };

        match domain::book::lend_copy(existing, Utc::now()) {
            Ok(lent) => {
                *existing = lent.clone();
                Ok(LendOutcome::Decremented(lent))
            }
            Err(domain::LendCopyError::OutOfStock) => Ok(LendOutcome::OutOfStock),
        }
    }

    async fn return_copy(&self, isbn: &Isbn) -> Result<ReturnOutcome> {
        let mut entries = self.lock()?;
        let Some(existing) = entries.get_mut(isbn) else {
            return Ok(ReturnOutcome::NotFound);
        };

        let returned = domain::book::return_copy(existing, Utc::now())
            .map_err(|_| StoreError::OutOfRange(isbn.clone()))?;
        *existing = returned.clone();
        Ok(ReturnOutcome::Incremented(returned))
    }

    async fn merge_copies(
        &self,
        isbn: &Isbn,
        additional: CopyCount,
    ) -> Result<Option<CatalogEntry>> {
        let mut entries = self.lock()?;
        let Some(existing) = entries.get_mut(isbn) else {
            return Ok(None);
        };

        let merged = domain::book::merge_copies(existing, additional, Utc::now())
            .map_err(|_| StoreError::OutOfRange(isbn.clone()))?;
        *existing = merged.clone();
        Ok(Some(merged))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Author, Title, book::register_entry};

    fn entry(isbn: &str, title: &str, author: &str, copies: i64) -> CatalogEntry {
        register_entry(
            Isbn::parse(isbn).unwrap(),
            Title::parse(title).unwrap(),
            Author::parse(author).unwrap(),
            CopyCount::try_from(copies).unwrap(),
            Utc::now(),
        )
    }

    fn isbn(raw: &str) -> Isbn {
        Isbn::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_isbn() {
        let store = InventoryStore::new();
        store.insert(&entry("1", "Dune", "Herbert", 1)).await.unwrap();

        let result = store.insert(&entry("1", "Other", "Someone", 3)).await;
        assert!(matches!(result, Err(StoreError::DuplicateKey(ref k)) if k.as_str() == "1"));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_all_orders_by_title() {
        let store = InventoryStore::with_entries([
            entry("3", "Neuromancer", "Gibson", 1),
            entry("1", "Dune", "Herbert", 1),
            entry("2", "Emma", "Austen", 1),
        ]);

        let titles: Vec<String> = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.title.to_string())
            .collect();
        assert_eq!(titles, vec!["Dune", "Emma", "Neuromancer"]);
    }

    #[tokio::test]
    async fn test_title_order_ignores_case() {
        let store = InventoryStore::with_entries([
            entry("1", "Banana", "X", 1),
            entry("2", "apple", "X", 1),
            entry("3", "cherry", "X", 1),
        ]);

        let titles: Vec<String> = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.title.to_string())
            .collect();
        assert_eq!(titles, vec!["apple", "Banana", "cherry"]);
    }

    #[tokio::test]
    async fn test_add_copies_creates_then_merges() {
        let store = InventoryStore::new();

        let first = store.add_copies(&entry("1", "Dune", "Herbert", 2)).await.unwrap();
        assert!(matches!(first, AddOutcome::Created(ref e) if e.copy_count.value() == 2));

        let second = store.add_copies(&entry("1", "Other", "Someone", 3)).await.unwrap();
        match second {
            AddOutcome::Merged(merged) => {
                assert_eq!(merged.copy_count.value(), 5);
                assert_eq!(merged.title.as_str(), "Dune");
            }
            other => panic!("Expected Merged, got {other:?}"),
        }
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_add_copies_overflow_leaves_entry_unchanged() {
        let store = InventoryStore::with_entries([entry("1", "T", "A", i32::MAX as i64)]);

        let result = store.add_copies(&entry("1", "T", "A", 1)).await;

        assert!(matches!(result, Err(StoreError::OutOfRange(_))));
        let stored = store.find_by_isbn(&isbn("1")).await.unwrap().unwrap();
        assert_eq!(stored.copy_count, CopyCount::MAX);
    }

    #[tokio::test]
    async fn test_search_matches_title_or_author_ignoring_case() {
        let store = InventoryStore::with_entries([
            entry("1", "The Hobbit", "Tolkien", 1),
            entry("2", "Silmarillion", "J. R. R. Tolkien", 1),
            entry("3", "Dune", "Herbert", 1),
        ]);

        let hits = store
            .search(&SearchTerm::parse("tolkien").unwrap())
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title.as_str(), "Silmarillion");
        assert_eq!(hits[1].title.as_str(), "The Hobbit");

        let hits = store
            .search(&SearchTerm::parse("HOBB").unwrap())
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);

        let hits = store
            .search(&SearchTerm::parse("nothing").unwrap())
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_available_and_unavailable_partition_catalog() {
        let store = InventoryStore::with_entries([
            entry("1", "A", "X", 0),
            entry("2", "B", "X", 2),
            entry("3", "C", "X", 0),
        ]);

        let available = store.find_available().await.unwrap();
        let unavailable = store.find_unavailable().await.unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].isbn.as_str(), "2");
        assert_eq!(unavailable.len(), 2);
    }

    #[tokio::test]
    async fn test_update_unknown_isbn_is_not_found() {
        let store = InventoryStore::new();
        let result = store.update(&entry("9", "T", "A", 1)).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_keeps_created_at() {
        let original = entry("1", "T", "A", 1);
        let store = InventoryStore::with_entries([original.clone()]);

        let mut replacement = entry("1", "T2", "A2", 0);
        replacement.created_at = original.created_at + chrono::Duration::days(1);

        let stored = store.update(&replacement).await.unwrap();
        assert_eq!(stored.created_at, original.created_at);
        assert_eq!(stored.title.as_str(), "T2");
        assert!(!stored.is_available());
    }

    #[tokio::test]
    async fn test_remove_reports_whether_anything_was_removed() {
        let store = InventoryStore::with_entries([entry("1", "T", "A", 1)]);

        assert!(store.remove(&isbn("1")).await.unwrap());
        assert!(!store.remove(&isbn("1")).await.unwrap());
        assert!(!store.exists(&isbn("1")).await.unwrap());
    }

    #[tokio::test]
    async fn test_lend_copy_outcomes() {
        let store = InventoryStore::with_entries([entry("1", "T", "A", 1)]);

        let first = store.lend_copy(&isbn("1")).await.unwrap();
        assert!(matches!(
            first,
            LendOutcome::Decremented(ref e) if e.copy_count == CopyCount::ZERO
        ));

        let second = store.lend_copy(&isbn("1")).await.unwrap();
        assert_eq!(second, LendOutcome::OutOfStock);

        let missing = store.lend_copy(&isbn("2")).await.unwrap();
        assert_eq!(missing, LendOutcome::NotFound);

        let stored = store.find_by_isbn(&isbn("1")).await.unwrap().unwrap();
        assert_eq!(stored.copy_count, CopyCount::ZERO);
    }

    #[tokio::test]
    async fn test_return_copy_outcomes() {
        let store = InventoryStore::with_entries([entry("1", "T", "A", 0)]);

        let returned = store.return_copy(&isbn("1")).await.unwrap();
        assert!(matches!(returned, ReturnOutcome::Incremented(ref e) if e.is_available()));

        let missing = store.return_copy(&isbn("2")).await.unwrap();
        assert_eq!(missing, ReturnOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_return_copy_at_maximum_is_out_of_range() {
        let mut full = entry("1", "T", "A", 0);
        full.copy_count = CopyCount::MAX;
        let store = InventoryStore::with_entries([full]);

        let result = store.return_copy(&isbn("1")).await;
        assert!(matches!(result, Err(StoreError::OutOfRange(_))));

        let stored = store.find_by_isbn(&isbn("1")).await.unwrap().unwrap();
        assert_eq!(stored.copy_count, CopyCount::MAX);
    }

    #[tokio::test]
    async fn test_merge_copies() {
        let store = InventoryStore::with_entries([entry("1", "T", "A", 2)]);

        let merged = store
            .merge_copies(&isbn("1"), CopyCount::try_from(3i64).unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(merged.copy_count.value(), 5);

        let missing = store
            .merge_copies(&isbn("2"), CopyCount::ONE)
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
