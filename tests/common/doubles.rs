use async_trait::async_trait;
use library_inventory::adapters::in_memory::InMemoryInventoryStore;
use library_inventory::domain::{CatalogEntry, CopyCount, Isbn, SearchTerm};
use library_inventory::ports::{
    AddOutcome, InventoryStore, LendOutcome, Result, ReturnOutcome, StoreError,
};

fn connection_refused() -> StoreError {
    StoreError::Unavailable("connection refused".into())
}

// ============================================================================
// FailingInventoryStore
// ============================================================================

/// Store whose backend is down: every call fails with `Unavailable`
pub struct FailingInventoryStore;

#[async_trait]
impl InventoryStore for FailingInventoryStore {
    async fn find_by_isbn(&self, _isbn: &Isbn) -> Result<Option<CatalogEntry>> {
        Err(connection_refused())
    }

    async fn find_all(&self) -> Result<Vec<CatalogEntry>> {
        Err(connection_refused())
    }

    async fn search(&self, _term: &SearchTerm) -> Result<Vec<CatalogEntry>> {
        Err(connection_refused())
    }

    async fn find_available(&self) -> Result<Vec<CatalogEntry>> {
        Err(connection_refused())
    }

    async fn find_unavailable(&self) -> Result<Vec<CatalogEntry>> {
        Err(connection_refused())
    }

    async fn insert(&self, _entry: &CatalogEntry) -> Result<()> {
        Err(connection_refused())
    }

    async fn add_copies(&self, _entry: &CatalogEntry) -> Result<AddOutcome> {
        Err(connection_refused())
    }

    async fn update(&self, _entry: &CatalogEntry) -> Result<CatalogEntry> {
        Err(connection_refused())
    }

    async fn remove(&self, _isbn: &Isbn) -> Result<bool> {
        Err(connection_refused())
    }

    async fn exists(&self, _isbn: &Isbn) -> Result<bool> {
        Err(connection_refused())
    }

    async fn count(&self) -> Result<u64> {
        Err(connection_refused())
    }

    async fn lend_copy(&self, _isbn: &Isbn) -> Result<LendOutcome> {
        Err(connection_refused())
    }

    async fn return_copy(&self, _isbn: &Isbn) -> Result<ReturnOutcome> {
        Err(connection_refused())
    }

    async fn merge_copies(
        &self,
        _isbn: &Isbn,
        _additional: CopyCount,
    ) -> Result<Option<CatalogEntry>> {
        Err(connection_refused())
    }
}

// ============================================================================
// ChurningInventoryStore
// ============================================================================

/// Store where another client keeps deleting and re-adding every ISBN
///
/// Separate `insert` and `merge_copies` calls always lose the race:
/// `insert` sees the ISBN taken and `merge_copies` sees it gone. Everything
/// else, `add_copies` included, goes to an in-memory store.
#[derive(Default)]
pub struct ChurningInventoryStore {
    inner: InMemoryInventoryStore,
}

#[async_trait]
impl InventoryStore for ChurningInventoryStore {
    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<CatalogEntry>> {
        self.inner.find_by_isbn(isbn).await
    }

    async fn find_all(&self) -> Result<Vec<CatalogEntry>> {
        self.inner.find_all().await
    }

    async fn search(&self, term: &SearchTerm) -> Result<Vec<CatalogEntry>> {
        self.inner.search(term).await
    }

    async fn find_available(&self) -> Result<Vec<CatalogEntry>> {
        self.inner.find_available().await
    }

    async fn find_unavailable(&self) -> Result<Vec<CatalogEntry>> {
        self.inner.find_unavailable().await
    }

    async fn insert(&self, entry: &CatalogEntry) -> Result<()> {
        Err(StoreError::DuplicateKey(entry.isbn.clone()))
    }

    async fn add_copies(&self, entry: &CatalogEntry) -> Result<AddOutcome> {
        self.inner.add_copies(entry).await
    }

    async fn update(&self, entry: &CatalogEntry) -> Result<CatalogEntry> {
        self.inner.update(entry).await
    }

    async fn remove(&self, isbn: &Isbn) -> Result<bool> {
        self.inner.remove(isbn).await
    }

    async fn exists(&self, isbn: &Isbn) -> Result<bool> {
        self.inner.exists(isbn).await
    }

    async fn count(&self) -> Result<u64> {
        self.inner.count().await
    }

    async fn lend_copy(&self, isbn: &Isbn) -> Result<LendOutcome> {
        self.inner.lend_copy(isbn).await
    }

    async fn return_copy(&self, isbn: &Isbn) -> Result<ReturnOutcome> {
        self.inner.return_copy(isbn).await
    }

    async fn merge_copies(
        &self,
        _isbn: &Isbn,
        _additional: CopyCount,
    ) -> Result<Option<CatalogEntry>> {
        Ok(None)
    }
}
