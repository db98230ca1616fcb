use crate::domain::{Author, CatalogEntry, CopyCount, Isbn, SearchTerm, Title};
use crate::ports::inventory_store::{
    AddOutcome, InventoryStore as InventoryStoreTrait, LendOutcome, Result, ReturnOutcome,
    StoreError,
};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

/// Columns selected for every catalog query, in `map_row_to_entry` order.
const ENTRY_COLUMNS: &str = "isbn, title, author, copy_count, created_at, updated_at";

/// Listing order shared with the in-memory store: lowercased title by code
/// point, then ISBN. `COLLATE "C"` keeps it independent of the database locale.
const TITLE_ORDER: &str = r#"lower(title) COLLATE "C", isbn COLLATE "C""#;

/// SQLSTATE for `numeric_value_out_of_range` (integer overflow).
const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

/// Convert a PostgreSQL row into a CatalogEntry.
///
/// Rows are re-validated through the domain value objects; a row that
/// violates them means the table was written around this adapter and is
/// reported as a storage failure.
fn map_row_to_entry(row: &PgRow) -> Result<CatalogEntry> {
    let invalid = |e: crate::domain::ValidationError| StoreError::Unavailable(Box::new(e));

    let isbn: String = row.try_get("isbn").map_err(unavailable)?;
    let title: String = row.try_get("title").map_err(unavailable)?;
    let author: String = row.try_get("author").map_err(unavailable)?;
    let copy_count: i32 = row.try_get("copy_count").map_err(unavailable)?;

    Ok(CatalogEntry {
        isbn: Isbn::parse(&isbn).map_err(invalid)?,
        title: Title::parse(&title).map_err(invalid)?,
        author: Author::parse(&author).map_err(invalid)?,
        copy_count: CopyCount::try_from(copy_count).map_err(invalid)?,
        created_at: row.try_get("created_at").map_err(unavailable)?,
        updated_at: row.try_get("updated_at").map_err(unavailable)?,
    })
}

fn unavailable(err: sqlx::Error) -> StoreError {
    StoreError::Unavailable(Box::new(err))
}

/// Map errors from statements that adjust `copy_count` arithmetically.
fn map_adjust_error(isbn: &Isbn, err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.code().as_deref() == Some(NUMERIC_VALUE_OUT_OF_RANGE) {
            return StoreError::OutOfRange(isbn.clone());
        }
    }
    unavailable(err)
}

/// Escape LIKE metacharacters so the term matches literally.
fn like_pattern(term: &SearchTerm) -> String {
    let mut escaped = String::with_capacity(term.as_str().len() + 2);
    escaped.push('%');
    for c in term.as_str().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// PostgreSQL implementation of InventoryStore
///
/// Copy-count adjustments are single conditional `UPDATE ... RETURNING`
/// statements, so the row lock PostgreSQL takes for the update is the only
/// serialization needed. `available` is a generated column and is never
/// written by this adapter.
pub struct InventoryStore {
    pool: PgPool,
}

impl InventoryStore {
    /// Create a new InventoryStore from a PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_entries(&self, sql: &str) -> Result<Vec<CatalogEntry>> {
        let rows = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(unavailable)?;

        rows.iter().map(map_row_to_entry).collect()
    }
}

#[async_trait]
impl InventoryStoreTrait for InventoryStore {
    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<CatalogEntry>> {
        let row = sqlx::query(&format!(
            "SELECT {ENTRY_COLUMNS} FROM books WHERE isbn = $1"
        ))
        .bind(isbn.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        row.as_ref().map(map_row_to_entry).transpose()
    }

    async fn find_all(&self) -> Result<Vec<CatalogEntry>> {
        self.fetch_entries(&format!(
            "SELECT {ENTRY_COLUMNS} FROM books ORDER BY {TITLE_ORDER}"
        ))
        .await
    }

    /// Case-insensitive substring match on title or author.
    ///
    /// The `ILIKE` scans the table; only the ordering uses an index.
    async fn search(&self, term: &SearchTerm) -> Result<Vec<CatalogEntry>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {ENTRY_COLUMNS}
            FROM books
            WHERE title ILIKE $1 ESCAPE '\' OR author ILIKE $1 ESCAPE '\'
            ORDER BY {TITLE_ORDER}
            "#
        ))
        .bind(like_pattern(term))
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable)?;

        rows.iter().map(map_row_to_entry).collect()
    }

    async fn find_available(&self) -> Result<Vec<CatalogEntry>> {
        self.fetch_entries(&format!(
            "SELECT {ENTRY_COLUMNS} FROM books WHERE available ORDER BY {TITLE_ORDER}"
        ))
        .await
    }

    async fn find_unavailable(&self) -> Result<Vec<CatalogEntry>> {
        self.fetch_entries(&format!(
            "SELECT {ENTRY_COLUMNS} FROM books WHERE NOT available ORDER BY {TITLE_ORDER}"
        ))
        .await
    }

    async fn insert(&self, entry: &CatalogEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO books (isbn, title, author, copy_count, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(entry.isbn.as_str())
        .bind(entry.title.as_str())
        .bind(entry.author.as_str())
        .bind(entry.copy_count.value())
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                StoreError::DuplicateKey(entry.isbn.clone())
            }
            other => unavailable(other),
        })?;

        Ok(())
    }

    /// Single upsert; `xmax = 0` holds only for a freshly inserted row.
    async fn add_copies(&self, entry: &CatalogEntry) -> Result<AddOutcome> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO books (isbn, title, author, copy_count, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (isbn) DO UPDATE
            SET copy_count = books.copy_count + EXCLUDED.copy_count,
                updated_at = EXCLUDED.updated_at
            RETURNING {ENTRY_COLUMNS}, (xmax = 0) AS inserted
            "#
        ))
        .bind(entry.isbn.as_str())
        .bind(entry.title.as_str())
        .bind(entry.author.as_str())
        .bind(entry.copy_count.value())
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| map_adjust_error(&entry.isbn, err))?;

        let inserted: bool = row.try_get("inserted").map_err(unavailable)?;
        let stored = map_row_to_entry(&row)?;
        if inserted {
            Ok(AddOutcome::Created(stored))
        } else {
            Ok(AddOutcome::Merged(stored))
        }
    }

    async fn update(&self, entry: &CatalogEntry) -> Result<CatalogEntry> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE books
            SET title = $2, author = $3, copy_count = $4, updated_at = $5
            WHERE isbn = $1
            RETURNING {ENTRY_COLUMNS}
            "#
        ))
        .bind(entry.isbn.as_str())
        .bind(entry.title.as_str())
        .bind(entry.author.as_str())
        .bind(entry.copy_count.value())
        .bind(entry.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        match row {
            Some(row) => map_row_to_entry(&row),
            None => Err(StoreError::NotFound(entry.isbn.clone())),
        }
    }

    async fn remove(&self, isbn: &Isbn) -> Result<bool> {
        let result = sqlx::query("DELETE FROM books WHERE isbn = $1")
            .bind(isbn.as_str())
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, isbn: &Isbn) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)")
            .bind(isbn.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(unavailable)?;

        Ok(exists)
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await
            .map_err(unavailable)?;

        Ok(count.max(0) as u64)
    }

    async fn lend_copy(&self, isbn: &Isbn) -> Result<LendOutcome> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE books
            SET copy_count = copy_count - 1, updated_at = now()
            WHERE isbn = $1 AND copy_count > 0
            RETURNING {ENTRY_COLUMNS}
            "#
        ))
        .bind(isbn.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        if let Some(row) = row {
            return map_row_to_entry(&row).map(LendOutcome::Decremented);
        }

        // Nothing was updated: tell "no copies" apart from "no entry".
        if self.exists(isbn).await? {
            Ok(LendOutcome::OutOfStock)
        } else {
            Ok(LendOutcome::NotFound)
        }
    }

    async fn return_copy(&self, isbn: &Isbn) -> Result<ReturnOutcome> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE books
            SET copy_count = copy_count + 1, updated_at = now()
            WHERE isbn = $1
            RETURNING {ENTRY_COLUMNS}
            "#
        ))
        .bind(isbn.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| map_adjust_error(isbn, err))?;

        match row {
            Some(row) => map_row_to_entry(&row).map(ReturnOutcome::Incremented),
            None => Ok(ReturnOutcome::NotFound),
        }
    }

    async fn merge_copies(
        &self,
        isbn: &Isbn,
        additional: CopyCount,
    ) -> Result<Option<CatalogEntry>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE books
            SET copy_count = copy_count + $2, updated_at = now()
            WHERE isbn = $1
            RETURNING {ENTRY_COLUMNS}
            "#
        ))
        .bind(isbn.as_str())
        .bind(additional.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| map_adjust_error(isbn, err))?;

        row.as_ref().map(map_row_to_entry).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        let term = SearchTerm::parse("50%_off\\").unwrap();
        assert_eq!(like_pattern(&term), "%50\\%\\_off\\\\%");
    }

    #[test]
    fn test_like_pattern_plain_term() {
        let term = SearchTerm::parse("Tolkien").unwrap();
        assert_eq!(like_pattern(&term), "%Tolkien%");
    }
}
