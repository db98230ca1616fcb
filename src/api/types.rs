use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::inventory::AddedEntry;
use crate::domain::{CatalogEntry, commands::*};

/// Body of POST /books
#[derive(Debug, Serialize, Deserialize)]
pub struct AddBookRequest {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub copy_count: i64,
}

impl AddBookRequest {
    pub fn to_command(&self) -> AddCopies {
        AddCopies {
            title: self.title.clone(),
            author: self.author.clone(),
            isbn: self.isbn.clone(),
            copy_count: self.copy_count,
        }
    }
}

/// Body of PUT /books/:isbn
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateBookRequest {
    pub title: String,
    pub author: String,
    pub copy_count: i64,
}

impl UpdateBookRequest {
    pub fn to_command(&self, isbn: String) -> UpdateEntry {
        UpdateEntry {
            isbn,
            title: self.title.clone(),
            author: self.author.clone(),
            copy_count: self.copy_count,
        }
    }
}

/// Query parameters of GET /books/search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Missing is treated like an empty term and rejected by the service
    #[serde(default)]
    pub q: String,
}

/// One catalog entry as rendered to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookResponse {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub copy_count: i32,
    pub available: bool,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CatalogEntry> for BookResponse {
    fn from(entry: CatalogEntry) -> Self {
        Self {
            available: entry.is_available(),
            status: entry.stock_state().as_str().to_string(),
            isbn: entry.isbn.into(),
            title: entry.title.into(),
            author: entry.author.into(),
            copy_count: entry.copy_count.value(),
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

/// Payload of POST /books
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddedBookResponse {
    /// "created" or "merged"
    pub outcome: String,
    pub book: BookResponse,
}

impl From<AddedEntry> for AddedBookResponse {
    fn from(added: AddedEntry) -> Self {
        let outcome = match added {
            AddedEntry::Created(_) => "created",
            AddedEntry::Merged(_) => "merged",
        };
        Self {
            outcome: outcome.to_string(),
            book: BookResponse::from(added.into_entry()),
        }
    }
}

/// Payload of DELETE /books/:isbn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub removed: bool,
}

/// Payload of GET /books/count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

pub fn books_response(entries: Vec<CatalogEntry>) -> Vec<BookResponse> {
    entries.into_iter().map(BookResponse::from).collect()
}
