use serde::{Deserialize, Serialize};

/// Command: add copies of a book, creating the entry on first sight of the ISBN.
///
/// Fields are raw input; the service validates them before anything
/// reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddCopies {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub copy_count: i64,
}

/// Command: replace title, author and copy count of an existing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateEntry {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub copy_count: i64,
}
