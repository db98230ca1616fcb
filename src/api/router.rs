use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, add_book, count_books, delete_book, get_book, lend_book, list_available_books,
    list_books, list_unavailable_books, return_book, search_books, update_book,
};

/// Creates the API router with all catalog endpoints
///
/// Command endpoints:
/// - POST /books - Add copies (create or merge)
/// - PUT /books/:isbn - Replace an entry's fields
/// - DELETE /books/:isbn - Remove an entry
/// - POST /books/:isbn/lend - Lend one copy
/// - POST /books/:isbn/return - Return one copy
///
/// Query endpoints:
/// - GET /books, /books/available, /books/unavailable
/// - GET /books/search?q=term
/// - GET /books/count
/// - GET /books/:isbn
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Collection queries; static segments win over :isbn
        .route("/books", get(list_books).post(add_book))
        .route("/books/available", get(list_available_books))
        .route("/books/unavailable", get(list_unavailable_books))
        .route("/books/search", get(search_books))
        .route("/books/count", get(count_books))
        // Single entry
        .route(
            "/books/:isbn",
            get(get_book).put(update_book).delete(delete_book),
        )
        .route("/books/:isbn/lend", post(lend_book))
        .route("/books/:isbn/return", post(return_book))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
