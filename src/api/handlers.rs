use crate::application::inventory::{
    self as inventory, AddedEntry, OperationResult, ServiceDependencies,
};
use crate::domain::CatalogEntry;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{
    error::ApiResponse,
    types::{
        AddBookRequest, AddedBookResponse, BookResponse, CountResponse, DeletedResponse,
        SearchQuery, UpdateBookRequest, books_response,
    },
};

// ============================================================================
// State
// ============================================================================

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

// ============================================================================
// Command handlers
// ============================================================================

/// POST /books - add copies of a book
///
/// Creates the entry for an unknown ISBN (201) or merges the copies into
/// the existing entry (200).
pub async fn add_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddBookRequest>,
) -> ApiResponse<AddedBookResponse> {
    let result = inventory::add_or_merge(&state.service_deps, req.to_command()).await;

    let success_status = match result.payload() {
        Some(AddedEntry::Created(_)) => StatusCode::CREATED,
        _ => StatusCode::OK,
    };

    ApiResponse::new(result.map_payload(AddedBookResponse::from))
        .with_success_status(success_status)
}

/// PUT /books/:isbn - replace title, author and copy count
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    Path(isbn): Path<String>,
    Json(req): Json<UpdateBookRequest>,
) -> ApiResponse<BookResponse> {
    inventory::update(&state.service_deps, req.to_command(isbn))
        .await
        .map_payload(BookResponse::from)
        .into()
}

/// DELETE /books/:isbn - remove an entry; unknown ISBNs succeed with `removed: false`
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    Path(isbn): Path<String>,
) -> ApiResponse<DeletedResponse> {
    inventory::delete(&state.service_deps, &isbn)
        .await
        .map_payload(|removed| DeletedResponse { removed })
        .into()
}

/// POST /books/:isbn/lend - lend one copy
pub async fn lend_book(
    State(state): State<Arc<AppState>>,
    Path(isbn): Path<String>,
) -> ApiResponse<BookResponse> {
    inventory::lend(&state.service_deps, &isbn)
        .await
        .map_payload(BookResponse::from)
        .into()
}

/// POST /books/:isbn/return - take one copy back
pub async fn return_book(
    State(state): State<Arc<AppState>>,
    Path(isbn): Path<String>,
) -> ApiResponse<BookResponse> {
    inventory::return_copy(&state.service_deps, &isbn)
        .await
        .map_payload(BookResponse::from)
        .into()
}

// ============================================================================
// Query handlers
// ============================================================================

/// GET /books/:isbn
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(isbn): Path<String>,
) -> ApiResponse<BookResponse> {
    inventory::find_entry(&state.service_deps, &isbn)
        .await
        .map_payload(BookResponse::from)
        .into()
}

/// GET /books - every entry ordered by title
pub async fn list_books(State(state): State<Arc<AppState>>) -> ApiResponse<Vec<BookResponse>> {
    books(inventory::list_all(&state.service_deps).await)
}

/// GET /books/available
pub async fn list_available_books(
    State(state): State<Arc<AppState>>,
) -> ApiResponse<Vec<BookResponse>> {
    books(inventory::list_available(&state.service_deps).await)
}

/// GET /books/unavailable
pub async fn list_unavailable_books(
    State(state): State<Arc<AppState>>,
) -> ApiResponse<Vec<BookResponse>> {
    books(inventory::list_unavailable(&state.service_deps).await)
}

/// GET /books/search?q=term - case-insensitive title/author search
pub async fn search_books(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> ApiResponse<Vec<BookResponse>> {
    books(inventory::search(&state.service_deps, &query.q).await)
}

/// GET /books/count - number of distinct ISBNs
pub async fn count_books(State(state): State<Arc<AppState>>) -> ApiResponse<CountResponse> {
    inventory::catalog_size(&state.service_deps)
        .await
        .map_payload(|count| CountResponse { count })
        .into()
}

fn books(result: OperationResult<Vec<CatalogEntry>>) -> ApiResponse<Vec<BookResponse>> {
    result.map_payload(books_response).into()
}
