use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, accept_borrow_request, cancel_borrow_request, create_book, delete_book, get_book,
    list_books, list_my_books, list_my_borrowed_books, login, logout, mark_returned, register,
    reject_borrow_request, request_borrow,
};

/// Creates the API router with all book lending endpoints
///
/// Catalog:
/// - GET /api/books, POST /api/books
/// - GET /api/books/:id, DELETE /api/books/:id
/// - GET /api/my-books, GET /api/my-borrowed-books
///
/// Lending (state transitions, token required):
/// - GET /api/books/:id/{request,cancel,accept,reject,return}
///
/// Accounts:
/// - GET /api/accounts/login, GET /api/accounts/logout
/// - POST /api/accounts/register
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Catalog
        .route("/api/books", get(list_books).post(create_book))
        .route("/api/books/:id", get(get_book).delete(delete_book))
        .route("/api/my-books", get(list_my_books))
        .route("/api/my-borrowed-books", get(list_my_borrowed_books))
        // Lending
        .route("/api/books/:id/request", get(request_borrow))
        .route("/api/books/:id/cancel", get(cancel_borrow_request))
        .route("/api/books/:id/accept", get(accept_borrow_request))
        .route("/api/books/:id/reject", get(reject_borrow_request))
        .route("/api/books/:id/return", get(mark_returned))
        // Accounts
        .route("/api/accounts/login", get(login))
        .route("/api/accounts/logout", get(logout))
        .route("/api/accounts/register", post(register))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
