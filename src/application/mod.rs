mod auth_service;
mod catalog_service;
mod dependencies;
mod errors;
mod lending_service;
mod seed;

pub use auth_service::{authenticate, login, logout, register};
pub use catalog_service::{
    BookDetails, create_book, delete_book, get_book, list_books, list_borrowed_books,
    list_owned_books,
};
pub use dependencies::ServiceDependencies;
pub use errors::{ApplicationError, Result};
pub use lending_service::{
    accept_borrow_request, cancel_borrow_request, mark_returned, reject_borrow_request,
    request_borrow,
};
pub use seed::{DEMO_ACCOUNTS, DEMO_BOOKS, DEMO_PASSWORD, seed_demo_data};
