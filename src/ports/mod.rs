pub mod account_repository;
pub mod book_repository;
pub mod notification_service;
pub mod password_hasher;
pub mod session_store;

pub use account_repository::AccountRepository;
pub use book_repository::BookRepository;
pub use notification_service::NotificationService;
pub use password_hasher::PasswordHasher;
pub use session_store::SessionStore;
