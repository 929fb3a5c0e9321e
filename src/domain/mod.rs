pub mod account;
pub mod book;
pub mod commands;
pub mod errors;
pub mod events;
pub mod session;
pub mod value_objects;

pub use account::{Account, NewAccount};
pub use book::{Book, BookStatus, NewBook};
pub use errors::*;
pub use events::*;
pub use session::{ExpiryOutOfRange, Session};
pub use value_objects::*;
