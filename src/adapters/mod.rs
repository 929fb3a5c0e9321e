pub mod argon2_password_hasher;
pub mod memory;
pub mod postgres;
