pub mod account_repository;
pub mod book_repository;

// パブリックに型を再エクスポート
pub use account_repository::AccountRepository as PostgresAccountRepository;
pub use book_repository::BookRepository as PostgresBookRepository;

use sqlx::{PgPool, postgres::PgPoolOptions};

/// コネクションプールを作成し、マイグレーションを適用する
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
