use crate::domain::{AccountId, Book, BookId, BookStatus, NewBook, Title};
use crate::ports::book_repository::{BookRepository as BookRepositoryTrait, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};

const SELECT_BOOKS: &str = r#"
    SELECT
        id,
        title,
        owner_id,
        status,
        borrower_id,
        status_changed_at,
        version,
        created_at,
        updated_at
    FROM books
"#;

fn invalid_data(message: String) -> Box<dyn std::error::Error + Send + Sync> {
    Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message))
}

/// status / borrower_id / status_changed_at の3列からBookStatusを復元する
fn map_status(
    status: &str,
    borrower_id: Option<i64>,
    changed_at: Option<DateTime<Utc>>,
) -> Result<BookStatus> {
    match (status, borrower_id, changed_at) {
        ("idle", None, None) => Ok(BookStatus::Idle),
        ("requested", Some(borrower), Some(requested_at)) => Ok(BookStatus::Requested {
            borrower: AccountId::new(borrower),
            requested_at,
        }),
        ("out", Some(borrower), Some(borrowed_at)) => Ok(BookStatus::Out {
            borrower: AccountId::new(borrower),
            borrowed_at,
        }),
        (status, borrower_id, changed_at) => Err(invalid_data(format!(
            "inconsistent book status: status={}, borrower_id={:?}, status_changed_at={:?}",
            status, borrower_id, changed_at
        ))),
    }
}

/// PostgreSQLの行データをBookに変換する
fn map_row_to_book(row: &PgRow) -> Result<Book> {
    let version_i32: i32 = row.try_get("version")?;
    let version = u32::try_from(version_i32)
        .map_err(|_| invalid_data(format!("version out of range: {}", version_i32)))?;

    let title: String = row.try_get("title")?;
    let title = Title::parse(&title).map_err(|e| invalid_data(e.to_string()))?;

    let status: &str = row.try_get("status")?;
    let status = map_status(
        status,
        row.try_get("borrower_id")?,
        row.try_get("status_changed_at")?,
    )?;

    Ok(Book {
        id: BookId::new(row.try_get("id")?),
        title,
        owner: AccountId::new(row.try_get("owner_id")?),
        status,
        version,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// BookRepositoryのPostgreSQL実装
pub struct BookRepository {
    pool: PgPool,
}

impl BookRepository {
    /// PostgreSQLコネクションプールから新しいBookRepositoryを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_books(&self, sql: &str, account_id: Option<i64>) -> Result<Vec<Book>> {
        let mut query = sqlx::query(sql);
        if let Some(account_id) = account_id {
            query = query.bind(account_id);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(map_row_to_book).collect()
    }
}

#[async_trait]
impl BookRepositoryTrait for BookRepository {
    async fn list_all(&self) -> Result<Vec<Book>> {
        self.fetch_books(&format!("{} ORDER BY id", SELECT_BOOKS), None)
            .await
    }

    async fn get_by_id(&self, book_id: BookId) -> Result<Option<Book>> {
        let row = sqlx::query(&format!("{} WHERE id = $1", SELECT_BOOKS))
            .bind(book_id.value())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_row_to_book).transpose()
    }

    async fn find_by_owner(&self, owner: AccountId) -> Result<Vec<Book>> {
        self.fetch_books(
            &format!("{} WHERE owner_id = $1 ORDER BY id", SELECT_BOOKS),
            Some(owner.value()),
        )
        .await
    }

    async fn find_by_borrower(&self, borrower: AccountId) -> Result<Vec<Book>> {
        // borrower_id の部分インデックスを使用
        self.fetch_books(
            &format!("{} WHERE borrower_id = $1 ORDER BY id", SELECT_BOOKS),
            Some(borrower.value()),
        )
        .await
    }

    async fn insert(&self, book: NewBook) -> Result<Book> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO books (title, owner_id, status, version, created_at, updated_at)
            VALUES ($1, $2, 'idle', 0, $3, $3)
            RETURNING id
            "#,
        )
        .bind(book.title.as_str())
        .bind(book.owner.value())
        .bind(book.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(book.into_book(BookId::new(id)))
    }

    /// バージョン一致時のみ更新する
    ///
    /// WHERE句でバージョンを比較するため、同時更新のうち1件だけが成功する。
    async fn update(&self, book: &Book, expected_version: u32) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET
                title = $2,
                status = $3,
                borrower_id = $4,
                status_changed_at = $5,
                version = $6,
                updated_at = $7
            WHERE id = $1 AND version = $8
            "#,
        )
        .bind(book.id.value())
        .bind(book.title.as_str())
        .bind(book.status.as_str())
        .bind(book.status.borrower().map(|b| b.value()))
        .bind(book.status.changed_at())
        .bind(book.version as i32)
        .bind(book.updated_at)
        .bind(expected_version as i32)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, book_id: BookId, expected_version: u32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1 AND version = $2")
            .bind(book_id.value())
            .bind(expected_version as i32)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_status_accepts_consistent_columns() {
        let now = Utc::now();
        assert_eq!(map_status("idle", None, None).unwrap(), BookStatus::Idle);
        assert_eq!(
            map_status("out", Some(2), Some(now)).unwrap(),
            BookStatus::Out {
                borrower: AccountId::new(2),
                borrowed_at: now
            }
        );
    }

    #[test]
    fn test_map_status_rejects_inconsistent_columns() {
        assert!(map_status("requested", None, None).is_err());
        assert!(map_status("idle", Some(2), None).is_err());
        assert!(map_status("lost", None, None).is_err());
    }
}
