use crate::domain::{AccountId, Book, BookId, NewBook};
use crate::ports::book_repository::{BookRepository as BookRepositoryTrait, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Catalog {
    books: BTreeMap<BookId, Book>,
    last_id: i64,
}

/// BookRepositoryのインメモリ実装
///
/// BTreeMapでID順を保持する。データベース未設定時の実行とテストで使用。
pub struct BookRepository {
    catalog: RwLock<Catalog>,
}

impl BookRepository {
    pub fn new() -> Self {
        Self {
            catalog: RwLock::new(Catalog::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Catalog>> {
        self.catalog
            .read()
            .map_err(|_| "book catalog lock poisoned".into())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Catalog>> {
        self.catalog
            .write()
            .map_err(|_| "book catalog lock poisoned".into())
    }

    fn collect(&self, filter: impl Fn(&Book) -> bool) -> Result<Vec<Book>> {
        Ok(self
            .read()?
            .books
            .values()
            .filter(|book| filter(book))
            .cloned()
            .collect())
    }
}

impl Default for BookRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookRepositoryTrait for BookRepository {
    async fn list_all(&self) -> Result<Vec<Book>> {
        self.collect(|_| true)
    }

    async fn get_by_id(&self, book_id: BookId) -> Result<Option<Book>> {
        Ok(self.read()?.books.get(&book_id).cloned())
    }

    async fn find_by_owner(&self, owner: AccountId) -> Result<Vec<Book>> {
        self.collect(|book| book.owner == owner)
    }

    async fn find_by_borrower(&self, borrower: AccountId) -> Result<Vec<Book>> {
        self.collect(|book| book.status.borrower() == Some(borrower))
    }

    async fn insert(&self, book: NewBook) -> Result<Book> {
        let mut catalog = self.write()?;
        catalog.last_id += 1;

        let book = book.into_book(BookId::new(catalog.last_id));
        catalog.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn update(&self, book: &Book, expected_version: u32) -> Result<bool> {
        let mut catalog = self.write()?;
        match catalog.books.get_mut(&book.id) {
            Some(stored) if stored.version == expected_version => {
                *stored = book.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, book_id: BookId, expected_version: u32) -> Result<bool> {
        let mut catalog = self.write()?;
        match catalog.books.get(&book_id) {
            Some(stored) if stored.version == expected_version => {
                catalog.books.remove(&book_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
