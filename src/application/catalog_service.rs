use crate::domain::{Account, AccountId, Book, BookId, NewBook, Title, book};
use chrono::Utc;
use futures::future::try_join_all;
use std::collections::{BTreeSet, HashMap};

use super::dependencies::ServiceDependencies;
use super::errors::{ApplicationError, Result};

/// 所有者・借り手を解決済みの書籍
///
/// API層はこの形でレスポンスを組み立てる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDetails {
    pub book: Book,
    pub owner: Account,
    pub borrower: Option<Account>,
}

/// 書籍群が参照するアカウントをまとめて取得し、BookDetailsに変換する
///
/// 同じアカウントは1回だけ取得する。参照先が存在しない場合は `AccountNotFound`。
pub(super) async fn resolve_details(
    deps: &ServiceDependencies,
    books: Vec<Book>,
) -> Result<Vec<BookDetails>> {
    let account_ids: BTreeSet<AccountId> = books
        .iter()
        .flat_map(|b| std::iter::once(b.owner).chain(b.status.borrower()))
        .collect();

    let accounts = try_join_all(
        account_ids
            .iter()
            .map(|id| deps.account_repository.get_by_id(*id)),
    )
    .await
    .map_err(ApplicationError::RepositoryError)?;

    let accounts: HashMap<AccountId, Account> = accounts
        .into_iter()
        .flatten()
        .map(|account| (account.id, account))
        .collect();

    let lookup = |id: AccountId| {
        accounts
            .get(&id)
            .cloned()
            .ok_or(ApplicationError::AccountNotFound(id))
    };

    books
        .into_iter()
        .map(|book| -> Result<BookDetails> {
            let owner = lookup(book.owner)?;
            let borrower = book.status.borrower().map(&lookup).transpose()?;
            Ok(BookDetails {
                book,
                owner,
                borrower,
            })
        })
        .collect()
}

pub(super) async fn load_book(deps: &ServiceDependencies, book_id: BookId) -> Result<Book> {
    deps.book_repository
        .get_by_id(book_id)
        .await
        .map_err(ApplicationError::RepositoryError)?
        .ok_or(ApplicationError::BookNotFound(book_id))
}

pub(super) async fn describe(deps: &ServiceDependencies, book: Book) -> Result<BookDetails> {
    let mut details = resolve_details(deps, vec![book]).await?;
    // 1冊渡して1冊返る
    details
        .pop()
        .ok_or_else(|| ApplicationError::RepositoryError("book details went missing".into()))
}

/// 全書籍を登録順に取得する
pub async fn list_books(deps: &ServiceDependencies) -> Result<Vec<BookDetails>> {
    let books = deps
        .book_repository
        .list_all()
        .await
        .map_err(ApplicationError::RepositoryError)?;

    resolve_details(deps, books).await
}

/// IDで書籍を取得する
pub async fn get_book(deps: &ServiceDependencies, book_id: BookId) -> Result<BookDetails> {
    let book = load_book(deps, book_id).await?;
    describe(deps, book).await
}

/// 自分が所有する書籍を取得する
pub async fn list_owned_books(
    deps: &ServiceDependencies,
    account: &Account,
) -> Result<Vec<BookDetails>> {
    let books = deps
        .book_repository
        .find_by_owner(account.id)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    resolve_details(deps, books).await
}

/// 自分が申請中・借用中の書籍を取得する
pub async fn list_borrowed_books(
    deps: &ServiceDependencies,
    account: &Account,
) -> Result<Vec<BookDetails>> {
    let books = deps
        .book_repository
        .find_by_borrower(account.id)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    resolve_details(deps, books).await
}

/// 書籍を登録する（所有者はログイン中のアカウント）
#[tracing::instrument(skip(deps, owner), fields(owner_id = %owner.id))]
pub async fn create_book(
    deps: &ServiceDependencies,
    owner: &Account,
    title: &str,
) -> Result<BookDetails> {
    let title = Title::parse(title)?;

    let book = deps
        .book_repository
        .insert(NewBook {
            title,
            owner: owner.id,
            created_at: Utc::now(),
        })
        .await
        .map_err(ApplicationError::RepositoryError)?;

    tracing::info!(book_id = %book.id, "Book created");

    Ok(BookDetails {
        book,
        owner: owner.clone(),
        borrower: None,
    })
}

/// 書籍を削除する
///
/// ビジネスルール：
/// - 所有者のみ
/// - 待機中（貸出申請・貸出が無い）の書籍のみ
#[tracing::instrument(skip(deps, actor), fields(actor_id = %actor.id))]
pub async fn delete_book(deps: &ServiceDependencies, actor: &Account, book_id: BookId) -> Result<()> {
    let book = load_book(deps, book_id).await?;
    book::ensure_deletable(&book, actor.id)?;

    let deleted = deps
        .book_repository
        .delete(book_id, book.version)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    if !deleted {
        return Err(ApplicationError::ConcurrentModification(book_id));
    }

    tracing::info!(%book_id, "Book deleted");
    Ok(())
}
