use crate::domain::{AccountId, BookId, BorrowError, Email, ValueError};
use thiserror::Error;

/// アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// トークンが無い・不正・期限切れ
    #[error("Authentication required")]
    Unauthenticated,

    /// ログイン時のメールアドレスまたはパスワードの不一致
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// 書籍が見つからない
    #[error("Book {0} not found")]
    BookNotFound(BookId),

    /// アカウントが見つからない
    #[error("Account {0} not found")]
    AccountNotFound(AccountId),

    /// 貸出ワークフローのルール違反
    #[error(transparent)]
    Borrow(#[from] BorrowError),

    /// 入力値の検証エラー
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// メールアドレスが登録済み
    #[error("Email {0} is already registered")]
    EmailAlreadyRegistered(Email),

    /// 他のリクエストが先に書籍を更新した
    #[error("Book {0} was modified concurrently")]
    ConcurrentModification(BookId),

    /// リポジトリのエラー
    #[error("Repository error")]
    RepositoryError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// SessionStoreのエラー
    #[error("Session store error")]
    SessionStoreError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// パスワードハッシュ処理のエラー
    #[error("Password hashing error")]
    PasswordHashError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<ValueError> for ApplicationError {
    fn from(err: ValueError) -> Self {
        ApplicationError::InvalidInput(err.to_string())
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, ApplicationError>;
