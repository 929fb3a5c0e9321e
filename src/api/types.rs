use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::BookDetails;
use crate::domain::Account;

/// ログインのクエリパラメータ（GET /api/accounts/login?email=&password=）
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// アカウント登録リクエスト（POST /api/accounts/register）
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// 書籍登録リクエスト（POST /api/books）
#[derive(Debug, Deserialize)]
pub struct CreateBookRequest {
    pub title: String,
}

/// アカウントの公開情報（パスワードハッシュは含めない）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id.value(),
            name: account.name,
            email: account.email.into(),
        }
    }
}

/// 書籍レスポンス（GET /api/books, GET /api/books/:id など）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookResponse {
    pub id: i64,
    pub title: String,
    /// idle / requested / out
    pub status: String,
    pub owner: AccountResponse,
    pub borrower: Option<AccountResponse>,
    /// 現在の状態に入った時刻（申請日時・貸出日時）
    pub status_changed_at: Option<DateTime<Utc>>,
}

impl From<BookDetails> for BookResponse {
    fn from(details: BookDetails) -> Self {
        let BookDetails {
            book,
            owner,
            borrower,
        } = details;

        Self {
            id: book.id.value(),
            status: book.status.as_str().to_string(),
            status_changed_at: book.status.changed_at(),
            title: book.title.into(),
            owner: owner.into(),
            borrower: borrower.map(AccountResponse::from),
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}
