use crate::application::ApplicationError;
use crate::domain::BorrowError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub struct ApiError(pub ApplicationError);

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    /// ステータスコードとエラーコード
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            // 401 Unauthorized - 認証が必要
            ApplicationError::Unauthenticated => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApplicationError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS")
            }

            // 404 Not Found - リクエストされたリソースが存在しない
            ApplicationError::BookNotFound(_) => (StatusCode::NOT_FOUND, "BOOK_NOT_FOUND"),
            ApplicationError::AccountNotFound(_) => (StatusCode::NOT_FOUND, "ACCOUNT_NOT_FOUND"),

            // 400 Bad Request - 貸出ルール違反・入力不正
            ApplicationError::Borrow(BorrowError::SelfLoan) => {
                (StatusCode::BAD_REQUEST, "SELF_LOAN")
            }
            ApplicationError::Borrow(e) if e.is_status_error() => {
                (StatusCode::BAD_REQUEST, "BOOK_STATUS_WRONG")
            }
            ApplicationError::Borrow(_) => (StatusCode::BAD_REQUEST, "BOOK_OWNERSHIP_WRONG"),
            ApplicationError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),

            // 409 Conflict
            ApplicationError::EmailAlreadyRegistered(_) => {
                (StatusCode::CONFLICT, "EMAIL_ALREADY_REGISTERED")
            }
            ApplicationError::ConcurrentModification(_) => {
                (StatusCode::CONFLICT, "CONCURRENT_MODIFICATION")
            }

            // 500 Internal Server Error - システム障害
            ApplicationError::RepositoryError(_)
            | ApplicationError::SessionStoreError(_)
            | ApplicationError::PasswordHashError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if status.is_server_error() {
            // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
            tracing::error!(error = ?self.0, "{}", self.0);
            "An unexpected error occurred".to_string()
        } else {
            self.0.to_string()
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}
