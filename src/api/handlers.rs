use crate::application::{self, ServiceDependencies};
use crate::domain::BookId;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{
    auth::{CurrentAccount, OptionalToken},
    error::ApiError,
    types::{AccountResponse, BookResponse, CreateBookRequest, LoginQuery, RegisterRequest},
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

fn to_responses(books: Vec<application::BookDetails>) -> Json<Vec<BookResponse>> {
    Json(books.into_iter().map(BookResponse::from).collect())
}

// ============================================================================
// Catalog
// ============================================================================

/// GET /api/books - 全書籍を登録順に取得
pub async fn list_books(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BookResponse>>, ApiError> {
    let books = application::list_books(&state.service_deps).await?;
    Ok(to_responses(books))
}

/// GET /api/books/:id - 書籍をIDで取得
///
/// 見つからない場合は404を返す。
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<i64>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = application::get_book(&state.service_deps, BookId::new(book_id)).await?;
    Ok(Json(book.into()))
}

/// POST /api/books - 書籍を登録（所有者はログイン中のアカウント）
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
    Json(req): Json<CreateBookRequest>,
) -> Result<(StatusCode, Json<BookResponse>), ApiError> {
    let book = application::create_book(&state.service_deps, &account, &req.title).await?;
    Ok((StatusCode::CREATED, Json(book.into())))
}

/// DELETE /api/books/:id - 書籍を削除（所有者のみ、待機中のみ）
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
    Path(book_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    application::delete_book(&state.service_deps, &account, BookId::new(book_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/my-books - 自分が所有する書籍
pub async fn list_my_books(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<Vec<BookResponse>>, ApiError> {
    let books = application::list_owned_books(&state.service_deps, &account).await?;
    Ok(to_responses(books))
}

/// GET /api/my-borrowed-books - 自分が申請中・借用中の書籍
pub async fn list_my_borrowed_books(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<Vec<BookResponse>>, ApiError> {
    let books = application::list_borrowed_books(&state.service_deps, &account).await?;
    Ok(to_responses(books))
}

// ============================================================================
// Lending
// ============================================================================

/// GET /api/books/:id/request - 貸出を申請
///
/// 強制されるビジネスルール:
/// - ログインしていること（401）
/// - 書籍が存在すること（404）
/// - 自分の書籍でないこと（400）
/// - 書籍が待機中であること（400）
pub async fn request_borrow(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
    Path(book_id): Path<i64>,
) -> Result<Json<BookResponse>, ApiError> {
    let book =
        application::request_borrow(&state.service_deps, BookId::new(book_id), &account).await?;
    Ok(Json(book.into()))
}

/// GET /api/books/:id/cancel - 自分の申請を取り消す
pub async fn cancel_borrow_request(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
    Path(book_id): Path<i64>,
) -> Result<Json<BookResponse>, ApiError> {
    let book =
        application::cancel_borrow_request(&state.service_deps, BookId::new(book_id), &account)
            .await?;
    Ok(Json(book.into()))
}

/// GET /api/books/:id/accept - 申請を承認して貸し出す（所有者のみ）
pub async fn accept_borrow_request(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
    Path(book_id): Path<i64>,
) -> Result<Json<BookResponse>, ApiError> {
    let book =
        application::accept_borrow_request(&state.service_deps, BookId::new(book_id), &account)
            .await?;
    Ok(Json(book.into()))
}

/// GET /api/books/:id/reject - 申請を却下する（所有者のみ）
pub async fn reject_borrow_request(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
    Path(book_id): Path<i64>,
) -> Result<Json<BookResponse>, ApiError> {
    let book =
        application::reject_borrow_request(&state.service_deps, BookId::new(book_id), &account)
            .await?;
    Ok(Json(book.into()))
}

/// GET /api/books/:id/return - 返却を受け付ける（所有者のみ）
pub async fn mark_returned(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
    Path(book_id): Path<i64>,
) -> Result<Json<BookResponse>, ApiError> {
    let book =
        application::mark_returned(&state.service_deps, BookId::new(book_id), &account).await?;
    Ok(Json(book.into()))
}

// ============================================================================
// Accounts
// ============================================================================

/// GET /api/accounts/login?email=&password= - ログイン
///
/// 成功時はトークンそのものをテキストで返す。
pub async fn login(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LoginQuery>,
) -> Result<String, ApiError> {
    let token = application::login(&state.service_deps, &query.email, &query.password).await?;
    Ok(token.as_str().to_string())
}

/// GET /api/accounts/logout - ログアウト
///
/// トークンが無い・無効な場合も200を返す。
pub async fn logout(
    State(state): State<Arc<AppState>>,
    OptionalToken(token): OptionalToken,
) -> Result<StatusCode, ApiError> {
    application::logout(&state.service_deps, token.as_ref()).await?;
    Ok(StatusCode::OK)
}

/// POST /api/accounts/register - アカウント登録
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), ApiError> {
    let account =
        application::register(&state.service_deps, &req.email, &req.name, &req.password).await?;
    Ok((StatusCode::CREATED, Json(account.into())))
}
