use axum::http::StatusCode;
use book_lending::api::types::*;
use book_lending::domain::{AccountId, LendingEvent};
use serde_json::json;

mod common;

use common::{CALVIN_EMAIL, DAVID_EMAIL, get, login, parse, seeded_app, send};

// ============================================================================
// E2Eテスト: カタログ
// ============================================================================

#[tokio::test]
async fn test_list_books_returns_seeded_catalog_in_order() {
    let app = seeded_app().await;

    let (status, body) = get(&app.router, "/api/books", None).await;
    assert_eq!(status, StatusCode::OK);

    let books: Vec<BookResponse> = parse(&body);
    assert_eq!(books.len(), 3);
    assert_eq!(books[0].title, "Big Data日知录");
    assert_eq!(books[0].owner.name, "Calvin");
    assert_eq!(books[0].status, "idle");
    assert!(books[0].borrower.is_none());

    let ids: Vec<i64> = books.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_get_book_matches_first_listed_book() {
    let app = seeded_app().await;

    let (status, body) = get(&app.router, "/api/books/1", None).await;
    assert_eq!(status, StatusCode::OK);
    let book: BookResponse = parse(&body);

    let (_, body) = get(&app.router, "/api/books", None).await;
    let books: Vec<BookResponse> = parse(&body);

    assert_eq!(book, books[0]);
    assert_eq!(book.title, "Big Data日知录");
    assert_eq!(book.owner.name, "Calvin");
}

#[tokio::test]
async fn test_get_unknown_book_returns_404() {
    let app = seeded_app().await;

    let (status, body) = get(&app.router, "/api/books/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let error: ErrorResponse = parse(&body);
    assert_eq!(error.code, "BOOK_NOT_FOUND");
}

#[tokio::test]
async fn test_book_json_never_exposes_password_hash() {
    let app = seeded_app().await;

    let (_, body) = get(&app.router, "/api/books/1", None).await;
    let raw = String::from_utf8(body).unwrap();
    assert!(!raw.contains("password"));
    assert!(!raw.contains("argon2"));
}

// ============================================================================
// E2Eテスト: 認証
// ============================================================================

#[tokio::test]
async fn test_login_then_request_then_logout_invalidates_token() {
    let app = seeded_app().await;

    // Step 1: ログイン
    let token = login(&app.router, CALVIN_EMAIL).await;
    assert!(!token.is_empty());

    // Step 2: 他人（David）の書籍に貸出申請
    let (status, body) = get(&app.router, "/api/books/3/request", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let book: BookResponse = parse(&body);
    assert_eq!(book.status, "requested");
    assert_eq!(book.borrower.map(|b| b.name), Some("Calvin".to_string()));

    // Step 3: ログアウト
    let (status, _) = get(&app.router, "/api/accounts/logout", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);

    // Step 4: 同じトークンはもう使えない
    let (status, _) = get(&app.router, "/api/books/2/request", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = get(&app.router, "/api/my-books", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_request_without_valid_token_is_unauthorized() {
    let app = seeded_app().await;

    // トークン未設定
    let (status, body) = get(&app.router, "/api/books/1/request", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let error: ErrorResponse = parse(&body);
    assert_eq!(error.code, "UNAUTHORIZED");

    // 不正なトークン
    let (status, _) = get(&app.router, "/api/books/1/request", Some("abc")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // 存在しない書籍でも、認証エラーが優先される
    let (status, _) = get(&app.router, "/api/books/99/request", Some("abc")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_self_loan_is_rejected_with_400() {
    let app = seeded_app().await;
    let token = login(&app.router, CALVIN_EMAIL).await;

    // 自分の書籍を借りようとする
    let (status, body) = get(&app.router, "/api/books/1/request", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let error: ErrorResponse = parse(&body);
    assert_eq!(error.code, "SELF_LOAN");

    // 状態は変わっていない
    let (_, body) = get(&app.router, "/api/books/1", None).await;
    let book: BookResponse = parse(&body);
    assert_eq!(book.status, "idle");
}

#[tokio::test]
async fn test_login_with_bad_credentials_is_unauthorized() {
    let app = seeded_app().await;

    for uri in [
        "/api/accounts/login?email=calvin.xiao@vipshop.com&password=wrong",
        "/api/accounts/login?email=nobody@vipshop.com&password=springside",
        "/api/accounts/login?email=not-an-email&password=springside",
        "/api/accounts/login",
    ] {
        let (status, body) = get(&app.router, uri, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        let error: ErrorResponse = parse(&body);
        assert_eq!(error.code, "INVALID_CREDENTIALS");
    }

    assert!(app.sessions.is_empty());
}

#[tokio::test]
async fn test_login_email_is_case_insensitive() {
    let app = seeded_app().await;
    let token = login(&app.router, "Calvin.Xiao@VIPSHOP.com").await;

    let (status, _) = get(&app.router, "/api/my-books", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let app = seeded_app().await;
    let token = login(&app.router, CALVIN_EMAIL).await;

    let (status, _) = get(&app.router, "/api/accounts/logout", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);

    // 2回目、不正トークン、トークン無しもすべて200
    let (status, _) = get(&app.router, "/api/accounts/logout", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get(&app.router, "/api/accounts/logout", Some("abc")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get(&app.router, "/api/accounts/logout", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_each_login_issues_an_independent_token() {
    let app = seeded_app().await;
    let first = login(&app.router, CALVIN_EMAIL).await;
    let second = login(&app.router, CALVIN_EMAIL).await;
    assert_ne!(first, second);

    get(&app.router, "/api/accounts/logout", Some(&first)).await;

    let (status, _) = get(&app.router, "/api/my-books", Some(&second)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_bearer_authorization_header_is_accepted() {
    let app = seeded_app().await;
    let token = login(&app.router, CALVIN_EMAIL).await;

    let request = axum::http::Request::builder()
        .uri("/api/my-books")
        .header("authorization", format!("Bearer {}", token))
        .body(axum::body::Body::empty())
        .unwrap();

    use tower::ServiceExt;
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// E2Eテスト: 貸出ワークフロー
// ============================================================================

#[tokio::test]
async fn test_full_lending_cycle() {
    let app = seeded_app().await;
    let calvin = login(&app.router, CALVIN_EMAIL).await;
    let david = login(&app.router, DAVID_EMAIL).await;

    // Calvin が David の書籍（3）を申請
    let (status, _) = get(&app.router, "/api/books/3/request", Some(&calvin)).await;
    assert_eq!(status, StatusCode::OK);

    // Calvin の借用一覧に載る
    let (status, body) = get(&app.router, "/api/my-borrowed-books", Some(&calvin)).await;
    assert_eq!(status, StatusCode::OK);
    let borrowed: Vec<BookResponse> = parse(&body);
    assert_eq!(borrowed.len(), 1);
    assert_eq!(borrowed[0].id, 3);

    // 申請者は承認できない
    let (status, body) = get(&app.router, "/api/books/3/accept", Some(&calvin)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = parse(&body);
    assert_eq!(error.code, "BOOK_OWNERSHIP_WRONG");

    // David が承認 → 貸出中
    let (status, body) = get(&app.router, "/api/books/3/accept", Some(&david)).await;
    assert_eq!(status, StatusCode::OK);
    let book: BookResponse = parse(&body);
    assert_eq!(book.status, "out");
    assert!(book.status_changed_at.is_some());

    // 貸出中は他の人も申請できない
    let (status, body) = get(&app.router, "/api/books/3/request", Some(&calvin)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = parse(&body);
    assert_eq!(error.code, "BOOK_STATUS_WRONG");

    // David が返却を受け付ける → 待機中
    let (status, body) = get(&app.router, "/api/books/3/return", Some(&david)).await;
    assert_eq!(status, StatusCode::OK);
    let book: BookResponse = parse(&body);
    assert_eq!(book.status, "idle");
    assert!(book.borrower.is_none());

    // 通知: 申請は所有者へ、承認・返却は借り手へ
    let sent = app.notifications.sent();
    let summary: Vec<(i64, &str)> = sent
        .iter()
        .map(|(recipient, event)| (recipient.value(), event.name()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (2, "BorrowRequested"),
            (1, "BorrowRequestAccepted"),
            (1, "BookReturned"),
        ]
    );
    assert!(matches!(
        &sent[0].1,
        LendingEvent::BorrowRequested(d) if d.title.as_str() == "Java并发编程实战"
    ));
}

#[tokio::test]
async fn test_reject_and_cancel_return_book_to_idle() {
    let app = seeded_app().await;
    let calvin = login(&app.router, CALVIN_EMAIL).await;
    let david = login(&app.router, DAVID_EMAIL).await;

    // David が Calvin の書籍（2）を申請 → Calvin が却下
    get(&app.router, "/api/books/2/request", Some(&david)).await;
    let (status, body) = get(&app.router, "/api/books/2/reject", Some(&calvin)).await;
    assert_eq!(status, StatusCode::OK);
    let book: BookResponse = parse(&body);
    assert_eq!(book.status, "idle");

    // 再申請 → David 自身が取り消し
    let (status, _) = get(&app.router, "/api/books/2/request", Some(&david)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get(&app.router, "/api/books/2/cancel", Some(&calvin)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, body) = get(&app.router, "/api/books/2/cancel", Some(&david)).await;
    assert_eq!(status, StatusCode::OK);
    let book: BookResponse = parse(&body);
    assert_eq!(book.status, "idle");

    // 申請の無い書籍は取り消せない
    let (status, body) = get(&app.router, "/api/books/2/cancel", Some(&david)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = parse(&body);
    assert_eq!(error.code, "BOOK_STATUS_WRONG");

    let recipients: Vec<AccountId> = app
        .notifications
        .sent()
        .into_iter()
        .map(|(recipient, _)| recipient)
        .collect();
    assert_eq!(
        recipients,
        vec![
            AccountId::new(1), // 申請
            AccountId::new(2), // 却下
            AccountId::new(1), // 申請
            AccountId::new(1), // 取り消し
        ]
    );
}

#[tokio::test]
async fn test_request_unknown_book_with_valid_token_returns_404() {
    let app = seeded_app().await;
    let token = login(&app.router, CALVIN_EMAIL).await;

    let (status, _) = get(&app.router, "/api/books/42/request", Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// E2Eテスト: アカウント登録・書籍登録
// ============================================================================

#[tokio::test]
async fn test_register_create_and_delete_book() {
    let app = seeded_app().await;

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/accounts/register",
        None,
        Some(json!({ "email": "Alice@Example.com", "name": "Alice", "password": "wonderland" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let account: AccountResponse = parse(&body);
    assert_eq!(account.email, "alice@example.com");

    let (status, body) = get(
        &app.router,
        "/api/accounts/login?email=alice@example.com&password=wonderland",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = String::from_utf8(body).unwrap();

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/books",
        Some(&token),
        Some(json!({ "title": "  Rust编程之道 " })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let book: BookResponse = parse(&body);
    assert_eq!(book.id, 4);
    assert_eq!(book.title, "Rust编程之道");
    assert_eq!(book.owner.name, "Alice");

    let (_, body) = get(&app.router, "/api/my-books", Some(&token)).await;
    let mine: Vec<BookResponse> = parse(&body);
    assert_eq!(mine.len(), 1);

    // 他人は削除できない
    let calvin = login(&app.router, CALVIN_EMAIL).await;
    let (status, _) = send(&app.router, "DELETE", "/api/books/4", Some(&calvin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app.router, "DELETE", "/api/books/4", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = get(&app.router, "/api/books/4", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_register_rejects_duplicate_and_invalid_input() {
    let app = seeded_app().await;

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/accounts/register",
        None,
        Some(json!({ "email": "CALVIN.XIAO@vipshop.com", "name": "Calvin 2", "password": "springside" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    let error: ErrorResponse = parse(&body);
    assert_eq!(error.code, "EMAIL_ALREADY_REGISTERED");

    for payload in [
        json!({ "email": "broken", "name": "X", "password": "longenough" }),
        json!({ "email": "x@example.com", "name": "  ", "password": "longenough" }),
        json!({ "email": "x@example.com", "name": "X", "password": "short" }),
    ] {
        let (status, body) = send(
            &app.router,
            "POST",
            "/api/accounts/register",
            None,
            Some(payload),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ErrorResponse = parse(&body);
        assert_eq!(error.code, "BAD_REQUEST");
    }
}

#[tokio::test]
async fn test_create_book_requires_login_and_title() {
    let app = seeded_app().await;

    let (status, _) = send(
        &app.router,
        "POST",
        "/api/books",
        None,
        Some(json!({ "title": "Anything" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = login(&app.router, CALVIN_EMAIL).await;
    let (status, _) = send(
        &app.router,
        "POST",
        "/api/books",
        Some(&token),
        Some(json!({ "title": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_check() {
    let app = seeded_app().await;
    let (status, body) = get(&app.router, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}
