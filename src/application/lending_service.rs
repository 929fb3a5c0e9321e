use crate::domain::{
    Account, BookId, book,
    commands::{LendingAction, LendingCommand},
};
use chrono::Utc;

use super::catalog_service::{BookDetails, describe, load_book};
use super::dependencies::ServiceDependencies;
use super::errors::{ApplicationError, Result};

/// 貸出状態の遷移を実行する
///
/// 処理フロー：
/// 1. 書籍を取得（存在しなければ `BookNotFound`）
/// 2. ドメイン層の純粋関数で遷移を判定
/// 3. 取得時のバージョンを条件に保存（競合したら `ConcurrentModification`）
/// 4. 関係者へ通知
///
/// # 通知の失敗
///
/// 通知は保存の後に行う。通知に失敗しても遷移は確定済みのため、
/// エラーはログに記録するだけで呼び出し側には返さない。
#[tracing::instrument(skip(deps), fields(book_id = %cmd.book_id, actor_id = %cmd.actor, action = ?cmd.action))]
pub async fn execute(deps: &ServiceDependencies, cmd: LendingCommand) -> Result<BookDetails> {
    // 1. 書籍を取得
    let current = load_book(deps, cmd.book_id).await?;
    let expected_version = current.version;

    // 2. ドメイン層の純粋関数を呼び出し
    let (updated, event) = book::apply_command(current, &cmd).map_err(|e| {
        tracing::info!(reason = %e, "Lending transition rejected");
        ApplicationError::from(e)
    })?;

    // 3. 楽観的排他制御つきで保存
    let saved = deps
        .book_repository
        .update(&updated, expected_version)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    if !saved {
        tracing::warn!("Lending transition lost a concurrent update");
        return Err(ApplicationError::ConcurrentModification(cmd.book_id));
    }

    tracing::info!(
        event = event.name(),
        status = updated.status.as_str(),
        version = updated.version,
        "Lending state changed"
    );

    // 4. 通知（失敗しても遷移は取り消さない）
    let recipient = event.recipient();
    if let Err(e) = deps.notification_service.notify(recipient, &event).await {
        tracing::warn!(error = %e, %recipient, "Failed to deliver lending notification");
    }

    describe(deps, updated).await
}

fn command(book_id: BookId, actor: &Account, action: LendingAction) -> LendingCommand {
    LendingCommand {
        book_id,
        actor: actor.id,
        action,
        issued_at: Utc::now(),
    }
}

/// 貸出を申請する
///
/// ビジネスルール：
/// - 書籍が存在すること
/// - 申請者が所有者でないこと
/// - 書籍が待機中であること
///
/// 認証は呼び出し側（API層の `CurrentAccount`）で済ませておくこと。
pub async fn request_borrow(
    deps: &ServiceDependencies,
    book_id: BookId,
    requester: &Account,
) -> Result<BookDetails> {
    execute(deps, command(book_id, requester, LendingAction::Request)).await
}

/// 自分の貸出申請を取り消す
pub async fn cancel_borrow_request(
    deps: &ServiceDependencies,
    book_id: BookId,
    requester: &Account,
) -> Result<BookDetails> {
    execute(deps, command(book_id, requester, LendingAction::Cancel)).await
}

/// 所有者として申請を承認し、書籍を貸し出す
pub async fn accept_borrow_request(
    deps: &ServiceDependencies,
    book_id: BookId,
    owner: &Account,
) -> Result<BookDetails> {
    execute(deps, command(book_id, owner, LendingAction::Accept)).await
}

/// 所有者として申請を却下する
pub async fn reject_borrow_request(
    deps: &ServiceDependencies,
    book_id: BookId,
    owner: &Account,
) -> Result<BookDetails> {
    execute(deps, command(book_id, owner, LendingAction::Reject)).await
}

/// 所有者として返却を受け付ける
pub async fn mark_returned(
    deps: &ServiceDependencies,
    book_id: BookId,
    owner: &Account,
) -> Result<BookDetails> {
    execute(deps, command(book_id, owner, LendingAction::Return)).await
}
