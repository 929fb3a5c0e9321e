use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{
    AccountId, BookId, BorrowError, LendingEvent, LendingEventDetails, Title,
    commands::{LendingAction, LendingCommand},
};

// ============================================================================
// 型安全な状態パターン
// ============================================================================

/// 書籍の貸出状態
///
/// 借り手は状態の一部として保持する。
/// 「申請中なのに借り手がいない」といった不正な状態は表現できない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BookStatus {
    /// 待機中（誰でも申請できる）
    Idle,
    /// 貸出申請中
    Requested {
        borrower: AccountId,
        requested_at: DateTime<Utc>,
    },
    /// 貸出中
    Out {
        borrower: AccountId,
        borrowed_at: DateTime<Utc>,
    },
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Idle => "idle",
            BookStatus::Requested { .. } => "requested",
            BookStatus::Out { .. } => "out",
        }
    }

    pub fn borrower(&self) -> Option<AccountId> {
        match self {
            BookStatus::Idle => None,
            BookStatus::Requested { borrower, .. } | BookStatus::Out { borrower, .. } => {
                Some(*borrower)
            }
        }
    }

    /// 現在の状態に入った時刻（Idleの場合はNone）
    pub fn changed_at(&self) -> Option<DateTime<Utc>> {
        match self {
            BookStatus::Idle => None,
            BookStatus::Requested { requested_at, .. } => Some(*requested_at),
            BookStatus::Out { borrowed_at, .. } => Some(*borrowed_at),
        }
    }
}

/// Book集約 - 共有される1冊の書籍
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    pub id: BookId,
    pub title: Title,
    pub owner: AccountId,
    #[serde(flatten)]
    pub status: BookStatus,

    /// 楽観的排他制御用のバージョン。状態遷移ごとに1ずつ増える。
    pub version: u32,

    // 監査情報
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 新規登録する書籍（IDはリポジトリが採番する）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: Title,
    pub owner: AccountId,
    pub created_at: DateTime<Utc>,
}

impl NewBook {
    /// 採番されたIDで集約を組み立てる
    pub fn into_book(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            owner: self.owner,
            status: BookStatus::Idle,
            version: 0,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

impl Book {
    pub fn is_owned_by(&self, account: AccountId) -> bool {
        self.owner == account
    }

    fn event_details(&self, borrower: AccountId, at: DateTime<Utc>) -> LendingEventDetails {
        LendingEventDetails {
            book_id: self.id,
            title: self.title.clone(),
            owner: self.owner,
            borrower,
            occurred_at: at,
        }
    }

    fn transition(self, status: BookStatus, at: DateTime<Utc>) -> Book {
        Book {
            status,
            version: self.version + 1,
            updated_at: at,
            ..self
        }
    }
}

// ============================================================================
// 純粋関数：状態遷移
// ============================================================================

/// 純粋関数：貸出を申請する
///
/// ビジネスルール：
/// - 所有者は自分の書籍を申請できない
/// - 待機中（Idle）の書籍のみ申請可能
///
/// 副作用なし。新しいBookとイベントを返す。
pub fn request_borrow(
    book: Book,
    requester: AccountId,
    at: DateTime<Utc>,
) -> Result<(Book, LendingEvent), BorrowError> {
    if book.is_owned_by(requester) {
        return Err(BorrowError::SelfLoan);
    }
    if book.status != BookStatus::Idle {
        return Err(BorrowError::BookNotIdle);
    }

    let event = LendingEvent::BorrowRequested(book.event_details(requester, at));
    let book = book.transition(
        BookStatus::Requested {
            borrower: requester,
            requested_at: at,
        },
        at,
    );

    Ok((book, event))
}

/// 純粋関数：申請を取り消す
///
/// ビジネスルール：
/// - 申請中の書籍のみ
/// - 申請者本人のみ
pub fn cancel_borrow_request(
    book: Book,
    requester: AccountId,
    at: DateTime<Utc>,
) -> Result<(Book, LendingEvent), BorrowError> {
    let borrower = match book.status {
        BookStatus::Requested { borrower, .. } => borrower,
        _ => return Err(BorrowError::NoPendingRequest),
    };
    if borrower != requester {
        return Err(BorrowError::NotRequester);
    }

    let event = LendingEvent::BorrowRequestCancelled(book.event_details(borrower, at));
    Ok((book.transition(BookStatus::Idle, at), event))
}

/// 純粋関数：申請を承認して貸し出す
///
/// ビジネスルール：
/// - 所有者のみ
/// - 申請中の書籍のみ（Requested → Out）
pub fn accept_borrow_request(
    book: Book,
    owner: AccountId,
    at: DateTime<Utc>,
) -> Result<(Book, LendingEvent), BorrowError> {
    if !book.is_owned_by(owner) {
        return Err(BorrowError::NotOwner);
    }
    let borrower = match book.status {
        BookStatus::Requested { borrower, .. } => borrower,
        _ => return Err(BorrowError::NoPendingRequest),
    };

    let event = LendingEvent::BorrowRequestAccepted(book.event_details(borrower, at));
    let book = book.transition(
        BookStatus::Out {
            borrower,
            borrowed_at: at,
        },
        at,
    );

    Ok((book, event))
}

/// 純粋関数：申請を却下する
///
/// ビジネスルール：
/// - 所有者のみ
/// - 申請中の書籍のみ（Requested → Idle）
pub fn reject_borrow_request(
    book: Book,
    owner: AccountId,
    at: DateTime<Utc>,
) -> Result<(Book, LendingEvent), BorrowError> {
    if !book.is_owned_by(owner) {
        return Err(BorrowError::NotOwner);
    }
    let borrower = match book.status {
        BookStatus::Requested { borrower, .. } => borrower,
        _ => return Err(BorrowError::NoPendingRequest),
    };

    let event = LendingEvent::BorrowRequestRejected(book.event_details(borrower, at));
    Ok((book.transition(BookStatus::Idle, at), event))
}

/// 純粋関数：返却を受け付ける
///
/// ビジネスルール：
/// - 所有者のみ
/// - 貸出中の書籍のみ（Out → Idle）
pub fn mark_returned(
    book: Book,
    owner: AccountId,
    at: DateTime<Utc>,
) -> Result<(Book, LendingEvent), BorrowError> {
    if !book.is_owned_by(owner) {
        return Err(BorrowError::NotOwner);
    }
    let borrower = match book.status {
        BookStatus::Out { borrower, .. } => borrower,
        _ => return Err(BorrowError::BookNotOut),
    };

    let event = LendingEvent::BookReturned(book.event_details(borrower, at));
    Ok((book.transition(BookStatus::Idle, at), event))
}

/// コマンドを対応する状態遷移に振り分ける
pub fn apply_command(
    book: Book,
    cmd: &LendingCommand,
) -> Result<(Book, LendingEvent), BorrowError> {
    match cmd.action {
        LendingAction::Request => request_borrow(book, cmd.actor, cmd.issued_at),
        LendingAction::Cancel => cancel_borrow_request(book, cmd.actor, cmd.issued_at),
        LendingAction::Accept => accept_borrow_request(book, cmd.actor, cmd.issued_at),
        LendingAction::Reject => reject_borrow_request(book, cmd.actor, cmd.issued_at),
        LendingAction::Return => mark_returned(book, cmd.actor, cmd.issued_at),
    }
}

/// 純粋関数：削除可能か判定する
///
/// 所有者のみ、かつ待機中の書籍のみ削除できる。
pub fn ensure_deletable(book: &Book, actor: AccountId) -> Result<(), BorrowError> {
    if !book.is_owned_by(actor) {
        return Err(BorrowError::NotOwner);
    }
    if book.status != BookStatus::Idle {
        return Err(BorrowError::BookNotIdle);
    }
    Ok(())
}
