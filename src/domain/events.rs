use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{AccountId, BookId, Title};

/// 貸出ワークフローで発生したイベントの共通情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LendingEventDetails {
    pub book_id: BookId,
    pub title: Title,
    pub owner: AccountId,
    pub borrower: AccountId,
    pub occurred_at: DateTime<Utc>,
}

/// ドメインイベント：書籍の貸出状態が遷移した
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "details", rename_all = "snake_case")]
pub enum LendingEvent {
    BorrowRequested(LendingEventDetails),
    BorrowRequestCancelled(LendingEventDetails),
    BorrowRequestAccepted(LendingEventDetails),
    BorrowRequestRejected(LendingEventDetails),
    BookReturned(LendingEventDetails),
}

impl LendingEvent {
    pub fn details(&self) -> &LendingEventDetails {
        match self {
            LendingEvent::BorrowRequested(d)
            | LendingEvent::BorrowRequestCancelled(d)
            | LendingEvent::BorrowRequestAccepted(d)
            | LendingEvent::BorrowRequestRejected(d)
            | LendingEvent::BookReturned(d) => d,
        }
    }

    /// 通知を受け取るべきアカウント
    ///
    /// 申請・取消は所有者へ、承認・却下・返却は借り手へ通知する。
    pub fn recipient(&self) -> AccountId {
        match self {
            LendingEvent::BorrowRequested(d) | LendingEvent::BorrowRequestCancelled(d) => d.owner,
            LendingEvent::BorrowRequestAccepted(d)
            | LendingEvent::BorrowRequestRejected(d)
            | LendingEvent::BookReturned(d) => d.borrower,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LendingEvent::BorrowRequested(_) => "BorrowRequested",
            LendingEvent::BorrowRequestCancelled(_) => "BorrowRequestCancelled",
            LendingEvent::BorrowRequestAccepted(_) => "BorrowRequestAccepted",
            LendingEvent::BorrowRequestRejected(_) => "BorrowRequestRejected",
            LendingEvent::BookReturned(_) => "BookReturned",
        }
    }
}
