use thiserror::Error;

/// 貸出ワークフローのエラー
///
/// いずれも利用者の操作ミスであり、状態は一切変更されない。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BorrowError {
    /// 所有者が自分の書籍を借りようとした
    #[error("owner cannot borrow their own book")]
    SelfLoan,

    /// 貸出申請は待機中（Idle）の書籍にのみ可能
    #[error("book is not idle")]
    BookNotIdle,

    /// 申請中（Requested）の書籍ではない
    #[error("book has no pending borrow request")]
    NoPendingRequest,

    /// 貸出中（Out）の書籍ではない
    #[error("book is not lent out")]
    BookNotOut,

    /// 所有者のみ可能な操作
    #[error("only the owner can do this")]
    NotOwner,

    /// 申請者本人のみ可能な操作
    #[error("only the requester can do this")]
    NotRequester,
}

impl BorrowError {
    /// 書籍の状態に起因するエラーか（所有関係に起因するエラーと区別する）
    pub fn is_status_error(&self) -> bool {
        matches!(
            self,
            BorrowError::BookNotIdle | BorrowError::NoPendingRequest | BorrowError::BookNotOut
        )
    }
}
