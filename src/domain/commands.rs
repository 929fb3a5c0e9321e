use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{AccountId, BookId};

/// 貸出ワークフローの操作種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LendingAction {
    /// 借り手が貸出を申請する
    Request,
    /// 借り手が申請を取り消す
    Cancel,
    /// 所有者が申請を承認し、書籍を貸し出す
    Accept,
    /// 所有者が申請を却下する
    Reject,
    /// 所有者が返却を受け付ける
    Return,
}

/// コマンド：書籍の貸出状態を遷移させる
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LendingCommand {
    pub book_id: BookId,
    pub actor: AccountId,
    pub action: LendingAction,
    pub issued_at: DateTime<Utc>,
}
