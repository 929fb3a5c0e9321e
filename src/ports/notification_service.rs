use crate::domain::{AccountId, LendingEvent};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 通知サービスポート
///
/// 貸出状態の変化を関係者に届ける仕組みを抽象化する。
/// 実装はメール、チャット、アプリ内メッセージなどが考えられる。
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// 貸出イベントを受信者に通知する
    ///
    /// 受信者は `LendingEvent::recipient()` で決まる。
    async fn notify(&self, recipient: AccountId, event: &LendingEvent) -> Result<()>;
}
