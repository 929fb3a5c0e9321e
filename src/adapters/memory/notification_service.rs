use crate::domain::{AccountId, LendingEvent};
use crate::ports::notification_service::{NotificationService as NotificationServiceTrait, Result};
use async_trait::async_trait;
use std::sync::Mutex;

/// NotificationServiceのインメモリ実装
///
/// 実際の配信は行わず、通知をログに出力して記録する。
/// 記録した通知はテストから `sent()` で確認できる。
pub struct NotificationService {
    sent: Mutex<Vec<(AccountId, LendingEvent)>>,
}

impl NotificationService {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    /// これまでに送信した通知（送信順）
    pub fn sent(&self) -> Vec<(AccountId, LendingEvent)> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationServiceTrait for NotificationService {
    async fn notify(&self, recipient: AccountId, event: &LendingEvent) -> Result<()> {
        let details = event.details();
        tracing::info!(
            recipient = %recipient,
            event = event.name(),
            book_id = %details.book_id,
            title = %details.title,
            "Lending notification"
        );

        self.sent
            .lock()
            .map_err(|_| "notification log lock poisoned")?
            .push((recipient, event.clone()));
        Ok(())
    }
}
