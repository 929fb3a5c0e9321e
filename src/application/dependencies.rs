use crate::ports::*;
use chrono::Duration;
use std::sync::Arc;

/// サービスの依存関係
///
/// データ構造として定義し、振る舞いは持たない。
/// ユースケースは自由関数として実装し、この構造体を引数で受け取る。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub book_repository: Arc<dyn BookRepository>,
    pub account_repository: Arc<dyn AccountRepository>,
    pub session_store: Arc<dyn SessionStore>,
    pub notification_service: Arc<dyn NotificationService>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    /// 最後のアクセスからセッションが失効するまでの時間
    pub session_ttl: Duration,
}
