use crate::domain::{Session, SessionToken};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// セッションストアポート
///
/// トークンからセッションへの対応を保持する。
/// 時刻は呼び出し側から渡す（ストアは時計を持たない）。
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// セッションを保存する
    async fn insert(&self, session: Session) -> Result<()>;

    /// トークンを解決し、有効期限を `now + ttl` まで延長する
    ///
    /// 未知のトークン、期限切れのトークンは `None`。期限切れのセッションはこの時点で破棄する。
    async fn resolve(
        &self,
        token: &SessionToken,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Option<Session>>;

    /// セッションを破棄する。存在した場合は `true`。
    async fn remove(&self, token: &SessionToken) -> Result<bool>;

    /// 期限切れのセッションをまとめて破棄し、件数を返す
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize>;
}
