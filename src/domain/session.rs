use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use super::{AccountId, SessionToken};

/// 有効期限が表現可能な日時の範囲を超えた
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("session expiry out of range: {now} + {ttl}")]
pub struct ExpiryOutOfRange {
    pub now: DateTime<Utc>,
    pub ttl: Duration,
}

fn expiry(now: DateTime<Utc>, ttl: Duration) -> Result<DateTime<Utc>, ExpiryOutOfRange> {
    now.checked_add_signed(ttl).ok_or(ExpiryOutOfRange { now, ttl })
}

/// ログインセッション
///
/// トークンとアカウントを1対1で結びつける。
/// 有効期限はスライディング方式（認証に成功するたびに延長される）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: SessionToken,
    pub account_id: AccountId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// 純粋関数：新しいセッションを開始する
    pub fn start(
        account_id: AccountId,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, ExpiryOutOfRange> {
        Ok(Self {
            token: SessionToken::generate(),
            account_id,
            created_at: now,
            expires_at: expiry(now, ttl)?,
        })
    }

    /// 期限切れか（expires_at ちょうどは期限切れとみなす）
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// 純粋関数：有効期限を now + ttl まで延長する
    pub fn touched(&self, now: DateTime<Utc>, ttl: Duration) -> Result<Self, ExpiryOutOfRange> {
        Ok(Self {
            expires_at: expiry(now, ttl)?,
            ..self.clone()
        })
    }
}
