use crate::domain::{Session, SessionToken};
use crate::ports::session_store::{Result, SessionStore as SessionStoreTrait};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// SessionStoreのインメモリ実装
///
/// プロセス再起動でセッションは失われる（再ログインが必要）。
pub struct SessionStore {
    sessions: Mutex<HashMap<SessionToken, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// 保持しているセッション数
    pub fn len(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStoreTrait for SessionStore {
    async fn insert(&self, session: Session) -> Result<()> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| "session store lock poisoned")?;
        sessions.insert(session.token.clone(), session);
        Ok(())
    }

    async fn resolve(
        &self,
        token: &SessionToken,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Option<Session>> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| "session store lock poisoned")?;

        let Some(session) = sessions.get(token) else {
            return Ok(None);
        };

        if session.is_expired(now) {
            sessions.remove(token);
            return Ok(None);
        }

        let touched = session.touched(now, ttl)?;
        sessions.insert(token.clone(), touched.clone());
        Ok(Some(touched))
    }

    async fn remove(&self, token: &SessionToken) -> Result<bool> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| "session store lock poisoned")?;
        Ok(sessions.remove(token).is_some())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| "session store lock poisoned")?;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now));
        Ok(before - sessions.len())
    }
}
