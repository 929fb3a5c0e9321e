use crate::domain::{Account, AccountId, Email, NewAccount};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// アカウントリポジトリポート
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// IDでアカウントを取得する
    async fn get_by_id(&self, account_id: AccountId) -> Result<Option<Account>>;

    /// メールアドレスでアカウントを取得する（ログインに使用）
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>>;

    /// アカウントを登録する
    ///
    /// メールアドレスが既に登録済みの場合は `None` を返す。
    async fn insert(&self, account: NewAccount) -> Result<Option<Account>>;
}
