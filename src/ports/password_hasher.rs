pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// パスワードハッシュポート
///
/// CPU負荷の高い同期処理。非同期コンテキストからは `spawn_blocking` 経由で呼ぶこと。
pub trait PasswordHasher: Send + Sync {
    /// パスワードをハッシュ化し、保存用の文字列を返す
    fn hash(&self, password: &str) -> Result<String>;

    /// パスワードがハッシュと一致するか検証する
    ///
    /// 不一致は `Ok(false)`。ハッシュ文字列が壊れている場合のみ `Err`。
    fn verify(&self, password: &str, password_hash: &str) -> Result<bool>;
}
