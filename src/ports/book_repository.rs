use crate::domain::{AccountId, Book, BookId, NewBook};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 書籍リポジトリポート
///
/// カタログの永続化を抽象化する。
/// 一覧系のメソッドはすべてID（＝登録順）の昇順で返す。
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// すべての書籍を取得する
    async fn list_all(&self) -> Result<Vec<Book>>;

    /// IDで書籍を取得する
    async fn get_by_id(&self, book_id: BookId) -> Result<Option<Book>>;

    /// 所有者の書籍を取得する
    async fn find_by_owner(&self, owner: AccountId) -> Result<Vec<Book>>;

    /// 借り手（申請中・貸出中）として関わっている書籍を取得する
    async fn find_by_borrower(&self, borrower: AccountId) -> Result<Vec<Book>>;

    /// 書籍を登録し、採番済みの集約を返す
    async fn insert(&self, book: NewBook) -> Result<Book>;

    /// 状態遷移後の書籍を保存する（楽観的排他制御）
    ///
    /// 保存済みのバージョンが `expected_version` と一致する場合のみ上書きし、`true` を返す。
    /// 一致しない（他のリクエストが先に更新した）または存在しない場合は `false` を返す。
    async fn update(&self, book: &Book, expected_version: u32) -> Result<bool>;

    /// 書籍を削除する（楽観的排他制御）
    ///
    /// 戻り値の意味は `update` と同じ。
    async fn delete(&self, book_id: BookId, expected_version: u32) -> Result<bool>;
}
