use crate::domain::{Account, Email, NewAccount, NewBook, Title};
use chrono::Utc;

use super::auth_service::hash_password;
use super::dependencies::ServiceDependencies;
use super::errors::{ApplicationError, Result};

/// デモ用アカウントの共通パスワード
pub const DEMO_PASSWORD: &str = "springside";

/// デモ用アカウント（メールアドレス, 表示名）
pub const DEMO_ACCOUNTS: [(&str, &str); 2] = [
    ("calvin.xiao@vipshop.com", "Calvin"),
    ("david.wang@vipshop.com", "David"),
];

/// デモ用書籍（タイトル, 所有者のインデックス）
pub const DEMO_BOOKS: [(&str, usize); 3] = [
    ("Big Data日知录", 0),
    ("Netty in Action", 0),
    ("Java并发编程实战", 1),
];

/// デモデータを投入する
///
/// 最初のデモアカウントが既に存在する場合は何もしない（再起動しても重複しない）。
/// 書籍は登録順にIDが振られるため、1冊目が "Big Data日知录"（Calvin所有）になる。
///
/// # 戻り値
/// 投入した場合は `true`
#[tracing::instrument(skip(deps))]
pub async fn seed_demo_data(deps: &ServiceDependencies) -> Result<bool> {
    let first_email = Email::parse(DEMO_ACCOUNTS[0].0)?;
    let already_seeded = deps
        .account_repository
        .find_by_email(&first_email)
        .await
        .map_err(ApplicationError::RepositoryError)?
        .is_some();

    if already_seeded {
        tracing::info!("Demo data already present, skipping");
        return Ok(false);
    }

    let password_hash = hash_password(deps, DEMO_PASSWORD).await?;

    let mut accounts: Vec<Account> = Vec::with_capacity(DEMO_ACCOUNTS.len());
    for (email, name) in DEMO_ACCOUNTS {
        let email = Email::parse(email)?;
        let account = deps
            .account_repository
            .insert(NewAccount {
                name: name.to_string(),
                email: email.clone(),
                password_hash: password_hash.clone(),
            })
            .await
            .map_err(ApplicationError::RepositoryError)?
            .ok_or(ApplicationError::EmailAlreadyRegistered(email))?;
        accounts.push(account);
    }

    let now = Utc::now();
    for (title, owner_index) in DEMO_BOOKS {
        deps.book_repository
            .insert(NewBook {
                title: Title::parse(title)?,
                owner: accounts[owner_index].id,
                created_at: now,
            })
            .await
            .map_err(ApplicationError::RepositoryError)?;
    }

    tracing::info!(
        accounts = accounts.len(),
        books = DEMO_BOOKS.len(),
        "Demo data seeded"
    );
    Ok(true)
}
