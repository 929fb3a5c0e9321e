use crate::domain::{Account, Email, NewAccount, Session, SessionToken, account};
use chrono::Utc;
use std::sync::Arc;

use super::dependencies::ServiceDependencies;
use super::errors::{ApplicationError, Result};

/// パスワードのハッシュ化をブロッキングスレッドで実行する
pub(super) async fn hash_password(deps: &ServiceDependencies, password: &str) -> Result<String> {
    let hasher = Arc::clone(&deps.password_hasher);
    let password = password.to_owned();

    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| ApplicationError::PasswordHashError(Box::new(e)))?
        .map_err(ApplicationError::PasswordHashError)
}

async fn verify_password(
    deps: &ServiceDependencies,
    password: &str,
    password_hash: &str,
) -> Result<bool> {
    let hasher = Arc::clone(&deps.password_hasher);
    let password = password.to_owned();
    let password_hash = password_hash.to_owned();

    tokio::task::spawn_blocking(move || hasher.verify(&password, &password_hash))
        .await
        .map_err(|e| ApplicationError::PasswordHashError(Box::new(e)))?
        .map_err(ApplicationError::PasswordHashError)
}

/// ログインする
///
/// メールアドレスとパスワードが一致した場合、新しいセッションを開始してトークンを返す。
/// どちらが間違っていたかは呼び出し側に区別させない（`InvalidCredentials`のみ）。
///
/// ログインのついでに期限切れのセッションを掃除する。
#[tracing::instrument(skip(deps, email, password))]
pub async fn login(deps: &ServiceDependencies, email: &str, password: &str) -> Result<SessionToken> {
    let Ok(email) = Email::parse(email) else {
        tracing::warn!("Login rejected: malformed email");
        return Err(ApplicationError::InvalidCredentials);
    };

    let account = deps
        .account_repository
        .find_by_email(&email)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    let Some(account) = account else {
        tracing::warn!("Login rejected: unknown email");
        return Err(ApplicationError::InvalidCredentials);
    };

    if !verify_password(deps, password, &account.password_hash).await? {
        tracing::warn!(account_id = %account.id, "Login rejected: wrong password");
        return Err(ApplicationError::InvalidCredentials);
    }

    let now = Utc::now();
    // 掃除に失敗してもログインは続行する
    match deps.session_store.purge_expired(now).await {
        Ok(0) => {}
        Ok(purged) => tracing::debug!(purged, "Purged expired sessions"),
        Err(e) => tracing::warn!(error = %e, "Failed to purge expired sessions"),
    }

    let session = Session::start(account.id, now, deps.session_ttl)
        .map_err(|e| ApplicationError::SessionStoreError(Box::new(e)))?;
    let token = session.token.clone();
    deps.session_store
        .insert(session)
        .await
        .map_err(ApplicationError::SessionStoreError)?;

    tracing::info!(account_id = %account.id, "Logged in");
    Ok(token)
}

/// ログアウトする
///
/// トークンに対応するセッションを破棄する。
/// トークンが無い・既に無効な場合も成功として扱う（冪等）。
#[tracing::instrument(skip(deps, token))]
pub async fn logout(deps: &ServiceDependencies, token: Option<&SessionToken>) -> Result<()> {
    let Some(token) = token else {
        return Ok(());
    };

    let removed = deps
        .session_store
        .remove(token)
        .await
        .map_err(ApplicationError::SessionStoreError)?;

    if removed {
        tracing::info!("Logged out");
    } else {
        tracing::debug!("Logout with unknown token ignored");
    }
    Ok(())
}

/// トークンを認証し、ログイン中のアカウントを返す
///
/// トークンが無い・未知・期限切れの場合は `Unauthenticated`。
/// 成功するとセッションの有効期限が延長される。
#[tracing::instrument(skip(deps, token))]
pub async fn authenticate(
    deps: &ServiceDependencies,
    token: Option<&SessionToken>,
) -> Result<Account> {
    let token = token.ok_or(ApplicationError::Unauthenticated)?;

    let session = deps
        .session_store
        .resolve(token, Utc::now(), deps.session_ttl)
        .await
        .map_err(ApplicationError::SessionStoreError)?
        .ok_or(ApplicationError::Unauthenticated)?;

    // セッションが残っていてもアカウントが消えていれば認証しない
    deps.account_repository
        .get_by_id(session.account_id)
        .await
        .map_err(ApplicationError::RepositoryError)?
        .ok_or(ApplicationError::Unauthenticated)
}

/// アカウントを登録する
///
/// 検証ルール：
/// - メールアドレスの形式が正しいこと（小文字に正規化して保存）
/// - 表示名が空白のみでないこと
/// - パスワードが6文字以上であること
/// - メールアドレスが未登録であること
#[tracing::instrument(skip(deps, email, name, password))]
pub async fn register(
    deps: &ServiceDependencies,
    email: &str,
    name: &str,
    password: &str,
) -> Result<Account> {
    let email = Email::parse(email)?;
    let name = account::parse_name(name)?;

    if !account::is_acceptable_password(password) {
        return Err(ApplicationError::InvalidInput(format!(
            "password must be at least {} characters",
            account::MIN_PASSWORD_LENGTH
        )));
    }

    let password_hash = hash_password(deps, password).await?;

    let account = deps
        .account_repository
        .insert(NewAccount {
            name,
            email: email.clone(),
            password_hash,
        })
        .await
        .map_err(ApplicationError::RepositoryError)?
        .ok_or(ApplicationError::EmailAlreadyRegistered(email))?;

    tracing::info!(account_id = %account.id, "Account registered");
    Ok(account)
}
