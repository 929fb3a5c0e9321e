use crate::application::authenticate;
use crate::domain::{Account, SessionToken};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use std::convert::Infallible;
use std::sync::Arc;

use super::{error::ApiError, handlers::AppState};

/// トークンを運ぶリクエストヘッダー
pub const TOKEN_HEADER: &str = "token";

/// リクエストヘッダーからセッショントークンを取り出す
///
/// `token` ヘッダーを優先し、無ければ `Authorization: Bearer <token>` を見る。
pub fn extract_token(headers: &HeaderMap) -> Option<SessionToken> {
    if let Some(value) = headers.get(TOKEN_HEADER) {
        return value.to_str().ok().and_then(SessionToken::from_header);
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .and_then(SessionToken::from_header)
}

/// ログイン中のアカウント
///
/// ハンドラーの引数に置くだけで認証が必須になる。
/// 認証に失敗した場合はハンドラーに到達せず 401 を返す。
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub Account);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentAccount {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers);
        let account = authenticate(&state.service_deps, token.as_ref()).await?;
        Ok(CurrentAccount(account))
    }
}

/// 検証前のトークン（無くてもよい）
///
/// ログアウトのように、トークンが無効でも失敗させたくないエンドポイントで使う。
#[derive(Debug, Clone)]
pub struct OptionalToken(pub Option<SessionToken>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalToken(extract_token(&parts.headers)))
    }
}
