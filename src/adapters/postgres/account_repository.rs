use crate::domain::{Account, AccountId, Email, NewAccount};
use crate::ports::account_repository::{AccountRepository as AccountRepositoryTrait, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

/// PostgreSQLの行データをAccountに変換する
fn map_row_to_account(row: &PgRow) -> Result<Account> {
    let email: String = row.try_get("email")?;
    let email = Email::parse(&email).map_err(|e| {
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            as Box<dyn std::error::Error + Send + Sync>
    })?;

    Ok(Account {
        id: AccountId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        email,
        password_hash: row.try_get("password_hash")?,
    })
}

/// AccountRepositoryのPostgreSQL実装
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepositoryTrait for AccountRepository {
    async fn get_by_id(&self, account_id: AccountId) -> Result<Option<Account>> {
        let row = sqlx::query("SELECT id, name, email, password_hash FROM accounts WHERE id = $1")
            .bind(account_id.value())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_row_to_account).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>> {
        let row =
            sqlx::query("SELECT id, name, email, password_hash FROM accounts WHERE email = $1")
                .bind(email.as_str())
                .fetch_optional(&self.pool)
                .await?;

        row.as_ref().map(map_row_to_account).transpose()
    }

    /// ON CONFLICT DO NOTHING で重複メールアドレスを検出する
    async fn insert(&self, account: NewAccount) -> Result<Option<Account>> {
        let id: Option<i64> = sqlx::query_scalar(
            r#"
            INSERT INTO accounts (name, email, password_hash)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(&account.name)
        .bind(account.email.as_str())
        .bind(&account.password_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(id.map(|id| account.into_account(AccountId::new(id))))
    }
}
