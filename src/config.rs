use crate::adapters::argon2_password_hasher::Argon2Params;
use chrono::Duration;
use config::{Config, Environment};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

/// セッション有効期間の上限（30日）
pub const MAX_SESSION_TTL_MINUTES: i64 = 30 * 24 * 60;

/// 設定値の読み込みエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("{key} has an invalid value: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// アプリケーション設定
///
/// 環境変数から読み込む。未設定の項目はデフォルト値を使う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// 待ち受けポート（PORT）
    pub port: u16,
    /// PostgreSQLの接続URL（DATABASE_URL）。未設定ならインメモリで動作する。
    pub database_url: Option<String>,
    /// コネクションプールの最大接続数（DATABASE_MAX_CONNECTIONS）
    pub database_max_connections: u32,
    /// セッションの有効期間（SESSION_TTL_MINUTES）
    pub session_ttl: Duration,
    /// 起動時にデモデータを投入するか（SEED_DEMO_DATA）
    pub seed_demo_data: bool,
    /// Argon2idのコスト（ARGON2_MEMORY_KIB, ARGON2_ITERATIONS, ARGON2_PARALLELISM）
    pub argon2: Argon2Params,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: Settings::default_port(),
            database_url: None,
            database_max_connections: Settings::default_database_max_connections(),
            session_ttl: Duration::minutes(Settings::default_session_ttl_minutes()),
            seed_demo_data: Settings::default_seed_demo_data(),
            argon2: Argon2Params::default(),
        }
    }
}

/// 環境変数そのままの形の設定
///
/// キーは小文字化された環境変数名（`SESSION_TTL_MINUTES` → `session_ttl_minutes`）。
#[derive(Debug, Clone, Deserialize)]
struct Settings {
    #[serde(default = "Settings::default_port")]
    port: u16,
    #[serde(default)]
    database_url: Option<String>,
    #[serde(default = "Settings::default_database_max_connections")]
    database_max_connections: u32,
    #[serde(default = "Settings::default_session_ttl_minutes")]
    session_ttl_minutes: i64,
    #[serde(default = "Settings::default_seed_demo_data")]
    seed_demo_data: bool,
    #[serde(default = "Settings::default_argon2_memory_kib")]
    argon2_memory_kib: u32,
    #[serde(default = "Settings::default_argon2_iterations")]
    argon2_iterations: u32,
    #[serde(default = "Settings::default_argon2_parallelism")]
    argon2_parallelism: u32,
}

impl Settings {
    fn default_port() -> u16 {
        3000
    }

    fn default_database_max_connections() -> u32 {
        5
    }

    fn default_session_ttl_minutes() -> i64 {
        30
    }

    fn default_seed_demo_data() -> bool {
        true
    }

    fn default_argon2_memory_kib() -> u32 {
        Argon2Params::default().memory_kib
    }

    fn default_argon2_iterations() -> u32 {
        Argon2Params::default().iterations
    }

    fn default_argon2_parallelism() -> u32 {
        Argon2Params::default().parallelism
    }

    /// 値の範囲を検証し、AppConfigに変換する
    fn validate(self) -> Result<AppConfig, ConfigError> {
        let session_ttl = Some(self.session_ttl_minutes)
            .filter(|minutes| (1..=MAX_SESSION_TTL_MINUTES).contains(minutes))
            .and_then(Duration::try_minutes)
            .ok_or_else(|| ConfigError::InvalidValue {
                key: "SESSION_TTL_MINUTES",
                value: format!(
                    "{} (expected 1..={})",
                    self.session_ttl_minutes, MAX_SESSION_TTL_MINUTES
                ),
            })?;

        if self.database_max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                key: "DATABASE_MAX_CONNECTIONS",
                value: "0".to_string(),
            });
        }

        Ok(AppConfig {
            port: self.port,
            database_url: self.database_url.filter(|url| !url.trim().is_empty()),
            database_max_connections: self.database_max_connections,
            session_ttl,
            seed_demo_data: self.seed_demo_data,
            argon2: Argon2Params {
                memory_kib: self.argon2_memory_kib,
                iterations: self.argon2_iterations,
                parallelism: self.argon2_parallelism,
            },
        })
    }
}

impl AppConfig {
    /// プロセスの環境変数（と `.env` があればその内容）から読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        // .env が無くてもよい
        let _ = dotenvy::dotenv();
        Self::load(Environment::default().try_parsing(true))
    }

    /// 与えられた変数表から読み込む（プロセスの環境変数は見ない）
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::load(
            Environment::default()
                .source(Some(vars.into_iter().collect()))
                .try_parsing(true),
        )
    }

    fn load(environment: Environment) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        settings.validate()
    }
}
