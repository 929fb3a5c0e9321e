use serde::Serialize;

use super::{AccountId, Email, ValueError};

/// パスワードの最小文字数
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// アカウント - 書籍の所有者であり借り手
///
/// パスワードはArgon2idのPHC文字列としてのみ保持する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub email: Email,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// 新規登録するアカウント（IDはリポジトリが採番する）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub name: String,
    pub email: Email,
    pub password_hash: String,
}

impl NewAccount {
    pub fn into_account(self, id: AccountId) -> Account {
        Account {
            id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
        }
    }
}

/// 表示名の検証（前後の空白を除去、空白のみは不可）
pub fn parse_name(raw: &str) -> Result<String, ValueError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValueError::BlankName);
    }
    Ok(trimmed.to_string())
}

/// パスワードの強度チェック（文字数のみ）
pub fn is_acceptable_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name_trims() {
        assert_eq!(parse_name("  Calvin ").unwrap(), "Calvin");
        assert_eq!(parse_name(" "), Err(ValueError::BlankName));
    }

    #[test]
    fn test_password_length_counts_chars() {
        assert!(is_acceptable_password("spring"));
        assert!(!is_acceptable_password("short"));
        assert!(is_acceptable_password("日知录日知录"));
    }

    #[test]
    fn test_password_hash_is_never_serialized() {
        let account = NewAccount {
            name: "Calvin".to_string(),
            email: Email::parse("calvin.xiao@vipshop.com").unwrap(),
            password_hash: "$argon2id$secret".to_string(),
        }
        .into_account(AccountId::new(1));

        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["name"], "Calvin");
        assert!(json.get("password_hash").is_none());
    }
}
