use crate::ports::password_hasher::{PasswordHasher as PasswordHasherTrait, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

/// Argon2idのコストパラメータ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    /// メモリコスト（KiB）
    pub memory_kib: u32,
    /// 反復回数
    pub iterations: u32,
    /// 並列度
    pub parallelism: u32,
}

impl Default for Argon2Params {
    /// OWASP推奨の最小構成（19 MiB, 2回, 並列度1）
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// PasswordHasherのArgon2id実装
///
/// ハッシュはPHC文字列形式（`$argon2id$v=19$m=...,t=...,p=...$<salt>$<hash>`）で、
/// ソルトとパラメータを含むため検証時に別途保存する必要はない。
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new(params: Argon2Params) -> std::result::Result<Self, argon2::Error> {
        let params = Params::new(
            params.memory_kib,
            params.iterations,
            params.parallelism,
            None,
        )?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl PasswordHasherTrait for PasswordHasher {
    fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| format!("failed to hash password: {}", e))?;
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, password_hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(password_hash)
            .map_err(|e| format!("stored password hash is malformed: {}", e))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(format!("failed to verify password: {}", e).into()),
        }
    }
}
