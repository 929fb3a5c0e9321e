use crate::domain::{Account, AccountId, Email, NewAccount};
use crate::ports::account_repository::{AccountRepository as AccountRepositoryTrait, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// AccountRepositoryのインメモリ実装
pub struct AccountRepository {
    accounts: Mutex<BTreeMap<AccountId, Account>>,
}

impl AccountRepository {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(BTreeMap::new()),
        }
    }
}

impl Default for AccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountRepositoryTrait for AccountRepository {
    async fn get_by_id(&self, account_id: AccountId) -> Result<Option<Account>> {
        let accounts = self
            .accounts
            .lock()
            .map_err(|_| "account store lock poisoned")?;
        Ok(accounts.get(&account_id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>> {
        let accounts = self
            .accounts
            .lock()
            .map_err(|_| "account store lock poisoned")?;
        Ok(accounts.values().find(|a| &a.email == email).cloned())
    }

    async fn insert(&self, account: NewAccount) -> Result<Option<Account>> {
        let mut accounts = self
            .accounts
            .lock()
            .map_err(|_| "account store lock poisoned")?;

        if accounts.values().any(|a| a.email == account.email) {
            return Ok(None);
        }

        let next_id = accounts.keys().next_back().map_or(1, |id| id.value() + 1);
        let account = account.into_account(AccountId::new(next_id));
        accounts.insert(account.id, account.clone());
        Ok(Some(account))
    }
}
