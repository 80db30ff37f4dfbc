//! Account operations: list, create, fetch, partial update, delete and the
//! balance total.

use anyhow::Result;
use shared::{Account, AccountFields};
use tracing::{debug, info};

use crate::domain::sum_present;
use crate::storage::{AccountRepository, DbConnection};

#[derive(Clone)]
pub struct AccountService {
    account_repository: AccountRepository,
}

impl AccountService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            account_repository: AccountRepository::new(db),
        }
    }

    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        let accounts = self.account_repository.list_accounts().await?;
        debug!("Loaded {} accounts", accounts.len());
        Ok(accounts)
    }

    pub async fn create_account(&self, fields: AccountFields) -> Result<Account> {
        let account = self.account_repository.store_account(&fields).await?;
        info!("Created account {}", account.id);
        Ok(account)
    }

    pub async fn get_account(&self, id: &str) -> Result<Option<Account>> {
        self.account_repository.get_account(id).await
    }

    /// Returns the account after the update, or None if `id` is unknown
    pub async fn update_account(&self, id: &str, fields: AccountFields) -> Result<Option<Account>> {
        info!("Updating account {} with {:?}", id, fields);
        self.account_repository.update_account(id, &fields).await
    }

    /// Returns false if `id` is unknown
    pub async fn delete_account(&self, id: &str) -> Result<bool> {
        let deleted = self.account_repository.delete_account(id).await?;
        if deleted.is_some() {
            info!("Deleted account {}", id);
        }
        Ok(deleted.is_some())
    }

    /// Sum of every account balance
    pub async fn total_balance(&self) -> Result<f64> {
        let accounts = self.account_repository.list_accounts().await?;
        let total = sum_present(accounts.iter().map(|a| a.balance));
        debug!("Total balance over {} accounts: {}", accounts.len(), total);
        Ok(total)
    }
}
