use anyhow::Result;
use shared::{Account, AccountFields};
use sqlx::{sqlite::SqliteRow, Row};
use uuid::Uuid;

use crate::storage::connection::DbConnection;

/// Repository for account records
#[derive(Clone)]
pub struct AccountRepository {
    db: DbConnection,
}

impl AccountRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Insert a new account under a freshly assigned identifier
    pub async fn store_account(&self, fields: &AccountFields) -> Result<Account> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO accounts (id, name, balance, address)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&fields.name)
        .bind(fields.balance)
        .bind(&fields.address)
        .execute(self.db.pool())
        .await?;

        Ok(Account {
            id,
            name: fields.name.clone(),
            balance: fields.balance,
            address: fields.address.clone(),
        })
    }

    /// List every account in insertion order
    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, balance, address
            FROM accounts
            ORDER BY ROWID ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(row_to_account).collect()
    }

    pub async fn get_account(&self, id: &str) -> Result<Option<Account>> {
        let row = sqlx::query("SELECT id, name, balance, address FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(row_to_account).transpose()
    }

    /// Overwrite the fields present in `fields` and return the record after
    /// the write, or None if no account has this id
    pub async fn update_account(&self, id: &str, fields: &AccountFields) -> Result<Option<Account>> {
        let row = sqlx::query(
            r#"
            UPDATE accounts
            SET name = COALESCE(?, name),
                balance = COALESCE(?, balance),
                address = COALESCE(?, address)
            WHERE id = ?
            RETURNING id, name, balance, address
            "#,
        )
        .bind(&fields.name)
        .bind(fields.balance)
        .bind(&fields.address)
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(row_to_account).transpose()
    }

    /// Delete an account, returning the removed record if it existed
    pub async fn delete_account(&self, id: &str) -> Result<Option<Account>> {
        let row = sqlx::query("DELETE FROM accounts WHERE id = ? RETURNING id, name, balance, address")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(row_to_account).transpose()
    }
}

fn row_to_account(row: &SqliteRow) -> Result<Account> {
    Ok(Account {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        balance: row.try_get("balance")?,
        address: row.try_get("address")?,
    })
}
