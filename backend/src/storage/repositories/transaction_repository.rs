use anyhow::Result;
use shared::{Transaction, TransactionFields};
use sqlx::{sqlite::SqliteRow, Row};
use uuid::Uuid;

use crate::storage::connection::DbConnection;

/// Repository for transaction records
#[derive(Clone)]
pub struct TransactionRepository {
    db: DbConnection,
}

impl TransactionRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Insert a new transaction under a freshly assigned identifier
    pub async fn store_transaction(&self, fields: &TransactionFields) -> Result<Transaction> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO transactions (id, from_party, to_party, amount, date)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&fields.from)
        .bind(&fields.to)
        .bind(fields.amount)
        .bind(fields.date)
        .execute(self.db.pool())
        .await?;

        Ok(Transaction {
            id,
            from: fields.from.clone(),
            to: fields.to.clone(),
            amount: fields.amount,
            date: fields.date,
        })
    }

    /// List every transaction in insertion order
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(
            r#"
            SELECT id, from_party, to_party, amount, date
            FROM transactions
            ORDER BY ROWID ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(row_to_transaction).collect()
    }

    pub async fn get_transaction(&self, id: &str) -> Result<Option<Transaction>> {
        let row = sqlx::query(
            "SELECT id, from_party, to_party, amount, date FROM transactions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(row_to_transaction).transpose()
    }

    /// Overwrite the fields present in `fields` and return the record after
    /// the write, or None if no transaction has this id
    pub async fn update_transaction(
        &self,
        id: &str,
        fields: &TransactionFields,
    ) -> Result<Option<Transaction>> {
        let row = sqlx::query(
            r#"
            UPDATE transactions
            SET from_party = COALESCE(?, from_party),
                to_party = COALESCE(?, to_party),
                amount = COALESCE(?, amount),
                date = COALESCE(?, date)
            WHERE id = ?
            RETURNING id, from_party, to_party, amount, date
            "#,
        )
        .bind(&fields.from)
        .bind(&fields.to)
        .bind(fields.amount)
        .bind(fields.date)
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(row_to_transaction).transpose()
    }

    /// Delete a transaction, returning the removed record if it existed
    pub async fn delete_transaction(&self, id: &str) -> Result<Option<Transaction>> {
        let row = sqlx::query(
            "DELETE FROM transactions WHERE id = ? RETURNING id, from_party, to_party, amount, date",
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(row_to_transaction).transpose()
    }
}

fn row_to_transaction(row: &SqliteRow) -> Result<Transaction> {
    Ok(Transaction {
        id: row.try_get("id")?,
        from: row.try_get("from_party")?,
        to: row.try_get("to_party")?,
        amount: row.try_get("amount")?,
        date: row.try_get("date")?,
    })
}
