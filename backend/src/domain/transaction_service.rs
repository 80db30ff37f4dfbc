//! Transaction operations, mirroring the account operations with `amount`
//! as the summed field.

use anyhow::Result;
use shared::{Transaction, TransactionFields};
use tracing::{debug, info};

use crate::domain::sum_present;
use crate::storage::{DbConnection, TransactionRepository};

#[derive(Clone)]
pub struct TransactionService {
    transaction_repository: TransactionRepository,
}

impl TransactionService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            transaction_repository: TransactionRepository::new(db),
        }
    }

    pub async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let transactions = self.transaction_repository.list_transactions().await?;
        debug!("Loaded {} transactions", transactions.len());
        Ok(transactions)
    }

    pub async fn create_transaction(&self, fields: TransactionFields) -> Result<Transaction> {
        let transaction = self.transaction_repository.store_transaction(&fields).await?;
        info!(
            "Created transaction {} ({:?} -> {:?}, amount {:?})",
            transaction.id, transaction.from, transaction.to, transaction.amount
        );
        Ok(transaction)
    }

    pub async fn get_transaction(&self, id: &str) -> Result<Option<Transaction>> {
        self.transaction_repository.get_transaction(id).await
    }

    pub async fn update_transaction(
        &self,
        id: &str,
        fields: TransactionFields,
    ) -> Result<Option<Transaction>> {
        info!("Updating transaction {} with {:?}", id, fields);
        self.transaction_repository.update_transaction(id, &fields).await
    }

    pub async fn delete_transaction(&self, id: &str) -> Result<bool> {
        let deleted = self.transaction_repository.delete_transaction(id).await?;
        if deleted.is_some() {
            info!("Deleted transaction {}", id);
        }
        Ok(deleted.is_some())
    }

    /// Sum of every transaction amount
    pub async fn total_amount(&self) -> Result<f64> {
        let transactions = self.transaction_repository.list_transactions().await?;
        let total = sum_present(transactions.iter().map(|t| t.amount));
        debug!("Total amount over {} transactions: {}", transactions.len(), total);
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test() -> TransactionService {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        TransactionService::new(db)
    }

    fn with_amount(amount: f64) -> TransactionFields {
        TransactionFields {
            from: Some("alice".to_string()),
            to: Some("bob".to_string()),
            amount: Some(amount),
            date: None,
        }
    }

    #[tokio::test]
    async fn test_total_amount() {
        let service = setup_test().await;
        assert_eq!(service.total_amount().await.unwrap(), 0.0);

        service.create_transaction(with_amount(100.0)).await.unwrap();
        service.create_transaction(with_amount(50.0)).await.unwrap();

        assert_eq!(service.total_amount().await.unwrap(), 150.0);
    }

    #[tokio::test]
    async fn test_update_keeps_unspecified_fields() {
        let service = setup_test().await;
        let created = service.create_transaction(with_amount(10.0)).await.unwrap();

        let patch = TransactionFields {
            to: Some("carol".to_string()),
            ..Default::default()
        };
        let updated = service
            .update_transaction(&created.id, patch)
            .await
            .unwrap()
            .expect("transaction should exist");

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.to.as_deref(), Some("carol"));
        assert_eq!(updated.from.as_deref(), Some("alice"));
        assert_eq!(updated.amount, Some(10.0));
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let service = setup_test().await;
        let result = service
            .update_transaction("never-issued", with_amount(1.0))
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
