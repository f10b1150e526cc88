use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::errors::{CoreError, CoreResult};

/// Open the single transaction a mutation stages its changes in.
pub async fn begin(db: &DatabaseConnection) -> CoreResult<DatabaseTransaction> {
    db.begin()
        .await
        .map_err(|e| CoreError::from_db("begin transaction", e))
}

/// Commit staged changes when `outcome` succeeded, roll them back otherwise.
pub async fn finish<T>(txn: DatabaseTransaction, outcome: CoreResult<T>) -> CoreResult<T> {
    match outcome {
        Ok(value) => {
            txn.commit()
                .await
                .map_err(|e| CoreError::from_db("commit", e))?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!("Failed to roll back transaction: {}", rollback_err);
            }
            Err(err)
        }
    }
}
