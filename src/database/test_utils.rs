use sea_orm::{DatabaseConnection, DbErr};

use crate::database::connection::{ensure_schema, establish_connection};

/// Fresh in-memory SQLite database with every table created.
pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = establish_connection("sqlite::memory:").await?;
    ensure_schema(&db).await?;
    Ok(db)
}
