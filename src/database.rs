use rusqlite::Connection;
use rusqlite_migration::{Migrations, M};
use std::sync::{Mutex, MutexGuard};
use tokio::task;

use crate::error::AppError;

pub struct Database {
    connection: Mutex<Connection>,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self, AppError> {
        let db_path = database_url.strip_prefix("sqlite:").unwrap_or(database_url).to_string();

        // Ensure the data directory exists
        if let Some(parent) = std::path::Path::new(&db_path).parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let connection = task::spawn_blocking(move || Connection::open(&db_path)).await??;

        Ok(Database {
            connection: Mutex::new(connection),
        })
    }

    pub async fn migrate(&self) -> Result<(), AppError> {
        let migrations = Migrations::new(vec![
            M::up(include_str!("../migrations/001_initial_schema.sql")),
            M::up(include_str!("../migrations/002_document_keys.sql")),
        ]);

        let mut conn = self.connection()?;
        migrations.to_latest(&mut conn)?;

        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        let conn = self.connection()?;
        let _result: i32 = conn.query_row("SELECT 1", [], |row| row.get(0))?;
        Ok(())
    }

    pub fn connection(&self) -> Result<MutexGuard<'_, Connection>, AppError> {
        self.connection
            .lock()
            .map_err(|_| AppError::Internal("database connection mutex poisoned".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_migrates() {
        let db = Database::new(":memory:").await.unwrap();
        db.migrate().await.unwrap();
        db.health_check().await.unwrap();

        let conn = db.connection().unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN
                 ('beers', 'breweries', 'beer_styles', 'users', 'opinions', 'images', 'audit_log')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 7);
    }

    #[tokio::test]
    async fn test_unique_keys_are_enforced() {
        let db = Database::new(":memory:").await.unwrap();
        db.migrate().await.unwrap();

        let conn = db.connection().unwrap();
        conn.execute(
            "INSERT INTO breweries (data) VALUES ('{\"name\": \"Pinta\"}')",
            [],
        )
        .unwrap();
        let duplicate = conn.execute(
            "INSERT INTO breweries (data) VALUES ('{\"name\": \"PINTA\"}')",
            [],
        );

        assert!(duplicate.is_err());
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let db = Database::new(":memory:").await.unwrap();
        db.migrate().await.unwrap();
        db.migrate().await.unwrap();
    }
}
