use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use super::SqliteRepository;
use crate::repository::{DocumentKey, DocumentStore, StorageError};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl DocumentStore for SqliteRepository {
    async fn get_document(&self, key: DocumentKey) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT body FROM documents WHERE key = ?1")
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let body: String = row
            .try_get("body")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        Ok(Some(body))
    }

    async fn put_document(&self, key: DocumentKey, body: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO documents (key, body, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                body = excluded.body,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key.as_str())
        .bind(body)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn delete_document(&self, key: DocumentKey) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM documents WHERE key = ?1")
            .bind(key.as_str())
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }
}
