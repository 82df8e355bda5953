//! Database repository for keyword operations.
//!
//! Fan-out inserts run inside a single transaction.

use sqlx::{Row, SqlitePool};
use tokio::sync::OnceCell;

use super::run_migrations;
use crate::errors::AppError;
use crate::models::{Keyword, NewKeywords};

/// Database repository for all keyword operations.
pub struct Repository {
    pool: SqlitePool,
    schema: OnceCell<()>,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            schema: OnceCell::new(),
        }
    }

    /// Connect if not connected yet and return the ready pool.
    ///
    /// A failed attempt leaves the cell empty so the next request retries.
    async fn ready(&self) -> Result<&SqlitePool, AppError> {
        self.schema
            .get_or_try_init(|| async {
                tracing::info!("Connecting to keyword store");
                run_migrations(&self.pool).await?;
                tracing::info!("Keyword store ready");
                Ok::<(), AppError>(())
            })
            .await?;
        Ok(&self.pool)
    }

    /// Count all stored keywords.
    pub async fn count_keywords(&self) -> Result<u64, AppError> {
        let pool = self.ready().await?;
        let row = sqlx::query("SELECT COUNT(*) AS total FROM keywords")
            .fetch_one(pool)
            .await?;
        let total: i64 = row.try_get("total")?;
        Ok(u64::try_from(total).unwrap_or(0))
    }

    /// List keywords in insertion order, skipping `offset` and returning at most `limit`.
    pub async fn list_keywords(&self, offset: u64, limit: u64) -> Result<Vec<Keyword>, AppError> {
        let pool = self.ready().await?;
        let rows = sqlx::query(
            "SELECT id, username, channels, available, unavailable, created, created_by, created_at FROM keywords ORDER BY seq LIMIT ? OFFSET ?"
        )
        .bind(clamp_to_i64(limit))
        .bind(clamp_to_i64(offset))
        .fetch_all(pool)
        .await?;

        let keywords = rows
            .iter()
            .map(keyword_from_row)
            .collect::<Result<Vec<_>, sqlx::Error>>()?;
        Ok(keywords)
    }

    /// Persist one keyword per channel.
    ///
    /// All inserts commit together or not at all.
    pub async fn create_keywords(&self, request: &NewKeywords) -> Result<Vec<Keyword>, AppError> {
        let pool = self.ready().await?;
        let mut tx = pool.begin().await?;
        let mut created = Vec::with_capacity(request.channels.len());

        for channel in &request.channels {
            let keyword = request.record_for(uuid::Uuid::new_v4().to_string(), channel);
            let channels_json = serde_json::to_string(&keyword.channels)
                .map_err(|e| AppError::Internal(format!("Failed to encode channels: {}", e)))?;

            sqlx::query(
                "INSERT INTO keywords (id, username, channels, available, unavailable, created, created_by, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
            )
            .bind(&keyword.id)
            .bind(&keyword.username)
            .bind(&channels_json)
            .bind(keyword.available)
            .bind(keyword.unavailable)
            .bind(keyword.created)
            .bind(&keyword.created_by)
            .bind(keyword.created_at)
            .execute(&mut *tx)
            .await?;

            created.push(keyword);
        }

        tx.commit().await?;

        Ok(created)
    }

    /// Delete a keyword.
    pub async fn delete_keyword(&self, id: &str) -> Result<(), AppError> {
        let pool = self.ready().await?;
        let result = sqlx::query("DELETE FROM keywords WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Keyword not found".to_string()));
        }

        Ok(())
    }
}

// Helper functions for row conversion

fn keyword_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Keyword, sqlx::Error> {
    let channels_str: String = row.try_get("channels")?;
    Ok(Keyword {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        channels: parse_json_array(&channels_str)?,
        available: row.try_get("available")?,
        unavailable: row.try_get("unavailable")?,
        created: row.try_get("created")?,
        created_by: row.try_get("created_by")?,
        created_at: row.try_get("created_at")?,
    })
}

fn parse_json_array(s: &str) -> Result<Vec<String>, sqlx::Error> {
    serde_json::from_str(s).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

fn clamp_to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    async fn repository(dir: &TempDir) -> Repository {
        let pool = crate::db::init_database(&dir.path().join("keywords.sqlite"))
            .await
            .unwrap();
        Repository::new(pool)
    }

    fn new_keywords(channels: &[&str]) -> NewKeywords {
        NewKeywords {
            username: "alice".to_string(),
            channels: channels.iter().map(|c| c.to_string()).collect(),
            available: true,
            unavailable: false,
            created: true,
            created_by: "admin".to_string(),
            created_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()),
        }
    }

    #[tokio::test]
    async fn test_fan_out_stores_one_record_per_channel() {
        let dir = TempDir::new().unwrap();
        let repo = repository(&dir).await;

        let created = repo
            .create_keywords(&new_keywords(&["a", "b", "c"]))
            .await
            .unwrap();
        assert_eq!(created.len(), 3);

        let stored = repo.list_keywords(0, 15).await.unwrap();
        assert_eq!(stored, created);
        for (keyword, channel) in stored.iter().zip(["a", "b", "c"]) {
            assert_eq!(keyword.channels, vec![channel.to_string()]);
            assert_eq!(keyword.username, "alice");
            assert_eq!(keyword.created_by, "admin");
            assert!(keyword.available && keyword.created && !keyword.unavailable);
        }
    }

    #[tokio::test]
    async fn test_list_respects_offset_and_limit() {
        let dir = TempDir::new().unwrap();
        let repo = repository(&dir).await;
        repo.create_keywords(&new_keywords(&["c1", "c2", "c3", "c4", "c5"]))
            .await
            .unwrap();

        assert_eq!(repo.count_keywords().await.unwrap(), 5);

        let page: Vec<String> = repo
            .list_keywords(2, 2)
            .await
            .unwrap()
            .into_iter()
            .map(|k| k.channels[0].clone())
            .collect();
        assert_eq!(page, vec!["c3", "c4"]);

        assert!(repo.list_keywords(10, 2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_keyword_is_not_found() {
        let dir = TempDir::new().unwrap();
        let repo = repository(&dir).await;
        let created = repo.create_keywords(&new_keywords(&["x"])).await.unwrap();

        let err = repo.delete_keyword("no-such-id").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(repo.count_keywords().await.unwrap(), 1);

        repo.delete_keyword(&created[0].id).await.unwrap();
        assert_eq!(repo.count_keywords().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_insert_rolls_back_whole_fan_out() {
        let dir = TempDir::new().unwrap();
        let repo = repository(&dir).await;
        repo.create_keywords(&new_keywords(&["keep"])).await.unwrap();

        sqlx::query(
            r#"CREATE TRIGGER reject_boom BEFORE INSERT ON keywords
               WHEN NEW.channels = '["boom"]'
               BEGIN SELECT RAISE(ABORT, 'channel rejected'); END"#,
        )
        .execute(&repo.pool)
        .await
        .unwrap();

        let err = repo
            .create_keywords(&new_keywords(&["a", "boom", "c"]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));

        let stored = repo.list_keywords(0, 15).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].channels, vec!["keep".to_string()]);
    }

    #[tokio::test]
    async fn test_corrupt_channels_column_is_an_error() {
        let dir = TempDir::new().unwrap();
        let repo = repository(&dir).await;
        repo.create_keywords(&new_keywords(&["ok"])).await.unwrap();

        sqlx::query("UPDATE keywords SET channels = 'not json'")
            .execute(&repo.pool)
            .await
            .unwrap();

        let err = repo.list_keywords(0, 15).await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
