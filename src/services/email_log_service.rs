use crate::models::{EmailLog, NewEmailLog};
use crate::utils::ApiResult;
use sqlx::SqlitePool;

/// Sole writer of the `email_logs` table. Rows are insert-only.
#[derive(Clone)]
pub struct EmailLogService {
    pool: SqlitePool,
}

impl EmailLogService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, log: NewEmailLog) -> ApiResult<EmailLog> {
        let result = sqlx::query(
            r#"INSERT INTO email_logs
               (user_input, reply_to, context, length, tone, generated_email)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&log.user_input)
        .bind(&log.reply_to)
        .bind(&log.context)
        .bind(log.length)
        .bind(&log.tone)
        .bind(&log.generated_email)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();

        let row: EmailLog = sqlx::query_as("SELECT * FROM email_logs WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!("Stored email log {}", row.id);
        Ok(row)
    }

    pub async fn get(&self, id: i64) -> ApiResult<Option<EmailLog>> {
        let row: Option<EmailLog> = sqlx::query_as("SELECT * FROM email_logs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// All rows, oldest first
    pub async fn list(&self) -> ApiResult<Vec<EmailLog>> {
        let rows: Vec<EmailLog> = sqlx::query_as("SELECT * FROM email_logs ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn count(&self) -> ApiResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM email_logs")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
