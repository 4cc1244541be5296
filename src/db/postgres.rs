use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{error::AppResult, models::SessionRecord};

use super::SessionLog;

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> AppResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Session log stored in the `soulprint_sessions` table
#[derive(Clone)]
pub struct PostgresSessionLog {
    pool: PgPool,
}

impl PostgresSessionLog {
    /// Connects and brings the schema up to date
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let pool = create_pool(database_url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM soulprint_sessions")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait::async_trait]
impl SessionLog for PostgresSessionLog {
    async fn append(&self, record: &SessionRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO soulprint_sessions (user_name, "timestamp", selected_badges, assigned_archetype)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&record.name)
        .bind(record.timestamp)
        .bind(record.badges_json())
        .bind(record.archetype.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
