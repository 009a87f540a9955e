//! User repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::metrics::QueryTimer;

/// Repository for user lookups.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the email address of a user.
    pub async fn find_email(&self, user_id: Uuid) -> Result<Option<String>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_email");
        let result = sqlx::query_scalar::<_, String>("SELECT email FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }
}
