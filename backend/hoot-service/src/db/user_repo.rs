use super::UserDirectory;
use crate::error::Result;
use crate::models::Author;
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

/// Reads author identities from the shared `users` table
#[derive(Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn get_users_by_ids(&self, user_ids: &[Uuid]) -> Result<HashMap<Uuid, Author>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let authors = sqlx::query_as::<_, Author>(
            r#"
            SELECT id, username
            FROM users
            WHERE id = ANY($1)
            "#,
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(authors.into_iter().map(|a| (a.id, a)).collect())
    }
}
