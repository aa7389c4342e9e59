use super::PostStore;
use crate::error::Result;
use crate::models::{Comment, NewPost, Post, PostChanges};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

/// Post row without its comments
#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    author_id: Uuid,
    title: String,
    text: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PostRow {
    fn into_post(self, comments: Vec<Comment>) -> Post {
        Post {
            id: self.id,
            author_id: self.author_id,
            title: self.title,
            text: self.text,
            comments,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// PostgreSQL-backed post store
#[derive(Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn fetch_comments<'e, E>(executor: E, post_id: Uuid) -> Result<Vec<Comment>>
where
    E: PgExecutor<'e>,
{
    let comments = sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, post_id, author_id, text, created_at, updated_at
        FROM comments
        WHERE post_id = $1
        ORDER BY seq ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(executor)
    .await?;

    Ok(comments)
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn list_posts(&self) -> Result<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, author_id, title, text, created_at, updated_at
            FROM posts
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, post_id, author_id, text, created_at, updated_at
            FROM comments
            WHERE post_id = ANY($1)
            ORDER BY post_id, seq ASC
            "#,
        )
        .bind(&post_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_post: HashMap<Uuid, Vec<Comment>> = HashMap::new();
        for comment in comments {
            by_post.entry(comment.post_id).or_default().push(comment);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let comments = by_post.remove(&row.id).unwrap_or_default();
                row.into_post(comments)
            })
            .collect())
    }

    async fn find_post(&self, post_id: Uuid) -> Result<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, author_id, title, text, created_at, updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let comments = fetch_comments(&self.pool, post_id).await?;
                Ok(Some(row.into_post(comments)))
            }
            None => Ok(None),
        }
    }

    async fn insert_post(&self, author_id: Uuid, post: NewPost) -> Result<Post> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (id, author_id, title, text)
            VALUES ($1, $2, $3, $4)
            RETURNING id, author_id, title, text, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(author_id)
        .bind(&post.title)
        .bind(&post.text)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_post(Vec::new()))
    }

    async fn update_post(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        changes: PostChanges,
    ) -> Result<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET title = COALESCE($3, title),
                text = COALESCE($4, text),
                updated_at = NOW()
            WHERE id = $1 AND author_id = $2
            RETURNING id, author_id, title, text, created_at, updated_at
            "#,
        )
        .bind(post_id)
        .bind(author_id)
        .bind(changes.title)
        .bind(changes.text)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let comments = fetch_comments(&self.pool, post_id).await?;
                Ok(Some(row.into_post(comments)))
            }
            None => Ok(None),
        }
    }

    async fn delete_post(&self, post_id: Uuid, author_id: Uuid) -> Result<Option<Post>> {
        let mut tx = self.pool.begin().await?;

        // Row lock blocks concurrent comment inserts (their FK check takes
        // KEY SHARE), so the comments read below are the ones the cascade drops.
        let locked: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT id FROM posts
            WHERE id = $1 AND author_id = $2
            FOR UPDATE
            "#,
        )
        .bind(post_id)
        .bind(author_id)
        .fetch_optional(&mut *tx)
        .await?;

        if locked.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        let comments = fetch_comments(&mut *tx, post_id).await?;

        let row = sqlx::query_as::<_, PostRow>(
            r#"
            DELETE FROM posts
            WHERE id = $1 AND author_id = $2
            RETURNING id, author_id, title, text, created_at, updated_at
            "#,
        )
        .bind(post_id)
        .bind(author_id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.map(|row| row.into_post(comments)))
    }

    async fn insert_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        text: String,
    ) -> Result<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (id, post_id, author_id, text)
            SELECT $1, $2, $3, $4
            WHERE EXISTS (SELECT 1 FROM posts WHERE id = $2)
            RETURNING id, post_id, author_id, text, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(post_id)
        .bind(author_id)
        .bind(text)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn update_comment(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        author_id: Uuid,
        text: String,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE comments
            SET text = $4, updated_at = NOW()
            WHERE post_id = $1 AND id = $2 AND author_id = $3
            "#,
        )
        .bind(post_id)
        .bind(comment_id)
        .bind(author_id)
        .bind(text)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_comment(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        author_id: Uuid,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM comments
            WHERE post_id = $1 AND id = $2 AND author_id = $3
            "#,
        )
        .bind(post_id)
        .bind(comment_id)
        .bind(author_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
