/// Database access layer
///
/// - `PostStore`: persistence for posts and their comments
/// - `UserDirectory`: read-only lookup of author identities owned by the
///   identity service
///
/// PostgreSQL implementations live in `post_repo` and `user_repo`;
/// `memory` holds in-process implementations for tests and local runs.
pub mod memory;
pub mod post_repo;
pub mod user_repo;

pub use memory::{InMemoryPostStore, InMemoryUserDirectory};
pub use post_repo::PgPostStore;
pub use user_repo::PgUserDirectory;

use crate::error::Result;
use crate::models::{Author, Comment, NewPost, Post, PostChanges};
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

/// Embedded migrations for the posts and comments tables
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Storage for posts and their comments.
///
/// Writes that change or remove an existing record take the expected author
/// and only apply when it matches the stored one; they return `None`/`false`
/// when no record matched.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// All posts, newest first, each with its comments.
    async fn list_posts(&self) -> Result<Vec<Post>>;

    async fn find_post(&self, post_id: Uuid) -> Result<Option<Post>>;

    async fn insert_post(&self, author_id: Uuid, post: NewPost) -> Result<Post>;

    async fn update_post(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        changes: PostChanges,
    ) -> Result<Option<Post>>;

    /// Removes the post and its comments, returning what was removed.
    async fn delete_post(&self, post_id: Uuid, author_id: Uuid) -> Result<Option<Post>>;

    /// Appends a comment; `None` when the post does not exist.
    async fn insert_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        text: String,
    ) -> Result<Option<Comment>>;

    async fn update_comment(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        author_id: Uuid,
        text: String,
    ) -> Result<bool>;

    async fn delete_comment(&self, post_id: Uuid, comment_id: Uuid, author_id: Uuid)
        -> Result<bool>;

    /// Cheap round trip to the backing storage
    async fn ping(&self) -> Result<()>;
}

/// Batched author lookup. Unknown ids are absent from the result map.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_users_by_ids(&self, user_ids: &[Uuid]) -> Result<HashMap<Uuid, Author>>;
}
