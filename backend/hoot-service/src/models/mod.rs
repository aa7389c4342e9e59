/// Data models for hoot-service
///
/// Two layers live here:
/// - Records (`Post`, `Comment`): what the store persists. Authors are bare
///   user ids.
/// - Views (`PostView`, `CommentView`): what the API returns. Authors are
///   resolved into `Author` at read time through the user directory.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored post with its comments in append order
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub text: String,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn comment(&self, comment_id: Uuid) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == comment_id)
    }
}

/// Comment row; bound to its parent post
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a post
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub text: String,
}

/// Mutable post fields; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub text: Option<String>,
}

/// Displayable identity of a user, owned by the identity service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Author {
    pub id: Uuid,
    pub username: String,
}

/// Author reference as it appears in responses.
///
/// Serialized either as `{id, username}` or as the bare id when the author
/// was not (or could not be) resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthorRef {
    Resolved(Author),
    Id(Uuid),
}

impl AuthorRef {
    pub fn id(&self) -> Uuid {
        match self {
            AuthorRef::Resolved(author) => author.id,
            AuthorRef::Id(id) => *id,
        }
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            AuthorRef::Resolved(author) => Some(&author.username),
            AuthorRef::Id(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub author: AuthorRef,
    pub comments: Vec<CommentView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: Uuid,
    pub text: String,
    pub author: AuthorRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
