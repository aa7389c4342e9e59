//! In-process store and directory.
//!
//! Same contract as the PostgreSQL implementations; used by the test suites
//! and for running the service without a database.

use super::{PostStore, UserDirectory};
use crate::error::Result;
use crate::models::{Author, Comment, NewPost, Post, PostChanges};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Posts kept in insertion order
#[derive(Default)]
pub struct InMemoryPostStore {
    posts: RwLock<Vec<Post>>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn list_posts(&self) -> Result<Vec<Post>> {
        let posts = self.posts.read().await;
        // Reverse first so that equal timestamps keep newest-inserted first
        // through the stable sort.
        let mut listed: Vec<Post> = posts.iter().rev().cloned().collect();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listed)
    }

    async fn find_post(&self, post_id: Uuid) -> Result<Option<Post>> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.id == post_id).cloned())
    }

    async fn insert_post(&self, author_id: Uuid, post: NewPost) -> Result<Post> {
        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            author_id,
            title: post.title,
            text: post.text,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        self.posts.write().await.push(post.clone());
        Ok(post)
    }

    async fn update_post(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        changes: PostChanges,
    ) -> Result<Option<Post>> {
        let mut posts = self.posts.write().await;
        let Some(post) = posts
            .iter_mut()
            .find(|p| p.id == post_id && p.author_id == author_id)
        else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            post.title = title;
        }
        if let Some(text) = changes.text {
            post.text = text;
        }
        post.updated_at = Utc::now();

        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, post_id: Uuid, author_id: Uuid) -> Result<Option<Post>> {
        let mut posts = self.posts.write().await;
        let position = posts
            .iter()
            .position(|p| p.id == post_id && p.author_id == author_id);

        Ok(position.map(|idx| posts.remove(idx)))
    }

    async fn insert_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        text: String,
    ) -> Result<Option<Comment>> {
        let mut posts = self.posts.write().await;
        let Some(post) = posts.iter_mut().find(|p| p.id == post_id) else {
            return Ok(None);
        };

        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4(),
            post_id,
            author_id,
            text,
            created_at: now,
            updated_at: now,
        };
        post.comments.push(comment.clone());

        Ok(Some(comment))
    }

    async fn update_comment(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        author_id: Uuid,
        text: String,
    ) -> Result<bool> {
        let mut posts = self.posts.write().await;
        let comment = posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .and_then(|p| p.comments.iter_mut().find(|c| c.id == comment_id))
            .filter(|c| c.author_id == author_id);

        match comment {
            Some(comment) => {
                comment.text = text;
                comment.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_comment(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        author_id: Uuid,
    ) -> Result<bool> {
        let mut posts = self.posts.write().await;
        let Some(post) = posts.iter_mut().find(|p| p.id == post_id) else {
            return Ok(false);
        };

        let before = post.comments.len();
        post.comments
            .retain(|c| !(c.id == comment_id && c.author_id == author_id));

        Ok(post.comments.len() < before)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

/// Author identities keyed by id
#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<Uuid, Author>>,
}

impl InMemoryUserDirectory {
    pub fn new(users: Vec<Author>) -> Self {
        Self {
            users: RwLock::new(users.into_iter().map(|u| (u.id, u)).collect()),
        }
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn get_users_by_ids(&self, user_ids: &[Uuid]) -> Result<HashMap<Uuid, Author>> {
        let users = self.users.read().await;
        Ok(user_ids
            .iter()
            .filter_map(|id| users.get(id).map(|u| (*id, u.clone())))
            .collect())
    }
}
