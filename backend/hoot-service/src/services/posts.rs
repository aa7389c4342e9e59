/// Post service - authorization and author resolution around the post store
use crate::db::{PostStore, UserDirectory};
use crate::error::{AppError, Result};
use crate::middleware::{check_comment_ownership, check_post_ownership};
use crate::models::{
    Author, AuthorRef, Comment, CommentView, NewPost, Post, PostChanges, PostView,
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Which authors to resolve when building a post view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolve {
    PostAuthor,
    PostAndCommentAuthors,
}

#[derive(Clone)]
pub struct PostService {
    store: Arc<dyn PostStore>,
    users: Arc<dyn UserDirectory>,
}

impl PostService {
    pub fn new(store: Arc<dyn PostStore>, users: Arc<dyn UserDirectory>) -> Self {
        Self { store, users }
    }

    /// All posts, newest first, with post authors resolved
    pub async fn list_posts(&self) -> Result<Vec<PostView>> {
        let posts = self.store.list_posts().await?;

        let author_ids: Vec<Uuid> = posts.iter().map(|p| p.author_id).collect();
        let authors = self.lookup_authors(author_ids).await?;

        Ok(posts
            .into_iter()
            .map(|post| render_post(post, &authors, Resolve::PostAuthor))
            .collect())
    }

    /// A single post with its author and every comment author resolved
    pub async fn get_post(&self, post_id: Uuid) -> Result<PostView> {
        let post = self.load_post(post_id).await?;
        self.resolve_post(post, Resolve::PostAndCommentAuthors).await
    }

    pub async fn create_post(&self, author_id: Uuid, post: NewPost) -> Result<PostView> {
        let post = self.store.insert_post(author_id, post).await?;
        tracing::info!(post_id = %post.id, author_id = %author_id, "post created");

        self.resolve_post(post, Resolve::PostAuthor).await
    }

    pub async fn update_post(
        &self,
        post_id: Uuid,
        requester: Uuid,
        changes: PostChanges,
    ) -> Result<PostView> {
        let post = self.load_post(post_id).await?;
        check_post_ownership(requester, &post)?;

        let updated = self
            .store
            .update_post(post_id, requester, changes)
            .await?
            .ok_or_else(|| post_not_found(post_id))?;
        tracing::info!(post_id = %post_id, "post updated");

        self.resolve_post(updated, Resolve::PostAuthor).await
    }

    /// Removes a post and its comments, returning the removed post
    pub async fn delete_post(&self, post_id: Uuid, requester: Uuid) -> Result<PostView> {
        let post = self.load_post(post_id).await?;
        check_post_ownership(requester, &post)?;

        let deleted = self
            .store
            .delete_post(post_id, requester)
            .await?
            .ok_or_else(|| post_not_found(post_id))?;
        tracing::info!(post_id = %post_id, "post deleted");

        self.resolve_post(deleted, Resolve::PostAuthor).await
    }

    pub async fn add_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        text: String,
    ) -> Result<CommentView> {
        let comment = self
            .store
            .insert_comment(post_id, author_id, text)
            .await?
            .ok_or_else(|| post_not_found(post_id))?;
        tracing::info!(post_id = %post_id, comment_id = %comment.id, "comment added");

        let authors = self.lookup_authors(vec![comment.author_id]).await?;
        Ok(render_comment(comment, Some(&authors)))
    }

    pub async fn update_comment(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        requester: Uuid,
        text: String,
    ) -> Result<()> {
        let post = self.load_post(post_id).await?;
        let comment = find_comment(&post, comment_id)?;
        check_comment_ownership(requester, comment)?;

        if !self
            .store
            .update_comment(post_id, comment_id, requester, text)
            .await?
        {
            return Err(comment_not_found(comment_id));
        }
        tracing::info!(post_id = %post_id, comment_id = %comment_id, "comment updated");

        Ok(())
    }

    pub async fn delete_comment(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        requester: Uuid,
    ) -> Result<()> {
        let post = self.load_post(post_id).await?;
        let comment = find_comment(&post, comment_id)?;
        check_comment_ownership(requester, comment)?;

        if !self
            .store
            .delete_comment(post_id, comment_id, requester)
            .await?
        {
            return Err(comment_not_found(comment_id));
        }
        tracing::info!(post_id = %post_id, comment_id = %comment_id, "comment deleted");

        Ok(())
    }

    /// Storage reachability, for health checks
    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await
    }

    async fn load_post(&self, post_id: Uuid) -> Result<Post> {
        self.store
            .find_post(post_id)
            .await?
            .ok_or_else(|| post_not_found(post_id))
    }

    async fn resolve_post(&self, post: Post, resolve: Resolve) -> Result<PostView> {
        let mut author_ids = vec![post.author_id];
        if resolve == Resolve::PostAndCommentAuthors {
            author_ids.extend(post.comments.iter().map(|c| c.author_id));
        }

        let authors = self.lookup_authors(author_ids).await?;
        Ok(render_post(post, &authors, resolve))
    }

    /// One directory round trip per response
    async fn lookup_authors(&self, mut author_ids: Vec<Uuid>) -> Result<HashMap<Uuid, Author>> {
        author_ids.sort_unstable();
        author_ids.dedup();
        self.users.get_users_by_ids(&author_ids).await
    }
}

fn post_not_found(post_id: Uuid) -> AppError {
    AppError::NotFound(format!("post {} not found", post_id))
}

fn comment_not_found(comment_id: Uuid) -> AppError {
    AppError::NotFound(format!("comment {} not found", comment_id))
}

fn find_comment(post: &Post, comment_id: Uuid) -> Result<&Comment> {
    post.comment(comment_id)
        .ok_or_else(|| comment_not_found(comment_id))
}

fn author_ref(author_id: Uuid, authors: Option<&HashMap<Uuid, Author>>) -> AuthorRef {
    match authors.and_then(|a| a.get(&author_id)) {
        Some(author) => AuthorRef::Resolved(author.clone()),
        None => AuthorRef::Id(author_id),
    }
}

fn render_comment(comment: Comment, authors: Option<&HashMap<Uuid, Author>>) -> CommentView {
    CommentView {
        id: comment.id,
        text: comment.text,
        author: author_ref(comment.author_id, authors),
        created_at: comment.created_at,
        updated_at: comment.updated_at,
    }
}

fn render_post(post: Post, authors: &HashMap<Uuid, Author>, resolve: Resolve) -> PostView {
    let comment_authors = match resolve {
        Resolve::PostAuthor => None,
        Resolve::PostAndCommentAuthors => Some(authors),
    };

    PostView {
        id: post.id,
        title: post.title,
        text: post.text,
        author: author_ref(post.author_id, Some(authors)),
        comments: post
            .comments
            .into_iter()
            .map(|c| render_comment(c, comment_authors))
            .collect(),
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{InMemoryPostStore, InMemoryUserDirectory};

    struct Fixture {
        service: PostService,
        store: Arc<InMemoryPostStore>,
        alice: Author,
        bob: Author,
    }

    fn fixture() -> Fixture {
        let alice = Author {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
        };
        let bob = Author {
            id: Uuid::new_v4(),
            username: "bob".to_string(),
        };
        let store = Arc::new(InMemoryPostStore::new());
        let users = Arc::new(InMemoryUserDirectory::new(vec![alice.clone(), bob.clone()]));

        Fixture {
            service: PostService::new(store.clone(), users),
            store,
            alice,
            bob,
        }
    }

    fn new_post(title: &str, text: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn created_post_belongs_to_creator() {
        let f = fixture();

        let created = f
            .service
            .create_post(f.alice.id, new_post("A", "B"))
            .await
            .unwrap();
        assert_eq!(created.author, AuthorRef::Resolved(f.alice.clone()));

        let fetched = f.service.get_post(created.id).await.unwrap();
        assert_eq!(fetched.author.id(), f.alice.id);
        assert_eq!(fetched.author.username(), Some("alice"));
        assert_eq!(fetched.title, "A");
        assert_eq!(fetched.text, "B");
    }

    #[tokio::test]
    async fn list_is_sorted_newest_first() {
        let f = fixture();
        for i in 0..5 {
            f.service
                .create_post(f.alice.id, new_post(&format!("post {i}"), "x"))
                .await
                .unwrap();
        }

        let posts = f.service.list_posts().await.unwrap();
        assert_eq!(posts.len(), 5);
        assert!(posts
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at));
        assert_eq!(posts[0].title, "post 4");
    }

    #[tokio::test]
    async fn list_resolves_post_authors_but_not_comment_authors() {
        let f = fixture();
        let post = f
            .service
            .create_post(f.alice.id, new_post("A", "B"))
            .await
            .unwrap();
        f.service
            .add_comment(post.id, f.bob.id, "hi".to_string())
            .await
            .unwrap();

        let posts = f.service.list_posts().await.unwrap();
        assert_eq!(posts[0].author, AuthorRef::Resolved(f.alice.clone()));
        assert_eq!(posts[0].comments[0].author, AuthorRef::Id(f.bob.id));

        let single = f.service.get_post(post.id).await.unwrap();
        assert_eq!(single.comments[0].author, AuthorRef::Resolved(f.bob.clone()));
    }

    #[tokio::test]
    async fn get_missing_post_is_not_found() {
        let f = fixture();
        let err = f.service.get_post(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_by_author_changes_fields() {
        let f = fixture();
        let post = f
            .service
            .create_post(f.alice.id, new_post("A", "B"))
            .await
            .unwrap();

        let updated = f
            .service
            .update_post(
                post.id,
                f.alice.id,
                PostChanges {
                    title: None,
                    text: Some("edited".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "A");
        assert_eq!(updated.text, "edited");
        assert_eq!(updated.author.id(), f.alice.id);
    }

    #[tokio::test]
    async fn update_by_stranger_is_forbidden_and_leaves_post_untouched() {
        let f = fixture();
        let post = f
            .service
            .create_post(f.alice.id, new_post("A", "B"))
            .await
            .unwrap();

        let err = f
            .service
            .update_post(
                post.id,
                f.bob.id,
                PostChanges {
                    title: Some("hijacked".to_string()),
                    text: Some("hijacked".to_string()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let stored = f.store.find_post(post.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "A");
        assert_eq!(stored.text, "B");
        assert_eq!(stored.author_id, f.alice.id);
    }

    #[tokio::test]
    async fn delete_by_author_removes_post() {
        let f = fixture();
        let post = f
            .service
            .create_post(f.alice.id, new_post("A", "B"))
            .await
            .unwrap();
        f.service
            .add_comment(post.id, f.bob.id, "hi".to_string())
            .await
            .unwrap();

        let deleted = f.service.delete_post(post.id, f.alice.id).await.unwrap();
        assert_eq!(deleted.id, post.id);
        assert_eq!(deleted.comments.len(), 1);

        let err = f.service.get_post(post.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_by_stranger_is_forbidden() {
        let f = fixture();
        let post = f
            .service
            .create_post(f.alice.id, new_post("A", "B"))
            .await
            .unwrap();

        let err = f.service.delete_post(post.id, f.bob.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert!(f.service.get_post(post.id).await.is_ok());
    }

    #[tokio::test]
    async fn add_comment_appends_exactly_one() {
        let f = fixture();
        let post = f
            .service
            .create_post(f.alice.id, new_post("A", "B"))
            .await
            .unwrap();
        f.service
            .add_comment(post.id, f.alice.id, "first".to_string())
            .await
            .unwrap();
        let before = f.service.get_post(post.id).await.unwrap().comments.len();

        let comment = f
            .service
            .add_comment(post.id, f.bob.id, "second".to_string())
            .await
            .unwrap();
        assert_eq!(comment.author, AuthorRef::Resolved(f.bob.clone()));

        let after = f.service.get_post(post.id).await.unwrap();
        assert_eq!(after.comments.len(), before + 1);
        let last = after.comments.last().unwrap();
        assert_eq!(last.id, comment.id);
        assert_eq!(last.author.id(), f.bob.id);
    }

    #[tokio::test]
    async fn add_comment_to_missing_post_is_not_found() {
        let f = fixture();
        let err = f
            .service
            .add_comment(Uuid::new_v4(), f.bob.id, "hi".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn comment_edits_are_restricted_to_comment_author() {
        let f = fixture();
        let post = f
            .service
            .create_post(f.alice.id, new_post("A", "B"))
            .await
            .unwrap();
        let comment = f
            .service
            .add_comment(post.id, f.bob.id, "original".to_string())
            .await
            .unwrap();

        // The post author does not own the comment
        let err = f
            .service
            .update_comment(post.id, comment.id, f.alice.id, "rewritten".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        let err = f
            .service
            .delete_comment(post.id, comment.id, f.alice.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let stored = f.store.find_post(post.id).await.unwrap().unwrap();
        assert_eq!(stored.comments.len(), 1);
        assert_eq!(stored.comments[0].text, "original");

        f.service
            .update_comment(post.id, comment.id, f.bob.id, "edited".to_string())
            .await
            .unwrap();
        let stored = f.store.find_post(post.id).await.unwrap().unwrap();
        assert_eq!(stored.comments[0].text, "edited");

        f.service
            .delete_comment(post.id, comment.id, f.bob.id)
            .await
            .unwrap();
        let stored = f.store.find_post(post.id).await.unwrap().unwrap();
        assert!(stored.comments.is_empty());
    }

    #[tokio::test]
    async fn missing_comment_is_not_found() {
        let f = fixture();
        let post = f
            .service
            .create_post(f.alice.id, new_post("A", "B"))
            .await
            .unwrap();

        let err = f
            .service
            .delete_comment(post.id, Uuid::new_v4(), f.alice.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn unknown_author_renders_as_bare_id() {
        let f = fixture();
        let ghost = Uuid::new_v4();
        let post = f
            .service
            .create_post(ghost, new_post("A", "B"))
            .await
            .unwrap();

        assert_eq!(post.author, AuthorRef::Id(ghost));
    }
}
