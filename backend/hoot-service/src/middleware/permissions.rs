/// Ownership-based permission checks for posts and comments.
///
/// Identities are compared by value; callers must run these before mutating
/// and return the error as-is.
use crate::error::{AppError, Result};
use crate::models::{Comment, Post};
use uuid::Uuid;

/// Check if a user authored a post
pub fn check_post_ownership(user_id: Uuid, post: &Post) -> Result<()> {
    if post.author_id == user_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You're not allowed to do that!".to_string(),
        ))
    }
}

/// Check if a user authored a comment
pub fn check_comment_ownership(user_id: Uuid, comment: &Comment) -> Result<()> {
    if comment.author_id == user_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You are not authorized to modify this comment".to_string(),
        ))
    }
}
