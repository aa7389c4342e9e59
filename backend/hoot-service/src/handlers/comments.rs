/// Comment handlers - comments live under their parent post
use crate::error::Result;
use crate::middleware::UserId;
use crate::services::PostService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 1, message = "text must not be empty"))]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentPath {
    pub post_id: Uuid,
    pub comment_id: Uuid,
}

pub async fn create_comment(
    service: web::Data<PostService>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
    req: web::Json<CommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let comment = service
        .add_comment(post_id.into_inner(), user_id.0, req.into_inner().text)
        .await?;

    Ok(HttpResponse::Created().json(comment))
}

pub async fn update_comment(
    service: web::Data<PostService>,
    user_id: UserId,
    path: web::Path<CommentPath>,
    req: web::Json<CommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    service
        .update_comment(
            path.post_id,
            path.comment_id,
            user_id.0,
            req.into_inner().text,
        )
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Comment updated successfully!" })))
}

pub async fn delete_comment(
    service: web::Data<PostService>,
    user_id: UserId,
    path: web::Path<CommentPath>,
) -> Result<HttpResponse> {
    service
        .delete_comment(path.post_id, path.comment_id, user_id.0)
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Comment deleted successfully!" })))
}
