/// Post handlers - HTTP endpoints for post operations
use crate::error::Result;
use crate::middleware::UserId;
use crate::models::{NewPost, PostChanges};
use crate::services::PostService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "text must not be empty"))]
    pub text: String,
}

/// Partial update; omitted fields keep their stored value
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "text must not be empty"))]
    pub text: Option<String>,
}

/// List all posts, newest first
pub async fn list_posts(service: web::Data<PostService>) -> Result<HttpResponse> {
    let posts = service.list_posts().await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// Get a post by ID with its comments
pub async fn get_post(
    service: web::Data<PostService>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = service.get_post(post_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Create a new post authored by the caller
pub async fn create_post(
    service: web::Data<PostService>,
    user_id: UserId,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let req = req.into_inner();

    let post = service
        .create_post(
            user_id.0,
            NewPost {
                title: req.title,
                text: req.text,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(post))
}

/// Update title and/or text of the caller's post
pub async fn update_post(
    service: web::Data<PostService>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
    req: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let req = req.into_inner();

    let post = service
        .update_post(
            post_id.into_inner(),
            user_id.0,
            PostChanges {
                title: req.title,
                text: req.text,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(post))
}

/// Delete the caller's post and its comments
pub async fn delete_post(
    service: web::Data<PostService>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = service.delete_post(post_id.into_inner(), user_id.0).await?;
    Ok(HttpResponse::Ok().json(post))
}
