/// HTTP handlers for hoot-service
///
/// - Posts: list, read, create, update, delete
/// - Comments: create, update, delete under `/posts/{post_id}/comments`
/// - Health: storage ping and liveness
pub mod comments;
pub mod health;
pub mod posts;

pub use comments::{create_comment, delete_comment, update_comment};
pub use health::{health_summary, liveness_check};
pub use posts::{create_post, delete_post, get_post, list_posts, update_post};

use crate::error::AppError;
use crate::middleware::JwtAuthMiddleware;
use actix_web::web;

/// Register every route of the service.
///
/// Health routes are public; everything under `/posts` goes through
/// `JwtAuthMiddleware`. Malformed JSON bodies and path ids become 400s.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid request body: {}", err)).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid path: {}", err)).into()
    }))
    .route("/health", web::get().to(health_summary))
    .route("/health/live", web::get().to(liveness_check))
    .service(
        web::scope("/posts")
            .wrap(JwtAuthMiddleware)
            .service(
                web::resource("")
                    .route(web::get().to(list_posts))
                    .route(web::post().to(create_post)),
            )
            .service(
                web::resource("/{post_id}")
                    .route(web::get().to(get_post))
                    .route(web::put().to(update_post))
                    .route(web::delete().to(delete_post)),
            )
            .service(web::resource("/{post_id}/comments").route(web::post().to(create_comment)))
            .service(
                web::resource("/{post_id}/comments/{comment_id}")
                    .route(web::put().to(update_comment))
                    .route(web::delete().to(delete_comment)),
            ),
    );
}
