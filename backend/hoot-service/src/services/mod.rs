/// Business logic layer for hoot-service
///
/// `PostService` runs each request as read, authorize, write, and joins
/// author identities into the returned views.
pub mod posts;

pub use posts::PostService;
