//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod catalog_repo;
pub mod comment_repo;
pub mod review_repo;
pub mod title_repo;
pub mod user_repo;

pub use catalog_repo::CatalogRepo;
pub use comment_repo::CommentRepo;
pub use review_repo::ReviewRepo;
pub use title_repo::TitleRepo;
pub use user_repo::UserRepo;
