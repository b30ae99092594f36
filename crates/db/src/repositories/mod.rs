//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod favorite_repo;
pub mod push_endpoint_repo;
pub mod recipe_repo;

pub use favorite_repo::FavoriteRepo;
pub use push_endpoint_repo::PushEndpointRepo;
pub use recipe_repo::RecipeRepo;
