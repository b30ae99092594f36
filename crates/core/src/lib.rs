//! Forkful domain layer.
//!
//! Dependency-light building blocks shared by the persistence, push,
//! and API crates:
//!
//! - [`error::CoreError`] — the domain error taxonomy.
//! - [`query`] — facet-parameter normalization into a canonical
//!   [`query::RecipeQuery`].
//! - [`pagination::PageInfo`] — pure pagination math.
//! - [`cache::TtlCache`] — time-bounded memoization for query results.

pub mod cache;
pub mod error;
pub mod pagination;
pub mod query;
pub mod types;

pub use error::CoreError;
