//! Request/response shapes for the HTTP surface.

pub mod payload;
pub mod query;

pub use query::ListPageQuery;
