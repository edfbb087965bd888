//! Services module - HTTP handlers for the entity API
//!
//! One generic handler set serves every registered entity; the path segment
//! selects the definition and an unknown segment gets the same enveloped 404
//! as a missing record.

pub mod entity;

pub use entity::{
    create, delete_by_id, delete_by_uuid, get_by_id, get_by_uuid, list, page, patch, put,
};

use axum::{http::StatusCode, response::IntoResponse};

/// Root endpoint - health check
pub async fn root() -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}
