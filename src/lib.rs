//! Server library - exposes the main modules for the integration tests

pub mod core;
pub mod dtos;
pub mod engine;
pub mod integrity;
pub mod record;
pub mod schema;
pub mod services;
pub mod storage;

pub use crate::core::{AppError, AppState, Config};
pub use crate::services::root;

use axum::{Router, routing::get};
use std::sync::Arc;
use storage::EntityStore;
use tower_http::cors::CorsLayer;

/// Builds the application router. Generic over the storage engine so the
/// integration tests can run the full HTTP surface against the in-memory
/// store.
pub fn create_router<S: EntityStore + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/api", configure_entity_routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// One route set serves every registered entity; the `{entity}` segment picks
/// the definition at request time.
fn configure_entity_routes<S: EntityStore + 'static>() -> Router<Arc<AppState<S>>> {
    use services::entity::*;

    Router::new()
        .route("/{entity}", get(list::<S>).post(create::<S>))
        .route("/{entity}/page", get(page::<S>))
        .route(
            "/{entity}/{id}",
            get(get_by_id::<S>)
                .put(put::<S>)
                .patch(patch::<S>)
                .delete(delete_by_id::<S>),
        )
        .route(
            "/{entity}/uuid/{uuid}",
            get(get_by_uuid::<S>).delete(delete_by_uuid::<S>),
        )
}
