//! Entity services - the generic CRUD handler set
//!
//! Every handler resolves the `{entity}` path segment against the registry
//! and delegates to a [`MutationService`] over the shared store. Failures
//! flow through `AppError::from(DomainError)`, which runs the classifier, so
//! the response envelope is identical no matter where a failure originated.

use crate::core::{AppError, AppState};
use crate::dtos::ListPageQuery;
use crate::engine::MutationService;
use crate::integrity::DomainError;
use crate::record::Record;
use crate::schema::{self, EntityDef};
use crate::storage::EntityStore;
use axum::{
    extract::{Json, Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

fn resolve(entity: &str) -> Result<&'static EntityDef, AppError> {
    schema::def(entity).ok_or_else(|| AppError::not_found(format!("unknown entity {entity}")))
}

#[instrument(skip(state))]
pub async fn list<S: EntityStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(entity): Path<String>,
) -> Result<Json<Vec<Record>>, AppError> {
    let def = resolve(&entity)?;
    let service = MutationService::new(def, &state.store);
    let records = service.find_all(None).await.map_err(AppError::from)?;
    debug!(count = records.len(), "listed records");
    Ok(Json(records))
}

#[instrument(skip(state))]
pub async fn page<S: EntityStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(entity): Path<String>,
    Query(query): Query<ListPageQuery>,
) -> Result<Json<Vec<Record>>, AppError> {
    let def = resolve(&entity)?;
    let service = MutationService::new(def, &state.store);
    let records = service
        .find_all(Some(query.into_page()))
        .await
        .map_err(AppError::from)?;
    Ok(Json(records))
}

#[instrument(skip(state))]
pub async fn get_by_id<S: EntityStore>(
    State(state): State<Arc<AppState<S>>>,
    Path((entity, id)): Path<(String, i64)>,
) -> Result<Json<Record>, AppError> {
    let def = resolve(&entity)?;
    let service = MutationService::new(def, &state.store);
    let record = service
        .find_by_id(id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::from(DomainError::not_found_by_id(def.name, id)))?;
    Ok(Json(record))
}

#[instrument(skip(state))]
pub async fn get_by_uuid<S: EntityStore>(
    State(state): State<Arc<AppState<S>>>,
    Path((entity, uuid)): Path<(String, Uuid)>,
) -> Result<Json<Record>, AppError> {
    let def = resolve(&entity)?;
    let service = MutationService::new(def, &state.store);
    let record = service
        .find_by_uuid(&uuid)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::from(DomainError::not_found_by_uuid(def.name, &uuid)))?;
    Ok(Json(record))
}

#[instrument(skip(state, body))]
pub async fn create<S: EntityStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(entity): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let def = resolve(&entity)?;
    let service = MutationService::new(def, &state.store);
    let record = service.create(body).await.map_err(AppError::from)?;
    info!(entity = def.name, id = record.id(), "record created");
    let location = record
        .uuid()
        .map(|uuid| format!("/api/{}/uuid/{}", def.name, uuid))
        .unwrap_or_else(|| format!("/api/{}", def.name));
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(record),
    ))
}

#[instrument(skip(state, body))]
pub async fn put<S: EntityStore>(
    State(state): State<Arc<AppState<S>>>,
    Path((entity, id)): Path<(String, i64)>,
    Json(body): Json<Value>,
) -> Result<Json<Record>, AppError> {
    let def = resolve(&entity)?;
    let service = MutationService::new(def, &state.store);
    let record = service.update(id, body).await.map_err(AppError::from)?;
    info!(entity = def.name, id, "record replaced");
    Ok(Json(record))
}

#[instrument(skip(state, body))]
pub async fn patch<S: EntityStore>(
    State(state): State<Arc<AppState<S>>>,
    Path((entity, id)): Path<(String, i64)>,
    Json(body): Json<Value>,
) -> Result<Json<Record>, AppError> {
    let def = resolve(&entity)?;
    let service = MutationService::new(def, &state.store);
    let record = service.patch(id, body).await.map_err(AppError::from)?;
    info!(entity = def.name, id, "record patched");
    Ok(Json(record))
}

#[instrument(skip(state))]
pub async fn delete_by_id<S: EntityStore>(
    State(state): State<Arc<AppState<S>>>,
    Path((entity, id)): Path<(String, i64)>,
) -> Result<StatusCode, AppError> {
    let def = resolve(&entity)?;
    let service = MutationService::new(def, &state.store);
    service.delete_by_id(id).await.map_err(AppError::from)?;
    info!(entity = def.name, id, "record deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn delete_by_uuid<S: EntityStore>(
    State(state): State<Arc<AppState<S>>>,
    Path((entity, uuid)): Path<(String, Uuid)>,
) -> Result<StatusCode, AppError> {
    let def = resolve(&entity)?;
    let service = MutationService::new(def, &state.store);
    service.delete_by_uuid(&uuid).await.map_err(AppError::from)?;
    info!(entity = def.name, %uuid, "record deleted by uuid");
    Ok(StatusCode::NO_CONTENT)
}
