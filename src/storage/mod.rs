//! Storage module - collaborator interface to the persistence engine
//!
//! The engine talks to storage only through [`EntityStore`]. Storage owns the
//! atomic enforcement of uniqueness, foreign keys and the optimistic version
//! counter; whatever it rejects surfaces as a [`StorageError`] that the
//! classifier translates, so no raw driver failure ever reaches a caller.

pub mod memory;
pub mod mysql;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

use crate::record::Record;
use crate::schema::EntityDef;
use serde_json::Value;
use std::future::Future;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StorageError {
    /// A uniqueness / foreign-key / not-null constraint fired inside storage.
    /// `constraint` carries the structured identifier when the driver reports
    /// one; the message text is kept for heuristic extraction otherwise.
    #[error("integrity constraint violated: {message}")]
    Integrity {
        constraint: Option<String>,
        message: String,
    },

    /// The submitted optimistic-concurrency token no longer matches storage.
    #[error("stale version submitted for {entity} id={id} (submitted {submitted}, current {current})")]
    VersionConflict {
        entity: &'static str,
        id: i64,
        submitted: i64,
        current: i64,
    },

    /// A row the engine had just loaded is gone.
    #[error("{entity} row missing for id={id}")]
    RowMissing { entity: &'static str, id: i64 },

    #[error("database driver failure")]
    Driver(#[from] sqlx::Error),
}

/// Page request for list reads, zero-based.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub page: u64,
    pub size: u64,
}

/// Persistence operations the mutation engine is written against.
///
/// Each mutating call is one atomic unit: the write, the audit-field
/// assignment and the version bump commit together or not at all.
pub trait EntityStore: Send + Sync {
    /// Inserts a fresh record; storage assigns identity, audit timestamps and
    /// the initial version, and returns the persisted record.
    fn insert(
        &self,
        def: &'static EntityDef,
        record: Record,
    ) -> impl Future<Output = Result<Record, StorageError>> + Send;

    /// Writes a fully merged record over the row `id`. The record's `version`
    /// field is the submitted optimistic-concurrency token; a mismatch with
    /// the stored row fails the write.
    fn update(
        &self,
        def: &'static EntityDef,
        id: i64,
        record: Record,
    ) -> impl Future<Output = Result<Record, StorageError>> + Send;

    fn find_by_id(
        &self,
        def: &'static EntityDef,
        id: i64,
    ) -> impl Future<Output = Result<Option<Record>, StorageError>> + Send;

    fn find_by_uuid(
        &self,
        def: &'static EntityDef,
        uuid: &Uuid,
    ) -> impl Future<Output = Result<Option<Record>, StorageError>> + Send;

    fn find_all(
        &self,
        def: &'static EntityDef,
        page: Option<Page>,
    ) -> impl Future<Output = Result<Vec<Record>, StorageError>> + Send;

    /// Whether any row (other than `exclude_id`, when given) holds `value` in
    /// `field`. Soft-deleted rows count: their uniqueness constraints stay in
    /// force until the row is purged.
    fn exists_by(
        &self,
        def: &'static EntityDef,
        field: &str,
        value: &Value,
        exclude_id: Option<i64>,
    ) -> impl Future<Output = Result<bool, StorageError>> + Send;

    /// Number of live rows holding `value` in `field`. Soft-deleted rows do
    /// not count: a hidden dependent must not block its parent's delete.
    fn count_by(
        &self,
        def: &'static EntityDef,
        field: &str,
        value: &Value,
    ) -> impl Future<Output = Result<i64, StorageError>> + Send;

    /// Removes the row, or marks it deleted when the def has the soft-delete
    /// capability. Absence is not an error at this level.
    fn delete_by_id(
        &self,
        def: &'static EntityDef,
        id: i64,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}
