//! Integrity module - typed failures and their classification
//!
//! Everything a mutation can fail with flows through here: guards raise
//! [`DomainError`] values eagerly before storage is touched, storage-level
//! failures arrive wrapped in [`crate::storage::StorageError`], and
//! [`classify`] turns either into the stable client-facing response tuple.

pub mod catalog;
pub mod classify;
pub mod code;
pub mod extract;

pub use classify::classify;
pub use code::{ErrorCode, FieldCode, FieldKind};

use crate::storage::StorageError;
use std::collections::BTreeMap;
use thiserror::Error;

/// Domain-raised mutation failure, carrying enough context to classify
/// without any string inspection.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} not found with {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("{entity} with {field} already exists")]
    Duplicate {
        entity: &'static str,
        field: &'static str,
    },

    #[error("{field} references missing {target}")]
    FkNotFound {
        entity: &'static str,
        field: &'static str,
        target: &'static str,
    },

    #[error("{field} is required")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// Delete blocked because a child collection still references the record.
    #[error("{entity} has dependent {child} records")]
    RefIntegrity {
        entity: &'static str,
        child: &'static str,
    },

    /// Payload shape failures, all failing fields collected.
    #[error("validation failed")]
    Validation(BTreeMap<String, String>),

    /// Anything the guards did not anticipate: constraint races, stale
    /// versions, driver faults.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl DomainError {
    pub fn not_found_by_id(entity: &'static str, id: i64) -> Self {
        Self::NotFound {
            entity,
            key: format!("id={id}"),
        }
    }

    pub fn not_found_by_uuid(entity: &'static str, uuid: &uuid::Uuid) -> Self {
        Self::NotFound {
            entity,
            key: format!("uuid={uuid}"),
        }
    }
}
