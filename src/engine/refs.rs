//! Reference resolver - lazy handles to records in referenced collections
//!
//! A `ForeignRef` names a row in the referenced collection without loading
//! it. The precheck guard probes it for existence; persistence itself
//! proceeds with the raw key, so a referenced record deleted between the
//! probe and the commit still fails the write through the storage engine's
//! own foreign-key enforcement, classified on the storage path.

use crate::integrity::DomainError;
use crate::record;
use crate::schema::{self, EntityDef};
use crate::storage::{EntityStore, StorageError};
use serde_json::{Value, json};

pub struct ForeignRef {
    pub target: &'static EntityDef,
    pub key: i64,
}

impl ForeignRef {
    pub fn new(target_name: &'static str, value: &Value) -> Result<Self, DomainError> {
        let target = schema::def(target_name).ok_or_else(|| {
            DomainError::InvalidValue(format!("unknown referenced entity {target_name}"))
        })?;
        let key = value.as_i64().ok_or_else(|| {
            DomainError::InvalidValue(format!("foreign key must be an integer, got {value}"))
        })?;
        Ok(Self { target, key })
    }

    /// Existence probe against the referenced collection.
    pub async fn exists<S: EntityStore>(&self, store: &S) -> Result<bool, StorageError> {
        store
            .exists_by(self.target, record::ID, &json!(self.key), None)
            .await
    }
}
