//! Mutation service - per-entity orchestration of the write pipeline
//!
//! One generic service instead of one hand-written class per entity: the
//! entity's `EntityDef` supplies every field and dependency rule. Reads pass
//! through to storage; writes run shape check -> precheck -> merge ->
//! storage, with the precheck judging the submitted payload itself (a patch
//! that omits a required field is refused, exactly like a full replace), and
//! deletes swap the precheck for the dependency guard.

use super::{depguard, merge, precheck};
use crate::dtos::payload;
use crate::integrity::DomainError;
use crate::record::Record;
use crate::schema::EntityDef;
use crate::storage::{EntityStore, Page};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

pub struct MutationService<'a, S> {
    def: &'static EntityDef,
    store: &'a S,
}

impl<'a, S: EntityStore> MutationService<'a, S> {
    pub fn new(def: &'static EntityDef, store: &'a S) -> Self {
        Self { def, store }
    }

    pub async fn create(&self, body: Value) -> Result<Record, DomainError> {
        let payload = payload::into_record(self.def, body)?;
        precheck::precheck_create(self.store, self.def, &payload).await?;
        let record = merge::build_create(self.def, payload);
        debug!(entity = self.def.name, "creating record");
        Ok(self.store.insert(self.def, record).await?)
    }

    /// Full replace. 404 when the record is absent; identity and audit
    /// fields are preserved per the merge rules.
    pub async fn update(&self, id: i64, body: Value) -> Result<Record, DomainError> {
        let payload = payload::into_record(self.def, body)?;
        let current = self.load(id).await?;
        precheck::precheck_update(self.store, self.def, id, &payload).await?;
        let merged = merge::build_replace(self.def, &current, payload);
        debug!(entity = self.def.name, id, "replacing record");
        Ok(self.store.update(self.def, id, merged).await?)
    }

    /// Partial patch. Only supplied declared fields are applied onto the
    /// stored record, but the payload is judged by the same rules as a full
    /// replace: omitting a required field refuses the patch.
    pub async fn patch(&self, id: i64, body: Value) -> Result<Record, DomainError> {
        let payload = payload::into_record(self.def, body)?;
        let current = self.load(id).await?;
        precheck::precheck_update(self.store, self.def, id, &payload).await?;
        let merged = merge::apply_patch(self.def, current, &payload);
        debug!(entity = self.def.name, id, "patching record");
        Ok(self.store.update(self.def, id, merged).await?)
    }

    /// Delete addressed by primary identity: absence is an error.
    pub async fn delete_by_id(&self, id: i64) -> Result<(), DomainError> {
        if self.store.find_by_id(self.def, id).await?.is_none() {
            return Err(DomainError::not_found_by_id(self.def.name, id));
        }
        depguard::guard_delete(self.store, self.def, id).await?;
        Ok(self.store.delete_by_id(self.def, id).await?)
    }

    /// Delete addressed by external identifier: absence is a silent no-op.
    /// The asymmetry with [`Self::delete_by_id`] is deliberate, documented
    /// behavior per operation.
    pub async fn delete_by_uuid(&self, uuid: &Uuid) -> Result<(), DomainError> {
        let Some(record) = self.store.find_by_uuid(self.def, uuid).await? else {
            return Ok(());
        };
        let id = record
            .id()
            .ok_or_else(|| DomainError::InvalidValue("persisted record has no id".to_string()))?;
        depguard::guard_delete(self.store, self.def, id).await?;
        Ok(self.store.delete_by_id(self.def, id).await?)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Record>, DomainError> {
        Ok(self.store.find_by_id(self.def, id).await?)
    }

    pub async fn find_by_uuid(&self, uuid: &Uuid) -> Result<Option<Record>, DomainError> {
        Ok(self.store.find_by_uuid(self.def, uuid).await?)
    }

    pub async fn find_all(&self, page: Option<Page>) -> Result<Vec<Record>, DomainError> {
        Ok(self.store.find_all(self.def, page).await?)
    }

    async fn load(&self, id: i64) -> Result<Record, DomainError> {
        self.store
            .find_by_id(self.def, id)
            .await?
            .ok_or_else(|| DomainError::not_found_by_id(self.def.name, id))
    }
}
