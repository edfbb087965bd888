//! Precheck guard - required-field, duplicate and foreign-key checks run
//! before a write reaches storage
//!
//! Two passes over the entity's field rules, in declared order: required
//! checks first (so a missing value is reported as missing, never as a failed
//! lookup), then duplicate and foreign-key existence checks for the values
//! that are present. The guard fails fast on the first violated rule; callers
//! get one actionable error per request from this path.

use super::refs::ForeignRef;
use crate::integrity::DomainError;
use crate::record::Record;
use crate::schema::EntityDef;
use crate::storage::EntityStore;

pub async fn precheck_create<S: EntityStore>(
    store: &S,
    def: &'static EntityDef,
    payload: &Record,
) -> Result<(), DomainError> {
    precheck(store, def, payload, None, true).await
}

/// Same as create, except duplicate checks exclude the record being updated:
/// a record is never a duplicate of itself.
pub async fn precheck_update<S: EntityStore>(
    store: &S,
    def: &'static EntityDef,
    id: i64,
    payload: &Record,
) -> Result<(), DomainError> {
    precheck(store, def, payload, Some(id), false).await
}

async fn precheck<S: EntityStore>(
    store: &S,
    def: &'static EntityDef,
    payload: &Record,
    exclude_id: Option<i64>,
    on_create: bool,
) -> Result<(), DomainError> {
    for field in def.fields {
        let required = if on_create {
            field.required_on_create
        } else {
            field.required_on_update
        };
        if required && !payload.contains(field.name) {
            return Err(DomainError::MissingField {
                entity: def.name,
                field: field.name,
            });
        }
    }

    for field in def.fields {
        let Some(value) = payload.get(field.name) else {
            continue;
        };
        if field.unique && store.exists_by(def, field.name, value, exclude_id).await? {
            return Err(DomainError::Duplicate {
                entity: def.name,
                field: field.name,
            });
        }
        if let Some(target) = field.references {
            let handle = ForeignRef::new(target, value)?;
            if !handle.exists(store).await? {
                return Err(DomainError::FkNotFound {
                    entity: def.name,
                    field: field.name,
                    target,
                });
            }
        }
    }
    Ok(())
}
