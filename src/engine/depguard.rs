//! Dependency guard - "does any other entity still reference me" checks run
//! before a delete
//!
//! Rules are counted in declared order and the first nonzero count refuses
//! the delete, naming that child collection. Only a clean sweep permits the
//! removal.

use crate::integrity::DomainError;
use crate::schema::{self, EntityDef};
use crate::storage::EntityStore;
use serde_json::json;

pub async fn guard_delete<S: EntityStore>(
    store: &S,
    def: &'static EntityDef,
    id: i64,
) -> Result<(), DomainError> {
    for rule in def.dependents {
        let child = schema::def(rule.child).ok_or_else(|| {
            DomainError::InvalidValue(format!("unknown dependent entity {}", rule.child))
        })?;
        let count = store.count_by(child, rule.lookup_key, &json!(id)).await?;
        if count > 0 {
            return Err(DomainError::RefIntegrity {
                entity: def.name,
                child: rule.child,
            });
        }
    }
    Ok(())
}
