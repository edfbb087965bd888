//! Merge engine - computes the next persisted state of a record
//!
//! Pure functions over records; storage assigns identity, audit timestamps
//! and the version bump afterwards. The identity fields (`id`, `uuid`,
//! `created_at`) are never taken from an update payload: full replace carries
//! them over from the stored record regardless of what the caller sent, and
//! partial patch only ever touches declared fields the caller supplied.

use crate::record::{self, Record};
use crate::schema::EntityDef;
use serde_json::json;
use uuid::Uuid;

/// Fresh record for a create. The external identifier is assigned once here
/// when the payload did not bring one.
pub fn build_create(def: &EntityDef, payload: Record) -> Record {
    let mut rec = Record::new();
    let uuid = payload.uuid().unwrap_or_else(Uuid::new_v4);
    rec.set(record::UUID, json!(uuid.to_string()));
    for field in def.fields {
        if let Some(value) = payload.get(field.name) {
            rec.set(field.name, value.clone());
        }
    }
    rec
}

/// Full replace (PUT). The record is rebuilt from the payload's declared
/// fields; identity is forced to the stored record's, and the version is the
/// payload's when submitted (optimistic-concurrency token) or carried over
/// otherwise so an omitted version never reads as a stale one.
pub fn build_replace(def: &EntityDef, current: &Record, payload: Record) -> Record {
    let mut rec = Record::new();
    for field in def.fields {
        if let Some(value) = payload.get(field.name) {
            rec.set(field.name, value.clone());
        }
    }
    for immutable in [record::ID, record::UUID, record::CREATED_AT] {
        if let Some(value) = current.get(immutable) {
            rec.set(immutable, value.clone());
        }
    }
    match payload.get(record::VERSION) {
        Some(version) => rec.set(record::VERSION, version.clone()),
        None => {
            if let Some(version) = current.get(record::VERSION) {
                rec.set(record::VERSION, version.clone());
            }
        }
    }
    rec
}

/// Partial patch (PATCH). Supplied declared fields overlay the stored record
/// in place; everything else stays untouched.
pub fn apply_patch(def: &EntityDef, current: Record, payload: &Record) -> Record {
    let mut rec = current;
    for field in def.fields {
        if let Some(value) = payload.get(field.name) {
            rec.set(field.name, value.clone());
        }
    }
    if let Some(version) = payload.get(record::VERSION) {
        rec.set(record::VERSION, version.clone());
    }
    rec
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;
    use serde_json::json;

    fn stored_warehouse() -> Record {
        let mut rec = Record::new();
        rec.set(record::ID, json!(3));
        rec.set(record::UUID, json!("f6a7f5a0-1111-4222-8333-444455556666"));
        rec.set(record::CREATED_AT, json!("2026-01-01T00:00:00+00:00"));
        rec.set(record::UPDATED_AT, json!("2026-02-01T00:00:00+00:00"));
        rec.set(record::VERSION, json!(5));
        rec.set("code", json!("WH-01"));
        rec.set("name", json!("Main"));
        rec.set("enterprise_id", json!(1));
        rec
    }

    #[test]
    fn create_assigns_external_identifier_once() {
        let def = schema::def("warehouse").unwrap();
        let mut payload = Record::new();
        payload.set("code", json!("WH-01"));
        let rec = build_create(def, payload);
        assert!(rec.uuid().is_some());

        let mut payload = Record::new();
        payload.set(record::UUID, json!("f6a7f5a0-1111-4222-8333-444455556666"));
        let rec = build_create(def, payload);
        assert_eq!(
            rec.get(record::UUID),
            Some(&json!("f6a7f5a0-1111-4222-8333-444455556666"))
        );
    }

    #[test]
    fn replace_preserves_identity_fields_when_payload_omits_them() {
        let def = schema::def("warehouse").unwrap();
        let current = stored_warehouse();
        let mut payload = Record::new();
        payload.set("code", json!("WH-02"));
        payload.set("name", json!("Secondary"));
        payload.set("enterprise_id", json!(1));

        let rec = build_replace(def, &current, payload);
        assert_eq!(rec.id(), Some(3));
        assert_eq!(
            rec.get(record::UUID),
            Some(&json!("f6a7f5a0-1111-4222-8333-444455556666"))
        );
        assert_eq!(
            rec.get(record::CREATED_AT),
            Some(&json!("2026-01-01T00:00:00+00:00"))
        );
        assert_eq!(rec.version(), Some(5));
        assert_eq!(rec.get("code"), Some(&json!("WH-02")));
    }

    #[test]
    fn replace_never_takes_identity_from_the_payload() {
        let def = schema::def("warehouse").unwrap();
        let current = stored_warehouse();
        let mut payload = Record::new();
        payload.set(record::ID, json!(99));
        payload.set(record::UUID, json!("00000000-0000-4000-8000-000000000000"));
        payload.set(record::CREATED_AT, json!("1999-01-01T00:00:00+00:00"));
        payload.set("code", json!("WH-02"));
        payload.set("name", json!("Main"));
        payload.set("enterprise_id", json!(1));

        let rec = build_replace(def, &current, payload);
        assert_eq!(rec.id(), Some(3));
        assert_eq!(
            rec.get(record::UUID),
            Some(&json!("f6a7f5a0-1111-4222-8333-444455556666"))
        );
        assert_eq!(
            rec.get(record::CREATED_AT),
            Some(&json!("2026-01-01T00:00:00+00:00"))
        );
    }

    #[test]
    fn replace_uses_submitted_version_as_the_lock_token() {
        let def = schema::def("warehouse").unwrap();
        let current = stored_warehouse();
        let mut payload = Record::new();
        payload.set("code", json!("WH-02"));
        payload.set("name", json!("Main"));
        payload.set("enterprise_id", json!(1));
        payload.set(record::VERSION, json!(2));

        let rec = build_replace(def, &current, payload);
        assert_eq!(rec.version(), Some(2));
    }

    #[test]
    fn replace_drops_declared_fields_the_payload_omits() {
        let def = schema::def("enterprise").unwrap();
        let mut current = Record::new();
        current.set(record::ID, json!(1));
        current.set("name", json!("Acme"));
        current.set("location", json!("Rome"));
        let mut payload = Record::new();
        payload.set("name", json!("Acme"));

        let rec = build_replace(def, &current, payload);
        assert_eq!(rec.get("location"), None);
    }

    #[test]
    fn patch_touches_only_supplied_fields() {
        let def = schema::def("warehouse").unwrap();
        let current = stored_warehouse();
        let mut payload = Record::new();
        payload.set("name", json!("Renamed"));

        let rec = apply_patch(def, current.clone(), &payload);
        assert_eq!(rec.get("name"), Some(&json!("Renamed")));
        assert_eq!(rec.get("code"), current.get("code"));
        assert_eq!(rec.get("enterprise_id"), current.get("enterprise_id"));
        assert_eq!(rec.get(record::UUID), current.get(record::UUID));
        assert_eq!(rec.version(), current.version());
    }
}
