//! Record - dynamic representation of one persisted row
//!
//! Every entity is carried through the engine as a JSON object map instead of a
//! per-entity struct. The distinction between an absent field and an explicit
//! `null` matters for merge semantics: a key that is missing or mapped to `null`
//! counts as "not supplied" and is never copied onto a stored record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Storage-assigned primary identity, immutable after creation.
pub const ID: &str = "id";
/// Globally unique external identifier, assigned once at creation.
pub const UUID: &str = "uuid";
/// Creation timestamp, immutable after creation.
pub const CREATED_AT: &str = "created_at";
/// Update timestamp, set by storage on every successful write.
pub const UPDATED_AT: &str = "updated_at";
/// Optimistic-concurrency counter, bumped by storage on each update.
pub const VERSION: &str = "version";
/// Soft-delete marker, only meaningful for defs with the capability enabled.
pub const DELETED: &str = "deleted";
pub const DELETED_AT: &str = "deleted_at";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Returns the value for `field`, treating an explicit JSON `null` as absent.
    pub fn get(&self, field: &str) -> Option<&Value> {
        match self.0.get(field) {
            Some(Value::Null) | None => None,
            Some(v) => Some(v),
        }
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn set(&mut self, field: &str, value: Value) {
        self.0.insert(field.to_string(), value);
    }

    pub fn id(&self) -> Option<i64> {
        self.get(ID).and_then(Value::as_i64)
    }

    pub fn uuid(&self) -> Option<Uuid> {
        self.get(UUID)
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
    }

    pub fn version(&self) -> Option<i64> {
        self.get(VERSION).and_then(Value::as_i64)
    }

    /// Parses a timestamp field stored in RFC 3339 form.
    pub fn timestamp(&self, field: &str) -> Option<DateTime<Utc>> {
        self.get(field)
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn is_deleted(&self) -> bool {
        self.get(DELETED).and_then(Value::as_bool).unwrap_or(false)
    }

}
