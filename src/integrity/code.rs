//! Error taxonomy - the closed set of client-facing error codes
//!
//! Two tiers: generic kinds, and per-field specific codes that refine them.
//! The rendered names are part of the API contract and must stay stable
//! (`PRODUCT_SKU_DUPLICATE`, `CLIENT_WAREHOUSE_ID_FK_VIOLATION`, ...).

use axum::http::StatusCode;
use std::fmt;

/// What a field-specific code refines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Required,
    Duplicate,
    FkViolation,
}

/// Field-specific code, rendered as `<ENTITY><FIELD>_<KIND>` with the entity
/// segment stripped of underscores (`stock_level` -> `STOCKLEVEL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldCode {
    pub entity: &'static str,
    pub field: &'static str,
    pub kind: FieldKind,
}

impl FieldCode {
    pub const fn new(entity: &'static str, field: &'static str, kind: FieldKind) -> Self {
        Self {
            entity,
            field,
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotFound,
    Duplicate,
    FkNotFound,
    BadRequest,
    RefIntegrity,
    ValidationError,
    DataIntegrity,
    InternalError,
    Field(FieldCode),
}

impl ErrorCode {
    pub const fn required(entity: &'static str, field: &'static str) -> Self {
        Self::Field(FieldCode::new(entity, field, FieldKind::Required))
    }

    pub const fn duplicate(entity: &'static str, field: &'static str) -> Self {
        Self::Field(FieldCode::new(entity, field, FieldKind::Duplicate))
    }

    pub const fn fk_violation(entity: &'static str, field: &'static str) -> Self {
        Self::Field(FieldCode::new(entity, field, FieldKind::FkViolation))
    }

    /// Whether the code belongs to the duplicate class; constraint failures
    /// resolving here map to 409 instead of 422.
    pub fn is_duplicate_class(&self) -> bool {
        matches!(
            self,
            ErrorCode::Duplicate
                | ErrorCode::Field(FieldCode {
                    kind: FieldKind::Duplicate,
                    ..
                })
        )
    }

    /// Canonical status class for domain-raised failures carrying this code.
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Duplicate | ErrorCode::RefIntegrity => StatusCode::CONFLICT,
            ErrorCode::FkNotFound | ErrorCode::ValidationError | ErrorCode::DataIntegrity => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            // Field codes only surface through the constraint catalog, so
            // each one carries exactly one status class.
            ErrorCode::Field(fc) => match fc.kind {
                FieldKind::Required => StatusCode::UNPROCESSABLE_ENTITY,
                FieldKind::Duplicate => StatusCode::CONFLICT,
                FieldKind::FkViolation => StatusCode::UNPROCESSABLE_ENTITY,
            },
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::NotFound => f.write_str("NOT_FOUND"),
            ErrorCode::Duplicate => f.write_str("DUPLICATE"),
            ErrorCode::FkNotFound => f.write_str("FK_NOT_FOUND"),
            ErrorCode::BadRequest => f.write_str("BAD_REQUEST"),
            ErrorCode::RefIntegrity => f.write_str("REF_INTEGRITY"),
            ErrorCode::ValidationError => f.write_str("VALIDATION_ERROR"),
            ErrorCode::DataIntegrity => f.write_str("DATA_INTEGRITY"),
            ErrorCode::InternalError => f.write_str("INTERNAL_ERROR"),
            ErrorCode::Field(fc) => {
                for ch in fc.entity.chars().filter(|&c| c != '_') {
                    write!(f, "{}", ch.to_ascii_uppercase())?;
                }
                f.write_str("_")?;
                for ch in fc.field.chars() {
                    write!(f, "{}", ch.to_ascii_uppercase())?;
                }
                match fc.kind {
                    FieldKind::Required => f.write_str("_REQUIRED"),
                    FieldKind::Duplicate => f.write_str("_DUPLICATE"),
                    FieldKind::FkViolation => f.write_str("_FK_VIOLATION"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specific_codes_render_stable_names() {
        assert_eq!(
            ErrorCode::duplicate("product", "sku").to_string(),
            "PRODUCT_SKU_DUPLICATE"
        );
        assert_eq!(
            ErrorCode::fk_violation("client", "warehouse_id").to_string(),
            "CLIENT_WAREHOUSE_ID_FK_VIOLATION"
        );
        assert_eq!(
            ErrorCode::required("stock_level", "product_id").to_string(),
            "STOCKLEVEL_PRODUCT_ID_REQUIRED"
        );
    }

    #[test]
    fn specific_codes_resolve_to_a_single_status_class() {
        assert_eq!(
            ErrorCode::duplicate("product", "sku").status(),
            ErrorCode::Duplicate.status()
        );
        assert_eq!(
            ErrorCode::fk_violation("client", "warehouse_id").status(),
            ErrorCode::FkNotFound.status()
        );
        // Required codes only ever surface from the constraint catalog,
        // whose non-duplicate resolutions are unprocessable-entity.
        assert_eq!(
            ErrorCode::required("warehouse", "code").status(),
            ErrorCode::DataIntegrity.status()
        );
    }

    #[test]
    fn duplicate_class_detection() {
        assert!(ErrorCode::Duplicate.is_duplicate_class());
        assert!(ErrorCode::duplicate("warehouse", "code").is_duplicate_class());
        assert!(!ErrorCode::required("warehouse", "code").is_duplicate_class());
        assert!(!ErrorCode::DataIntegrity.is_duplicate_class());
    }
}
