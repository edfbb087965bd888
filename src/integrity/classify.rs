//! Error classifier - single entry point turning any mutation failure into
//! the client-facing response tuple
//!
//! Dispatch is most-specific-first: domain-raised failures carry their own
//! context and classify directly; storage-level integrity failures go through
//! the constraint catalog (structured name first, message heuristic second);
//! everything else degrades to a generic internal error whose response never
//! carries the underlying failure text.

use super::DomainError;
use super::catalog;
use super::code::ErrorCode;
use super::extract;
use crate::core::error::AppError;
use crate::storage::StorageError;
use axum::http::StatusCode;
use tracing::{error, warn};

/// Classifies a mutation failure. Pure apart from log output; never panics.
pub fn classify(failure: DomainError) -> AppError {
    let message = failure.to_string();
    match failure {
        DomainError::NotFound { .. } => {
            AppError::new(StatusCode::NOT_FOUND, ErrorCode::NotFound, message)
        }
        DomainError::Duplicate { entity, field } => {
            let code = ErrorCode::duplicate(entity, field);
            AppError::new(code.status(), code, message)
        }
        DomainError::FkNotFound { .. } => AppError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::FkNotFound,
            message,
        ),
        // Guard-tier missing fields carry the generic code; the specific
        // *_REQUIRED codes belong to the constraint-catalog path.
        DomainError::MissingField { .. } => {
            AppError::new(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, message)
        }
        DomainError::InvalidValue(_) => {
            AppError::new(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, message)
        }
        DomainError::RefIntegrity { child, .. } => {
            AppError::new(StatusCode::CONFLICT, ErrorCode::RefIntegrity, message)
                .with_detail("child", child)
        }
        DomainError::Validation(fields) => AppError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::ValidationError,
            "Validation failed",
        )
        .with_details(fields),
        DomainError::Storage(storage) => classify_storage(storage),
    }
}

fn classify_storage(failure: StorageError) -> AppError {
    match failure {
        StorageError::Integrity {
            constraint,
            message,
        } => {
            // Structured name from the driver wins; the text heuristic is the
            // fallback for drivers that only report a message.
            let name = constraint
                .filter(|c| !c.trim().is_empty())
                .or_else(|| extract::from_message(&message));
            match name.as_deref().and_then(catalog::resolve) {
                Some(code) => {
                    let status = if code.is_duplicate_class() {
                        StatusCode::CONFLICT
                    } else {
                        StatusCode::UNPROCESSABLE_ENTITY
                    };
                    let mut err = AppError::new(status, code, "Database constraint violated");
                    if let Some(name) = name {
                        err = err.with_detail("constraint", name);
                    }
                    err
                }
                None => {
                    warn!(constraint = ?name, "unrecognized integrity constraint");
                    let mut err = AppError::new(
                        StatusCode::UNPROCESSABLE_ENTITY,
                        ErrorCode::DataIntegrity,
                        "Database constraint violated",
                    );
                    if let Some(name) = name {
                        err = err.with_detail("constraint", name);
                    }
                    err
                }
            }
        }
        // No dedicated code for stale versions in the observed catalog;
        // folded into DATA_INTEGRITY for compatibility.
        StorageError::VersionConflict { .. } => AppError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::DataIntegrity,
            failure.to_string(),
        ),
        StorageError::RowMissing { entity, id } => AppError::new(
            StatusCode::NOT_FOUND,
            ErrorCode::NotFound,
            format!("{entity} not found with id={id}"),
        ),
        StorageError::Driver(err) => {
            // Some drivers only reveal the violated constraint deep in the
            // cause chain of an otherwise opaque failure.
            if let Some(name) = extract::constraint_name(&err) {
                if let Some(code) = catalog::resolve(&name) {
                    let status = if code.is_duplicate_class() {
                        StatusCode::CONFLICT
                    } else {
                        StatusCode::UNPROCESSABLE_ENTITY
                    };
                    return AppError::new(status, code, "Database constraint violated")
                        .with_detail("constraint", name);
                }
            }
            error!(error = %err, "unclassified storage failure");
            AppError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalError,
                "Unexpected error",
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn domain_not_found_maps_to_404() {
        let err = classify(DomainError::not_found_by_id("warehouse", 9));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "warehouse not found with id=9");
    }

    #[test]
    fn domain_duplicate_maps_to_409_with_specific_code() {
        let err = classify(DomainError::Duplicate {
            entity: "product",
            field: "sku",
        });
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code().to_string(), "PRODUCT_SKU_DUPLICATE");
    }

    #[test]
    fn domain_fk_missing_maps_to_422() {
        let err = classify(DomainError::FkNotFound {
            entity: "client",
            field: "warehouse_id",
            target: "warehouse",
        });
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code(), ErrorCode::FkNotFound);
    }

    #[test]
    fn missing_field_maps_to_400_with_the_generic_code() {
        let err = classify(DomainError::MissingField {
            entity: "warehouse",
            field: "code",
        });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), ErrorCode::BadRequest);
        assert_eq!(err.message(), "code is required");
    }

    #[test]
    fn ref_integrity_names_the_child_collection() {
        let err = classify(DomainError::RefIntegrity {
            entity: "warehouse",
            child: "client",
        });
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code(), ErrorCode::RefIntegrity);
        assert!(err.message().contains("client"));
        assert_eq!(err.details().get("child").map(String::as_str), Some("client"));
    }

    #[test]
    fn validation_keeps_every_failing_field() {
        let mut fields = BTreeMap::new();
        fields.insert("price".to_string(), "expected number".to_string());
        fields.insert("sku".to_string(), "expected string".to_string());
        let err = classify(DomainError::Validation(fields));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert_eq!(err.details().len(), 2);
    }

    #[test]
    fn resolved_duplicate_constraint_is_a_conflict() {
        let err = classify(DomainError::Storage(StorageError::Integrity {
            constraint: Some("uk_product_sku".to_string()),
            message: "duplicate key".to_string(),
        }));
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code().to_string(), "PRODUCT_SKU_DUPLICATE");
    }

    #[test]
    fn resolved_not_null_constraint_is_unprocessable() {
        let err = classify(DomainError::Storage(StorageError::Integrity {
            constraint: Some("nn_warehouse_code".to_string()),
            message: "null value".to_string(),
        }));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code().to_string(), "WAREHOUSE_CODE_REQUIRED");
    }

    #[test]
    fn heuristic_fallback_when_driver_has_no_structured_name() {
        let err = classify(DomainError::Storage(StorageError::Integrity {
            constraint: None,
            message: r#"violates constraint "uk_warehouse_code""#.to_string(),
        }));
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code().to_string(), "WAREHOUSE_CODE_DUPLICATE");
    }

    #[test]
    fn unresolved_constraint_degrades_to_data_integrity() {
        let err = classify(DomainError::Storage(StorageError::Integrity {
            constraint: Some("totally_unknown_constraint".to_string()),
            message: "boom".to_string(),
        }));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code(), ErrorCode::DataIntegrity);
        assert_eq!(
            err.details().get("constraint").map(String::as_str),
            Some("totally_unknown_constraint")
        );
    }

    #[test]
    fn version_conflict_folds_into_data_integrity() {
        let err = classify(DomainError::Storage(StorageError::VersionConflict {
            entity: "product",
            id: 4,
            submitted: 1,
            current: 3,
        }));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code(), ErrorCode::DataIntegrity);
    }

    #[test]
    fn driver_faults_never_leak_their_text() {
        let err = classify(DomainError::Storage(StorageError::Driver(
            sqlx::Error::PoolClosed,
        )));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert_eq!(err.message(), "Unexpected error");
        assert!(err.details().is_empty());
    }
}
