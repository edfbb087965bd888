//! Integration tests for the error envelope and classification
//!
//! Exercises the precheck guard and the classifier end to end: specific
//! field codes, generic codes, the collected validation map and the
//! guarantee that refused requests never reach storage.

mod common;

#[cfg(test)]
mod error_tests {
    use super::common::{create_test_server, create_test_state, seed, seed_enterprise};
    use serde_json::{Value, json};

    #[tokio::test]
    async fn missing_required_field_is_refused_before_storage() {
        let state = create_test_state();
        let server = create_test_server(state.clone());
        seed_enterprise(&server, "Acme").await;
        let writes_after_seed = state.store.write_calls();

        let response = server
            .post("/api/warehouse")
            .json(&json!({ "code": "WH-01" }))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["code"], "BAD_REQUEST");
        assert_eq!(body["message"], "name is required");
        assert_eq!(state.store.write_calls(), writes_after_seed);
    }

    #[tokio::test]
    async fn duplicate_value_renders_the_specific_code() {
        let server = create_test_server(create_test_state());
        seed(
            &server,
            "product",
            json!({ "sku": "SKU-100", "name": "Bolt" }),
        )
        .await;

        let response = server
            .post("/api/product")
            .json(&json!({ "sku": "SKU-100", "name": "Nut" }))
            .await;

        response.assert_status_conflict();
        let body: Value = response.json();
        assert_eq!(body["code"], "PRODUCT_SKU_DUPLICATE");
    }

    #[tokio::test]
    async fn broken_reference_is_a_generic_fk_not_found() {
        let server = create_test_server(create_test_state());

        let response = server
            .post("/api/warehouse")
            .json(&json!({ "code": "WH-01", "name": "Main", "enterprise_id": 77 }))
            .await;

        response.assert_status_unprocessable_entity();
        let body: Value = response.json();
        assert_eq!(body["code"], "FK_NOT_FOUND");
        assert!(body["message"].as_str().unwrap().contains("enterprise"));
    }

    #[tokio::test]
    async fn shape_problems_are_collected_into_one_response() {
        let server = create_test_server(create_test_state());

        let response = server
            .post("/api/enterprise")
            .json(&json!({ "name": 12, "bogus": true }))
            .await;

        response.assert_status_unprocessable_entity();
        let body: Value = response.json();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        let details = body["details"].as_object().expect("details map");
        assert_eq!(details.len(), 2);
        assert_eq!(details["name"], "expected string");
        assert!(
            details["bogus"]
                .as_str()
                .unwrap()
                .contains("unknown field")
        );
    }

    #[tokio::test]
    async fn duplicate_check_excludes_the_record_being_updated() {
        let server = create_test_server(create_test_state());
        let created = seed_enterprise(&server, "Acme").await;
        let id = created["id"].as_i64().unwrap();

        // Re-submitting its own unique value is not a duplicate.
        let response = server
            .put(&format!("/api/enterprise/{id}"))
            .json(&json!({ "name": "Acme", "location": "Rome" }))
            .await;
        response.assert_status_ok();

        // But colliding with another record is.
        seed_enterprise(&server, "Globex").await;
        let response = server
            .put(&format!("/api/enterprise/{id}"))
            .json(&json!({ "name": "Globex", "version": 1 }))
            .await;
        response.assert_status_conflict();
        let body: Value = response.json();
        assert_eq!(body["code"], "ENTERPRISE_NAME_DUPLICATE");
    }

    #[tokio::test]
    async fn envelope_always_carries_code_message_and_timestamp() {
        let server = create_test_server(create_test_state());
        let response = server.get("/api/warehouse/1").await;
        let body: Value = response.json();
        assert!(body["code"].is_string());
        assert!(body["message"].is_string());
        assert!(body["timestamp"].is_string());
    }
}
