//! Integration tests for delete semantics
//!
//! Dependency-guarded deletes, the id/uuid addressing asymmetry and the
//! soft-delete behavior of the entities that carry it.

mod common;

#[cfg(test)]
mod delete_tests {
    use super::common::{create_test_server, create_test_state, seed, seed_enterprise, seed_warehouse};
    use serde_json::{Value, json};

    #[tokio::test]
    async fn guarded_delete_names_the_first_dependent_collection() {
        let server = create_test_server(create_test_state());
        let enterprise = seed_enterprise(&server, "Acme").await;
        let warehouse = seed_warehouse(&server, "WH-01", enterprise["id"].as_i64().unwrap()).await;
        let warehouse_id = warehouse["id"].as_i64().unwrap();

        // Both a client and a user reference the warehouse; the user rule
        // comes first in the dependency order and decides the error.
        seed(
            &server,
            "client",
            json!({ "fullname": "Rossi SRL", "rib": "IT000111", "warehouse_id": warehouse_id }),
        )
        .await;
        seed(
            &server,
            "user",
            json!({
                "username": "mrossi",
                "firstname": "Mario",
                "lastname": "Rossi",
                "email": "m.rossi@acme.it",
                "keycloak_id": "kc-1",
                "warehouse_id": warehouse_id
            }),
        )
        .await;

        let response = server.delete(&format!("/api/warehouse/{warehouse_id}")).await;
        response.assert_status_conflict();
        let body: Value = response.json();
        assert_eq!(body["code"], "REF_INTEGRITY");
        assert_eq!(body["details"]["child"], "user");
        assert!(body["message"].as_str().unwrap().contains("user"));

        // The guard refused; nothing was removed.
        let still_there = server.get(&format!("/api/warehouse/{warehouse_id}")).await;
        still_there.assert_status_ok();
    }

    #[tokio::test]
    async fn delete_succeeds_once_dependents_are_gone() {
        let server = create_test_server(create_test_state());
        let enterprise = seed_enterprise(&server, "Acme").await;
        let warehouse = seed_warehouse(&server, "WH-01", enterprise["id"].as_i64().unwrap()).await;
        let warehouse_id = warehouse["id"].as_i64().unwrap();
        let client = seed(
            &server,
            "client",
            json!({ "fullname": "Rossi SRL", "rib": "IT000111", "warehouse_id": warehouse_id }),
        )
        .await;

        let refused = server.delete(&format!("/api/warehouse/{warehouse_id}")).await;
        refused.assert_status_conflict();

        let client_id = client["id"].as_i64().unwrap();
        server
            .delete(&format!("/api/client/{client_id}"))
            .await
            .assert_status(axum::http::StatusCode::NO_CONTENT);

        let response = server.delete(&format!("/api/warehouse/{warehouse_id}")).await;
        response.assert_status(axum::http::StatusCode::NO_CONTENT);
        server
            .get(&format!("/api/warehouse/{warehouse_id}"))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn delete_by_id_of_a_missing_record_is_404() {
        let server = create_test_server(create_test_state());
        let response = server.delete("/api/enterprise/5").await;
        response.assert_status_not_found();
        let body: Value = response.json();
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn delete_by_uuid_is_a_silent_no_op_when_absent() {
        let server = create_test_server(create_test_state());
        let created = seed_enterprise(&server, "Acme").await;
        let uuid = created["uuid"].as_str().unwrap();

        let first = server.delete(&format!("/api/enterprise/uuid/{uuid}")).await;
        first.assert_status(axum::http::StatusCode::NO_CONTENT);

        // Already gone; same outcome.
        let second = server.delete(&format!("/api/enterprise/uuid/{uuid}")).await;
        second.assert_status(axum::http::StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn soft_deleted_records_vanish_from_reads_but_keep_their_uniqueness() {
        let server = create_test_server(create_test_state());
        let enterprise = seed_enterprise(&server, "Acme").await;
        let warehouse = seed_warehouse(&server, "WH-01", enterprise["id"].as_i64().unwrap()).await;
        let warehouse_id = warehouse["id"].as_i64().unwrap();
        let client = seed(
            &server,
            "client",
            json!({ "fullname": "Rossi SRL", "rib": "IT000111", "warehouse_id": warehouse_id }),
        )
        .await;
        let client_id = client["id"].as_i64().unwrap();

        server
            .delete(&format!("/api/client/{client_id}"))
            .await
            .assert_status(axum::http::StatusCode::NO_CONTENT);

        server
            .get(&format!("/api/client/{client_id}"))
            .await
            .assert_status_not_found();
        let listed: Vec<Value> = server.get("/api/client").await.json();
        assert!(listed.is_empty());

        // The hidden row still holds its unique rib.
        let response = server
            .post("/api/client")
            .json(&json!({ "fullname": "Bianchi SRL", "rib": "IT000111", "warehouse_id": warehouse_id }))
            .await;
        response.assert_status_conflict();
        let body: Value = response.json();
        assert_eq!(body["code"], "CLIENT_RIB_DUPLICATE");
    }
}
