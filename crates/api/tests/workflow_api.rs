//! Full-router tests: authentication, error mapping and the review workflow
//! driven over HTTP against the in-memory store.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::build_test_app;

#[tokio::test]
async fn health_is_public() {
    let app = build_test_app().await;

    let (status, json) = app.send(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["store_healthy"], true);
}

#[tokio::test]
async fn missing_or_bad_token_is_401() {
    let app = build_test_app().await;

    let (status, json) = app.send(Method::GET, "/api/v1/projects", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");

    let (status, _) = app
        .send(Method::GET, "/api/v1/projects", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_issues_a_working_token() {
    let app = build_test_app().await;
    app.engine
        .bootstrap_admin("Ada", "Admin", "Admin@Example.com", "s3cret-pass")
        .await
        .unwrap();

    let (status, json) = app
        .send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "admin@example.com", "password": "s3cret-pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["data"]["token_type"], "Bearer");
    assert_eq!(json["data"]["expires_in"], 3600);
    assert_eq!(json["data"]["user"]["role"], "ETS");
    assert!(json["data"]["user"].get("password_hash").is_none());

    let token = json["data"]["access_token"].as_str().unwrap().to_string();
    let (status, me) = app
        .send(Method::GET, "/api/v1/auth/me", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["data"]["email"], "admin@example.com");
}

#[tokio::test]
async fn wrong_password_is_401() {
    let app = build_test_app().await;
    app.engine
        .bootstrap_admin("Ada", "Admin", "admin@example.com", "s3cret-pass")
        .await
        .unwrap();

    let (status, json) = app
        .send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "admin@example.com", "password": "guess" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn approval_cycle_over_http() {
    let app = build_test_app().await;
    let project_id = app.create_project().await;
    let status_uri = format!("/api/v1/projects/{project_id}/status");

    // A vendor can never approve.
    let (status, json) = app
        .send_as(
            &app.vendor,
            Method::POST,
            &status_uri,
            Some(json!({ "status": "APPROVED" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");

    let (status, json) = app
        .send_as(
            &app.ets,
            Method::POST,
            &status_uri,
            Some(json!({ "status": "approved" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["data"]["status"], "APPROVED");

    // Approving twice is not an edge of the lifecycle.
    let (status, json) = app
        .send_as(
            &app.ets,
            Method::POST,
            &status_uri,
            Some(json!({ "status": "APPROVED" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "INVALID_TRANSITION");

    // The approved project is locked against edits and new issues.
    let (status, json) = app
        .send_as(
            &app.vendor,
            Method::PUT,
            &format!("/api/v1/projects/{project_id}"),
            Some(json!({ "name": "Renamed" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "PROJECT_LOCKED");

    let (_, comments) = app
        .send_as(
            &app.vendor,
            Method::GET,
            &format!("/api/v1/projects/{project_id}/comments"),
            None,
        )
        .await;
    let comments = comments["data"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["content"], "Approved project");
    assert_eq!(comments[0]["author_id"], app.ets.id);

    // The owner sends it back for review, which unlocks editing.
    let (status, json) = app
        .send_as(
            &app.vendor,
            Method::POST,
            &status_uri,
            Some(json!({ "status": "PENDING" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "PENDING");

    let (status, json) = app
        .send_as(
            &app.vendor,
            Method::PUT,
            &format!("/api/v1/projects/{project_id}"),
            Some(json!({ "name": "Renamed" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["name"], "Renamed");
}

#[tokio::test]
async fn unknown_status_label_is_a_validation_error() {
    let app = build_test_app().await;
    let project_id = app.create_project().await;

    let (status, json) = app
        .send_as(
            &app.ets,
            Method::POST,
            &format!("/api/v1/projects/{project_id}/status"),
            Some(json!({ "status": "ARCHIVED" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["fields"][0]["field"], "status");
}

#[tokio::test]
async fn invalid_project_fields_are_listed() {
    let app = build_test_app().await;

    let (status, json) = app
        .send_as(
            &app.vendor,
            Method::POST,
            "/api/v1/projects",
            Some(json!({ "name": "ab", "original_contract_award_cents": -1 })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = json["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"name"), "{json}");
    assert!(fields.contains(&"original_contract_award_cents"), "{json}");
}

#[tokio::test]
async fn duplicate_report_period_is_409() {
    let app = build_test_app().await;
    let project_id = app.create_project().await;
    let reports_uri = format!("/api/v1/projects/{project_id}/reports");
    let body = json!({
        "year": 2024,
        "month": "MARCH",
        "paid_up_to_now_cents": 500_000,
        "progress": 10.0,
    });

    let (status, created) = app
        .send_as(&app.vendor, Method::POST, &reports_uri, Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    assert_eq!(created["data"]["status"], "PENDING");

    let (status, json) = app
        .send_as(&app.vendor, Method::POST, &reports_uri, Some(body))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "DUPLICATE_REPORT_PERIOD");

    let (status, json) = app
        .send_as(
            &app.vendor,
            Method::GET,
            &format!("{reports_uri}/exists?year=2024&month=3"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["id"], created["data"]["id"]);

    let (_, json) = app
        .send_as(
            &app.vendor,
            Method::GET,
            &format!("{reports_uri}/exists?year=2024&month=april"),
            None,
        )
        .await;
    assert!(json["data"].is_null());
}

#[tokio::test]
async fn report_search_is_paged_and_scoped() {
    let app = build_test_app().await;
    let project_id = app.create_project().await;
    for month in 1..=10 {
        let (status, json) = app
            .send_as(
                &app.vendor,
                Method::POST,
                &format!("/api/v1/projects/{project_id}/reports"),
                Some(json!({
                    "year": 2024,
                    "month": month.to_string(),
                    "paid_up_to_now_cents": 0,
                    "progress": 0.0,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{json}");
    }

    let (status, json) = app
        .send_as(
            &app.vendor,
            Method::GET,
            "/api/v1/reports/search?term=welfare&page=2",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["data"]["total"], 10);
    assert_eq!(json["data"]["page"], 2);
    assert_eq!(json["data"]["page_size"], 9);
    assert_eq!(json["data"]["reports"].as_array().unwrap().len(), 1);

    let (_, json) = app
        .send_as(
            &app.other_vendor,
            Method::GET,
            "/api/v1/reports/search?term=welfare",
            None,
        )
        .await;
    assert_eq!(json["data"]["total"], 0);

    let (status, json) = app
        .send_as(&app.ets, Method::GET, "/api/v1/reports/search?term=ab", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["fields"][0]["field"], "term");
}

#[tokio::test]
async fn other_vendors_cannot_see_a_project() {
    let app = build_test_app().await;
    let project_id = app.create_project().await;

    let (status, _) = app
        .send_as(
            &app.other_vendor,
            Method::GET,
            &format!("/api/v1/projects/{project_id}"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, json) = app
        .send_as(&app.other_vendor, Method::GET, "/api/v1/projects", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn missing_project_is_404() {
    let app = build_test_app().await;

    let (status, json) = app
        .send_as(&app.ets, Method::GET, "/api/v1/projects/999", None)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn admin_routes_are_ets_only() {
    let app = build_test_app().await;

    let (status, _) = app
        .send_as(&app.vendor, Method::GET, "/api/v1/admin/users", None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, json) = app
        .send_as(
            &app.ets,
            Method::POST,
            "/api/v1/admin/users",
            Some(json!({
                "first_name": "Grace",
                "last_name": "Vendor",
                "email": "grace@vendor.example",
                "role": "vendor",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    assert_eq!(json["data"]["user"]["role"], "VENDOR");
    assert_eq!(
        json["data"]["generated_password"].as_str().unwrap().len(),
        16
    );
}

#[tokio::test]
async fn deleted_user_token_stops_working() {
    let app = build_test_app().await;
    let token = app.token(&app.other_vendor);

    let (status, _) = app
        .send_as(
            &app.ets,
            Method::DELETE,
            &format!("/api/v1/admin/users/{}", app.other_vendor.id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .send(Method::GET, "/api/v1/projects", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn role_change_applies_to_existing_tokens() {
    let app = build_test_app().await;
    let token = app.token(&app.other_vendor);

    let (status, json) = app
        .send_as(
            &app.ets,
            Method::PUT,
            &format!("/api/v1/admin/users/{}/role", app.other_vendor.id),
            Some(json!({ "role": "ETS" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{json}");

    let (status, _) = app
        .send(Method::GET, "/api/v1/admin/users", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}
