/// API integration tests
/// Tests complete HTTP request/response cycles with a real database
mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::DateTime;
use common::{body_json, delete, get, john, json, FailingRepository, Form, TestApp};
use roster_core::validation::MAX_AVATAR_BYTES;
use roster_server::Environment;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\nnot really a png";

/// Create, read, update, delete and read again
#[tokio::test]
async fn test_user_lifecycle() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(john().request("POST", "/api/users"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["success"], true);
    assert_eq!(created["message"], "User created successfully");
    assert_eq!(created["data"]["id"], 1);
    assert_eq!(created["data"]["createdAt"], created["data"]["updatedAt"]);

    let response = app.router.clone().oneshot(get("/api/users/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched["message"], "User retrieved successfully");
    assert_eq!(fetched["data"], created["data"]);

    let response = app
        .router
        .clone()
        .oneshot(Form::new().text("city", "Boston").request("PUT", "/api/users/1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["message"], "User updated successfully");
    assert_eq!(updated["data"]["city"], "Boston");
    assert_eq!(updated["data"]["country"], "USA");
    assert_eq!(updated["data"]["firstName"], "John");
    assert_eq!(updated["data"]["createdAt"], created["data"]["createdAt"]);

    let before = DateTime::parse_from_rfc3339(created["data"]["updatedAt"].as_str().unwrap()).unwrap();
    let after = DateTime::parse_from_rfc3339(updated["data"]["updatedAt"].as_str().unwrap()).unwrap();
    assert!(after > before, "updatedAt should advance");

    let response = app.router.clone().oneshot(delete("/api/users/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let deleted = body_json(response).await;
    assert_eq!(deleted["message"], "User deleted successfully");
    assert_eq!(deleted["data"]["id"], 1);

    let response = app.router.clone().oneshot(get("/api/users/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let missing = body_json(response).await;
    assert_eq!(missing["success"], false);
    assert_eq!(missing["message"], "User not found");

    // Deleting again is a plain not-found
    let response = app.router.clone().oneshot(delete("/api/users/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_users_newest_first() {
    let app = TestApp::new().await;

    for (first, email) in [("Alice", "alice@example.com"), ("Bob", "bob@example.com")] {
        let body = serde_json::json!({
            "firstName": first,
            "lastName": "Tester",
            "country": "Canada",
            "city": "Toronto",
            "email": email,
        });
        let response = app
            .router
            .clone()
            .oneshot(json("POST", "/api/users", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app.router.clone().oneshot(get("/api/users")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let list = body_json(response).await;
    assert_eq!(list["message"], "Users retrieved successfully");
    assert_eq!(list["count"], 2);
    assert_eq!(list["data"][0]["firstName"], "Bob");
    assert_eq!(list["data"][1]["firstName"], "Alice");
}

#[tokio::test]
async fn test_validation_errors_are_reported_per_field() {
    let app = TestApp::new().await;

    let form = Form::new()
        .text("firstName", "J")
        .text("lastName", "Doe")
        .text("country", "USA")
        .text("email", "not-an-email");
    let response = app
        .router
        .clone()
        .oneshot(form.request("POST", "/api/users"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Validation failed");
    let errors = body["errors"].as_array().unwrap();
    let message_for = |field: &str| {
        errors
            .iter()
            .find(|e| e["field"] == field)
            .map(|e| e["message"].as_str().unwrap().to_string())
    };
    assert_eq!(
        message_for("firstName").as_deref(),
        Some("First name must be between 2 and 100 characters")
    );
    assert_eq!(message_for("city").as_deref(), Some("City is required"));
    assert_eq!(
        message_for("email").as_deref(),
        Some("Please provide a valid email address")
    );

    assert_eq!(app.repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_duplicate_email_is_a_conflict() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(john().request("POST", "/api/users"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let duplicate = Form::new()
        .text("firstName", "Johnny")
        .text("lastName", "Dough")
        .text("country", "UK")
        .text("city", "London")
        .text("email", "JOHN@x.com");
    let response = app
        .router
        .clone()
        .oneshot(duplicate.request("POST", "/api/users"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = body_json(response).await;
    assert_eq!(body["message"], "A user with this email already exists");
    assert_eq!(body["errors"][0]["field"], "email");

    let original = app.repo.find_by_id(1).await.unwrap().unwrap();
    assert_eq!(original.first_name, "John");
    assert_eq!(app.repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_update_to_taken_email_is_a_conflict() {
    let app = TestApp::new().await;

    app.router
        .clone()
        .oneshot(john().request("POST", "/api/users"))
        .await
        .unwrap();
    let jane = serde_json::json!({
        "firstName": "Jane",
        "lastName": "Smith",
        "country": "Canada",
        "city": "Toronto",
        "email": "jane@x.com",
    });
    app.router
        .clone()
        .oneshot(json("POST", "/api/users", &jane))
        .await
        .unwrap();

    let response = app
        .router
        .clone()
        .oneshot(json(
            "PUT",
            "/api/users/2",
            &serde_json::json!({ "email": "john@x.com", "city": "Ottawa" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let jane = app.repo.find_by_id(2).await.unwrap().unwrap();
    assert_eq!(jane.email, "jane@x.com");
    assert_eq!(jane.city, "Toronto");
}

#[tokio::test]
async fn test_json_update_clears_phone_number() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(john().text("phoneNumber", "+84935682466").request("POST", "/api/users"))
        .await
        .unwrap();
    let created = body_json(response).await;
    assert_eq!(created["data"]["phoneNumber"], "+84935682466");

    let response = app
        .router
        .clone()
        .oneshot(json(
            "PUT",
            "/api/users/1",
            &serde_json::json!({ "phoneNumber": "" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await;
    assert!(updated["data"].get("phoneNumber").map_or(true, serde_json::Value::is_null));
    assert_eq!(updated["data"]["city"], "NYC");
}

#[tokio::test]
async fn test_multipart_update_with_empty_phone_clears_it() {
    let app = TestApp::new().await;

    app.router
        .clone()
        .oneshot(john().text("phoneNumber", "+84935682466").request("POST", "/api/users"))
        .await
        .unwrap();

    let response = app
        .router
        .clone()
        .oneshot(
            Form::new()
                .text("firstName", "John")
                .text("phoneNumber", "")
                .request("PUT", "/api/users/1"),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await;
    assert!(updated["data"].get("phoneNumber").map_or(true, serde_json::Value::is_null));
    assert!(app.repo.find_by_id(1).await.unwrap().unwrap().phone_number.is_none());
}

#[tokio::test]
async fn test_update_missing_user_is_not_found() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(Form::new().text("city", "Boston").request("PUT", "/api/users/99"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_id_is_rejected() {
    let app = TestApp::new().await;

    for uri in ["/api/users/abc", "/api/users/0", "/api/users/-1"] {
        let response = app.router.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");

        let body = body_json(response).await;
        assert_eq!(body["errors"][0]["field"], "id");
    }
}

/// Uploaded avatars are stored and served back with long-lived caching
#[tokio::test]
async fn test_avatar_upload_and_serving() {
    let app = TestApp::new().await;

    let form = john().file("avatar", "me.png", "image/png", PNG);
    let response = app
        .router
        .clone()
        .oneshot(form.request("POST", "/api/users"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    let avatar = body["data"]["avatar"].as_str().unwrap().to_string();
    assert!(avatar.starts_with("/uploads/avatar-"), "{avatar}");
    assert!(avatar.ends_with(".png"), "{avatar}");

    let response = app.router.clone().oneshot(get(&avatar)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "public, max-age=31536000"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], PNG);
}

#[tokio::test]
async fn test_avatar_with_wrong_type_is_rejected() {
    let app = TestApp::new().await;

    let form = john().file("avatar", "resume.pdf", "application/pdf", b"%PDF-1.4");
    let response = app
        .router
        .clone()
        .oneshot(form.request("POST", "/api/users"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["message"], "File upload failed");
    assert_eq!(body["errors"][0]["field"], "avatar");
    assert_eq!(
        body["errors"][0]["message"],
        "Only image files (JPEG, PNG, GIF, WebP) are allowed"
    );

    assert_eq!(app.repo.count().await.unwrap(), 0);
    assert_eq!(app.stored_files(), 0);
}

#[tokio::test]
async fn test_oversized_avatar_is_rejected() {
    let app = TestApp::new().await;

    let data = vec![0u8; MAX_AVATAR_BYTES + 1024];
    let form = john().file("avatar", "huge.jpg", "image/jpeg", &data);
    let response = app
        .router
        .clone()
        .oneshot(form.request("POST", "/api/users"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["errors"][0]["message"], "File too large. Maximum size is 5MB");
    assert_eq!(app.stored_files(), 0);
}

#[tokio::test]
async fn test_request_body_over_limit_is_413() {
    let app = TestApp::new().await;

    let data = vec![0u8; 11 * 1024 * 1024];
    let form = john().file("avatar", "huge.jpg", "image/jpeg", &data);
    let response = app
        .router
        .clone()
        .oneshot(form.request("POST", "/api/users"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Request body too large");
}

/// Replacing an avatar removes the old file; deleting the user removes the new one
#[tokio::test]
async fn test_avatar_files_follow_the_user() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(john().file("avatar", "a.png", "image/png", PNG).request("POST", "/api/users"))
        .await
        .unwrap();
    let first = body_json(response).await["data"]["avatar"]
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(app.stored_files(), 1);

    let response = app
        .router
        .clone()
        .oneshot(
            Form::new()
                .file("avatar", "b.gif", "image/gif", b"GIF89a")
                .request("PUT", "/api/users/1"),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let second = body_json(response).await["data"]["avatar"]
        .as_str()
        .unwrap()
        .to_string();
    assert_ne!(first, second);
    assert!(second.ends_with(".gif"));
    assert_eq!(app.stored_files(), 1);

    let response = app.router.clone().oneshot(get(&first)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.router.clone().oneshot(delete("/api/users/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.stored_files(), 0);
}

#[tokio::test]
async fn test_failed_create_removes_written_avatar() {
    let temp_dir = TempDir::new().unwrap();
    let app = TestApp::with_repository(Arc::new(FailingRepository), Environment::Production, temp_dir)
        .await;

    let response = app
        .router
        .clone()
        .oneshot(john().file("avatar", "a.png", "image/png", PNG).request("POST", "/api/users"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(app.stored_files(), 0);
}

#[tokio::test]
async fn test_internal_error_detail_only_in_development() {
    let temp_dir = TempDir::new().unwrap();
    let production =
        TestApp::with_repository(Arc::new(FailingRepository), Environment::Production, temp_dir)
            .await;

    let response = production.router.oneshot(get("/api/users")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Internal server error");
    assert!(body.get("error").is_none());

    let temp_dir = TempDir::new().unwrap();
    let development =
        TestApp::with_repository(Arc::new(FailingRepository), Environment::Development, temp_dir)
            .await;

    let response = development.router.oneshot(get("/api/users")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Internal server error");
    assert!(body["error"].as_str().unwrap().contains("database is locked"));
}

#[tokio::test]
async fn test_unknown_endpoint() {
    let app = TestApp::new().await;

    let response = app.router.clone().oneshot(get("/api/nothing-here")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Endpoint not found");
    assert_eq!(body["path"], "/api/nothing-here");
}

#[tokio::test]
async fn test_health_and_info() {
    let app = TestApp::new().await;

    let response = app.router.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Server is running");
    assert_eq!(body["environment"], "development");
    assert!(body["timestamp"].is_string());

    let response = app.router.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["endpoints"]["users"], "/api/users");
}

#[tokio::test]
async fn test_security_and_cors_headers() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    let headers = response.headers();

    assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
    assert_eq!(headers[header::REFERRER_POLICY], "no-referrer");
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");

    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "http://evil.example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
