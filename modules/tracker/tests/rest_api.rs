//! REST projection: auth boundary, CRUD round-trips, serializer asymmetry
//! and the aggregate sub-actions, driven through the real router.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use blobstore::BlobStore;
use serde_json::json;
use tower::ServiceExt;

use common::{bearer, new_project, new_task, register_user, send_json, test_app};

#[tokio::test]
async fn register_creates_account_and_rejects_bad_payloads() {
    let app = test_app().await;

    let (status, body) = send_json(
        &app.router,
        "POST",
        "/api/register",
        None,
        Some(json!({"username": "alice", "email": "alice@example.com", "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "alice");

    // Field-level error payload on validation failure.
    let (status, body) = send_json(
        &app.router,
        "POST",
        "/api/register",
        None,
        Some(json!({"username": "bob", "email": "nope", "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["email"].is_array());

    // Duplicate username conflicts.
    let (status, _) = send_json(
        &app.router,
        "POST",
        "/api/register",
        None,
        Some(json!({"username": "alice", "email": "a2@example.com", "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn token_flow_issues_and_refreshes() {
    let app = test_app().await;
    register_user(&app.state.service, "alice").await;

    let (status, body) = send_json(
        &app.router,
        "POST",
        "/api/token",
        None,
        Some(json!({"username": "alice", "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let access = body["access"].as_str().unwrap().to_string();
    let refresh = body["refresh"].as_str().unwrap().to_string();

    // The access token opens the protected surface.
    let (status, _) = send_json(
        &app.router,
        "GET",
        "/api/projects",
        Some(&format!("Bearer {access}")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Refresh yields a new usable access token.
    let (status, body) = send_json(
        &app.router,
        "POST",
        "/api/token/refresh",
        None,
        Some(json!({"refresh": refresh})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let new_access = body["access"].as_str().unwrap();
    let (status, _) = send_json(
        &app.router,
        "GET",
        "/api/projects",
        Some(&format!("Bearer {new_access}")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Wrong password: 401, no hint which half was wrong.
    let (status, _) = send_json(
        &app.router,
        "POST",
        "/api/token",
        None,
        Some(json!({"username": "alice", "password": "wrong-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = test_app().await;

    for uri in ["/api/projects", "/api/tasks", "/api/comments", "/graphql"] {
        let (status, _) = send_json(&app.router, "GET", uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "unauthenticated {uri}");
    }

    let (status, _) = send_json(
        &app.router,
        "GET",
        "/api/projects",
        Some("Bearer not.a.token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Health stays public.
    let (status, _) = send_json(&app.router, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn project_crud_ignores_client_supplied_owner() {
    let app = test_app().await;
    let alice = register_user(&app.state.service, "alice").await;
    let mallory = register_user(&app.state.service, "mallory").await;
    let auth = bearer(&app.state, &alice);

    // The payload tries to spoof ownership; the acting identity wins.
    let (status, body) = send_json(
        &app.router,
        "POST",
        "/api/projects",
        Some(&auth),
        Some(json!({
            "name": "Alpha",
            "description": "spoof test",
            "owner": mallory.id,
            "members": [mallory.id],
            "is_active": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["owner"]["id"], json!(alice.id));
    assert_eq!(body["owner"]["username"], "alice");
    let project_id = body["id"].as_str().unwrap().to_string();

    // Read nests owner and members as user objects.
    let (status, body) = send_json(
        &app.router,
        "GET",
        &format!("/api/projects/{project_id}"),
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["members"][0]["username"], "mallory");

    // PATCH replaces the member set wholesale.
    let (status, body) = send_json(
        &app.router,
        "PATCH",
        &format!("/api/projects/{project_id}"),
        Some(&auth),
        Some(json!({"name": "Renamed", "members": [alice.id]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["members"].as_array().unwrap().len(), 1);
    assert_eq!(body["members"][0]["username"], "alice");

    // DELETE cascades and returns 204; a second delete is 404.
    let (status, _) = send_json(
        &app.router,
        "DELETE",
        &format!("/api/projects/{project_id}"),
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send_json(
        &app.router,
        "DELETE",
        &format!("/api/projects/{project_id}"),
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn task_views_nest_assignee_but_not_project() {
    let app = test_app().await;
    let alice = register_user(&app.state.service, "alice").await;
    let auth = bearer(&app.state, &alice);

    let project = app
        .state
        .service
        .create_project(alice.id, new_project("Alpha"))
        .await
        .unwrap();

    let (status, body) = send_json(
        &app.router,
        "POST",
        "/api/tasks",
        Some(&auth),
        Some(json!({
            "title": "Ship it",
            "project": project.project.id,
            "assigned_to": alice.id,
            "status": "INPR"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    // Asymmetry: write took raw ids, read nests the assignee only.
    assert_eq!(body["project"], json!(project.project.id));
    assert_eq!(body["assigned_to"]["username"], "alice");
    assert_eq!(body["status"], "INPR");
    let task_id = body["id"].as_str().unwrap().to_string();

    // PATCH with explicit null clears the assignment.
    let (status, body) = send_json(
        &app.router,
        "PATCH",
        &format!("/api/tasks/{task_id}"),
        Some(&auth),
        Some(json!({"assigned_to": null, "status": "DONE"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["assigned_to"].is_null());
    assert_eq!(body["status"], "DONE");

    // Unknown related ids surface as 404.
    let (status, _) = send_json(
        &app.router,
        "POST",
        "/api/tasks",
        Some(&auth),
        Some(json!({"title": "ghost", "project": uuid::Uuid::new_v4()})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn task_filters_and_aggregates_over_rest() {
    let app = test_app().await;
    let alice = register_user(&app.state.service, "alice").await;
    let bob = register_user(&app.state.service, "bob").await;
    let auth = bearer(&app.state, &alice);
    let service = &app.state.service;

    let project = service
        .create_project(alice.id, new_project("Alpha"))
        .await
        .unwrap();
    for (title, status, assignee) in [
        ("a", "TODO", Some(alice.id)),
        ("b", "INPR", Some(bob.id)),
        ("c", "DONE", Some(bob.id)),
    ] {
        send_json(
            &app.router,
            "POST",
            "/api/tasks",
            Some(&auth),
            Some(json!({
                "title": title,
                "project": project.project.id,
                "status": status,
                "assigned_to": assignee
            })),
        )
        .await;
    }

    let (status, body) = send_json(
        &app.router,
        "GET",
        "/api/tasks/by-status?status=TODO",
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let tasks = body.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert!(tasks.iter().all(|t| t["status"] == "TODO"));

    // Unknown status values are a validation error, not an empty list.
    let (status, _) = send_json(
        &app.router,
        "GET",
        "/api/tasks/by-status?status=BOGUS",
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send_json(
        &app.router,
        "GET",
        &format!("/api/tasks/by-user?user_id={}", bob.id),
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    // No user_id: explicitly an empty list.
    let (status, body) =
        send_json(&app.router, "GET", "/api/tasks/by-user", Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);

    let (status, body) = send_json(
        &app.router,
        "GET",
        "/api/tasks/status-summary",
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let summary = body.as_array().unwrap();
    assert_eq!(summary.len(), 3);
    assert!(summary.iter().all(|e| e["count"] == 1));

    let (status, body) = send_json(
        &app.router,
        "GET",
        "/api/tasks/average-per-project",
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["avg"], json!(3.0));

    let (status, body) = send_json(
        &app.router,
        "GET",
        "/api/projects/with-task-count",
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["task_count"], 3);

    let (status, body) = send_json(
        &app.router,
        "GET",
        "/api/tasks/recent?limit=2",
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn comment_views_render_author_as_username() {
    let app = test_app().await;
    let alice = register_user(&app.state.service, "alice").await;
    let auth = bearer(&app.state, &alice);
    let service = &app.state.service;

    let project = service
        .create_project(alice.id, new_project("Alpha"))
        .await
        .unwrap();
    let task = service
        .create_task(new_task("t", project.project.id))
        .await
        .unwrap();

    // A client-supplied author field is ignored; the acting identity wins.
    let (status, body) = send_json(
        &app.router,
        "POST",
        "/api/comments",
        Some(&auth),
        Some(json!({
            "content": "first!",
            "task": task.task.id,
            "author": uuid::Uuid::new_v4()
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["author"], "alice");
    assert_eq!(body["task"], json!(task.task.id));
    let comment_id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send_json(
        &app.router,
        "GET",
        &format!("/api/tasks/{}/comments", task.task.id),
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send_json(
        &app.router,
        "PATCH",
        &format!("/api/comments/{comment_id}"),
        Some(&auth),
        Some(json!({"content": "edited"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "edited");
    assert_eq!(body["author"], "alice");

    let (status, _) = send_json(
        &app.router,
        "DELETE",
        &format!("/api/comments/{comment_id}"),
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn attachment_upload_and_download_roundtrip() {
    let app = test_app().await;
    let alice = register_user(&app.state.service, "alice").await;
    let auth = bearer(&app.state, &alice);
    let service = &app.state.service;

    let project = service
        .create_project(alice.id, new_project("Alpha"))
        .await
        .unwrap();
    let task = service
        .create_task(new_task("t", project.project.id))
        .await
        .unwrap();

    let boundary = "test-boundary-7d1a";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"task\"\r\n\r\n\
         {}\r\n\
         --{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"note.txt\"\r\n\
         Content-Type: text/plain\r\n\r\n\
         hello attachment\r\n\
         --{boundary}--\r\n",
        task.task.id
    );

    let request = Request::builder()
        .method("POST")
        .uri("/api/attachments")
        .header("authorization", &auth)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let view: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(view["task"], json!(task.task.id));
    let key = view["file"].as_str().unwrap().to_string();
    assert!(key.ends_with(".txt"));
    let attachment_id = view["id"].as_str().unwrap().to_string();

    // Download returns the stored bytes.
    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/attachments/{attachment_id}/download"))
        .header("authorization", &auth)
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"hello attachment");

    // Delete removes the record and the blob.
    let (status, _) = send_json(
        &app.router,
        "DELETE",
        &format!("/api/attachments/{attachment_id}"),
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(app.state.blobs.get(&key).await.is_err());
}

#[tokio::test]
async fn profile_get_and_put() {
    let app = test_app().await;
    let alice = register_user(&app.state.service, "alice").await;
    let auth = bearer(&app.state, &alice);

    let (status, body) = send_json(&app.router, "GET", "/api/profile", Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bio"], "");
    assert_eq!(body["user"]["username"], "alice");

    let (status, body) = send_json(
        &app.router,
        "PUT",
        "/api/profile",
        Some(&auth),
        Some(json!({"bio": "Rustacean"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bio"], "Rustacean");
}

#[tokio::test]
async fn active_and_unactive_listings() {
    let app = test_app().await;
    let alice = register_user(&app.state.service, "alice").await;
    let auth = bearer(&app.state, &alice);
    let service = &app.state.service;

    service
        .create_project(alice.id, new_project("Running"))
        .await
        .unwrap();
    let mut closed = new_project("Closed");
    closed.is_active = false;
    service.create_project(alice.id, closed).await.unwrap();

    let (status, body) = send_json(
        &app.router,
        "GET",
        "/api/projects/active",
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let active = body.as_array().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["name"], "Running");

    let (status, body) = send_json(
        &app.router,
        "GET",
        "/api/projects/unactive",
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let inactive = body.as_array().unwrap();
    assert_eq!(inactive.len(), 1);
    assert_eq!(inactive[0]["name"], "Closed");
}
