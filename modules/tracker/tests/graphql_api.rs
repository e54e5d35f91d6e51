//! GraphQL projection, exercised directly through the schema, plus the
//! REST/GraphQL consistency property.

mod common;

use std::collections::HashSet;

use async_graphql::Request;
use authn::CurrentUser;
use serde_json::json;

use common::{bearer, new_project, new_task, register_user, send_json, test_app};
use tracker::contract::model::User;

fn as_actor(user: &User) -> CurrentUser {
    CurrentUser {
        id: user.id,
        username: user.username.clone(),
    }
}

#[tokio::test]
async fn queries_return_typed_object_graphs() {
    let app = test_app().await;
    let alice = register_user(&app.state.service, "alice").await;
    let service = &app.state.service;

    let project = service
        .create_project(alice.id, new_project("Alpha"))
        .await
        .unwrap();
    let task = service
        .create_task(tracker::contract::model::NewTask {
            assigned_to: Some(alice.id),
            ..new_task("Ship it", project.project.id)
        })
        .await
        .unwrap();
    service
        .create_comment(
            alice.id,
            tracker::contract::model::NewComment {
                content: "first".to_string(),
                task_id: task.task.id,
            },
        )
        .await
        .unwrap();

    let query = r#"
        {
            allProjects {
                id
                name
                owner { username }
                tasks {
                    title
                    status
                    assignedTo { username }
                    comments { content author { username } }
                }
            }
        }
    "#;
    let response = app
        .state
        .schema
        .execute(Request::new(query).data(as_actor(&alice)))
        .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let data = response.data.into_json().unwrap();
    let projects = data["allProjects"].as_array().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["owner"]["username"], "alice");
    let tasks = projects[0]["tasks"].as_array().unwrap();
    assert_eq!(tasks[0]["status"], "TODO");
    assert_eq!(tasks[0]["assignedTo"]["username"], "alice");
    assert_eq!(tasks[0]["comments"][0]["author"]["username"], "alice");
}

#[tokio::test]
async fn create_project_takes_owner_from_acting_identity() {
    let app = test_app().await;
    let alice = register_user(&app.state.service, "alice").await;
    let bob = register_user(&app.state.service, "bob").await;

    let mutation = format!(
        r#"mutation {{
            createProject(name: "Alpha", memberIds: ["{}"]) {{
                id
                owner {{ username }}
                members {{ username }}
            }}
        }}"#,
        bob.id
    );
    let response = app
        .state
        .schema
        .execute(Request::new(mutation).data(as_actor(&alice)))
        .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let data = response.data.into_json().unwrap();
    assert_eq!(data["createProject"]["owner"]["username"], "alice");
    assert_eq!(data["createProject"]["members"][0]["username"], "bob");
}

#[tokio::test]
async fn delete_project_reports_ok_false_when_absent() {
    let app = test_app().await;
    let alice = register_user(&app.state.service, "alice").await;
    let project = app
        .state
        .service
        .create_project(alice.id, new_project("Alpha"))
        .await
        .unwrap();

    let mutation = format!(
        r#"mutation {{ deleteProject(id: "{}") {{ ok }} }}"#,
        project.project.id
    );
    let response = app
        .state
        .schema
        .execute(Request::new(mutation.clone()).data(as_actor(&alice)))
        .await;
    assert!(response.errors.is_empty());
    assert_eq!(
        response.data.into_json().unwrap()["deleteProject"]["ok"],
        json!(true)
    );

    // Second delete: tolerated no-op, ok=false, no error.
    let response = app
        .state
        .schema
        .execute(Request::new(mutation).data(as_actor(&alice)))
        .await;
    assert!(response.errors.is_empty());
    assert_eq!(
        response.data.into_json().unwrap()["deleteProject"]["ok"],
        json!(false)
    );
}

#[tokio::test]
async fn delete_task_surfaces_not_found_in_errors_array() {
    let app = test_app().await;
    let alice = register_user(&app.state.service, "alice").await;

    let mutation = format!(
        r#"mutation {{ deleteTask(id: "{}") {{ ok }} }}"#,
        uuid::Uuid::new_v4()
    );
    let response = app
        .state
        .schema
        .execute(Request::new(mutation).data(as_actor(&alice)))
        .await;
    assert_eq!(response.errors.len(), 1);
    let serialized = serde_json::to_value(&response).unwrap();
    assert_eq!(
        serialized["errors"][0]["extensions"]["code"],
        json!("NOT_FOUND")
    );
}

#[tokio::test]
async fn task_mutations_roundtrip() {
    let app = test_app().await;
    let alice = register_user(&app.state.service, "alice").await;
    let project = app
        .state
        .service
        .create_project(alice.id, new_project("Alpha"))
        .await
        .unwrap();

    let mutation = format!(
        r#"mutation {{
            createTask(title: "Build", projectId: "{}", status: INPR) {{ id title status }}
        }}"#,
        project.project.id
    );
    let response = app
        .state
        .schema
        .execute(Request::new(mutation).data(as_actor(&alice)))
        .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    assert_eq!(data["createTask"]["status"], "INPR");
    let task_id = data["createTask"]["id"].as_str().unwrap().to_string();

    let mutation = format!(
        r#"mutation {{ updateTask(id: "{task_id}", status: DONE, title: "Built") {{ title status }} }}"#
    );
    let response = app
        .state
        .schema
        .execute(Request::new(mutation).data(as_actor(&alice)))
        .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    assert_eq!(data["updateTask"]["title"], "Built");
    assert_eq!(data["updateTask"]["status"], "DONE");
}

#[tokio::test]
async fn rest_and_graphql_agree_on_the_task_set() {
    let app = test_app().await;
    let alice = register_user(&app.state.service, "alice").await;
    let auth = bearer(&app.state, &alice);
    let service = &app.state.service;

    let project = service
        .create_project(alice.id, new_project("Alpha"))
        .await
        .unwrap();
    for title in ["a", "b", "c"] {
        service
            .create_task(new_task(title, project.project.id))
            .await
            .unwrap();
    }

    // REST view of the task ids.
    let (status, body) = send_json(&app.router, "GET", "/api/tasks", Some(&auth), None).await;
    assert_eq!(status, axum::http::StatusCode::OK);
    let rest_ids: HashSet<String> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect();

    // GraphQL view of the same store state.
    let response = app
        .state
        .schema
        .execute(Request::new("{ allTasks { id } }").data(as_actor(&alice)))
        .await;
    assert!(response.errors.is_empty());
    let data = response.data.into_json().unwrap();
    let gql_ids: HashSet<String> = data["allTasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect();

    assert_eq!(rest_ids, gql_ids);
    assert_eq!(rest_ids.len(), 3);
}

#[tokio::test]
async fn graphql_endpoint_enforces_bearer_auth_over_http() {
    let app = test_app().await;
    let alice = register_user(&app.state.service, "alice").await;
    let auth = bearer(&app.state, &alice);

    // Without a token the middleware rejects the request.
    let (status, _) = send_json(
        &app.router,
        "POST",
        "/graphql",
        None,
        Some(json!({"query": "{ allProjects { id } }"})),
    )
    .await;
    assert_eq!(status, axum::http::StatusCode::UNAUTHORIZED);

    // With a token the same query succeeds end to end.
    let (status, body) = send_json(
        &app.router,
        "POST",
        "/graphql",
        Some(&auth),
        Some(json!({"query": "{ allProjects { id name } }"})),
    )
    .await;
    assert_eq!(status, axum::http::StatusCode::OK);
    assert!(body["data"]["allProjects"].is_array());
}
