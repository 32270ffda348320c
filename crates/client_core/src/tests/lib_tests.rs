use super::*;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use shared::error::{ApiError, ErrorCode};
use tokio::{net::TcpListener, sync::Mutex};

fn sample_user(id: i64) -> UserRecord {
    UserRecord {
        id: UserId(id),
        name: format!("user-{id}"),
        tel: "555-0100".to_string(),
        address: "1 Main St".to_string(),
        intro: "hello".to_string(),
    }
}

fn sample_draft() -> UserDraft {
    UserDraft {
        name: "alice".to_string(),
        tel: "555-0100".to_string(),
        address: "1 Main St".to_string(),
        intro: "hello there".to_string(),
    }
}

#[derive(Clone)]
struct DirectoryServerState {
    created: Arc<Mutex<Vec<UserDraft>>>,
    updated: Arc<Mutex<Vec<(i64, UserDraft)>>>,
    deleted: Arc<Mutex<Vec<i64>>>,
    accept_create: Arc<Mutex<bool>>,
    fail_update: Arc<Mutex<bool>>,
    fail_delete: Arc<Mutex<bool>>,
}

async fn handle_create(
    State(state): State<DirectoryServerState>,
    Json(draft): Json<UserDraft>,
) -> Json<CreateUserResponse> {
    state.created.lock().await.push(draft);
    Json(CreateUserResponse {
        success: *state.accept_create.lock().await,
    })
}

async fn handle_list() -> Json<Vec<UserRecord>> {
    Json(vec![sample_user(1), sample_user(2)])
}

async fn handle_enumerate() -> Json<Vec<UserRecord>> {
    Json(vec![sample_user(1), sample_user(2), sample_user(3)])
}

async fn handle_get_user(Path(id): Path<i64>) -> Result<Json<UserRecord>, StatusCode> {
    if id == 7 {
        Ok(Json(sample_user(7)))
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

async fn handle_update(
    State(state): State<DirectoryServerState>,
    Path(id): Path<i64>,
    Json(draft): Json<UserDraft>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    if *state.fail_update.lock().await {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::new(ErrorCode::Internal, "update rejected by server")),
        ));
    }
    state.updated.lock().await.push((id, draft));
    Ok(StatusCode::NO_CONTENT)
}

async fn handle_delete(
    State(state): State<DirectoryServerState>,
    Path(id): Path<i64>,
) -> StatusCode {
    if *state.fail_delete.lock().await {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    state.deleted.lock().await.push(id);
    StatusCode::NO_CONTENT
}

async fn spawn_directory_server() -> (String, DirectoryServerState) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let state = DirectoryServerState {
        created: Arc::new(Mutex::new(Vec::new())),
        updated: Arc::new(Mutex::new(Vec::new())),
        deleted: Arc::new(Mutex::new(Vec::new())),
        accept_create: Arc::new(Mutex::new(true)),
        fail_update: Arc::new(Mutex::new(false)),
        fail_delete: Arc::new(Mutex::new(false)),
    };
    let app = Router::new()
        .route("/api/create-user", post(handle_create))
        .route("/api", get(handle_list))
        .route("/api/users", get(handle_enumerate))
        .route("/api/user/:id", get(handle_get_user))
        .route("/api/update/:id", put(handle_update))
        .route("/api/:id", delete(handle_delete))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), state)
}

#[test]
fn trims_trailing_slash_from_base_url() {
    let client = DirectoryClient::new("http://localhost:8080/");
    assert_eq!(client.base_url(), "http://localhost:8080");
}

#[tokio::test]
async fn create_user_posts_wire_body_and_reads_success_flag() {
    let (url, state) = spawn_directory_server().await;
    let client = DirectoryClient::new(url);

    let response = client.create_user(&sample_draft()).await.expect("create");
    assert!(response.success);

    let created = state.created.lock().await;
    assert_eq!(created.len(), 1);
    assert_eq!(created[0], sample_draft());
}

#[tokio::test]
async fn create_user_surfaces_server_rejection_flag() {
    let (url, state) = spawn_directory_server().await;
    *state.accept_create.lock().await = false;
    let client = DirectoryClient::new(url);

    let response = client.create_user(&sample_draft()).await.expect("create");
    assert!(!response.success);
}

#[tokio::test]
async fn list_users_returns_records_in_order() {
    let (url, _state) = spawn_directory_server().await;
    let client = DirectoryClient::new(url);

    let users = client.list_users().await.expect("list");
    assert_eq!(
        users.iter().map(|u| u.id).collect::<Vec<_>>(),
        vec![UserId(1), UserId(2)]
    );
}

#[tokio::test]
async fn enumerate_users_hits_enumeration_endpoint() {
    let (url, _state) = spawn_directory_server().await;
    let client = DirectoryClient::new(url);

    let users = client.enumerate_users().await.expect("enumerate");
    assert_eq!(users.len(), 3);
}

#[tokio::test]
async fn user_by_id_resolves_existing_record() {
    let (url, _state) = spawn_directory_server().await;
    let client = DirectoryClient::new(url);

    let user = client.user_by_id(UserId(7)).await.expect("resolve");
    assert_eq!(user.id, UserId(7));
    assert_eq!(user.name, "user-7");
}

#[tokio::test]
async fn user_by_id_maps_404_to_not_found() {
    let (url, _state) = spawn_directory_server().await;
    let client = DirectoryClient::new(url);

    let err = client.user_by_id(UserId(99)).await.expect_err("must fail");
    match err {
        ClientError::NotFound { id } => assert_eq!(id, UserId(99)),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn update_user_puts_draft_to_update_path() {
    let (url, state) = spawn_directory_server().await;
    let client = DirectoryClient::new(url);

    client
        .update_user(UserId(7), &sample_draft())
        .await
        .expect("update");

    let updated = state.updated.lock().await;
    assert_eq!(updated.len(), 1);
    assert_eq!(updated[0].0, 7);
    assert_eq!(updated[0].1, sample_draft());
}

#[tokio::test]
async fn update_failure_prefers_structured_error_message() {
    let (url, state) = spawn_directory_server().await;
    *state.fail_update.lock().await = true;
    let client = DirectoryClient::new(url);

    let err = client
        .update_user(UserId(7), &sample_draft())
        .await
        .expect_err("must fail");
    match err {
        ClientError::Network { message } => assert_eq!(message, "update rejected by server"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn delete_user_issues_delete_and_maps_plain_failure_to_status_text() {
    let (url, state) = spawn_directory_server().await;
    let client = DirectoryClient::new(url.clone());

    client.delete_user(UserId(2)).await.expect("delete");
    assert_eq!(state.deleted.lock().await.clone(), vec![2]);

    *state.fail_delete.lock().await = true;
    let err = client.delete_user(UserId(2)).await.expect_err("must fail");
    match err {
        ClientError::Network { message } => {
            assert!(message.contains("500"), "unexpected message: {message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn transport_failure_maps_to_network_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    // Bind to grab a free port, then drop the listener so nothing answers.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let client = DirectoryClient::new(format!("http://{addr}"));
    let err = client.list_users().await.expect_err("must fail");
    assert!(matches!(err, ClientError::Network { .. }));
}
