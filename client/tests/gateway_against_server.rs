use client::{ClientConfig, GatewayError, TaskApi, TaskGateway, TaskListState};
use common::{CreateTaskPayload, UpdateTaskPayload};
use server::{database, routes::create_router, service::TaskService};
use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

/// Serves the real router on an ephemeral port and returns its API base URL.
async fn spawn_server() -> String {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory SQLite");
    database::ensure_schema(&pool).await.unwrap();

    let app = create_router(TaskService::new(pool));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}/api")
}

async fn gateway() -> TaskGateway {
    TaskGateway::new(&ClientConfig::new(spawn_server().await)).unwrap()
}

#[tokio::test]
async fn test_scenario_through_list_state() {
    let mut state = TaskListState::new(gateway().await);
    state.load().await.unwrap();
    assert!(state.tasks().is_empty());

    let created = state
        .add_task(&CreateTaskPayload::titled("Buy milk"))
        .await
        .unwrap();
    assert!(!created.status);
    assert_eq!(created.created_at, created.updated_at);

    let toggled = state.toggle_task(created.id).await.unwrap();
    assert!(toggled.status);
    assert!(toggled.updated_at > toggled.created_at);
    assert_eq!(state.completed_count(), 1);
    assert_eq!(state.progress_percentage(), Some(100.0));

    let updated = state
        .update_task(
            created.id,
            &UpdateTaskPayload {
                title: Some("Buy milk and eggs".to_string()),
                status: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Buy milk and eggs");
    assert!(!updated.status);
    assert_eq!(state.tasks()[0], updated);

    state.delete_task(created.id).await.unwrap();
    assert!(state.tasks().is_empty());

    // A fresh load agrees with the reconciled list.
    state.load().await.unwrap();
    assert!(state.tasks().is_empty());
    assert_eq!(state.progress_percentage(), None);
}

#[tokio::test]
async fn test_reconciled_order_matches_server_order() {
    let gateway = gateway().await;
    let mut state = TaskListState::new(gateway.clone());
    state.load().await.unwrap();

    for title in ["A", "B", "C", "D"] {
        state
            .add_task(&CreateTaskPayload::titled(title))
            .await
            .unwrap();
    }

    let server_side = gateway.list_tasks().await.unwrap();
    assert_eq!(server_side.count, Some(4));
    assert_eq!(server_side.data.unwrap(), state.tasks().to_vec());
}

#[tokio::test]
async fn test_service_errors_are_propagated() {
    let gateway = gateway().await;

    let err = gateway
        .create_task(&CreateTaskPayload::titled("  "))
        .await
        .unwrap_err();
    match err {
        GatewayError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Please provide a task title");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let err = gateway.toggle_task(Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.status(), Some(404));

    let err = gateway.get_task(Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_get_task_round_trip() {
    let gateway = gateway().await;
    let created = gateway
        .create_task(&CreateTaskPayload::titled("Find me"))
        .await
        .unwrap()
        .data
        .unwrap();

    let fetched = gateway.get_task(created.id).await.unwrap().data.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_error() {
    // Grab a free port, then close it again so nothing is listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let gateway = TaskGateway::new(&ClientConfig::new(format!("http://{addr}/api"))).unwrap();
    let mut state = TaskListState::new(gateway);

    let err = state.load().await.unwrap_err();
    assert!(matches!(err, GatewayError::Http(_)));
    assert!(matches!(state.load_state(), client::LoadState::Failed(_)));
}
