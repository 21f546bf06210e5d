// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::error::AppError;
use crate::service::TaskService;
use axum::{
    extract::{Json, Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::Utc;
use common::{ApiResponse, CreateTaskPayload, Task, UpdateTaskPayload};
use serde_json::{Value, json};
use tracing::{debug, info};

type TaskResponse = Json<ApiResponse<Task>>;

/// Handler for listing all tasks, newest first.
pub async fn list_tasks(
    State(service): State<TaskService>, // State injection (task service)
) -> Result<Json<ApiResponse<Vec<Task>>>, AppError> {
    let tasks = service.list().await?;
    info!("Successfully retrieved {} tasks.", tasks.len());
    Ok(Json(ApiResponse::list(tasks)))
}

/// Handler for fetching a single task.
pub async fn get_task(
    State(service): State<TaskService>,
    Path(task_id): Path<String>,
) -> Result<TaskResponse, AppError> {
    let task = service.get(&task_id).await?;
    Ok(Json(ApiResponse::success(task, "Task retrieved successfully")))
}

/// Handler for creating a new task.
pub async fn create_task(
    State(service): State<TaskService>,
    payload: Result<Json<CreateTaskPayload>, JsonRejection>, // Extracting the request body as JSON
) -> Result<(StatusCode, TaskResponse), AppError> {
    let Json(payload) = payload?;
    debug!("Received request to create task: {:?}", payload.title);

    let new_task = service.create(&payload).await?;

    // Return a 201 Created status with the new task in the envelope.
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(new_task, "Task created successfully")),
    ))
}

/// Handler for replacing a task's title and status.
pub async fn update_task(
    State(service): State<TaskService>,
    Path(task_id): Path<String>, // Extract task ID from the URL path
    payload: Result<Json<UpdateTaskPayload>, JsonRejection>,
) -> Result<TaskResponse, AppError> {
    let Json(payload) = payload?;
    debug!("Attempting to update task with ID: {}", task_id);

    let task = service.update(&task_id, &payload).await?;
    Ok(Json(ApiResponse::success(task, "Task updated successfully")))
}

/// Handler for deleting a task by ID.
pub async fn delete_task(
    State(service): State<TaskService>,
    Path(task_id): Path<String>,
) -> Result<TaskResponse, AppError> {
    debug!("Attempting to delete task with ID: {}", task_id);

    let task = service.delete(&task_id).await?;
    Ok(Json(ApiResponse::success(task, "Task deleted successfully")))
}

/// Handler for flipping a task between pending and completed.
pub async fn toggle_task(
    State(service): State<TaskService>,
    Path(task_id): Path<String>,
) -> Result<TaskResponse, AppError> {
    debug!("Received request to toggle task with ID: {}", task_id);

    let task = service.toggle_status(&task_id).await?;
    let message = format!("Task marked as {}", task.status_label());
    Ok(Json(ApiResponse::success(task, message)))
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Todo API Server is running!",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to Todo API!",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/api/health",
            "tasks": "/api/tasks"
        }
    }))
}

pub async fn route_not_found() -> AppError {
    AppError::not_found_route()
}
