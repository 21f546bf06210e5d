// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::database;
use chrono::{DateTime, Duration, Utc};
use common::validation::{self, ValidationError};
use common::{CreateTaskPayload, Task, UpdateTaskPayload};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid task ID")]
    InvalidIdentifier(String),

    #[error("Task not found")]
    NotFound(Uuid),

    #[error("Server Error")]
    Store(#[from] anyhow::Error),
}

/// CRUD operations over tasks. Holds the pool it was built with; cloning is
/// cheap and shares the pool.
#[derive(Clone)]
pub struct TaskService {
    pool: SqlitePool,
}

impl TaskService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Task>, ServiceError> {
        let tasks = database::list_tasks(&self.pool).await?;
        debug!("Listed {} tasks.", tasks.len());
        Ok(tasks)
    }

    pub async fn get(&self, id: &str) -> Result<Task, ServiceError> {
        let id = parse_task_id(id)?;
        database::find_task(&self.pool, id)
            .await?
            .ok_or(ServiceError::NotFound(id))
    }

    pub async fn create(&self, payload: &CreateTaskPayload) -> Result<Task, ServiceError> {
        let new_task = validation::validate_create(payload)?;
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title: new_task.title,
            status: false,
            priority: new_task.priority,
            category: new_task.category,
            due_date: new_task.due_date,
            created_at: now,
            updated_at: now,
        };

        database::insert_task(&self.pool, &task).await?;
        info!("Task created successfully with ID: {}", task.id);
        Ok(task)
    }

    /// Replaces title and status. The title is checked before the id, and an
    /// omitted status is written as pending. Like toggle, this reads the row
    /// first and writes afterwards without a transaction.
    pub async fn update(
        &self,
        id: &str,
        payload: &UpdateTaskPayload,
    ) -> Result<Task, ServiceError> {
        let changes = validation::validate_update(payload)?;
        let id = parse_task_id(id)?;
        let current = database::find_task(&self.pool, id)
            .await?
            .ok_or(ServiceError::NotFound(id))?;

        let task = database::update_task(
            &self.pool,
            id,
            &changes.title,
            changes.status,
            next_updated_at(current.updated_at),
        )
        .await?
        .ok_or(ServiceError::NotFound(id))?;

        info!("Task with ID {} updated successfully.", id);
        Ok(task)
    }

    pub async fn delete(&self, id: &str) -> Result<Task, ServiceError> {
        let id = parse_task_id(id)?;
        let task = database::delete_task(&self.pool, id)
            .await?
            .ok_or(ServiceError::NotFound(id))?;

        info!("Task with ID {} deleted successfully.", id);
        Ok(task)
    }

    /// Reads the task, inverts its status and writes it back. Nothing guards
    /// the gap between read and write: concurrent toggles on one id race and
    /// the last write wins.
    pub async fn toggle_status(&self, id: &str) -> Result<Task, ServiceError> {
        let id = parse_task_id(id)?;
        let current = database::find_task(&self.pool, id)
            .await?
            .ok_or(ServiceError::NotFound(id))?;

        let task = database::set_task_status(
            &self.pool,
            id,
            !current.status,
            next_updated_at(current.updated_at),
        )
        .await?
        .ok_or(ServiceError::NotFound(id))?;

        info!("Task with ID {} marked as {}.", id, task.status_label());
        Ok(task)
    }
}

fn parse_task_id(raw: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw).map_err(|_| ServiceError::InvalidIdentifier(raw.to_string()))
}

/// Current time, bumped past `previous` if the clock has not moved on.
fn next_updated_at(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}
