// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use common::Task;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use tracing::{debug, info};
use uuid::Uuid;

/// Establishes the database connection pool.
/// If the database file (or its directory) does not exist, it is created.
/// It also ensures the `tasks` table has the correct schema.
pub async fn establish_connection_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid database URL: {database_url}"))?
        .create_if_missing(true);

    if let Some(dir) = options.get_filename().parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            info!("Creating database directory {}", dir.display());
            std::fs::create_dir_all(dir).context("Failed to create database directory")?;
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;

    ensure_schema(&pool).await?;

    Ok(pool)
}

/// Creates the `tasks` table when it is missing.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tasks (
            id BLOB PRIMARY KEY NOT NULL,
            title TEXT NOT NULL,
            status BOOLEAN NOT NULL DEFAULT 0,
            priority TEXT NOT NULL DEFAULT 'medium',
            category TEXT NULL,
            due_date DATE NULL,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create 'tasks' table")?;

    info!("'tasks' table is ready.");
    Ok(())
}

/// Retrieves every task, newest first. Rows sharing a timestamp fall back
/// to insertion order.
pub async fn list_tasks(pool: &SqlitePool) -> Result<Vec<Task>> {
    let tasks = sqlx::query_as::<_, Task>(
        "SELECT * FROM tasks ORDER BY created_at DESC, rowid DESC;",
    )
    .fetch_all(pool)
    .await
    .context("Failed to retrieve tasks from DB")?;

    Ok(tasks)
}

pub async fn find_task(pool: &SqlitePool, id: Uuid) -> Result<Option<Task>> {
    sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .with_context(|| format!("Failed to fetch task with ID: {id}"))
}

/// Inserts a fully built task. The caller owns id and timestamp assignment.
pub async fn insert_task(pool: &SqlitePool, task: &Task) -> Result<()> {
    debug!(
        "Insert values: id={}, title={}, status={}, priority={:?}, category={:?}, due_date={:?}, created_at={}",
        task.id, task.title, task.status, task.priority, task.category, task.due_date, task.created_at
    );

    sqlx::query(
        "INSERT INTO tasks (id, title, status, priority, category, due_date, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(task.id)
    .bind(&task.title)
    .bind(task.status)
    .bind(task.priority)
    .bind(&task.category)
    .bind(task.due_date)
    .bind(task.created_at)
    .bind(task.updated_at)
    .execute(pool)
    .await
    .context("Failed to insert task into DB")?;

    Ok(())
}

/// Replaces title and status. Returns `None` when no row has this id.
pub async fn update_task(
    pool: &SqlitePool,
    id: Uuid,
    title: &str,
    status: bool,
    updated_at: DateTime<Utc>,
) -> Result<Option<Task>> {
    sqlx::query_as::<_, Task>(
        "UPDATE tasks SET title = ?, status = ?, updated_at = ? WHERE id = ? RETURNING *",
    )
    .bind(title)
    .bind(status)
    .bind(updated_at)
    .bind(id)
    .fetch_optional(pool)
    .await
    .with_context(|| format!("Failed to update task with ID: {id}"))
}

/// Writes a new status only. Returns `None` when no row has this id.
pub async fn set_task_status(
    pool: &SqlitePool,
    id: Uuid,
    status: bool,
    updated_at: DateTime<Utc>,
) -> Result<Option<Task>> {
    sqlx::query_as::<_, Task>(
        "UPDATE tasks SET status = ?, updated_at = ? WHERE id = ? RETURNING *",
    )
    .bind(status)
    .bind(updated_at)
    .bind(id)
    .fetch_optional(pool)
    .await
    .with_context(|| format!("Failed to set status of task with ID: {id}"))
}

/// Hard deletes a task and hands back the row as it was.
pub async fn delete_task(pool: &SqlitePool, id: Uuid) -> Result<Option<Task>> {
    debug!("Attempting to delete task with ID: {}", id);
    let deleted = sqlx::query_as::<_, Task>("DELETE FROM tasks WHERE id = ? RETURNING *")
        .bind(id)
        .fetch_optional(pool)
        .await
        .with_context(|| format!("Failed to delete task with ID: {id}"))?;

    info!(
        "Deleted {} rows for task ID: {}",
        usize::from(deleted.is_some()),
        id
    );

    Ok(deleted)
}
