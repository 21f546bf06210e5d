// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! In-memory task list kept in step with the server.
//!
//! Every mutation waits for the server's answer and then merges the single
//! returned task into the collection; the list is never refetched after a
//! mutation and never changed speculatively. A failed call leaves the
//! collection exactly as it was and returns the gateway error unchanged.

use crate::error::GatewayError;
use crate::gateway::TaskApi;
use common::{ApiResponse, CreateTaskPayload, Task, TaskFilter, UpdateTaskPayload};
use tracing::{debug, warn};
use uuid::Uuid;

/// Status of the initial fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Ready,
    /// Carries the message to show next to a retry action.
    Failed(String),
}

/// Status of the most recent mutating action.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ActionState {
    #[default]
    Idle,
    Pending,
    Applied,
    Failed(String),
}

pub struct TaskListState<A> {
    api: A,
    tasks: Vec<Task>,
    filter: TaskFilter,
    load_state: LoadState,
    action_state: ActionState,
}

impl<A: TaskApi> TaskListState<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            tasks: Vec::new(),
            filter: TaskFilter::All,
            load_state: LoadState::Loading,
            action_state: ActionState::Idle,
        }
    }

    /// Fetches the full list once and replaces the collection with it.
    /// On failure the collection is kept and the state becomes `Failed`.
    pub async fn load(&mut self) -> Result<(), GatewayError> {
        self.load_state = LoadState::Loading;
        match self.api.list_tasks().await {
            Ok(envelope) => {
                self.tasks = envelope.data.unwrap_or_default();
                self.load_state = LoadState::Ready;
                debug!("Loaded {} tasks.", self.tasks.len());
                Ok(())
            }
            Err(e) => {
                self.load_state = LoadState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Re-runs the initial fetch.
    pub async fn retry(&mut self) -> Result<(), GatewayError> {
        self.load().await
    }

    /// Creates a task and puts it at the front, matching server order.
    pub async fn add_task(&mut self, payload: &CreateTaskPayload) -> Result<Task, GatewayError> {
        self.action_state = ActionState::Pending;
        let result = self.api.create_task(payload).await;
        let task = self.settle(result.and_then(|e| data_of(e, "create")))?;
        self.tasks.insert(0, task.clone());
        Ok(task)
    }

    pub async fn update_task(
        &mut self,
        id: Uuid,
        payload: &UpdateTaskPayload,
    ) -> Result<Task, GatewayError> {
        self.action_state = ActionState::Pending;
        let result = self.api.update_task(id, payload).await;
        let task = self.settle(result.and_then(|e| data_of(e, "update")))?;
        self.replace(task.clone());
        Ok(task)
    }

    pub async fn toggle_task(&mut self, id: Uuid) -> Result<Task, GatewayError> {
        self.action_state = ActionState::Pending;
        let result = self.api.toggle_task(id).await;
        let task = self.settle(result.and_then(|e| data_of(e, "toggle")))?;
        self.replace(task.clone());
        Ok(task)
    }

    pub async fn delete_task(&mut self, id: Uuid) -> Result<(), GatewayError> {
        self.action_state = ActionState::Pending;
        let result = self.api.delete_task(id).await;
        self.settle(result)?;
        self.tasks.retain(|task| task.id != id);
        Ok(())
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filter(&self) -> TaskFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.filter = filter;
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn action_state(&self) -> &ActionState {
        &self.action_state
    }

    pub fn filtered_tasks(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| self.filter.matches(task))
            .collect()
    }

    pub fn total_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.iter().filter(|task| !task.status).count()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.status).count()
    }

    /// Share of completed tasks in percent; `None` while the list is empty.
    pub fn progress_percentage(&self) -> Option<f64> {
        let total = self.total_count();
        if total == 0 {
            return None;
        }
        Some(self.completed_count() as f64 * 100.0 / total as f64)
    }

    /// Swaps in the server's copy of a task, keeping its position.
    fn replace(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => *slot = task,
            None => warn!("Task {} is not in the local list; ignoring update.", task.id),
        }
    }

    fn settle<T>(&mut self, result: Result<T, GatewayError>) -> Result<T, GatewayError> {
        self.action_state = match &result {
            Ok(_) => ActionState::Applied,
            Err(e) => ActionState::Failed(e.to_string()),
        };
        result
    }
}

fn data_of(envelope: ApiResponse<Task>, operation: &'static str) -> Result<Task, GatewayError> {
    envelope.data.ok_or(GatewayError::MissingData(operation))
}
