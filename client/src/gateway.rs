// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! One function per server operation, each making exactly one HTTP call.
//! Errors are logged and handed back untouched; nothing here retries.

use crate::config::ClientConfig;
use crate::error::GatewayError;
use common::{ApiResponse, CreateTaskPayload, Task, UpdateTaskPayload};
use serde::de::{DeserializeOwned, IgnoredAny};
use std::future::Future;
use tracing::{debug, error};
use uuid::Uuid;

type Envelope<T> = Result<ApiResponse<T>, GatewayError>;

/// The five task operations as seen by the list state.
pub trait TaskApi {
    fn list_tasks(&self) -> impl Future<Output = Envelope<Vec<Task>>> + Send;

    fn create_task(
        &self,
        payload: &CreateTaskPayload,
    ) -> impl Future<Output = Envelope<Task>> + Send;

    fn update_task(
        &self,
        id: Uuid,
        payload: &UpdateTaskPayload,
    ) -> impl Future<Output = Envelope<Task>> + Send;

    fn delete_task(&self, id: Uuid) -> impl Future<Output = Envelope<Task>> + Send;

    fn toggle_task(&self, id: Uuid) -> impl Future<Output = Envelope<Task>> + Send;
}

/// HTTP client bound to one API base URL.
#[derive(Debug, Clone)]
pub struct TaskGateway {
    http: reqwest::Client,
    base_url: String,
}

impl TaskGateway {
    pub fn new(config: &ClientConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("task-client/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches one task by id.
    pub async fn get_task(&self, id: Uuid) -> Envelope<Task> {
        let request = self.http.get(self.url(&format!("/tasks/{id}")));
        logged("fetching task", send(request).await)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl TaskApi for TaskGateway {
    async fn list_tasks(&self) -> Envelope<Vec<Task>> {
        let request = self.http.get(self.url("/tasks"));
        logged("fetching tasks", send(request).await)
    }

    async fn create_task(&self, payload: &CreateTaskPayload) -> Envelope<Task> {
        let request = self.http.post(self.url("/tasks")).json(payload);
        logged("creating task", send(request).await)
    }

    async fn update_task(&self, id: Uuid, payload: &UpdateTaskPayload) -> Envelope<Task> {
        let request = self.http.put(self.url(&format!("/tasks/{id}"))).json(payload);
        logged("updating task", send(request).await)
    }

    async fn delete_task(&self, id: Uuid) -> Envelope<Task> {
        let request = self.http.delete(self.url(&format!("/tasks/{id}")));
        logged("deleting task", send(request).await)
    }

    async fn toggle_task(&self, id: Uuid) -> Envelope<Task> {
        let request = self.http.patch(self.url(&format!("/tasks/{id}/toggle")));
        logged("toggling task", send(request).await)
    }
}

async fn send<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Envelope<T> {
    let response = request.send().await?;
    let status = response.status();
    debug!("{} {}", status.as_u16(), response.url());

    if !status.is_success() {
        // Prefer the envelope's message; fall back to the status reason.
        let message = match response.json::<ApiResponse<IgnoredAny>>().await {
            Ok(ApiResponse {
                message: Some(message),
                ..
            }) => message,
            _ => status.canonical_reason().unwrap_or("Request failed").to_string(),
        };
        return Err(GatewayError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let envelope: ApiResponse<T> = response.json().await?;
    if !envelope.success {
        return Err(GatewayError::Api {
            status: status.as_u16(),
            message: envelope.message.unwrap_or_default(),
        });
    }
    Ok(envelope)
}

fn logged<T>(action: &str, result: Envelope<T>) -> Envelope<T> {
    if let Err(e) = &result {
        error!("Error {}: {}", action, e);
    }
    result
}
