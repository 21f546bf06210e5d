// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod validation;

pub use validation::ValidationError;

#[allow(clippy::doc_overindented_list_items)]
/// Represents a single to-do item.
///
/// Derivation attributes (derive):
/// - `Serialize`, `Deserialize`: Allows conversion to/from JSON. Field names
///    are camelCase on the wire and the identifier travels as `_id`.
/// - `Debug`, `Clone`, `PartialEq`: Debugging, copies and test assertions.
/// - `sqlx::FromRow`: Allows `sqlx` to create a `Task` instance directly
///    from a database result row.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id", alias = "id")]
    #[sqlx(rename = "id")]
    pub id: Uuid,

    #[sqlx(rename = "title")]
    pub title: String,

    // false = pending, true = completed
    #[sqlx(rename = "status")]
    pub status: bool,

    #[sqlx(rename = "priority")]
    #[serde(default)]
    pub priority: Priority,

    #[sqlx(rename = "category")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[sqlx(rename = "due_date")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    #[sqlx(rename = "created_at")]
    pub created_at: DateTime<Utc>,

    #[sqlx(rename = "updated_at")]
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Human readable state, as used in toggle confirmations.
    pub fn status_label(&self) -> &'static str {
        if self.status { "completed" } else { "pending" }
    }
}

/// Priority tier chosen in the creation form.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

/// Body of `POST /api/tasks`.
///
/// Every field is optional at the JSON level so that a missing title is
/// reported by validation instead of by the JSON extractor.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

impl CreateTaskPayload {
    /// A payload carrying only a title, the shape the plain add form sends.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

/// Body of `PUT /api/tasks/{id}`.
///
/// An omitted `status` resets the task to pending; it does not keep the
/// stored value.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct UpdateTaskPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<bool>,
}

/// Uniform wrapper returned by every endpoint.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Underlying error text; only present on server errors in debug builds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
            count: None,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            count: None,
            error: None,
        }
    }
}

impl ApiResponse<Vec<Task>> {
    /// Envelope for the list endpoint: data plus its length in `count`.
    pub fn list(tasks: Vec<Task>) -> Self {
        Self {
            success: true,
            count: Some(tasks.len()),
            data: Some(tasks),
            message: None,
            error: None,
        }
    }
}

/// Client-side view filter.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl TaskFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Pending => !task.status,
            TaskFilter::Completed => task.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample_task() -> Task {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        Task {
            id: Uuid::nil(),
            title: "Buy milk".to_string(),
            status: false,
            priority: Priority::Medium,
            category: None,
            due_date: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_task_wire_format() {
        let value = serde_json::to_value(sample_task()).unwrap();

        assert_eq!(value["_id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(value["title"], "Buy milk");
        assert_eq!(value["status"], false);
        assert_eq!(value["priority"], "medium");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        // Optional enrichment fields are omitted when absent.
        assert!(value.get("category").is_none());
        assert!(value.get("dueDate").is_none());
    }

    #[test]
    fn test_task_accepts_plain_id_alias() {
        let value = json!({
            "id": "6f1c0c1e-3b5d-4a59-9a8e-7d54f9b8a2c1",
            "title": "Water plants",
            "status": true,
            "priority": "urgent",
            "category": "home",
            "dueDate": "2025-03-04",
            "createdAt": "2025-03-01T09:30:00Z",
            "updatedAt": "2025-03-01T10:00:00Z"
        });

        let task: Task = serde_json::from_value(value).unwrap();
        assert_eq!(task.priority, Priority::Urgent);
        assert_eq!(task.category.as_deref(), Some("home"));
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2025, 3, 4));
        assert_eq!(task.status_label(), "completed");
    }

    #[test]
    fn test_create_payload_tolerates_missing_title() {
        let payload: CreateTaskPayload = serde_json::from_value(json!({})).unwrap();
        assert!(payload.title.is_none());
        assert!(payload.priority.is_none());
    }

    #[test]
    fn test_list_envelope_carries_count() {
        let envelope = ApiResponse::list(vec![sample_task(), sample_task()]);
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["count"], 2);
        assert!(value.get("message").is_none());
    }

    #[test]
    fn test_failure_envelope_has_no_data() {
        let envelope: ApiResponse<Task> = ApiResponse::failure("Task not found");
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value, json!({ "success": false, "message": "Task not found" }));
    }

    #[test]
    fn test_filter_predicates() {
        let mut task = sample_task();
        assert!(TaskFilter::All.matches(&task));
        assert!(TaskFilter::Pending.matches(&task));
        assert!(!TaskFilter::Completed.matches(&task));

        task.status = true;
        assert!(TaskFilter::Completed.matches(&task));
        assert!(!TaskFilter::Pending.matches(&task));
    }
}
