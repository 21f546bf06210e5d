// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! Field-level validation run by the server before any store write.

use crate::{CreateTaskPayload, Priority, UpdateTaskPayload};
use chrono::NaiveDate;
use thiserror::Error;

pub const TITLE_MAX_CHARS: usize = 200;
pub const CATEGORY_MAX_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please provide a task title")]
    TitleRequired,

    #[error("Title cannot be more than {max} characters")]
    TitleTooLong { max: usize },

    #[error("Category cannot be more than {max} characters")]
    CategoryTooLong { max: usize },

    /// The request body itself could not be decoded.
    #[error("{0}")]
    MalformedBody(String),
}

/// A create request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub priority: Priority,
    pub category: Option<String>,
    pub due_date: Option<NaiveDate>,
}

/// An update request that passed validation. `status` is already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskChanges {
    pub title: String,
    pub status: bool,
}

/// Trims the title and checks it is non-empty and at most
/// [`TITLE_MAX_CHARS`] characters long.
pub fn validate_title(title: Option<&str>) -> Result<String, ValidationError> {
    let trimmed = title.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(ValidationError::TitleRequired);
    }
    if trimmed.chars().count() > TITLE_MAX_CHARS {
        return Err(ValidationError::TitleTooLong {
            max: TITLE_MAX_CHARS,
        });
    }
    Ok(trimmed.to_string())
}

/// Blank categories are dropped rather than stored as empty strings.
pub fn validate_category(category: Option<&str>) -> Result<Option<String>, ValidationError> {
    match category.map(str::trim) {
        None | Some("") => Ok(None),
        Some(c) if c.chars().count() > CATEGORY_MAX_CHARS => {
            Err(ValidationError::CategoryTooLong {
                max: CATEGORY_MAX_CHARS,
            })
        }
        Some(c) => Ok(Some(c.to_string())),
    }
}

pub fn validate_create(payload: &CreateTaskPayload) -> Result<NewTask, ValidationError> {
    Ok(NewTask {
        title: validate_title(payload.title.as_deref())?,
        priority: payload.priority.unwrap_or_default(),
        category: validate_category(payload.category.as_deref())?,
        due_date: payload.due_date,
    })
}

/// An absent `status` resolves to `false` (pending), never to the stored value.
pub fn validate_update(payload: &UpdateTaskPayload) -> Result<TaskChanges, ValidationError> {
    Ok(TaskChanges {
        title: validate_title(payload.title.as_deref())?,
        status: payload.status.unwrap_or(false),
    })
}
