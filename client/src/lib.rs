// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! Client side of the task API: an HTTP gateway and the in-memory list
//! state that is reconciled from single-task server responses.

pub mod config;
pub mod error;
pub mod gateway;
pub mod state;

pub use config::ClientConfig;
pub use error::GatewayError;
pub use gateway::{TaskApi, TaskGateway};
pub use state::{ActionState, LoadState, TaskListState};
