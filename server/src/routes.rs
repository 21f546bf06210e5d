// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::error::AppError;
use crate::handlers;
use crate::service::TaskService;
use axum::{
    Router,
    http::{HeaderValue, Method, header, request::Parts},
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Creates and configures the application router.
pub fn create_router(service: TaskService) -> Router {
    let router = Router::new()
        // `GET /api/tasks` lists, `POST /api/tasks` creates
        .route(
            "/api/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        // Single task reads and mutations by ID
        .route(
            "/api/tasks/{id}",
            get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route("/api/tasks/{id}/toggle", patch(handlers::toggle_task))
        .route("/api/health", get(handlers::health))
        .route("/", get(handlers::root));

    // Adds the task service to the application state
    with_defaults(router).with_state(service)
}

/// Fallbacks and layers shared by every router we serve.
///
/// Unknown paths and known paths hit with the wrong method both get the
/// JSON 404 envelope. A panicking handler becomes a 500 envelope instead
/// of a dropped connection.
fn with_defaults<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .fallback(handlers::route_not_found)
        .method_not_allowed_fallback(handlers::route_not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };
    AppError::internal(format!("Handler panicked: {detail}")).into_response()
}

/// CORS policy for browser clients. Credentials are allowed, so origins,
/// methods and headers are listed explicitly rather than with `Any`.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Arc<[String]> = allowed_origins.into();

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _: &Parts| {
                origin
                    .to_str()
                    .map(|origin| origin_allowed(origin, &origins))
                    .unwrap_or(false)
            },
        ))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

/// Exact match, or a `scheme://*.domain` pattern matching any subdomain.
fn origin_allowed(origin: &str, allowed: &[String]) -> bool {
    allowed.iter().any(|pattern| {
        let Some((scheme, host_pattern)) = pattern.split_once("://*.") else {
            return pattern == origin;
        };
        origin
            .strip_prefix(scheme)
            .and_then(|rest| rest.strip_prefix("://"))
            .and_then(|host| host.strip_suffix(host_pattern))
            .and_then(|sub| sub.strip_suffix('.'))
            .is_some_and(|sub| !sub.is_empty() && !sub.contains('/'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    fn allowed() -> Vec<String> {
        vec![
            "http://localhost:3000".to_string(),
            "https://*.vercel.app".to_string(),
        ]
    }

    #[test]
    fn test_exact_origin() {
        assert!(origin_allowed("http://localhost:3000", &allowed()));
        assert!(!origin_allowed("http://localhost:3001", &allowed()));
    }

    #[test]
    fn test_wildcard_origin() {
        assert!(origin_allowed("https://todo-orcin.vercel.app", &allowed()));
        assert!(origin_allowed("https://a.b.vercel.app", &allowed()));
        assert!(!origin_allowed("https://vercel.app", &allowed()));
        assert!(!origin_allowed("http://todo.vercel.app", &allowed()));
        assert!(!origin_allowed("https://todo.vercel.app.evil.com", &allowed()));
        assert!(!origin_allowed("https://evilvercel.app", &allowed()));
    }

    async fn boom() -> &'static str {
        panic!("handler exploded")
    }

    #[tokio::test]
    async fn test_panicking_handler_is_a_server_error_envelope() {
        let app: Router = with_defaults(Router::new().route("/boom", get(boom)));

        let response = app
            .oneshot(Request::get("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Server Error");
        if cfg!(debug_assertions) {
            assert_eq!(body["error"], "Handler panicked: handler exploded");
        }
    }

    #[test]
    fn test_panic_payloads_are_rendered() {
        let response = handle_panic(Box::new(String::from("owned")));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = handle_panic(Box::new(42_u8));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
