//! REST API layer: route handlers, DTOs, OpenAPI document and router
//! composition.
//!
//! Resource endpoints are mounted under `/api/v1`; system endpoints sit at
//! the root.

pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;
use crate::error::{ErrorBody, ErrorResponse};

/// OpenAPI document for the REST surface.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "chat-relay", description = "WebSocket chat relay"),
    paths(handlers::system::health_handler, handlers::messages::list_messages),
    components(schemas(
        handlers::system::HealthResponse,
        dto::MessageListResponse,
        dto::StoredMessageDto,
        ErrorResponse,
        ErrorBody,
    )),
    tags(
        (name = "System", description = "Health and service metadata"),
        (name = "Messages", description = "Transcript of relayed messages"),
    )
)]
pub struct ApiDoc;

/// Path of the served OpenAPI JSON document.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
        .merge(docs_router())
}

#[cfg(feature = "swagger-ui")]
fn docs_router() -> Router<AppState> {
    Router::new().merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui").url(OPENAPI_PATH, ApiDoc::openapi()),
    )
}

#[cfg(not(feature = "swagger-ui"))]
fn docs_router() -> Router<AppState> {
    Router::new().route(
        OPENAPI_PATH,
        axum::routing::get(|| async { axum::Json(ApiDoc::openapi()) }),
    )
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::service::RelayService;

    fn app() -> Router {
        build_router().with_state(AppState::new(RelayService::new(None), 1024))
    }

    async fn get(uri: &str) -> (StatusCode, serde_json::Value) {
        let Ok(request) = Request::builder().uri(uri).body(Body::empty()) else {
            panic!("request");
        };
        let Ok(response) = app().oneshot(request).await else {
            panic!("router call");
        };
        let status = response.status();
        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body");
        };
        let json = serde_json::from_slice(&bytes).unwrap_or_default();
        (status, json)
    }

    #[tokio::test]
    async fn health_reports_counters() {
        let (status, body) = get("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.get("status"), Some(&serde_json::json!("healthy")));
        assert_eq!(body.get("active_connections"), Some(&serde_json::json!(0)));
        assert_eq!(body.get("persistence"), Some(&serde_json::json!(false)));
    }

    #[tokio::test]
    async fn history_without_store_is_unavailable() {
        let (status, body) = get("/api/v1/messages?limit=5").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let code = body
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(serde_json::Value::as_u64);
        assert_eq!(code, Some(3002));
    }

    #[tokio::test]
    async fn malformed_history_query_uses_error_body() {
        let (status, body) = get("/api/v1/messages?limit=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let code = body
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(serde_json::Value::as_u64);
        assert_eq!(code, Some(1001));
        let message = body
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default();
        assert!(message.starts_with("invalid request:"), "{message}");
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let (status, body) = get(OPENAPI_PATH).await;
        assert_eq!(status, StatusCode::OK);
        let has_health = body
            .get("paths")
            .and_then(|p| p.get("/health"))
            .is_some();
        assert!(has_health);
    }

    #[test]
    fn document_lists_message_endpoint() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/messages"));
    }
}
