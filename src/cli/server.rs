//! HTTP server mode for REST access to provider operations

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ProviderConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::provider::{Operation, OperationRequest, Provider};
use crate::types::Context;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Settings of the provider every request is dispatched to
    pub provider: ProviderConfig,
}

/// App state shared across handlers
struct AppState {
    provider: Provider,
}

/// Error body of a failed request
#[derive(Debug, Serialize)]
struct ErrorBody {
    kind: &'static str,
    message: String,
}

/// Response wrapper
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorBody>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn error(err: &Error) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ErrorBody {
                kind: err.kind().as_str(),
                message: err.to_string(),
            }),
        }
    }
}

/// HTTP status reported for an error kind
fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::InvalidRequest | ErrorKind::Configuration => StatusCode::BAD_REQUEST,
        ErrorKind::Malformed => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::OperationNotSupported => StatusCode::METHOD_NOT_ALLOWED,
        ErrorKind::Transient => StatusCode::BAD_GATEWAY,
    }
}

fn respond(result: Result<Value>) -> Response {
    match result {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::success(data))).into_response(),
        Err(e) => {
            tracing::warn!(kind = %e.kind(), "Request failed: {e}");
            (status_for(e.kind()), Json(ApiResponse::<()>::error(&e))).into_response()
        }
    }
}

/// Build the router over a configured provider
pub fn router(provider: Provider) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/resources", get(list_resources))
        .route("/resources/:type/:operation", post(apply))
        .route("/data-sources/:name", post(read_data_source))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(AppState { provider }))
}

/// Start the HTTP server
pub async fn serve(config: ServerConfig, port: u16) -> Result<()> {
    let app = router(Provider::configure(config.provider)?);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {port}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// List resource types and data sources
async fn list_resources(State(state): State<Arc<AppState>>) -> Response {
    respond(Ok(json!({
        "resources": state.provider.schemas(),
        "data_sources": state.provider.data_source_names(),
    })))
}

/// Run one lifecycle operation; the body carries `plan`, `state` or `id`
async fn apply(
    State(state): State<Arc<AppState>>,
    Path((resource_type, operation)): Path<(String, String)>,
    Json(request): Json<OperationRequest>,
) -> Response {
    let result = match operation.parse::<Operation>() {
        Ok(operation) => {
            state
                .provider
                .apply(&Context::new(), &resource_type, operation, request)
                .await
        }
        Err(e) => Err(e),
    };
    respond(result)
}

/// Resolve a data source; the body is the query document
async fn read_data_source(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(query): Json<Value>,
) -> Response {
    respond(
        state
            .provider
            .read_data_source(&Context::new(), &name, query)
            .await,
    )
}
