//! HTTP routes for listing and searching recipes.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, warn};

use recipe_query::{ListParams, PageResponse, QueryError, QueryExecutor, Recipe, SearchParams};

/// Query-string parameters accepted by the list and search routes.
const KNOWN_PARAMS: [&str; 8] = [
    "title",
    "cuisine",
    "rating",
    "total_time",
    "page",
    "limit",
    "sort",
    "order",
];

/// Application state shared across handlers
pub struct AppState {
    pub executor: QueryExecutor,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<&'static str>,
}

/// Handler error, mapped onto an HTTP status with a JSON body.
#[derive(Debug)]
pub enum ApiError {
    Query(QueryError),
    /// The query string itself could not be decoded, e.g. a repeated key.
    BadQueryString(QueryRejection),
}

impl From<QueryError> for ApiError {
    fn from(e: QueryError) -> Self {
        ApiError::Query(e)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadQueryString(rejection)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Query(
                QueryError::InvalidFilterEncoding { .. }
                | QueryError::InvalidPagination { .. }
                | QueryError::InvalidSort { .. },
            )
            | ApiError::BadQueryString(_) => StatusCode::BAD_REQUEST,
            ApiError::Query(QueryError::UnsupportedOperator(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Query(QueryError::StoreUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            ApiError::Query(e) => ErrorBody {
                error: e.to_string(),
                param: e.param(),
            },
            ApiError::BadQueryString(rejection) => {
                let message = rejection.body_text();
                ErrorBody {
                    param: param_named_in(&message),
                    error: message,
                }
            }
        }
    }
}

/// serde names the offending key in backticks, e.g. "duplicate field `rating`".
fn param_named_in(message: &str) -> Option<&'static str> {
    KNOWN_PARAMS
        .into_iter()
        .find(|param| message.contains(&format!("`{}`", param)))
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = self.body();
        if status.is_server_error() {
            error!("request failed: {}", body.error);
        } else {
            warn!("rejected request: {}", body.error);
        }
        (status, Json(body)).into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/recipes", get(list_recipes))
        .route("/api/recipes/search", get(search_recipes))
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

// GET /api/recipes?page=1&limit=10
async fn list_recipes(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<PageResponse<Recipe>>, ApiError> {
    let Query(params) = params?;
    Ok(Json(state.executor.handle_list(&params).await?))
}

// GET /api/recipes/search?title=soup&rating=>4.5&total_time=<30&page=1&limit=10
async fn search_recipes(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<PageResponse<Recipe>>, ApiError> {
    let Query(params) = params?;
    Ok(Json(state.executor.handle_search(&params).await?))
}
