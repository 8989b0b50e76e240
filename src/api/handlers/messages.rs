//! Message history handler.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{HistoryParams, MessageListResponse, StoredMessageDto};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, RelayError};

/// `GET /messages` — Recent transcript entries, newest first.
///
/// # Errors
///
/// Returns [`RelayError::InvalidRequest`] for an unparsable query string,
/// [`RelayError::PersistenceDisabled`] when the relay runs without a
/// transcript store, or [`RelayError::PersistenceError`] on database
/// failure.
#[utoipa::path(
    get,
    path = "/api/v1/messages",
    tag = "Messages",
    summary = "List recent messages",
    description = "Returns the most recent relayed user messages. Requires PERSISTENCE_ENABLED.",
    params(HistoryParams),
    responses(
        (status = 200, description = "Recent messages", body = MessageListResponse),
        (status = 400, description = "Invalid query string", body = ErrorResponse),
        (status = 503, description = "Persistence is disabled", body = ErrorResponse),
    )
)]
pub async fn list_messages(
    State(state): State<AppState>,
    query: Result<Query<HistoryParams>, QueryRejection>,
) -> Result<impl IntoResponse, RelayError> {
    let Query(params) = query.map_err(|e| RelayError::InvalidRequest(e.body_text()))?;
    let params = params.clamped();
    let rows = state.relay_service.history(params.limit).await?;

    let data: Vec<StoredMessageDto> = rows.into_iter().map(StoredMessageDto::from).collect();

    Ok(Json(MessageListResponse {
        count: data.len(),
        data,
        limit: params.limit,
    }))
}

/// Message routes, nested under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new().route("/messages", get(list_messages))
}
