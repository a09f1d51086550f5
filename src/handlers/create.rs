use crate::error::{ApiError, ErrorResponse};
use crate::handlers::json_object;
use crate::models::Todo;
use crate::routes;
use crate::state::AppState;
use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use serde_json::Value as JsonValue;

/// POST /api/todos handler - Create a todo
///
/// The body is stored verbatim under a freshly generated id, and echoed
/// back with that id.
#[utoipa::path(
    post,
    path = routes::TODOS,
    request_body = serde_json::Value,
    responses(
        (status = 201, description = "Todo created", body = serde_json::Value),
        (status = 400, description = "Missing, malformed or non-object JSON", body = ErrorResponse),
        (status = 413, description = "Body over the size limit", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "todos"
)]
pub async fn create_handler(
    State(state): State<AppState>,
    payload: Result<Json<JsonValue>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let fields = json_object(payload, "Invalid todo data")?;

    let id = state.store.new_document_id();
    state.store.set(&id, &fields).await?;

    tracing::info!("Created todo with id: {}", id);
    Ok((StatusCode::CREATED, Json(Todo::new(id, fields))))
}
