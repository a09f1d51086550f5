use crate::error::{ApiError, ErrorResponse};
use crate::models::DeleteResponse;
use crate::routes;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

/// DELETE /api/todos/{id} handler - Remove a todo
#[utoipa::path(
    delete,
    path = routes::TODO_ITEM,
    params(
        ("id" = String, Path, description = "Document id of the todo")
    ),
    responses(
        (status = 200, description = "Todo deleted", body = DeleteResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "todos"
)]
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<DeleteResponse>), ApiError> {
    if state.store.get(&id).await?.is_none() {
        return Err(ApiError::TodoNotFound(id));
    }

    state.store.delete(&id).await?;

    tracing::info!("Deleted todo with id: {}", id);
    Ok((
        StatusCode::OK,
        Json(DeleteResponse {
            message: "Todo deleted successfully".to_string(),
            id,
        }),
    ))
}
