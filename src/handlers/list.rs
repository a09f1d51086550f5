use crate::error::{ApiError, ErrorResponse};
use crate::models::Todo;
use crate::routes;
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};

/// GET /api/todos handler - List every todo
///
/// Returns the whole collection with each document's id injected. No
/// pagination, and clients must not rely on the order.
#[utoipa::path(
    get,
    path = routes::TODOS,
    responses(
        (status = 200, description = "All todos", body = Vec<serde_json::Value>),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "todos"
)]
pub async fn list_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<Todo>>), ApiError> {
    let todos: Vec<Todo> = state
        .store
        .stream_all()
        .await?
        .into_iter()
        .map(|doc| Todo::new(doc.id, doc.fields))
        .collect();

    tracing::info!(
        "Listed {} todos from collection {}",
        todos.len(),
        state.config.todos_collection
    );

    Ok((StatusCode::OK, Json(todos)))
}
