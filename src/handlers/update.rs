use crate::error::{ApiError, ErrorResponse};
use crate::handlers::json_object;
use crate::models::Todo;
use crate::routes;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::Value as JsonValue;

/// PATCH /api/todos/{id} handler - Partially update a todo
///
/// Only the top-level keys present in the body are overwritten. The full
/// merged document is read back and returned.
#[utoipa::path(
    patch,
    path = routes::TODO_ITEM,
    params(
        ("id" = String, Path, description = "Document id of the todo")
    ),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Merged todo", body = serde_json::Value),
        (status = 400, description = "Missing, malformed or non-object JSON", body = ErrorResponse),
        (status = 413, description = "Body over the size limit", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "todos"
)]
pub async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<JsonValue>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let partial = json_object(payload, "Invalid update data")?;

    if !state.store.update(&id, &partial).await? {
        return Err(ApiError::TodoNotFound(id));
    }

    // Deleted between the merge and this read
    let Some(merged) = state.store.get(&id).await? else {
        return Err(ApiError::TodoNotFound(id));
    };

    tracing::info!("Updated todo with id: {}", id);
    Ok((StatusCode::OK, Json(Todo::new(id, merged))))
}

#[cfg(test)]
mod tests {
    use crate::app::router;
    use crate::handlers::test_support::send;
    use crate::state::AppState;
    use crate::store::DocumentStore;
    use axum::http::StatusCode;
    use serde_json::{Value as JsonValue, json};

    async fn create(app: &axum::Router, body: JsonValue) -> String {
        let (status, created) = send(app, "POST", "/api/todos", Some(body.to_string().as_str())).await;
        assert_eq!(status, StatusCode::CREATED);
        created["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_update_merges_supplied_fields() {
        let (state, _) = AppState::in_memory();
        let app = router(state);
        let id = create(&app, json!({"title": "buy milk", "done": false})).await;

        let (status, body) = send(
            &app,
            "PATCH",
            &format!("/api/todos/{}", id),
            Some(r#"{"done":true}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"title": "buy milk", "done": true, "id": id}));
    }

    #[tokio::test]
    async fn test_update_leaves_other_keys_untouched() {
        let (state, store) = AppState::in_memory();
        let app = router(state);
        let id = create(
            &app,
            json!({"title": "t", "priority": 3, "tags": ["home"], "meta": {"a": 1}}),
        )
        .await;

        let (status, body) = send(
            &app,
            "PATCH",
            &format!("/api/todos/{}", id),
            Some(r#"{"priority":1,"note":"new key"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let expected = json!({
            "title": "t",
            "priority": 1,
            "tags": ["home"],
            "meta": {"a": 1},
            "note": "new key"
        });
        let stored = store.get(&id).await.unwrap().unwrap();
        assert_eq!(JsonValue::Object(stored), expected);

        let mut expected_response = expected;
        expected_response["id"] = json!(id);
        assert_eq!(body, expected_response);
    }

    #[tokio::test]
    async fn test_update_cannot_change_id() {
        let (state, store) = AppState::in_memory();
        let app = router(state);
        let id = create(&app, json!({"title": "t"})).await;

        let (status, body) = send(
            &app,
            "PATCH",
            &format!("/api/todos/{}", id),
            Some(r#"{"id":"other","title":"renamed"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"title": "renamed", "id": id}));
        assert!(!store.get(&id).await.unwrap().unwrap().contains_key("id"));
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_404() {
        let (state, store) = AppState::in_memory();
        let app = router(state);

        let (status, body) = send(
            &app,
            "PATCH",
            "/api/todos/does-not-exist",
            Some(r#"{"done":true}"#),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Todo not found"}));
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_body() {
        let (state, store) = AppState::in_memory();
        let app = router(state);
        let id = create(&app, json!({"title": "t"})).await;
        let uri = format!("/api/todos/{}", id);

        for body in ["[]", r#"["done"]"#, "1", "{}"] {
            let (status, response) = send(&app, "PATCH", &uri, Some(body)).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);
            assert_eq!(response, json!({"error": "Invalid update data"}));
        }

        let (status, response) = send(&app, "PATCH", &uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response, json!({"error": "Missing JSON in request"}));

        let stored = store.get(&id).await.unwrap().unwrap();
        assert_eq!(JsonValue::Object(stored), json!({"title": "t"}));
    }

    #[tokio::test]
    async fn test_update_after_delete_is_404() {
        let (state, _) = AppState::in_memory();
        let app = router(state);
        let id = create(&app, json!({"title": "t"})).await;
        let uri = format!("/api/todos/{}", id);

        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, "PATCH", &uri, Some(r#"{"done":true}"#)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
