use crate::models::MessageResponse;
use crate::routes;
use axum::{Json, http::StatusCode};

/// GET / handler - Liveness banner
#[utoipa::path(
    get,
    path = routes::HOME,
    responses(
        (status = 200, description = "Service is up", body = MessageResponse)
    ),
    tag = "home"
)]
pub async fn home_handler() -> (StatusCode, Json<MessageResponse>) {
    (
        StatusCode::OK,
        Json(MessageResponse {
            message: "HOME".to_string(),
        }),
    )
}
