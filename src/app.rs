use axum::{
    Router,
    routing::{get, patch},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::handlers::{
    create_handler, delete_handler, health_handler, home_handler, list_handler, update_handler,
};
use crate::routes;
use crate::state::AppState;

/// Assemble the full HTTP surface over the given state
///
/// CORS is fully open: the API is called from a separately hosted front end.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(routes::HOME, get(home_handler))
        .route(routes::HEALTH, get(health_handler))
        .route(routes::TODOS, get(list_handler).post(create_handler))
        .route(routes::TODO_ITEM, patch(update_handler).delete(delete_handler))
        .merge(SwaggerUi::new(routes::SWAGGER_UI).url(routes::OPENAPI_JSON, ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
