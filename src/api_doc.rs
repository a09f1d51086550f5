use utoipa::OpenApi;

use crate::error::{ErrorResponse, HealthResponse, UnhealthyResponse};
use crate::handlers;
use crate::models::{DeleteResponse, MessageResponse};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "todo-api",
        version = "0.1.0",
        description = "CRUD over a collection of free-form JSON todos"
    ),
    paths(
        handlers::home::home_handler,
        handlers::health::health_handler,
        handlers::list::list_handler,
        handlers::create::create_handler,
        handlers::update::update_handler,
        handlers::delete::delete_handler
    ),
    components(
        schemas(
            MessageResponse,
            DeleteResponse,
            ErrorResponse,
            HealthResponse,
            UnhealthyResponse
        )
    ),
    tags(
        (name = "home", description = "Service banner"),
        (name = "health", description = "Health check operations"),
        (name = "todos", description = "Todo collection operations")
    )
)]
pub struct ApiDoc;
