// Route path constants - single source of truth for all API paths

pub const HOME: &str = "/";
pub const HEALTH: &str = "/health";
pub const TODOS: &str = "/api/todos";
pub const TODO_ITEM: &str = "/api/todos/{id}";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";
pub const SWAGGER_UI: &str = "/swagger-ui";
