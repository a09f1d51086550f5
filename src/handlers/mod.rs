pub mod create;
pub mod delete;
pub mod health;
pub mod home;
pub mod list;
pub mod update;

pub use create::create_handler;
pub use delete::delete_handler;
pub use health::health_handler;
pub use home::home_handler;
pub use list::list_handler;
pub use update::update_handler;

use axum::{Json, extract::rejection::JsonRejection};
use serde_json::Value as JsonValue;

use crate::error::ApiError;
use crate::models::{TodoFields, strip_id};

/// Accept a request body only if it is a non-empty JSON object
///
/// A client-supplied `id` key is dropped before the emptiness check.
pub(crate) fn json_object(
    payload: Result<Json<JsonValue>, JsonRejection>,
    invalid: &'static str,
) -> Result<TodoFields, ApiError> {
    let Json(value) = payload?;
    match value {
        JsonValue::Object(fields) => {
            let fields = strip_id(fields);
            if fields.is_empty() {
                Err(ApiError::InvalidData(invalid))
            } else {
                Ok(fields)
            }
        }
        _ => Err(ApiError::InvalidData(invalid)),
    }
}
