use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Field name the handlers inject into every returned todo
pub const ID_FIELD: &str = "id";

/// Body of a todo document: an ordered mapping of arbitrary JSON fields
pub type TodoFields = Map<String, JsonValue>;

/// A todo as returned to clients: the stored fields plus the document key
///
/// `fields` never contains an `id` entry, so the flattened output carries
/// exactly one `id`, always equal to the store key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    #[serde(flatten)]
    pub fields: TodoFields,
    pub id: String,
}

impl Todo {
    pub fn new(id: impl Into<String>, mut fields: TodoFields) -> Self {
        fields.shift_remove(ID_FIELD);
        Self {
            fields,
            id: id.into(),
        }
    }
}

/// Drop any client-supplied `id` so the store key stays authoritative
pub fn strip_id(mut fields: TodoFields) -> TodoFields {
    fields.shift_remove(ID_FIELD);
    fields
}

/// Overwrite the top-level keys of `target` with those in `partial`
///
/// Keys absent from `partial` are left untouched. Nested objects are
/// replaced, not merged.
pub fn merge_fields(target: &mut TodoFields, partial: &TodoFields) {
    for (key, value) in partial {
        target.insert(key.clone(), value.clone());
    }
}

/// Response body for `GET /`
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Response body for a successful delete
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct DeleteResponse {
    pub message: String,
    pub id: String,
}
