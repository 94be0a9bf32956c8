//! Domain models, request/response types, and input validation.

use std::fmt;

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::calendar;

/// Maximum length of a bucket (collection) name from the request path.
const MAX_BUCKET_NAME_LEN: usize = 64;

/// Persisted to-do entry: `{_id, info, month, day}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TodoDocument {
    /// Unique document id, database-assigned
    #[serde(rename = "_id")]
    pub id: ObjectId,

    /// Free-text content
    pub info: String,

    /// Derived month tag, format YYYYMM
    pub month: String,

    /// Day tag, format YYYY-MM-DD
    pub day: String,
}

impl TodoDocument {
    /// Stamp a new entry for a day: fresh id, derived tags.
    ///
    /// The month tag is always recomputed from the day, never taken from
    /// client input.
    pub fn stamped(info: String, day: &str) -> Self {
        Self {
            id: ObjectId::new(),
            info,
            month: calendar::month_tag(day),
            day: day.to_string(),
        }
    }
}

/// To-do entry as returned to clients (id as hex).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoResponse {
    pub id: String,
    pub info: String,
    pub month: String,
    pub day: String,
}

impl From<TodoDocument> for TodoResponse {
    fn from(todo: TodoDocument) -> Self {
        Self { id: todo.id.to_hex(), info: todo.info, month: todo.month, day: todo.day }
    }
}

/// `{"todos": [...]}` envelope for the read endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct TodosResponse {
    pub todos: Vec<TodoResponse>,
}

/// Incoming entry for a day replace. Only the text is taken from the client;
/// any id or tag fields in the payload are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TodoInput {
    pub info: String,
}

/// JSON payload carried in the `data` form field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplaceDayRequest {
    #[serde(default)]
    pub todos: Vec<TodoInput>,
}

/// Form wrapper for the replace endpoint: `data=<json>`.
#[derive(Debug, Deserialize)]
pub struct ReplaceDayForm {
    pub data: String,
}

/// `{"error": null}` success envelope for the replace endpoint.
#[derive(Debug, Serialize)]
pub struct ReplaceDayResponse {
    pub error: Option<String>,
}

/// Validated logical bucket name taken from the `:db` path segment.
///
/// The segment becomes a collection name, so it is checked before it
/// reaches the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketName(String);

impl BucketName {
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        if name.is_empty() {
            return Err(ValidationError::Empty { field: "db" });
        }
        if name.len() > MAX_BUCKET_NAME_LEN {
            return Err(ValidationError::TooLong { field: "db", max: MAX_BUCKET_NAME_LEN });
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return Err(ValidationError::InvalidFormat {
                field: "db",
                reason: "only letters, digits, '_' and '-' are allowed",
            });
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validation error for request inputs.
#[derive(Debug, Clone)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// String doesn't match required format (e.g. a date tag)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// The JSON payload could not be decoded
    InvalidPayload { reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => write!(f, "{}: {}", field, reason),
            Self::InvalidPayload { reason } => write!(f, "invalid payload: {}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}
