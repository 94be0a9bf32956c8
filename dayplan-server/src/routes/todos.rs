//! Calendar to-do endpoints.
//!
//! Reads are keyed by derived tags; writes replace a whole day at once.
//! The `{db}` path segment selects the logical bucket (collection).

use std::sync::Arc;

use axum::extract::{Form, Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use mongodb::bson::doc;

use crate::calendar;
use crate::error::ApiError;
use crate::models::{
    BucketName, ReplaceDayForm, ReplaceDayRequest, ReplaceDayResponse, TodoDocument, TodoResponse,
    TodosResponse, ValidationError,
};
use crate::state::{AppState, WritePolicy};

/// GET /getTodos/{db}/month/{month} - entries for the month and its calendar
/// neighbors
async fn get_month(
    State(state): State<Arc<AppState>>,
    Path((db, month)): Path<(String, String)>,
) -> Result<Json<TodosResponse>, ApiError> {
    let bucket = BucketName::new(&db)?;
    let months = calendar::month_window(&month)?;

    let todos: Vec<TodoDocument> = state
        .store
        .find_all(bucket.as_str(), doc! { "month": { "$in": months.to_vec() } })
        .await?;

    Ok(Json(TodosResponse { todos: todos.into_iter().map(TodoResponse::from).collect() }))
}

/// GET /getTodos/{db}/day/{date} - entries whose day tag equals the date
async fn get_day(
    State(state): State<Arc<AppState>>,
    Path((db, date)): Path<(String, String)>,
) -> Result<Json<TodosResponse>, ApiError> {
    let bucket = BucketName::new(&db)?;
    calendar::parse_day(&date)?;

    let todos: Vec<TodoDocument> =
        state.store.find_all(bucket.as_str(), doc! { "day": date.as_str() }).await?;

    Ok(Json(TodosResponse { todos: todos.into_iter().map(TodoResponse::from).collect() }))
}

/// POST /updateTodos/{db}/day/{date} - replace the day's entries wholesale
///
/// The `data` form field carries `{"todos": [{"info": ...}, ...]}`. Existing
/// entries for the date are deleted, then the submitted set is inserted with
/// fresh ids and recomputed tags. A payload that fails to decode is rejected
/// before anything is deleted.
async fn replace_day(
    State(state): State<Arc<AppState>>,
    Path((db, date)): Path<(String, String)>,
    Form(form): Form<ReplaceDayForm>,
) -> Result<Json<ReplaceDayResponse>, ApiError> {
    let bucket = BucketName::new(&db)?;
    calendar::parse_day(&date)?;

    let request: ReplaceDayRequest = serde_json::from_str(&form.data)
        .map_err(|err| ValidationError::InvalidPayload { reason: err.to_string() })?;

    let removed = state.store.delete_many(bucket.as_str(), doc! { "day": date.as_str() }).await?;
    tracing::debug!(
        bucket = bucket.as_str(),
        %date,
        removed,
        incoming = request.todos.len(),
        "replacing day"
    );

    for todo in request.todos {
        let document = TodoDocument::stamped(todo.info, &date);
        if let Err(err) = state.store.insert_one(bucket.as_str(), &document).await {
            match state.write_policy {
                WritePolicy::Strict => return Err(err.into()),
                WritePolicy::Lenient => {
                    tracing::error!(
                        bucket = bucket.as_str(),
                        %date,
                        error = %err,
                        "insert failed during day replace"
                    );
                }
            }
        }
    }

    Ok(Json(ReplaceDayResponse { error: None }))
}

/// To-do routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/getTodos/{db}/month/{month}", get(get_month))
        .route("/getTodos/{db}/day/{date}", get(get_day))
        .route("/updateTodos/{db}/day/{date}", post(replace_day))
}

#[cfg(test)]
mod tests {
    // Endpoint behavior is covered by tests/api_flow.rs against a live
    // database: MONGODB_URI=... cargo test -p dayplan-server -- --ignored
}
