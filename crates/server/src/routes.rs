//! Route handlers for the participants surface.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use leaderboard_core::Participant;
use serde::Serialize;
use serde_json::Value;

use crate::db::Db;
use crate::error::ApiError;

/// Build the application router.
pub fn router(db: Arc<Db>) -> Router {
    Router::new()
        .route("/participants", get(list).post(create))
        .route(
            "/participants/:id",
            axum::routing::put(update_score).delete(remove),
        )
        .with_state(db)
}

/// GET /participants — all participants sorted by score descending.
async fn list(State(db): State<Arc<Db>>) -> Result<Json<Vec<Participant>>, ApiError> {
    Ok(Json(db.list()?))
}

/// POST /participants — add a new participant.
///
/// The body is validated by hand so a missing or blank name answers
/// 400 with the error envelope instead of a bare extractor rejection.
async fn create(
    State(db): State<Arc<Db>>,
    Json(body): Json<Value>,
) -> Result<Json<Participant>, ApiError> {
    let name = body
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or(ApiError::MissingName)?;

    let created = db.create(name)?;
    tracing::info!("Created participant {} ({})", created.name, created.id);
    Ok(Json(created))
}

/// PUT /participants/{id} — replace a participant's score.
async fn update_score(
    State(db): State<Arc<Db>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Participant>, ApiError> {
    let score = body
        .get("score")
        .and_then(Value::as_u64)
        .and_then(|raw| u32::try_from(raw).ok())
        .ok_or(ApiError::InvalidScore)?;

    db.update_score(&id, score)?
        .map(Json)
        .ok_or(ApiError::UnknownId(id))
}

#[derive(Debug, Serialize)]
struct DeleteOutcome {
    success: bool,
}

/// DELETE /participants/{id} — remove a participant.
async fn remove(
    State(db): State<Arc<Db>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteOutcome>, ApiError> {
    if db.delete(&id)? {
        tracing::info!("Deleted participant {id}");
        Ok(Json(DeleteOutcome { success: true }))
    } else {
        Err(ApiError::UnknownId(id))
    }
}
