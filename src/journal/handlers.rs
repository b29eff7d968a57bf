use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{error, instrument, warn};
use uuid::Uuid;

use crate::state::AppState;

use super::dto::{Pagination, SubmitEntryRequest, SubmitEntryResponse};
use super::repo::JournalEntry;
use super::services;

pub fn journal_routes() -> Router<AppState> {
    Router::new()
        .route("/children/:child_id/journal", post(submit_entry))
        .route("/children/:child_id/journal", get(list_entries))
}

#[instrument(skip(state, payload))]
pub async fn submit_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubmitEntryRequest>,
) -> Result<(StatusCode, Json<SubmitEntryResponse>), (StatusCode, String)> {
    for rating in payload.ratings.iter().flatten() {
        if !(0..=10).contains(&rating) {
            warn!(child_id = %id, rating, "rating out of range");
            return Err((
                StatusCode::BAD_REQUEST,
                "ratings must be between 0 and 10".into(),
            ));
        }
    }

    let entry_date = payload
        .entry_date
        .unwrap_or_else(|| OffsetDateTime::now_utc().date());

    match services::submit_entry(
        &state.db,
        id,
        entry_date,
        payload.ratings,
        &payload.reflections,
    )
    .await
    {
        Ok(Some(submitted)) => Ok((
            StatusCode::CREATED,
            Json(SubmitEntryResponse {
                entry: submitted.entry,
                xp_awarded: submitted.xp_awarded,
            }),
        )),
        Ok(None) => Err((StatusCode::NOT_FOUND, "Child not found".into())),
        Err(e) => {
            error!(error = %e, child_id = %id, "submit_entry failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

#[instrument(skip(state))]
pub async fn list_entries(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<JournalEntry>>, (StatusCode, String)> {
    let (limit, offset) = p.clamped();
    let entries = JournalEntry::list_by_child(&state.db, id, limit, offset)
        .await
        .map_err(|e| {
            error!(error = %e, child_id = %id, "list_entries failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;
    Ok(Json(entries))
}
