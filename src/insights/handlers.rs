use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::{Duration, OffsetDateTime};
use tracing::{error, instrument, warn};
use uuid::Uuid;

use crate::children::repo::Child;
use crate::progress::APPROX_DAYS_PER_MONTH;
use crate::state::AppState;

use super::dto::{CreateInsightRequest, InsightQuery};
use super::repo::{SelInsight, COMPETENCY_MAX};

pub fn insight_routes() -> Router<AppState> {
    Router::new()
        .route("/children/:child_id/insights", post(create_insight))
        .route("/children/:child_id/insights", get(list_insights))
}

#[instrument(skip(state, payload))]
pub async fn create_insight(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateInsightRequest>,
) -> Result<(StatusCode, Json<SelInsight>), (StatusCode, String)> {
    let scores = payload.scores();
    if scores.iter().any(|&s| !(0..=COMPETENCY_MAX).contains(&s)) {
        warn!(child_id = %id, ?scores, "competency score out of range");
        return Err((
            StatusCode::BAD_REQUEST,
            "competency scores must be between 0 and 10".into(),
        ));
    }

    match Child::find_by_id(&state.db, id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Err((StatusCode::NOT_FOUND, "Child not found".into())),
        Err(e) => {
            error!(error = %e, child_id = %id, "child lookup failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    }

    let recorded_at = payload.recorded_at.unwrap_or_else(OffsetDateTime::now_utc);
    let insight = SelInsight::create(
        &state.db,
        id,
        scores,
        payload.source_text.as_deref(),
        recorded_at,
    )
    .await
    .map_err(|e| {
        error!(error = %e, child_id = %id, "create_insight failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok((StatusCode::CREATED, Json(insight)))
}

#[instrument(skip(state))]
pub async fn list_insights(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<InsightQuery>,
) -> Result<Json<Vec<SelInsight>>, (StatusCode, String)> {
    let since = match q.months {
        Some(months) => {
            OffsetDateTime::now_utc() - Duration::days(months as i64 * APPROX_DAYS_PER_MONTH)
        }
        None => OffsetDateTime::UNIX_EPOCH,
    };

    let insights = SelInsight::list_by_child(&state.db, id, since)
        .await
        .map_err(|e| {
            error!(error = %e, child_id = %id, "list_insights failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;
    Ok(Json(insights))
}
