use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{error, instrument, warn};
use uuid::Uuid;

use crate::state::AppState;
use crate::store::StoreError;

use super::dto::{
    CohortResponse, OverviewResponse, TopImproversResponse, TrendQuery, TrendResponse,
};
use super::services;
use super::window::Lookback;

pub fn progress_routes() -> Router<AppState> {
    Router::new()
        .route("/parents/:parent_id/progress/trend", get(trend))
        .route(
            "/parents/:parent_id/progress/top-improvers",
            get(top_improvers),
        )
        .route("/parents/:parent_id/progress/cohorts", get(cohorts))
        .route("/parents/:parent_id/progress/overview", get(overview))
}

fn store_error(e: StoreError, parent_id: Uuid, what: &str) -> (StatusCode, String) {
    match e {
        StoreError::NotFound => (StatusCode::NOT_FOUND, "Not found".into()),
        StoreError::Unavailable(source) => {
            error!(error = %source, %parent_id, "{what}: record store unavailable");
            (
                StatusCode::BAD_GATEWAY,
                "record store unavailable".to_string(),
            )
        }
    }
}

#[instrument(skip(state))]
pub async fn trend(
    State(state): State<AppState>,
    Path(parent_id): Path<Uuid>,
    Query(q): Query<TrendQuery>,
) -> Result<Json<TrendResponse>, (StatusCode, String)> {
    let Some(lookback) = Lookback::from_months(q.months) else {
        warn!(%parent_id, months = q.months, "unsupported lookback");
        return Err((
            StatusCode::BAD_REQUEST,
            "months must be 3, 6 or 12".to_string(),
        ));
    };

    let buckets = services::trend_report(
        state.store.as_ref(),
        parent_id,
        lookback,
        state.config.progress.entries_per_child_per_month,
        OffsetDateTime::now_utc(),
    )
    .await
    .map_err(|e| store_error(e, parent_id, "trend"))?;

    Ok(Json(TrendResponse {
        months: lookback.months(),
        buckets,
    }))
}

#[instrument(skip(state))]
pub async fn top_improvers(
    State(state): State<AppState>,
    Path(parent_id): Path<Uuid>,
) -> Result<Json<TopImproversResponse>, (StatusCode, String)> {
    let improvers = services::top_improvers_report(state.store.as_ref(), parent_id)
        .await
        .map_err(|e| store_error(e, parent_id, "top_improvers"))?;
    Ok(Json(TopImproversResponse { improvers }))
}

#[instrument(skip(state))]
pub async fn cohorts(
    State(state): State<AppState>,
    Path(parent_id): Path<Uuid>,
) -> Result<Json<CohortResponse>, (StatusCode, String)> {
    let cohorts =
        services::cohort_report(state.store.as_ref(), parent_id, OffsetDateTime::now_utc())
            .await
            .map_err(|e| store_error(e, parent_id, "cohorts"))?;
    Ok(Json(CohortResponse { cohorts }))
}

#[instrument(skip(state))]
pub async fn overview(
    State(state): State<AppState>,
    Path(parent_id): Path<Uuid>,
) -> Result<Json<OverviewResponse>, (StatusCode, String)> {
    let stats = services::overview_report(state.store.as_ref(), parent_id)
        .await
        .map_err(|e| store_error(e, parent_id, "overview"))?;
    Ok(Json(OverviewResponse { stats }))
}
