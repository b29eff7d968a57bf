use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::state::AppState;

use super::dto::{CreateParentRequest, ParentResponse, UpdateParentRequest};
use super::repo::Parent;

pub fn parent_routes() -> Router<AppState> {
    Router::new()
        .route("/parents", post(create_parent))
        .route("/parents/:parent_id", get(get_parent))
        .route("/parents/:parent_id", put(update_parent))
}

fn is_unique_violation(e: &anyhow::Error) -> bool {
    matches!(
        e.downcast_ref::<sqlx::Error>(),
        Some(sqlx::Error::Database(db)) if db.is_unique_violation()
    )
}

#[instrument(skip(state, payload))]
pub async fn create_parent(
    State(state): State<AppState>,
    Json(mut payload): Json<CreateParentRequest>,
) -> Result<(StatusCode, Json<ParentResponse>), (StatusCode, String)> {
    payload.email = payload.email.trim().to_lowercase();
    if payload.name.trim().is_empty() || payload.email.is_empty() {
        warn!("create_parent missing name or email");
        return Err((StatusCode::BAD_REQUEST, "name and email are required".into()));
    }

    // Ensure email is not taken
    if let Ok(Some(_)) = Parent::find_by_email(&state.db, &payload.email).await {
        warn!(email = %payload.email, "email already registered");
        return Err((
            StatusCode::CONFLICT,
            "Email already registered".into(),
        ));
    }

    let id = payload.id.unwrap_or_else(Uuid::new_v4);
    let parent = Parent::create(
        &state.db,
        id,
        payload.name.trim(),
        &payload.email,
        payload.relationship.as_deref(),
        payload.emergency_contact.as_deref(),
    )
    .await
    .map_err(|e| {
        // The UNIQUE constraint backstops the pre-check under races.
        if is_unique_violation(&e) {
            warn!(email = %payload.email, "email already registered");
            (StatusCode::CONFLICT, "Email already registered".to_string())
        } else {
            error!(error = %e, "create parent failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    })?;

    info!(parent_id = %parent.id, "parent created");
    Ok((StatusCode::CREATED, Json(parent.into())))
}


#[instrument(skip(state))]
pub async fn get_parent(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ParentResponse>, (StatusCode, String)> {
    match Parent::find_by_id(&state.db, id).await {
        Ok(Some(parent)) => Ok(Json(parent.into())),
        Ok(None) => Err((StatusCode::NOT_FOUND, "Parent not found".into())),
        Err(e) => {
            error!(error = %e, %id, "get_parent failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn update_parent(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateParentRequest>,
) -> Result<Json<ParentResponse>, (StatusCode, String)> {
    if payload.name.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "name is required".into()));
    }

    match Parent::update(
        &state.db,
        id,
        payload.name.trim(),
        payload.relationship.as_deref(),
        payload.emergency_contact.as_deref(),
    )
    .await
    {
        Ok(Some(parent)) => Ok(Json(parent.into())),
        Ok(None) => Err((StatusCode::NOT_FOUND, "Parent not found".into())),
        Err(e) => {
            error!(error = %e, %id, "update_parent failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
