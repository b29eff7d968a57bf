use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::parents::repo::Parent;
use crate::state::AppState;

use super::dto::{CheckInResponse, ChildResponse, CreateChildRequest, UpdateChildRequest};
use super::repo::{Child, NewChild};
use super::services;

pub fn child_routes() -> Router<AppState> {
    Router::new()
        .route("/parents/:parent_id/children", post(create_child))
        .route("/parents/:parent_id/children", get(list_children))
        .route("/children/:child_id", get(get_child))
        .route("/children/:child_id", put(update_child))
        .route("/children/:child_id", delete(delete_child))
        .route("/children/:child_id/check-in", post(check_in))
}

#[instrument(skip(state, payload))]
pub async fn create_child(
    State(state): State<AppState>,
    Path(parent_id): Path<Uuid>,
    Json(payload): Json<CreateChildRequest>,
) -> Result<(StatusCode, Json<ChildResponse>), (StatusCode, String)> {
    if payload.display_name.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "display_name is required".into()));
    }

    // The owning parent must exist; the FK would reject anyway but a 404
    // is the right answer for a bad parent id.
    match Parent::find_by_id(&state.db, parent_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Err((StatusCode::NOT_FOUND, "Parent not found".into())),
        Err(e) => {
            error!(error = %e, %parent_id, "parent lookup failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    }

    let child = Child::create(
        &state.db,
        parent_id,
        NewChild {
            display_name: payload.display_name.trim(),
            date_of_birth: payload.date_of_birth,
            grade: payload.grade.as_deref(),
            avatar: payload.avatar.as_deref(),
            learning_styles: &payload.learning_styles,
            sel_strengths: &payload.sel_strengths,
            interests: &payload.interests,
            story_preferences: &payload.story_preferences,
            sel_challenges: &payload.sel_challenges,
            relationship_to_parent: payload.relationship_to_parent.as_deref(),
        },
    )
    .await
    .map_err(|e| {
        error!(error = %e, %parent_id, "create child failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    info!(child_id = %child.id, %parent_id, "child profile created");
    Ok((StatusCode::CREATED, Json(child.into())))
}

#[instrument(skip(state))]
pub async fn list_children(
    State(state): State<AppState>,
    Path(parent_id): Path<Uuid>,
) -> Result<Json<Vec<ChildResponse>>, (StatusCode, String)> {
    let children = Child::list_by_parent(&state.db, parent_id)
        .await
        .map_err(|e| {
            error!(error = %e, %parent_id, "list children failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;
    Ok(Json(children.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn get_child(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ChildResponse>, (StatusCode, String)> {
    match Child::find_by_id(&state.db, id).await {
        Ok(Some(child)) => Ok(Json(child.into())),
        Ok(None) => Err((StatusCode::NOT_FOUND, "Child not found".into())),
        Err(e) => {
            error!(error = %e, %id, "get_child failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn update_child(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateChildRequest>,
) -> Result<Json<ChildResponse>, (StatusCode, String)> {
    if payload.display_name.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "display_name is required".into()));
    }
    if payload.creation_status != "pending" && payload.creation_status != "completed" {
        return Err((
            StatusCode::BAD_REQUEST,
            "creation_status must be pending or completed".into(),
        ));
    }

    match Child::update_profile(
        &state.db,
        id,
        NewChild {
            display_name: payload.display_name.trim(),
            date_of_birth: payload.date_of_birth,
            grade: payload.grade.as_deref(),
            avatar: payload.avatar.as_deref(),
            learning_styles: &payload.learning_styles,
            sel_strengths: &payload.sel_strengths,
            interests: &payload.interests,
            story_preferences: &payload.story_preferences,
            sel_challenges: &payload.sel_challenges,
            relationship_to_parent: payload.relationship_to_parent.as_deref(),
        },
        &payload.creation_status,
    )
    .await
    {
        Ok(Some(child)) => Ok(Json(child.into())),
        Ok(None) => Err((StatusCode::NOT_FOUND, "Child not found".into())),
        Err(e) => {
            error!(error = %e, %id, "update_child failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

#[instrument(skip(state))]
pub async fn delete_child(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    match Child::delete(&state.db, id).await {
        Ok(true) => {
            info!(child_id = %id, "child profile deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        Ok(false) => Err((StatusCode::NOT_FOUND, "Child not found".into())),
        Err(e) => {
            error!(error = %e, %id, "delete_child failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

#[instrument(skip(state))]
pub async fn check_in(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CheckInResponse>, (StatusCode, String)> {
    let today = OffsetDateTime::now_utc().date();
    match services::check_in(&state.db, id, today).await {
        Ok(Some(result)) => {
            if result.already_completed {
                warn!(child_id = %id, "duplicate check-in attempt");
            }
            Ok(Json(CheckInResponse {
                child: result.child.into(),
                new_badges: result.new_badges,
                already_completed: result.already_completed,
            }))
        }
        Ok(None) => Err((StatusCode::NOT_FOUND, "Child not found".into())),
        Err(e) => {
            error!(error = %e, %id, "check_in failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
