//! Event creation, editing, detail and invitations.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use planner_core::models::event::{Event, UpdateEvent};
use planner_core::models::role::Role;
use planner_core::planner::{EventDetail, NewEventPlan, NewRole, PlannedEvent};
use planner_core::repository::ProfileRepository;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath, CurrentUser};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/event_creation/", post(create_event))
        .route(
            "/{event_id}/edit_event/",
            get(edit_form).post(edit_event).delete(delete_event),
        )
        .route("/event/{event_id}/", get(event_detail))
        .route("/event/{event_id}/invitees/", post(invite))
        .route(
            "/event/{event_id}/invitees/{profile_id}/",
            delete(uninvite),
        )
        .route("/event/{event_id}/roles/", post(add_role))
}

#[derive(Debug, Deserialize)]
pub struct InviteRequest {
    pub username: String,
}

/// POST /event_creation/
async fn create_event(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiJson(plan): ApiJson<NewEventPlan>,
) -> ApiResult<(StatusCode, Json<PlannedEvent>)> {
    let planned = state.planner.create_event(user.profile_id(), plan).await?;
    Ok((StatusCode::CREATED, Json(planned)))
}

/// GET /{event_id}/edit_event/
async fn edit_form(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(event_id): ApiPath<Uuid>,
) -> ApiResult<Json<Event>> {
    let event = state
        .planner
        .editable_event(user.profile_id(), event_id)
        .await?;
    Ok(Json(event))
}

/// POST /{event_id}/edit_event/
async fn edit_event(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(event_id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<UpdateEvent>,
) -> ApiResult<Json<Event>> {
    let event = state
        .planner
        .edit_event(user.profile_id(), event_id, input)
        .await?;
    Ok(Json(event))
}

/// DELETE /{event_id}/edit_event/
async fn delete_event(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(event_id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .planner
        .delete_event(user.profile_id(), event_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /event/{event_id}/
async fn event_detail(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(event_id): ApiPath<Uuid>,
) -> ApiResult<Json<EventDetail>> {
    let detail = state
        .planner
        .event_detail(user.profile_id(), event_id)
        .await?;
    Ok(Json(detail))
}

/// POST /event/{event_id}/invitees/
async fn invite(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(event_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<InviteRequest>,
) -> ApiResult<StatusCode> {
    let invitee = state.profiles.get_by_username(&req.username).await?;
    state
        .planner
        .invite(user.profile_id(), event_id, invitee.id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /event/{event_id}/invitees/{profile_id}/
async fn uninvite(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath((event_id, profile_id)): ApiPath<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    state
        .planner
        .uninvite(user.profile_id(), event_id, profile_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /event/{event_id}/roles/
async fn add_role(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(event_id): ApiPath<Uuid>,
    ApiJson(new_role): ApiJson<NewRole>,
) -> ApiResult<(StatusCode, Json<Role>)> {
    let role = state
        .planner
        .add_role(user.profile_id(), event_id, new_role)
        .await?;
    Ok((StatusCode::CREATED, Json(role)))
}
