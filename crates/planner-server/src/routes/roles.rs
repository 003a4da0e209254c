//! Role maintenance and fulfillment.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use planner_core::models::role::{Role, UpdateRole};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath, CurrentUser};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/role/{role_id}/", post(update_role).delete(remove_role))
        .route(
            "/role/{role_id}/fulfill/",
            post(fulfill_role).delete(withdraw_from_role),
        )
        .route("/profile/roles/", get(my_roles))
}

/// POST /role/{role_id}/ (event owner only)
async fn update_role(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(role_id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<UpdateRole>,
) -> ApiResult<Json<Role>> {
    let role = state
        .planner
        .update_role(user.profile_id(), role_id, input)
        .await?;
    Ok(Json(role))
}

/// DELETE /role/{role_id}/ (event owner only)
async fn remove_role(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(role_id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .planner
        .remove_role(user.profile_id(), role_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /role/{role_id}/fulfill/
async fn fulfill_role(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(role_id): ApiPath<Uuid>,
) -> ApiResult<Json<Role>> {
    let role = state
        .planner
        .fulfill_role(user.profile_id(), role_id)
        .await?;
    Ok(Json(role))
}

/// DELETE /role/{role_id}/fulfill/
async fn withdraw_from_role(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(role_id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .planner
        .withdraw_from_role(user.profile_id(), role_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /profile/roles/
async fn my_roles(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<Vec<Role>>> {
    let roles = state.planner.my_roles(user.profile_id()).await?;
    Ok(Json(roles))
}
