//! Registration, login and logout.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use planner_auth::{LoginInput, LoginOutput, RegisterInput, Registered};
use planner_core::dashboard::DashboardMode;
use serde::Serialize;

use crate::error::ApiResult;
use crate::extract::{ApiJson, BearerToken};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register/", post(register))
        .route("/login/", post(login))
        .route("/logout/", post(logout))
}

#[derive(Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub session: LoginOutput,
    /// Dashboard mode a fresh session starts in.
    pub dashboard_mode: DashboardMode,
}

/// POST /register/
async fn register(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<RegisterInput>,
) -> ApiResult<(StatusCode, Json<Registered>)> {
    let registered = state.auth.register(input).await?;
    Ok((StatusCode::CREATED, Json(registered)))
}

/// POST /login/
async fn login(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LoginInput>,
) -> ApiResult<Json<LoginResponse>> {
    let session = state.auth.login(input).await?;
    Ok(Json(LoginResponse {
        session,
        dashboard_mode: DashboardMode::default(),
    }))
}

/// POST /logout/
async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> ApiResult<StatusCode> {
    state.auth.logout(&token).await?;
    Ok(StatusCode::NO_CONTENT)
}
