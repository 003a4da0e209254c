//! The dashboard listing.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use planner_core::dashboard::{DashboardMode, DashboardView};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::extract::CurrentUser;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard/", get(dashboard))
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// `my`, `invited` or `all`; a mode label is accepted too.
    pub mode: Option<String>,
}

#[derive(Serialize)]
pub struct ModeOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Serialize)]
pub struct DashboardResponse {
    #[serde(flatten)]
    pub view: DashboardView,
    pub modes: Vec<ModeOption>,
}

/// GET /dashboard/?mode=my|invited|all
async fn dashboard(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Json<DashboardResponse>> {
    let mode = match query.mode.as_deref() {
        None | Some("") => DashboardMode::default(),
        Some(raw) => raw
            .parse::<DashboardMode>()
            .map_err(|e| ApiError::validation(e.to_string()))?,
    };

    let view = state.dashboard.render(user.profile_id(), mode).await?;
    let modes = DashboardMode::ALL
        .into_iter()
        .map(|m| ModeOption {
            value: m.as_param(),
            label: m.label(),
            selected: m == mode,
        })
        .collect();

    Ok(Json(DashboardResponse { view, modes }))
}
