//! Route table. Each module contributes a router over [`AppState`].

pub mod account;
pub mod dashboard;
pub mod events;
pub mod health;
pub mod roles;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(account::router())
        .merge(dashboard::router())
        .merge(events::router())
        .merge(roles::router())
}
