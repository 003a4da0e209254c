//! Shared application state.

use std::sync::Arc;

use planner_auth::{AuthConfig, AuthService};
use planner_core::dashboard::Dashboard;
use planner_core::planner::EventPlanner;
use planner_db::repository::{
    SurrealEventRepository, SurrealProfileRepository, SurrealRoleRepository,
    SurrealSessionRepository, SurrealUserRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;

pub type Auth = AuthService<
    SurrealUserRepository<Any>,
    SurrealProfileRepository<Any>,
    SurrealSessionRepository<Any>,
>;
pub type Planner = EventPlanner<SurrealEventRepository<Any>, SurrealRoleRepository<Any>>;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<Auth>,
    pub planner: Arc<Planner>,
    pub dashboard: Arc<Dashboard<SurrealEventRepository<Any>>>,
    pub profiles: SurrealProfileRepository<Any>,
    pub sessions: SurrealSessionRepository<Any>,
}

impl AppState {
    /// Wire every service to the same database handle.
    pub fn new(db: Surreal<Any>, auth_config: AuthConfig) -> Self {
        let auth = AuthService::new(
            SurrealUserRepository::new(db.clone()),
            SurrealProfileRepository::new(db.clone()),
            SurrealSessionRepository::new(db.clone()),
            auth_config,
        );
        let planner = EventPlanner::new(
            SurrealEventRepository::new(db.clone()),
            SurrealRoleRepository::new(db.clone()),
        );

        Self {
            auth: Arc::new(auth),
            planner: Arc::new(planner),
            dashboard: Arc::new(Dashboard::new(SurrealEventRepository::new(db.clone()))),
            profiles: SurrealProfileRepository::new(db.clone()),
            sessions: SurrealSessionRepository::new(db),
        }
    }
}
