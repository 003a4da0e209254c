//! Domain models for the planner.
//!
//! `Create*` and `Update*` inputs carry the field limits as `validator`
//! rules; the schema re-checks the same limits on write.

pub mod event;
pub mod profile;
pub mod role;
pub mod session;
pub mod user;
