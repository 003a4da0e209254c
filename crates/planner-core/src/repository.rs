//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Writes that reference another
//! record (an event's owner, a role's event, either end of an
//! invitation or fulfillment) fail with [`PlannerError::NotFound`]
//! when the referenced record does not exist.
//!
//! Listings of events are ordered by date, then creation time.
//!
//! [`PlannerError::NotFound`]: crate::error::PlannerError::NotFound

use uuid::Uuid;

use crate::error::PlannerResult;
use crate::models::{
    event::{CreateEvent, Event, UpdateEvent},
    profile::Profile,
    role::{CreateRole, Role, UpdateRole},
    session::{CreateSession, Session},
    user::{CreateUser, User},
};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    /// Creates the user together with its profile.
    fn create(&self, input: CreateUser) -> impl Future<Output = PlannerResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = PlannerResult<User>> + Send;
    fn get_by_username(&self, username: &str)
    -> impl Future<Output = PlannerResult<User>> + Send;
    /// Hard delete. Removes the profile, every event the profile owns
    /// (with their roles), every invitation and fulfillment the profile
    /// takes part in, and the user's sessions.
    fn delete(&self, id: Uuid) -> impl Future<Output = PlannerResult<()>> + Send;
}

pub trait ProfileRepository: Send + Sync {
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = PlannerResult<Profile>> + Send;
    fn get_by_user_id(&self, user_id: Uuid)
    -> impl Future<Output = PlannerResult<Profile>> + Send;
    fn get_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = PlannerResult<Profile>> + Send;
    /// Removes the profile, every event it owns (with their roles,
    /// fulfillments and invitations), and every invitation and
    /// fulfillment it holds. The user and its sessions are kept.
    fn delete(&self, id: Uuid) -> impl Future<Output = PlannerResult<()>> + Send;
    /// Roles the profile fulfills, across all events.
    fn roles(&self, id: Uuid) -> impl Future<Output = PlannerResult<Vec<Role>>> + Send;
}

// ---------------------------------------------------------------------------
// Events & invitations
// ---------------------------------------------------------------------------

pub trait EventRepository: Send + Sync {
    fn create(&self, input: CreateEvent) -> impl Future<Output = PlannerResult<Event>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = PlannerResult<Event>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateEvent,
    ) -> impl Future<Output = PlannerResult<Event>> + Send;
    /// Removes the event, its roles, their fulfillments and all
    /// invitations to it.
    fn delete(&self, id: Uuid) -> impl Future<Output = PlannerResult<()>> + Send;

    fn list_owned_by(
        &self,
        profile_id: Uuid,
    ) -> impl Future<Output = PlannerResult<Vec<Event>>> + Send;
    fn list_invited(
        &self,
        profile_id: Uuid,
    ) -> impl Future<Output = PlannerResult<Vec<Event>>> + Send;
    /// Union of [`list_owned_by`](Self::list_owned_by) and
    /// [`list_invited`](Self::list_invited), without duplicates.
    fn list_owned_or_invited(
        &self,
        profile_id: Uuid,
    ) -> impl Future<Output = PlannerResult<Vec<Event>>> + Send;

    /// Invites a profile. Inviting twice is a no-op.
    fn invite(
        &self,
        event_id: Uuid,
        profile_id: Uuid,
    ) -> impl Future<Output = PlannerResult<()>> + Send;
    fn uninvite(
        &self,
        event_id: Uuid,
        profile_id: Uuid,
    ) -> impl Future<Output = PlannerResult<()>> + Send;
    fn invitees(&self, event_id: Uuid)
    -> impl Future<Output = PlannerResult<Vec<Profile>>> + Send;
    fn is_invited(
        &self,
        event_id: Uuid,
        profile_id: Uuid,
    ) -> impl Future<Output = PlannerResult<bool>> + Send;
}

// ---------------------------------------------------------------------------
// Roles & fulfillment
// ---------------------------------------------------------------------------

pub trait RoleRepository: Send + Sync {
    fn create(&self, input: CreateRole) -> impl Future<Output = PlannerResult<Role>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = PlannerResult<Role>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateRole,
    ) -> impl Future<Output = PlannerResult<Role>> + Send;
    /// Removes the role and its fulfillments.
    fn delete(&self, id: Uuid) -> impl Future<Output = PlannerResult<()>> + Send;
    fn list_by_event(
        &self,
        event_id: Uuid,
    ) -> impl Future<Output = PlannerResult<Vec<Role>>> + Send;

    /// Records that a profile fills the role. Fulfilling twice is a
    /// no-op. Headcount is not enforced.
    fn fulfill(
        &self,
        role_id: Uuid,
        profile_id: Uuid,
    ) -> impl Future<Output = PlannerResult<()>> + Send;
    fn unfulfill(
        &self,
        role_id: Uuid,
        profile_id: Uuid,
    ) -> impl Future<Output = PlannerResult<()>> + Send;
    fn fulfilled_by(
        &self,
        role_id: Uuid,
    ) -> impl Future<Output = PlannerResult<Vec<Profile>>> + Send;
    /// Roles the profile has taken on, across all events.
    fn list_by_profile(
        &self,
        profile_id: Uuid,
    ) -> impl Future<Output = PlannerResult<Vec<Role>>> + Send;
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

pub trait SessionRepository: Send + Sync {
    fn create(&self, input: CreateSession) -> impl Future<Output = PlannerResult<Session>> + Send;
    fn get_by_token_hash(
        &self,
        token_hash: &str,
    ) -> impl Future<Output = PlannerResult<Session>> + Send;
    fn invalidate(&self, id: Uuid) -> impl Future<Output = PlannerResult<()>> + Send;
    fn invalidate_user_sessions(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = PlannerResult<()>> + Send;
    /// Deletes expired sessions and returns how many were removed.
    fn cleanup_expired(&self) -> impl Future<Output = PlannerResult<u64>> + Send;
}
