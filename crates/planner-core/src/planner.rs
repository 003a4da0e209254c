//! Event planning: creating events with their roles, editing them,
//! managing invitations and letting profiles take on roles.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::access;
use crate::error::PlannerResult;
use crate::models::event::{CreateEvent, Event, UpdateEvent, validate_event_date};
use crate::models::profile::Profile;
use crate::models::role::{CreateRole, Role, UpdateRole};
use crate::repository::{EventRepository, RoleRepository};

/// A role slot submitted together with a new event.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewRole {
    #[validate(length(min = 1, max = 30))]
    pub name: String,
    #[validate(length(max = 100))]
    #[serde(default)]
    pub description: String,
    pub amount: u32,
}

/// Everything needed to create an event in one step.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewEventPlan {
    #[validate(length(min = 1, max = 30))]
    pub name: String,
    #[validate(custom(function = "validate_event_date"))]
    pub date: NaiveDate,
    #[validate(length(max = 200))]
    #[serde(default)]
    pub description: String,
    #[validate(length(max = 50))]
    #[serde(default)]
    pub location: String,
    #[validate(nested)]
    #[serde(default)]
    pub roles: Vec<NewRole>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlannedEvent {
    pub event: Event,
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleDetail {
    pub role: Role,
    pub fulfilled_by: Vec<Profile>,
}

/// Event as seen by one requester.
#[derive(Debug, Clone, Serialize)]
pub struct EventDetail {
    pub event: Event,
    pub roles: Vec<RoleDetail>,
    pub invitees: Vec<Profile>,
    pub can_edit: bool,
    pub invited: bool,
}

/// Planning service.
///
/// Generic over repository implementations so that the planning rules
/// have no dependency on the database crate. Every `requester` is a
/// profile id.
pub struct EventPlanner<E: EventRepository, R: RoleRepository> {
    events: E,
    roles: R,
}

impl<E: EventRepository, R: RoleRepository> EventPlanner<E, R> {
    pub fn new(events: E, roles: R) -> Self {
        Self { events, roles }
    }

    /// Create an event owned by `requester`, then its roles.
    ///
    /// The whole plan is validated before anything is written. If a
    /// role fails to persist the event is removed again.
    pub async fn create_event(
        &self,
        requester: Uuid,
        plan: NewEventPlan,
    ) -> PlannerResult<PlannedEvent> {
        plan.validate()?;

        let event = self
            .events
            .create(CreateEvent {
                owner_id: requester,
                name: plan.name,
                date: plan.date,
                description: plan.description,
                location: plan.location,
            })
            .await?;

        let mut roles = Vec::with_capacity(plan.roles.len());
        for new_role in plan.roles {
            match self.roles.create(role_input(event.id, new_role)).await {
                Ok(role) => roles.push(role),
                Err(e) => {
                    if let Err(cleanup) = self.events.delete(event.id).await {
                        warn!(
                            event_id = %event.id,
                            error = %cleanup,
                            "Failed to remove partially created event"
                        );
                    }
                    return Err(e);
                }
            }
        }

        info!(
            event_id = %event.id,
            owner_id = %requester,
            roles = roles.len(),
            "Event created"
        );

        Ok(PlannedEvent { event, roles })
    }

    /// Load an event for editing; fails unless `requester` owns it.
    pub async fn editable_event(&self, requester: Uuid, event_id: Uuid) -> PlannerResult<Event> {
        let event = self.events.get_by_id(event_id).await?;
        access::ensure_can_edit(requester, &event)?;
        Ok(event)
    }

    pub async fn edit_event(
        &self,
        requester: Uuid,
        event_id: Uuid,
        input: UpdateEvent,
    ) -> PlannerResult<Event> {
        input.validate()?;
        self.editable_event(requester, event_id).await?;

        let event = self.events.update(event_id, input).await?;
        info!(event_id = %event_id, "Event updated");
        Ok(event)
    }

    pub async fn delete_event(&self, requester: Uuid, event_id: Uuid) -> PlannerResult<()> {
        self.editable_event(requester, event_id).await?;
        self.events.delete(event_id).await?;
        info!(event_id = %event_id, "Event deleted");
        Ok(())
    }

    pub async fn invite(
        &self,
        requester: Uuid,
        event_id: Uuid,
        invitee: Uuid,
    ) -> PlannerResult<()> {
        self.editable_event(requester, event_id).await?;
        self.events.invite(event_id, invitee).await?;
        info!(event_id = %event_id, invitee = %invitee, "Profile invited");
        Ok(())
    }

    pub async fn uninvite(
        &self,
        requester: Uuid,
        event_id: Uuid,
        invitee: Uuid,
    ) -> PlannerResult<()> {
        self.editable_event(requester, event_id).await?;
        self.events.uninvite(event_id, invitee).await?;
        info!(event_id = %event_id, invitee = %invitee, "Invitation removed");
        Ok(())
    }

    pub async fn add_role(
        &self,
        requester: Uuid,
        event_id: Uuid,
        new_role: NewRole,
    ) -> PlannerResult<Role> {
        new_role.validate()?;
        self.editable_event(requester, event_id).await?;

        let role = self.roles.create(role_input(event_id, new_role)).await?;
        info!(event_id = %event_id, role_id = %role.id, "Role added");
        Ok(role)
    }

    pub async fn update_role(
        &self,
        requester: Uuid,
        role_id: Uuid,
        input: UpdateRole,
    ) -> PlannerResult<Role> {
        input.validate()?;
        let role = self.roles.get_by_id(role_id).await?;
        self.editable_event(requester, role.event_id).await?;

        let role = self.roles.update(role_id, input).await?;
        info!(role_id = %role_id, "Role updated");
        Ok(role)
    }

    pub async fn remove_role(&self, requester: Uuid, role_id: Uuid) -> PlannerResult<()> {
        let role = self.roles.get_by_id(role_id).await?;
        self.editable_event(requester, role.event_id).await?;

        self.roles.delete(role_id).await?;
        info!(role_id = %role_id, event_id = %role.event_id, "Role removed");
        Ok(())
    }

    /// Sign `requester` up for a role. Open to any profile regardless
    /// of ownership or invitation.
    pub async fn fulfill_role(&self, requester: Uuid, role_id: Uuid) -> PlannerResult<Role> {
        let role = self.roles.get_by_id(role_id).await?;
        self.roles.fulfill(role_id, requester).await?;
        info!(role_id = %role_id, profile_id = %requester, "Role fulfilled");
        Ok(role)
    }

    pub async fn withdraw_from_role(&self, requester: Uuid, role_id: Uuid) -> PlannerResult<()> {
        self.roles.unfulfill(role_id, requester).await?;
        info!(role_id = %role_id, profile_id = %requester, "Withdrew from role");
        Ok(())
    }

    /// Roles `requester` has taken on.
    pub async fn my_roles(&self, requester: Uuid) -> PlannerResult<Vec<Role>> {
        self.roles.list_by_profile(requester).await
    }

    /// Any authenticated profile may view an event; only the owner gets
    /// `can_edit`.
    pub async fn event_detail(&self, requester: Uuid, event_id: Uuid) -> PlannerResult<EventDetail> {
        let event = self.events.get_by_id(event_id).await?;

        let mut roles = Vec::new();
        for role in self.roles.list_by_event(event_id).await? {
            let fulfilled_by = self.roles.fulfilled_by(role.id).await?;
            roles.push(RoleDetail { role, fulfilled_by });
        }

        let invitees = self.events.invitees(event_id).await?;
        let invited = invitees.iter().any(|p| p.id == requester);

        Ok(EventDetail {
            can_edit: access::can_edit(requester, &event),
            event,
            roles,
            invitees,
            invited,
        })
    }
}

fn role_input(event_id: Uuid, new_role: NewRole) -> CreateRole {
    CreateRole {
        event_id,
        name: new_role.name,
        description: new_role.description,
        amount: new_role.amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(roles: Vec<NewRole>) -> NewEventPlan {
        NewEventPlan {
            name: "Bake sale".into(),
            date: NaiveDate::from_ymd_opt(2025, 9, 20).unwrap(),
            description: String::new(),
            location: "Gym".into(),
            roles,
        }
    }

    #[test]
    fn plan_validation_reaches_roles() {
        let ok = plan(vec![NewRole {
            name: "Cashier".into(),
            description: String::new(),
            amount: 2,
        }]);
        assert!(ok.validate().is_ok());

        let bad = plan(vec![NewRole {
            name: "x".repeat(31),
            description: String::new(),
            amount: 1,
        }]);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn plan_defaults_optional_text() {
        let plan: NewEventPlan = serde_json::from_value(serde_json::json!({
            "name": "a",
            "date": "2025-01-02",
        }))
        .unwrap();
        assert!(plan.description.is_empty());
        assert!(plan.roles.is_empty());
        assert!(plan.validate().is_ok());
    }
}
