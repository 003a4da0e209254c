//! Edit access to events.
//!
//! Only the owning profile may change an event, its roles or its
//! invitations. Invitations and role fulfillment never grant edit
//! access.

use tracing::warn;
use uuid::Uuid;

use crate::error::{PlannerError, PlannerResult};
use crate::models::event::Event;

/// Whether `requester` may edit `event`.
pub fn can_edit(requester: Uuid, event: &Event) -> bool {
    event.owner_id == requester
}

/// Like [`can_edit`] but fails with `AuthorizationDenied`.
pub fn ensure_can_edit(requester: Uuid, event: &Event) -> PlannerResult<()> {
    if can_edit(requester, event) {
        return Ok(());
    }

    warn!(
        requester = %requester,
        event_id = %event.id,
        owner_id = %event.owner_id,
        "Rejected edit of event not owned by requester"
    );
    Err(PlannerError::AuthorizationDenied {
        reason: format!("profile {requester} does not own event {}", event.id),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn event_owned_by(owner_id: Uuid) -> Event {
        Event {
            id: Uuid::new_v4(),
            owner_id,
            name: "a".into(),
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            description: String::new(),
            location: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn owner_can_edit() {
        let owner = Uuid::new_v4();
        let event = event_owned_by(owner);
        assert!(can_edit(owner, &event));
        assert!(ensure_can_edit(owner, &event).is_ok());
    }

    #[test]
    fn anyone_else_is_denied() {
        let event = event_owned_by(Uuid::new_v4());
        let stranger = Uuid::new_v4();

        assert!(!can_edit(stranger, &event));
        assert!(matches!(
            ensure_can_edit(stranger, &event),
            Err(PlannerError::AuthorizationDenied { .. })
        ));
    }
}
