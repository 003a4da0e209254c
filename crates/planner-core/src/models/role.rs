//! Role domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A volunteer slot on an event with a required headcount.
///
/// `amount` is informational: nothing caps the number of profiles that
/// fulfill a role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Role {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub description: String,
    pub amount: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRole {
    pub event_id: Uuid,
    #[validate(length(min = 1, max = 30))]
    pub name: String,
    #[validate(length(max = 100))]
    pub description: String,
    pub amount: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
pub struct UpdateRole {
    #[validate(length(min = 1, max = 30))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub description: Option<String>,
    pub amount: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_limits() {
        let ok = CreateRole {
            event_id: Uuid::new_v4(),
            name: "r".repeat(30),
            description: "d".repeat(100),
            amount: 0,
        };
        assert!(ok.validate().is_ok());

        let long_description = CreateRole {
            description: "d".repeat(101),
            ..ok.clone()
        };
        assert!(long_description.validate().is_err());

        let long_name = CreateRole {
            name: "r".repeat(31),
            ..ok
        };
        assert!(long_name.validate().is_err());
    }

    #[test]
    fn negative_amount_is_unrepresentable() {
        let parsed: Result<CreateRole, _> = serde_json::from_value(serde_json::json!({
            "event_id": Uuid::new_v4(),
            "name": "usher",
            "description": "",
            "amount": -1,
        }));
        assert!(parsed.is_err());
    }
}
