//! Event domain model.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Event dates must have a four-digit year (1 to 9999).
pub fn validate_event_date(date: &NaiveDate) -> Result<(), ValidationError> {
    if (1..=9999).contains(&date.year()) {
        Ok(())
    } else {
        Err(ValidationError::new("date_out_of_range")
            .with_message("year must be between 1 and 9999".into()))
    }
}

/// An event organized by a single owning profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Event {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub date: NaiveDate,
    pub description: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateEvent {
    pub owner_id: Uuid,
    #[validate(length(min = 1, max = 30))]
    pub name: String,
    #[validate(custom(function = "validate_event_date"))]
    pub date: NaiveDate,
    #[validate(length(max = 200))]
    pub description: String,
    #[validate(length(max = 50))]
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
pub struct UpdateEvent {
    #[validate(length(min = 1, max = 30))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_event_date"))]
    pub date: Option<NaiveDate>,
    #[validate(length(max = 200))]
    pub description: Option<String>,
    #[validate(length(max = 50))]
    pub location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(name: &str, description: &str, location: &str) -> CreateEvent {
        CreateEvent {
            owner_id: Uuid::new_v4(),
            name: name.into(),
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            description: description.into(),
            location: location.into(),
        }
    }

    #[test]
    fn limits_are_inclusive() {
        let input = create(&"n".repeat(30), &"d".repeat(200), &"l".repeat(50));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn over_long_fields_are_rejected() {
        assert!(create(&"n".repeat(31), "", "").validate().is_err());
        assert!(create("a", &"d".repeat(201), "").validate().is_err());
        assert!(create("a", "", &"l".repeat(51)).validate().is_err());
    }

    #[test]
    fn limits_count_characters_not_bytes() {
        // 30 two-byte characters.
        let input = create(&"é".repeat(30), "", "");
        assert!(input.validate().is_ok());
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(create("", "", "").validate().is_err());
    }

    #[test]
    fn update_only_checks_present_fields() {
        assert!(UpdateEvent::default().validate().is_ok());

        let update = UpdateEvent {
            location: Some("x".repeat(51)),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn five_digit_years_are_rejected() {
        let mut input = create("a", "", "");
        input.date = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap();
        assert!(input.validate().is_ok());

        input.date = NaiveDate::from_ymd_opt(10000, 1, 1).unwrap();
        assert!(input.validate().is_err());

        let update = UpdateEvent {
            date: NaiveDate::from_ymd_opt(-1, 1, 1),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
