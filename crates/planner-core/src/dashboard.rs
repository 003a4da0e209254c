//! Dashboard: the events a profile sees, filtered by its relationship
//! to them.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::access;
use crate::error::{PlannerError, PlannerResult};
use crate::models::event::Event;
use crate::repository::EventRepository;

/// Which events the dashboard lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DashboardMode {
    /// Events the requester owns.
    #[default]
    #[serde(rename = "my")]
    MyEvents,
    /// Events the requester is invited to.
    #[serde(rename = "invited")]
    InvitedEvents,
    /// Owned and invited events together. Events the requester has no
    /// relationship with are never listed.
    #[serde(rename = "all")]
    AllEvents,
}

impl DashboardMode {
    pub const ALL: [DashboardMode; 3] = [
        DashboardMode::MyEvents,
        DashboardMode::InvitedEvents,
        DashboardMode::AllEvents,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DashboardMode::MyEvents => "My Events",
            DashboardMode::InvitedEvents => "Invited Events",
            DashboardMode::AllEvents => "All Events",
        }
    }

    /// Value used in the `mode` query parameter.
    pub fn as_param(self) -> &'static str {
        match self {
            DashboardMode::MyEvents => "my",
            DashboardMode::InvitedEvents => "invited",
            DashboardMode::AllEvents => "all",
        }
    }

    /// Heading shown above the event list.
    pub fn describe(self) -> String {
        format!("The dashboard is currently in mode {}", self.label())
    }
}

impl fmt::Display for DashboardMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DashboardMode {
    type Err = PlannerError;

    /// Accepts the query value (`my`) or the label (`My Events`),
    /// ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|mode| {
                mode.as_param().eq_ignore_ascii_case(wanted)
                    || mode.label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| PlannerError::Validation {
                message: format!("unknown dashboard mode: {wanted}"),
            })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DashboardEntry {
    pub event_id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    /// Whether the edit control is rendered for this entry.
    pub can_edit: bool,
}

impl DashboardEntry {
    pub fn for_requester(requester: Uuid, event: &Event) -> Self {
        Self {
            event_id: event.id,
            title: event.name.clone(),
            date: event.date,
            can_edit: access::can_edit(requester, event),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DashboardView {
    pub mode: DashboardMode,
    pub heading: String,
    pub entries: Vec<DashboardEntry>,
}

impl DashboardView {
    pub fn titles(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.title.as_str()).collect()
    }
}

/// Renders dashboards from an [`EventRepository`].
pub struct Dashboard<E: EventRepository> {
    events: E,
}

impl<E: EventRepository> Dashboard<E> {
    pub fn new(events: E) -> Self {
        Self { events }
    }

    pub async fn render(&self, requester: Uuid, mode: DashboardMode) -> PlannerResult<DashboardView> {
        let events = match mode {
            DashboardMode::MyEvents => self.events.list_owned_by(requester).await?,
            DashboardMode::InvitedEvents => self.events.list_invited(requester).await?,
            DashboardMode::AllEvents => self.events.list_owned_or_invited(requester).await?,
        };

        debug!(
            requester = %requester,
            mode = mode.as_param(),
            count = events.len(),
            "Rendered dashboard"
        );

        Ok(DashboardView {
            mode,
            heading: mode.describe(),
            entries: events
                .iter()
                .map(|event| DashboardEntry::for_requester(requester, event))
                .collect(),
        })
    }
}
