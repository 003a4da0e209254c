//! Event planning service against in-memory SurrealDB.

use chrono::NaiveDate;
use planner_core::error::PlannerError;
use planner_core::models::event::UpdateEvent;
use planner_core::models::role::UpdateRole;
use planner_core::models::user::CreateUser;
use planner_core::planner::{EventPlanner, NewEventPlan, NewRole};
use planner_core::repository::{
    EventRepository, ProfileRepository, RoleRepository, UserRepository,
};
use planner_db::repository::{
    SurrealEventRepository, SurrealProfileRepository, SurrealRoleRepository,
    SurrealUserRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

type Planner = EventPlanner<SurrealEventRepository<Db>, SurrealRoleRepository<Db>>;

struct Fixture {
    planner: Planner,
    events: SurrealEventRepository<Db>,
    roles: SurrealRoleRepository<Db>,
    owner: Uuid,
    guest: Uuid,
}

async fn setup() -> Fixture {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    planner_db::run_migrations(&db).await.unwrap();

    let users = SurrealUserRepository::new(db.clone());
    let profiles = SurrealProfileRepository::new(db.clone());
    let mut ids = Vec::new();
    for name in ["owner", "guest"] {
        let user = users
            .create(CreateUser {
                username: name.into(),
                password_hash: "hash".into(),
            })
            .await
            .unwrap();
        ids.push(profiles.get_by_user_id(user.id).await.unwrap().id);
    }

    let planner = EventPlanner::new(
        SurrealEventRepository::new(db.clone()),
        SurrealRoleRepository::new(db.clone()),
    );
    Fixture {
        planner,
        events: SurrealEventRepository::new(db.clone()),
        roles: SurrealRoleRepository::new(db),
        owner: ids[0],
        guest: ids[1],
    }
}

fn plan(roles: Vec<NewRole>) -> NewEventPlan {
    NewEventPlan {
        name: "Spring cleanup".into(),
        date: NaiveDate::from_ymd_opt(2025, 4, 12).unwrap(),
        description: "Pick up litter along the river".into(),
        location: "North bank".into(),
        roles,
    }
}

fn new_role(name: &str, amount: u32) -> NewRole {
    NewRole {
        name: name.into(),
        description: String::new(),
        amount,
    }
}

#[tokio::test]
async fn create_event_with_roles() {
    let Fixture {
        planner, roles, owner, ..
    } = setup().await;

    let planned = planner
        .create_event(owner, plan(vec![new_role("bags", 2), new_role("lead", 1)]))
        .await
        .unwrap();

    assert_eq!(planned.event.owner_id, owner);
    assert_eq!(planned.roles.len(), 2);
    assert_eq!(roles.list_by_event(planned.event.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn invalid_plan_writes_nothing() {
    let Fixture {
        planner,
        events,
        owner,
        ..
    } = setup().await;

    let mut bad = plan(vec![new_role("r", 1)]);
    bad.location = "x".repeat(51);

    let result = planner.create_event(owner, bad).await;
    assert!(matches!(result, Err(PlannerError::Validation { .. })));

    assert!(events.list_owned_by(owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn five_digit_years_are_rejected() {
    let Fixture {
        planner,
        events,
        owner,
        ..
    } = setup().await;

    let mut far = plan(vec![]);
    far.date = NaiveDate::from_ymd_opt(10000, 1, 1).unwrap();
    let result = planner.create_event(owner, far).await;
    assert!(matches!(result, Err(PlannerError::Validation { .. })));

    let planned = planner.create_event(owner, plan(vec![])).await.unwrap();
    let moved = UpdateEvent {
        date: NaiveDate::from_ymd_opt(12025, 4, 12),
        ..Default::default()
    };
    let result = planner.edit_event(owner, planned.event.id, moved).await;
    assert!(matches!(result, Err(PlannerError::Validation { .. })));

    assert_eq!(events.list_owned_by(owner).await.unwrap().len(), 1);
}

#[tokio::test]
async fn only_owner_can_edit() {
    let Fixture {
        planner, owner, guest, ..
    } = setup().await;
    let planned = planner.create_event(owner, plan(vec![])).await.unwrap();
    let event_id = planned.event.id;

    let rename = UpdateEvent {
        name: Some("Renamed".into()),
        ..Default::default()
    };

    let denied = planner.edit_event(guest, event_id, rename.clone()).await;
    assert!(matches!(denied, Err(PlannerError::AuthorizationDenied { .. })));

    // Being invited does not grant edit access.
    planner.invite(owner, event_id, guest).await.unwrap();
    let still_denied = planner.edit_event(guest, event_id, rename.clone()).await;
    assert!(matches!(still_denied, Err(PlannerError::AuthorizationDenied { .. })));

    let edited = planner.edit_event(owner, event_id, rename).await.unwrap();
    assert_eq!(edited.name, "Renamed");
}

#[tokio::test]
async fn edit_rejects_over_long_fields() {
    let Fixture { planner, owner, .. } = setup().await;
    let planned = planner.create_event(owner, plan(vec![])).await.unwrap();

    let result = planner
        .edit_event(
            owner,
            planned.event.id,
            UpdateEvent {
                description: Some("d".repeat(201)),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(PlannerError::Validation { .. })));
}

#[tokio::test]
async fn only_owner_manages_invitations_and_roles() {
    let Fixture {
        planner, owner, guest, ..
    } = setup().await;
    let event_id = planner.create_event(owner, plan(vec![])).await.unwrap().event.id;

    assert!(matches!(
        planner.invite(guest, event_id, guest).await,
        Err(PlannerError::AuthorizationDenied { .. })
    ));
    assert!(matches!(
        planner.add_role(guest, event_id, new_role("sneaky", 1)).await,
        Err(PlannerError::AuthorizationDenied { .. })
    ));

    let role = planner
        .add_role(owner, event_id, new_role("ladders", 1))
        .await
        .unwrap();
    assert!(matches!(
        planner
            .update_role(guest, role.id, UpdateRole { amount: Some(9), ..Default::default() })
            .await,
        Err(PlannerError::AuthorizationDenied { .. })
    ));
    assert!(matches!(
        planner.remove_role(guest, role.id).await,
        Err(PlannerError::AuthorizationDenied { .. })
    ));
    assert!(matches!(
        planner.delete_event(guest, event_id).await,
        Err(PlannerError::AuthorizationDenied { .. })
    ));

    let updated = planner
        .update_role(owner, role.id, UpdateRole { amount: Some(3), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(updated.amount, 3);
    planner.remove_role(owner, role.id).await.unwrap();
}

#[tokio::test]
async fn anyone_can_fulfill_a_role() {
    let Fixture {
        planner, owner, guest, ..
    } = setup().await;
    let planned = planner
        .create_event(owner, plan(vec![new_role("gloves", 1)]))
        .await
        .unwrap();
    let role_id = planned.roles[0].id;

    // Guest is neither owner nor invited.
    planner.fulfill_role(guest, role_id).await.unwrap();
    assert_eq!(planner.my_roles(guest).await.unwrap().len(), 1);

    planner.withdraw_from_role(guest, role_id).await.unwrap();
    assert!(planner.my_roles(guest).await.unwrap().is_empty());
}

#[tokio::test]
async fn event_detail_reports_edit_access_per_requester() {
    let Fixture {
        planner, owner, guest, ..
    } = setup().await;
    let planned = planner
        .create_event(owner, plan(vec![new_role("gloves", 1)]))
        .await
        .unwrap();
    let event_id = planned.event.id;
    planner.invite(owner, event_id, guest).await.unwrap();
    planner.fulfill_role(guest, planned.roles[0].id).await.unwrap();

    let for_owner = planner.event_detail(owner, event_id).await.unwrap();
    assert!(for_owner.can_edit);
    assert!(!for_owner.invited);

    let for_guest = planner.event_detail(guest, event_id).await.unwrap();
    assert!(!for_guest.can_edit);
    assert!(for_guest.invited);
    assert_eq!(for_guest.invitees.len(), 1);
    assert_eq!(for_guest.roles.len(), 1);
    assert_eq!(for_guest.roles[0].fulfilled_by[0].id, guest);
}

#[tokio::test]
async fn delete_event_removes_it() {
    let Fixture {
        planner, roles, owner, ..
    } = setup().await;
    let planned = planner
        .create_event(owner, plan(vec![new_role("gloves", 1)]))
        .await
        .unwrap();

    planner.delete_event(owner, planned.event.id).await.unwrap();

    assert!(matches!(
        planner.event_detail(owner, planned.event.id).await,
        Err(PlannerError::NotFound { .. })
    ));
    assert!(roles.get_by_id(planned.roles[0].id).await.is_err());
}

#[tokio::test]
async fn editable_event_for_missing_event_is_not_found() {
    let Fixture { planner, owner, .. } = setup().await;

    let result = planner.editable_event(owner, Uuid::new_v4()).await;
    assert!(matches!(result, Err(PlannerError::NotFound { .. })));
}
