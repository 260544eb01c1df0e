use super::{FakeMediaHost, ScriptedPlanner, TestApp, create_test_app_with, register_principal};
use crate::constants::MAX_OWNED_GROUPS;
use crate::core::errors::LedgerError;
use crate::core::models::{
    group::{NewGroup, Role},
    principal::Principal,
};

const BLUEPRINT: &str = r#"{
    "name": "Family Budget",
    "description": "Monthly household spending",
    "budgets": [
        {"name": "Groceries", "limit": 400, "icon": "shopping-cart", "color": "green"},
        {"name": "Transportation costs", "limit": 120, "icon": "directions-car", "color": "blue"}
    ]
}"#;

fn app_replying(reply: &str) -> TestApp {
    create_test_app_with(ScriptedPlanner::replying(reply), FakeMediaHost { url: None })
}

#[tokio::test]
async fn test_create_ai_group_persists_blueprint() {
    let app = app_replying(BLUEPRINT);
    let alice = register_principal(&app, "alice").await;

    let group = app.groups.create_ai_group(&alice, "budget for a family of four").await.unwrap();
    assert_eq!(group.name, "Family Budget");
    assert_eq!(group.description, "Monthly household spending");
    assert_eq!(group.members.len(), 1);
    assert_eq!(group.members[0].role, Role::Owner);
    assert_eq!(group.budgets.len(), 2);
    assert_eq!(group.budgets[0].limit, 400.0);
    assert_eq!(group.budgets[1].name, "Transportation ");
    assert_ne!(group.budgets[0].id, group.budgets[1].id);

    let stored = app.groups.find_group_by_id(&group.id).await.unwrap().unwrap();
    assert_eq!(stored, group);
    let user = app.users.get_user(&alice.id).await.unwrap().unwrap();
    assert_eq!(user.group_id, Some(group.id));
}

#[tokio::test]
async fn test_create_ai_group_invalid_completion_persists_nothing() {
    let app = app_replying("Invalid JSON response");
    let alice = register_principal(&app, "alice").await;

    let result = app.groups.create_ai_group(&alice, "anything").await;
    assert!(matches!(result, Err(LedgerError::AiGenerationFailed)));
    assert_eq!(app.storage.group_count().await, 0);
}

#[tokio::test]
async fn test_create_ai_group_transport_failure() {
    let app = create_test_app_with(ScriptedPlanner::failing(), FakeMediaHost { url: None });
    let alice = register_principal(&app, "alice").await;

    let result = app.groups.create_ai_group(&alice, "anything").await;
    assert!(matches!(result, Err(LedgerError::AiGenerationFailed)));
    assert_eq!(app.storage.group_count().await, 0);
}

#[tokio::test]
async fn test_create_ai_group_respects_owned_limit() {
    let app = app_replying(BLUEPRINT);
    let alice = register_principal(&app, "alice").await;
    for i in 0..MAX_OWNED_GROUPS {
        app.groups
            .create_group(
                &alice,
                NewGroup {
                    name: format!("Group {}", i),
                    description: String::new(),
                },
            )
            .await
            .unwrap();
    }

    let result = app.groups.create_ai_group(&alice, "one more").await;
    assert!(matches!(result, Err(LedgerError::OwnedGroupLimit(_))));
    assert_eq!(app.storage.group_count().await, MAX_OWNED_GROUPS);
}

#[tokio::test]
async fn test_create_ai_group_by_unregistered_principal_writes_nothing() {
    let app = app_replying(BLUEPRINT);
    let ghost = Principal::new("65f000000000000000000000", "Ghost", "ghost@example.com");

    let result = app.groups.create_ai_group(&ghost, "anything").await;
    assert!(matches!(result, Err(LedgerError::UserNotFound)));
    assert_eq!(app.storage.group_count().await, 0);
}
