use super::{TestApp, create_test_app, register_principal};
use crate::constants::{MAX_JOINED_GROUPS, MAX_OWNED_GROUPS};
use crate::core::errors::LedgerError;
use crate::core::models::{
    group::{Group, NewGroup, Role},
    principal::Principal,
};

async fn create_named(app: &TestApp, owner: &Principal, name: &str) -> Result<Group, LedgerError> {
    app.groups
        .create_group(
            owner,
            NewGroup {
                name: name.to_string(),
                description: format!("{} description", name),
            },
        )
        .await
}

#[tokio::test]
async fn test_create_group_makes_caller_owner() {
    let app = create_test_app();
    let alice = register_principal(&app, "alice").await;

    let group = create_named(&app, &alice, "Household").await.unwrap();
    assert_eq!(group.members.len(), 1);
    assert_eq!(group.members[0].user_id, alice.id);
    assert_eq!(group.members[0].name, alice.name);
    assert_eq!(group.members[0].role, Role::Owner);
    assert_eq!(group.owner_count(), 1);
    assert!(group.incomes.is_empty() && group.expenses.is_empty() && group.budgets.is_empty());
    assert!(!group.invite.is_empty());

    let user = app.users.get_user(&alice.id).await.unwrap().unwrap();
    assert_eq!(user.group_id, Some(group.id));
}

#[tokio::test]
async fn test_create_group_accepts_blank_name() {
    let app = create_test_app();
    let alice = register_principal(&app, "alice").await;
    let group = create_named(&app, &alice, "").await.unwrap();
    assert_eq!(group.name, "");
    assert_eq!(app.storage.group_count().await, 1);
}

#[tokio::test]
async fn test_create_group_rejects_invalid_principal_id() {
    let app = create_test_app();
    let bogus = Principal::new("not-an-object-id", "Bogus", "bogus@example.com");
    assert!(matches!(create_named(&app, &bogus, "Home").await, Err(LedgerError::InvalidId(_))));
    assert_eq!(app.storage.group_count().await, 0);
}

#[tokio::test]
async fn test_create_group_by_unregistered_principal_writes_nothing() {
    let app = create_test_app();
    let ghost = Principal::new("65f000000000000000000000", "Ghost", "ghost@example.com");

    let result = create_named(&app, &ghost, "G").await;
    assert!(matches!(result, Err(LedgerError::UserNotFound)));
    assert_eq!(app.storage.group_count().await, 0);
    assert!(app.groups.get_groups_by_user_id(&ghost.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_owned_group_limit() {
    let app = create_test_app();
    let alice = register_principal(&app, "alice").await;
    for i in 0..MAX_OWNED_GROUPS {
        create_named(&app, &alice, &format!("Group {}", i)).await.unwrap();
    }

    let result = create_named(&app, &alice, "One too many").await;
    assert!(matches!(result, Err(LedgerError::OwnedGroupLimit(3))));
    assert_eq!(result.unwrap_err().to_string(), "You can only own up to 3 groups");
    assert_eq!(app.storage.group_count().await, MAX_OWNED_GROUPS);
}

#[tokio::test]
async fn test_join_group_by_invite() {
    let app = create_test_app();
    let alice = register_principal(&app, "alice").await;
    let bob = register_principal(&app, "bob").await;
    let group = create_named(&app, &alice, "Household").await.unwrap();

    let joined = app.groups.join_group(&bob, &group.invite).await.unwrap();
    assert_eq!(joined.members.len(), 2);
    assert_eq!(joined.members[1].user_id, bob.id);
    assert_eq!(joined.members[1].role, Role::Member);

    let stored = app.groups.find_group_by_id(&group.id).await.unwrap().unwrap();
    assert_eq!(stored.members, joined.members);

    let again = app.groups.join_group(&bob, &group.invite).await;
    assert!(matches!(again, Err(LedgerError::AlreadyGroupMember)));

    let bobs_groups = app.groups.get_groups_by_user_id(&bob.id).await.unwrap();
    assert_eq!(bobs_groups.len(), 1);
}

#[tokio::test]
async fn test_join_group_unknown_invite() {
    let app = create_test_app();
    let bob = register_principal(&app, "bob").await;
    let result = app.groups.join_group(&bob, "no-such-invite").await;
    assert!(matches!(result, Err(LedgerError::GroupNotFound)));
}

#[tokio::test]
async fn test_joined_group_limit() {
    let app = create_test_app();
    let alice = register_principal(&app, "alice").await;
    let bob = register_principal(&app, "bob").await;
    let mut invites = Vec::new();
    for i in 0..MAX_OWNED_GROUPS {
        invites.push(create_named(&app, &alice, &format!("A{}", i)).await.unwrap().invite);
    }
    let bobs_own = create_named(&app, &bob, "Bob's").await.unwrap();
    assert_eq!(bobs_own.members[0].role, Role::Owner);

    for invite in invites.iter().take(MAX_JOINED_GROUPS - 1) {
        app.groups.join_group(&bob, invite).await.unwrap();
    }
    let result = app.groups.join_group(&bob, &invites[MAX_JOINED_GROUPS - 1]).await;
    assert!(matches!(result, Err(LedgerError::JoinedGroupLimit(3))));
}

#[tokio::test]
async fn test_find_group_lookups_return_none() {
    let app = create_test_app();
    assert!(app.groups.find_group_by_invite("missing").await.unwrap().is_none());
    assert!(app.groups.find_group_by_id("missing").await.unwrap().is_none());
    assert!(app.groups.get_groups_by_user_id("missing").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_group_overwrites_both_fields() {
    let app = create_test_app();
    let alice = register_principal(&app, "alice").await;
    let group = create_named(&app, &alice, "Household").await.unwrap();

    let updated = app
        .groups
        .update_group(&alice, &group.id, "Flat".to_string(), String::new())
        .await
        .unwrap();
    assert_eq!(updated.name, "Flat");
    assert_eq!(updated.description, "");

    let stored = app.groups.find_group_by_id(&group.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Flat");
    assert_eq!(stored.description, "");
}

#[tokio::test]
async fn test_update_group_requires_manager() {
    let app = create_test_app();
    let alice = register_principal(&app, "alice").await;
    let bob = register_principal(&app, "bob").await;
    let carol = register_principal(&app, "carol").await;
    let group = create_named(&app, &alice, "Household").await.unwrap();
    app.groups.join_group(&bob, &group.invite).await.unwrap();

    let by_member = app
        .groups
        .update_group(&bob, &group.id, "Bob's".to_string(), String::new())
        .await;
    assert!(matches!(by_member, Err(LedgerError::NotGroupAdmin)));

    let by_stranger = app
        .groups
        .update_group(&carol, &group.id, "Carol's".to_string(), String::new())
        .await;
    assert!(matches!(by_stranger, Err(LedgerError::NotGroupMember)));

    let missing = app
        .groups
        .update_group(&alice, "missing", "X".to_string(), String::new())
        .await;
    assert!(matches!(missing, Err(LedgerError::GroupNotFound)));
}

#[tokio::test]
async fn test_delete_group_owner_only() {
    let app = create_test_app();
    let alice = register_principal(&app, "alice").await;
    let bob = register_principal(&app, "bob").await;
    let group = create_named(&app, &alice, "Household").await.unwrap();
    app.groups.join_group(&bob, &group.invite).await.unwrap();

    let by_member = app.groups.delete_group(&bob, &group.id).await;
    assert!(matches!(by_member, Err(LedgerError::NotGroupOwner)));
    assert_eq!(app.storage.group_count().await, 1);

    assert_eq!(app.groups.delete_group(&alice, &group.id).await.unwrap(), "Delete Successful");
    assert!(app.groups.find_group_by_id(&group.id).await.unwrap().is_none());

    // Former members keep the stale reference.
    let user = app.users.get_user(&alice.id).await.unwrap().unwrap();
    assert_eq!(user.group_id, Some(group.id.clone()));

    let again = app.groups.delete_group(&alice, &group.id).await;
    assert!(matches!(again, Err(LedgerError::GroupNotFound)));
}

#[tokio::test]
async fn test_owner_and_member_lifecycle() {
    let app = create_test_app();
    let a = register_principal(&app, "owner").await;
    let b = register_principal(&app, "member").await;
    let group = create_named(&app, &a, "G").await.unwrap();
    let joined = app.groups.join_group(&b, &group.invite).await.unwrap();
    assert_eq!(joined.owner_count(), 1);

    let err = app
        .groups
        .update_group(&b, &group.id, "Mine".to_string(), String::new())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "You are not the admin of this group");

    let updated = app
        .groups
        .update_group(&a, &group.id, "X".to_string(), "Y".to_string())
        .await
        .unwrap();
    assert_eq!((updated.name.as_str(), updated.description.as_str()), ("X", "Y"));

    let err = app.groups.delete_group(&b, &group.id).await.unwrap_err();
    assert_eq!(err.to_string(), "Only owners can delete the group");

    assert_eq!(app.groups.delete_group(&a, &group.id).await.unwrap(), "Delete Successful");
    assert!(app.groups.find_group_by_id(&group.id).await.unwrap().is_none());
}
