use crate::constants::{
    AI_GROUP_CREATED, DELETE_SUCCESS, GROUP_CREATED, GROUP_DELETED, GROUP_UPDATED, MAX_JOINED_GROUPS,
    MAX_OWNED_GROUPS, MEMBER_JOINED,
};
use crate::core::ai::{build_prompt, parse_blueprint};
use crate::core::errors::LedgerError;
use crate::core::guard::{Requirement, require};
use crate::core::models::{
    group::{Group, GroupMember, NewGroup, Role},
    ledger::Budget,
    principal::Principal,
};
use crate::core::services::users::assign_group;
use crate::infrastructure::ai::BudgetPlanner;
use crate::infrastructure::storage::{GroupRepository, UserRepository};
use bson::oid::ObjectId;
use tracing::info;
use uuid::Uuid;

/// Group lifecycle, membership and the embedded sub-ledgers.
///
/// Every mutating operation re-reads the group, runs the membership guard and
/// only then issues a single write, so a failed check never leaves a partial
/// change behind.
pub struct GroupService<G: GroupRepository, U: UserRepository, A: BudgetPlanner> {
    pub(super) groups: G,
    users: U,
    planner: A,
}

pub(super) fn new_id() -> String {
    ObjectId::new().to_hex()
}

fn validate_principal_id(principal: &Principal) -> Result<(), LedgerError> {
    ObjectId::parse_str(&principal.id)
        .map(|_| ())
        .map_err(|_| LedgerError::InvalidId(principal.id.clone()))
}

fn founding_group(principal: &Principal, name: String, description: String, budgets: Vec<Budget>) -> Group {
    Group {
        id: new_id(),
        name,
        description,
        members: vec![GroupMember {
            user_id: principal.id.clone(),
            name: principal.name.clone(),
            role: Role::Owner,
        }],
        incomes: Vec::new(),
        expenses: Vec::new(),
        budgets,
        invite: Uuid::new_v4().to_string(),
    }
}

impl<G: GroupRepository, U: UserRepository, A: BudgetPlanner> GroupService<G, U, A> {
    pub fn new(groups: G, users: U, planner: A) -> Self {
        GroupService { groups, users, planner }
    }

    /// Founding checks: a registered caller below the owned-group cap.
    async fn ensure_can_found(&self, principal: &Principal) -> Result<(), LedgerError> {
        validate_principal_id(principal)?;
        if self.users.find_by_id(&principal.id).await?.is_none() {
            return Err(LedgerError::UserNotFound);
        }
        let owned = self
            .groups
            .find_by_member(&principal.id)
            .await?
            .iter()
            .filter(|g| g.is_owned_by(&principal.id))
            .count();
        if owned >= MAX_OWNED_GROUPS {
            return Err(LedgerError::OwnedGroupLimit(MAX_OWNED_GROUPS));
        }
        Ok(())
    }

    async fn persist_founding_group(&self, principal: &Principal, group: Group) -> Result<Group, LedgerError> {
        if self.groups.insert(&group).await?.is_none() {
            return Err(LedgerError::PersistenceFailed("create group".to_string()));
        }
        assign_group(&self.users, &principal.id, &group.id).await?;
        Ok(group)
    }

    pub async fn create_group(&self, principal: &Principal, new_group: NewGroup) -> Result<Group, LedgerError> {
        self.ensure_can_found(principal).await?;

        let group = founding_group(principal, new_group.name, new_group.description, Vec::new());
        let group = self.persist_founding_group(principal, group).await?;
        info!(action = GROUP_CREATED, group_id = %group.id, user_id = %principal.id);
        Ok(group)
    }

    pub async fn create_ai_group(&self, principal: &Principal, request: &str) -> Result<Group, LedgerError> {
        self.ensure_can_found(principal).await?;

        let completion = self.planner.complete(&build_prompt(request)).await?;
        let blueprint = parse_blueprint(&completion)?;

        let budgets = blueprint
            .budgets
            .into_iter()
            .map(|b| Budget {
                id: new_id(),
                name: b.name,
                limit: b.limit,
                icon: b.icon,
                color: b.color,
            })
            .collect();
        let group = founding_group(principal, blueprint.name, blueprint.description, budgets);
        let group = self.persist_founding_group(principal, group).await?;
        info!(
            action = AI_GROUP_CREATED,
            group_id = %group.id,
            user_id = %principal.id,
            budgets = group.budgets.len()
        );
        Ok(group)
    }

    /// No match is not an error here.
    pub async fn find_group_by_invite(&self, invite: &str) -> Result<Option<Group>, LedgerError> {
        self.groups.find_by_invite(invite).await
    }

    pub async fn find_group_by_id(&self, group_id: &str) -> Result<Option<Group>, LedgerError> {
        self.groups.find_by_id(group_id).await
    }

    pub async fn get_groups_by_user_id(&self, user_id: &str) -> Result<Vec<Group>, LedgerError> {
        self.groups.find_by_member(user_id).await
    }

    pub async fn join_group(&self, principal: &Principal, invite: &str) -> Result<Group, LedgerError> {
        validate_principal_id(principal)?;

        let joined = self.groups.find_by_member(&principal.id).await?.len();
        if joined >= MAX_JOINED_GROUPS {
            return Err(LedgerError::JoinedGroupLimit(MAX_JOINED_GROUPS));
        }

        let mut group = self
            .groups
            .find_by_invite(invite)
            .await?
            .ok_or(LedgerError::GroupNotFound)?;
        if group.is_member(&principal.id) {
            return Err(LedgerError::AlreadyGroupMember);
        }

        let member = GroupMember {
            user_id: principal.id.clone(),
            name: principal.name.clone(),
            role: Role::Member,
        };
        if self.groups.push_member(&group.id, &member).await? == 0 {
            return Err(LedgerError::PersistenceFailed("join group".to_string()));
        }
        group.members.push(member);

        info!(action = MEMBER_JOINED, group_id = %group.id, user_id = %principal.id);
        Ok(group)
    }

    /// Overwrites both fields; callers resend whichever one is unchanged.
    pub async fn update_group(
        &self,
        principal: &Principal,
        group_id: &str,
        name: String,
        description: String,
    ) -> Result<Group, LedgerError> {
        let mut group = self
            .groups
            .find_by_id(group_id)
            .await?
            .ok_or(LedgerError::GroupNotFound)?;
        require(&group, &principal.id, Requirement::Manager)?;

        if self.groups.update_details(group_id, &name, &description).await? == 0 {
            return Err(LedgerError::PersistenceFailed("update group".to_string()));
        }
        group.name = name;
        group.description = description;

        info!(action = GROUP_UPDATED, group_id, user_id = %principal.id);
        Ok(group)
    }

    /// Members' user records keep pointing at the deleted group.
    pub async fn delete_group(&self, principal: &Principal, group_id: &str) -> Result<&'static str, LedgerError> {
        let group = self
            .groups
            .find_by_id(group_id)
            .await?
            .ok_or(LedgerError::GroupNotFound)?;
        require(&group, &principal.id, Requirement::Owner)?;

        if self.groups.delete(group_id).await? == 0 {
            return Err(LedgerError::PersistenceFailed("delete group".to_string()));
        }

        info!(action = GROUP_DELETED, group_id, user_id = %principal.id);
        Ok(DELETE_SUCCESS)
    }
}
