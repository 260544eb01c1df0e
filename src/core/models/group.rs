use super::ledger::{Budget, Expense, Income};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub enum Role {
    Owner,
    Member,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Owner => "Owner",
            Role::Member => "Member",
            Role::Admin => "Admin",
        };
        write!(f, "{}", s)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct GroupMember {
    #[serde(rename = "_id")]
    pub user_id: String,
    pub name: String,
    pub role: Role,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Group {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub members: Vec<GroupMember>,
    #[serde(default)]
    pub incomes: Vec<Income>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    pub invite: String,
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct NewGroup {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl GroupMember {
    pub fn is_owner(&self) -> bool {
        self.role == Role::Owner
    }

    pub fn can_manage(&self) -> bool {
        matches!(self.role, Role::Owner | Role::Admin)
    }
}

impl Group {
    pub fn member(&self, user_id: &str) -> Option<&GroupMember> {
        self.members.iter().find(|m| m.user_id == user_id)
    }

    pub fn is_member(&self, user_id: &str) -> bool {
        self.member(user_id).is_some()
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.member(user_id).is_some_and(GroupMember::is_owner)
    }

    pub fn owner_count(&self) -> usize {
        self.members.iter().filter(|m| m.is_owner()).count()
    }
}
