use crate::core::errors::LedgerError;
use crate::core::models::{
    group::{Group, GroupMember},
    ledger::{EntryKind, LedgerEntry},
    user::User,
};
use crate::infrastructure::storage::{GroupRepository, UserRepository};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Groups keyed by id, plus insertion order so scans are stable.
#[derive(Default)]
struct GroupTable {
    by_id: HashMap<String, Group>,
    order: Vec<String>,
}

impl GroupTable {
    fn scan(&self) -> impl Iterator<Item = &Group> {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }
}

/// Process-local store. Clones share the same collections, so one instance
/// can back both repositories.
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    users: Arc<RwLock<Vec<User>>>,
    groups: Arc<RwLock<GroupTable>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage::default()
    }

    pub async fn group_count(&self) -> usize {
        self.groups.read().await.by_id.len()
    }
}

fn entry_ids(group: &Group, kind: EntryKind) -> Vec<&str> {
    match kind {
        EntryKind::Income => group.incomes.iter().map(|e| e.id.as_str()).collect(),
        EntryKind::Expense => group.expenses.iter().map(|e| e.id.as_str()).collect(),
        EntryKind::Budget => group.budgets.iter().map(|e| e.id.as_str()).collect(),
    }
}

#[async_trait]
impl UserRepository for InMemoryStorage {
    async fn find_all(&self) -> Result<Vec<User>, LedgerError> {
        Ok(self.users.read().await.clone())
    }

    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, LedgerError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, LedgerError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_email_or_username(&self, email: &str, username: &str) -> Result<Option<User>, LedgerError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.email == email || u.username == username)
            .cloned())
    }

    async fn insert(&self, user: &User) -> Result<Option<String>, LedgerError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.id == user.id) {
            return Err(LedgerError::StorageError(format!("Duplicate user id {}", user.id)));
        }
        users.push(user.clone());
        Ok(Some(user.id.clone()))
    }

    async fn update_profile(&self, user: &User) -> Result<u64, LedgerError> {
        let mut users = self.users.write().await;
        let Some(stored) = users.iter_mut().find(|u| u.id == user.id) else {
            return Ok(0);
        };
        stored.name = user.name.clone();
        stored.username = user.username.clone();
        stored.email = user.email.clone();
        stored.profile_picture = user.profile_picture.clone();
        stored.birth_date = user.birth_date;
        Ok(1)
    }

    async fn set_profile_picture(&self, user_id: &str, url: &str) -> Result<u64, LedgerError> {
        let mut users = self.users.write().await;
        Ok(match users.iter_mut().find(|u| u.id == user_id) {
            Some(user) => {
                user.profile_picture = Some(url.to_string());
                1
            }
            None => 0,
        })
    }

    async fn set_group(&self, user_id: &str, group_id: &str) -> Result<u64, LedgerError> {
        let mut users = self.users.write().await;
        Ok(match users.iter_mut().find(|u| u.id == user_id) {
            Some(user) => {
                user.group_id = Some(group_id.to_string());
                1
            }
            None => 0,
        })
    }
}

#[async_trait]
impl GroupRepository for InMemoryStorage {
    async fn find_by_id(&self, group_id: &str) -> Result<Option<Group>, LedgerError> {
        let groups = self.groups.read().await;
        Ok(groups.by_id.get(group_id).cloned())
    }

    async fn find_by_invite(&self, invite: &str) -> Result<Option<Group>, LedgerError> {
        let groups = self.groups.read().await;
        Ok(groups.scan().find(|g| g.invite == invite).cloned())
    }

    async fn find_by_member(&self, user_id: &str) -> Result<Vec<Group>, LedgerError> {
        let groups = self.groups.read().await;
        Ok(groups.scan().filter(|g| g.is_member(user_id)).cloned().collect())
    }

    async fn find_by_entry(&self, kind: EntryKind, entry_id: &str) -> Result<Option<Group>, LedgerError> {
        let groups = self.groups.read().await;
        Ok(groups
            .scan()
            .find(|g| entry_ids(g, kind).contains(&entry_id))
            .cloned())
    }

    async fn insert(&self, group: &Group) -> Result<Option<String>, LedgerError> {
        let mut groups = self.groups.write().await;
        if groups.by_id.contains_key(&group.id) {
            return Err(LedgerError::StorageError(format!("Duplicate group id {}", group.id)));
        }
        groups.by_id.insert(group.id.clone(), group.clone());
        groups.order.push(group.id.clone());
        Ok(Some(group.id.clone()))
    }

    async fn update_details(&self, group_id: &str, name: &str, description: &str) -> Result<u64, LedgerError> {
        let mut groups = self.groups.write().await;
        Ok(match groups.by_id.get_mut(group_id) {
            Some(group) => {
                group.name = name.to_string();
                group.description = description.to_string();
                1
            }
            None => 0,
        })
    }

    async fn push_member(&self, group_id: &str, member: &GroupMember) -> Result<u64, LedgerError> {
        let mut groups = self.groups.write().await;
        Ok(match groups.by_id.get_mut(group_id) {
            Some(group) => {
                group.members.push(member.clone());
                1
            }
            None => 0,
        })
    }

    async fn push_entry(&self, group_id: &str, entry: &LedgerEntry) -> Result<u64, LedgerError> {
        let mut groups = self.groups.write().await;
        let Some(group) = groups.by_id.get_mut(group_id) else {
            return Ok(0);
        };
        match entry.clone() {
            LedgerEntry::Income(income) => group.incomes.push(income),
            LedgerEntry::Expense(expense) => group.expenses.push(expense),
            LedgerEntry::Budget(budget) => group.budgets.push(budget),
        }
        Ok(1)
    }

    async fn set_entry(&self, group_id: &str, entry: &LedgerEntry) -> Result<u64, LedgerError> {
        let mut groups = self.groups.write().await;
        let Some(group) = groups.by_id.get_mut(group_id) else {
            return Ok(0);
        };
        let replaced = match entry.clone() {
            LedgerEntry::Income(income) => group
                .incomes
                .iter_mut()
                .find(|e| e.id == income.id)
                .map(|slot| *slot = income),
            LedgerEntry::Expense(expense) => group
                .expenses
                .iter_mut()
                .find(|e| e.id == expense.id)
                .map(|slot| *slot = expense),
            LedgerEntry::Budget(budget) => group
                .budgets
                .iter_mut()
                .find(|e| e.id == budget.id)
                .map(|slot| *slot = budget),
        };
        Ok(u64::from(replaced.is_some()))
    }

    async fn pull_entry(&self, group_id: &str, kind: EntryKind, entry_id: &str) -> Result<u64, LedgerError> {
        let mut groups = self.groups.write().await;
        let Some(group) = groups.by_id.get_mut(group_id) else {
            return Ok(0);
        };
        let before = entry_ids(group, kind).len();
        match kind {
            EntryKind::Income => group.incomes.retain(|e| e.id != entry_id),
            EntryKind::Expense => group.expenses.retain(|e| e.id != entry_id),
            EntryKind::Budget => group.budgets.retain(|e| e.id != entry_id),
        }
        Ok((before - entry_ids(group, kind).len()) as u64)
    }

    async fn delete(&self, group_id: &str) -> Result<u64, LedgerError> {
        let mut groups = self.groups.write().await;
        if groups.by_id.remove(group_id).is_some() {
            groups.order.retain(|id| id != group_id);
            Ok(1)
        } else {
            Ok(0)
        }
    }
}
