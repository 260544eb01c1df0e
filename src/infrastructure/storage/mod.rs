use crate::core::errors::LedgerError;
use crate::core::models::{
    group::{Group, GroupMember},
    ledger::{EntryKind, LedgerEntry},
    user::User,
};
use async_trait::async_trait;

/// Document-store access for the users collection.
///
/// Write methods return the number of affected documents; callers decide
/// whether zero is an error.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<User>, LedgerError>;
    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, LedgerError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, LedgerError>;
    async fn find_by_email_or_username(&self, email: &str, username: &str) -> Result<Option<User>, LedgerError>;
    /// Returns the inserted id, if the store reported one.
    async fn insert(&self, user: &User) -> Result<Option<String>, LedgerError>;
    /// Overwrites the editable profile fields of `user`.
    async fn update_profile(&self, user: &User) -> Result<u64, LedgerError>;
    async fn set_profile_picture(&self, user_id: &str, url: &str) -> Result<u64, LedgerError>;
    async fn set_group(&self, user_id: &str, group_id: &str) -> Result<u64, LedgerError>;
}

/// Document-store access for the groups collection, including the embedded
/// member and ledger arrays.
#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn find_by_id(&self, group_id: &str) -> Result<Option<Group>, LedgerError>;
    async fn find_by_invite(&self, invite: &str) -> Result<Option<Group>, LedgerError>;
    async fn find_by_member(&self, user_id: &str) -> Result<Vec<Group>, LedgerError>;
    /// The group whose `kind` array embeds an entry with `entry_id`.
    async fn find_by_entry(&self, kind: EntryKind, entry_id: &str) -> Result<Option<Group>, LedgerError>;
    async fn insert(&self, group: &Group) -> Result<Option<String>, LedgerError>;
    async fn update_details(&self, group_id: &str, name: &str, description: &str) -> Result<u64, LedgerError>;
    async fn push_member(&self, group_id: &str, member: &GroupMember) -> Result<u64, LedgerError>;
    async fn push_entry(&self, group_id: &str, entry: &LedgerEntry) -> Result<u64, LedgerError>;
    /// Replaces the array element with the same id as `entry`.
    async fn set_entry(&self, group_id: &str, entry: &LedgerEntry) -> Result<u64, LedgerError>;
    async fn pull_entry(&self, group_id: &str, kind: EntryKind, entry_id: &str) -> Result<u64, LedgerError>;
    async fn delete(&self, group_id: &str) -> Result<u64, LedgerError>;
}

pub mod in_memory;
pub mod mongo;
