use crate::core::errors::LedgerError;
use crate::core::models::{
    group::{Group, GroupMember},
    ledger::{EntryKind, LedgerEntry},
    user::User,
};
use crate::infrastructure::storage::{GroupRepository, UserRepository};
use async_trait::async_trait;
use bson::{Document, doc, to_bson};
use futures::TryStreamExt;
use mongodb::{Client, Collection, Database};

const USERS: &str = "users";
const GROUPS: &str = "groups";

/// MongoDB-backed repositories. Ids are stored as hex strings in `_id`.
#[derive(Clone)]
pub struct MongoStorage {
    users: Collection<User>,
    groups: Collection<Group>,
}

impl MongoStorage {
    pub fn new(database: &Database) -> Self {
        MongoStorage {
            users: database.collection(USERS),
            groups: database.collection(GROUPS),
        }
    }

    pub async fn connect(uri: &str, database_name: &str) -> Result<Self, LedgerError> {
        let client = Client::with_uri_str(uri).await?;
        Ok(MongoStorage::new(&client.database(database_name)))
    }
}

fn entry_filter(group_id: &str, kind: EntryKind, entry_id: &str) -> Document {
    let mut filter = doc! { "_id": group_id };
    filter.insert(format!("{}._id", kind.field()), entry_id);
    filter
}

#[async_trait]
impl UserRepository for MongoStorage {
    async fn find_all(&self) -> Result<Vec<User>, LedgerError> {
        let cursor = self.users.find(None, None).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, LedgerError> {
        Ok(self.users.find_one(doc! { "_id": user_id }, None).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, LedgerError> {
        Ok(self.users.find_one(doc! { "email": email }, None).await?)
    }

    async fn find_by_email_or_username(&self, email: &str, username: &str) -> Result<Option<User>, LedgerError> {
        let filter = doc! { "$or": [{ "email": email }, { "username": username }] };
        Ok(self.users.find_one(filter, None).await?)
    }

    async fn insert(&self, user: &User) -> Result<Option<String>, LedgerError> {
        let result = self.users.insert_one(user, None).await?;
        Ok(result.inserted_id.as_str().map(String::from))
    }

    async fn update_profile(&self, user: &User) -> Result<u64, LedgerError> {
        let update = doc! {
            "$set": {
                "name": user.name.as_str(),
                "username": user.username.as_str(),
                "email": user.email.as_str(),
                "profile_picture": user.profile_picture.as_deref(),
                "birth_date": to_bson(&user.birth_date)?,
            }
        };
        let result = self.users.update_one(doc! { "_id": user.id.as_str() }, update, None).await?;
        Ok(result.matched_count)
    }

    async fn set_profile_picture(&self, user_id: &str, url: &str) -> Result<u64, LedgerError> {
        let result = self
            .users
            .update_one(doc! { "_id": user_id }, doc! { "$set": { "profile_picture": url } }, None)
            .await?;
        Ok(result.matched_count)
    }

    async fn set_group(&self, user_id: &str, group_id: &str) -> Result<u64, LedgerError> {
        let result = self
            .users
            .update_one(doc! { "_id": user_id }, doc! { "$set": { "group_id": group_id } }, None)
            .await?;
        Ok(result.matched_count)
    }
}

#[async_trait]
impl GroupRepository for MongoStorage {
    async fn find_by_id(&self, group_id: &str) -> Result<Option<Group>, LedgerError> {
        Ok(self.groups.find_one(doc! { "_id": group_id }, None).await?)
    }

    async fn find_by_invite(&self, invite: &str) -> Result<Option<Group>, LedgerError> {
        Ok(self.groups.find_one(doc! { "invite": invite }, None).await?)
    }

    async fn find_by_member(&self, user_id: &str) -> Result<Vec<Group>, LedgerError> {
        let cursor = self.groups.find(doc! { "members._id": user_id }, None).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_by_entry(&self, kind: EntryKind, entry_id: &str) -> Result<Option<Group>, LedgerError> {
        let mut filter = Document::new();
        filter.insert(format!("{}._id", kind.field()), entry_id);
        Ok(self.groups.find_one(filter, None).await?)
    }

    async fn insert(&self, group: &Group) -> Result<Option<String>, LedgerError> {
        let result = self.groups.insert_one(group, None).await?;
        Ok(result.inserted_id.as_str().map(String::from))
    }

    async fn update_details(&self, group_id: &str, name: &str, description: &str) -> Result<u64, LedgerError> {
        let result = self
            .groups
            .update_one(
                doc! { "_id": group_id },
                doc! { "$set": { "name": name, "description": description } },
                None,
            )
            .await?;
        Ok(result.matched_count)
    }

    async fn push_member(&self, group_id: &str, member: &GroupMember) -> Result<u64, LedgerError> {
        let result = self
            .groups
            .update_one(
                doc! { "_id": group_id },
                doc! { "$push": { "members": to_bson(member)? } },
                None,
            )
            .await?;
        Ok(result.modified_count)
    }

    async fn push_entry(&self, group_id: &str, entry: &LedgerEntry) -> Result<u64, LedgerError> {
        let mut push = Document::new();
        push.insert(entry.kind().field(), to_bson(entry)?);
        let result = self
            .groups
            .update_one(doc! { "_id": group_id }, doc! { "$push": push }, None)
            .await?;
        Ok(result.modified_count)
    }

    async fn set_entry(&self, group_id: &str, entry: &LedgerEntry) -> Result<u64, LedgerError> {
        let mut set = Document::new();
        set.insert(format!("{}.$", entry.kind().field()), to_bson(entry)?);
        let result = self
            .groups
            .update_one(
                entry_filter(group_id, entry.kind(), entry.id()),
                doc! { "$set": set },
                None,
            )
            .await?;
        // Identical rewrites still count as matched.
        Ok(result.matched_count)
    }

    async fn pull_entry(&self, group_id: &str, kind: EntryKind, entry_id: &str) -> Result<u64, LedgerError> {
        let mut pull = Document::new();
        pull.insert(kind.field(), doc! { "_id": entry_id });
        let result = self
            .groups
            .update_one(doc! { "_id": group_id }, doc! { "$pull": pull }, None)
            .await?;
        Ok(result.modified_count)
    }

    async fn delete(&self, group_id: &str) -> Result<u64, LedgerError> {
        let result = self.groups.delete_one(doc! { "_id": group_id }, None).await?;
        Ok(result.deleted_count)
    }
}
