use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String, // bcrypt hash
    pub gender: String,
    pub profile_picture: Option<String>,
    #[schema(value_type = Option<String>, example = "1990-01-01")]
    pub birth_date: Option<NaiveDate>,
    pub group_id: Option<String>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
}

/// Input for registering a new account. `password` is plaintext here.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub gender: Option<String>,
    pub profile_picture: Option<String>,
    #[schema(value_type = Option<String>, example = "1990-01-01")]
    pub birth_date: Option<NaiveDate>,
    pub group_id: Option<String>,
}

/// Partial profile change. Only non-empty values overwrite the stored ones.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub profile_picture: Option<String>,
    #[schema(value_type = Option<String>, example = "1990-01-01")]
    pub birth_date: Option<NaiveDate>,
}

impl User {
    pub fn apply_profile_update(&mut self, update: ProfileUpdate) {
        if let Some(name) = update.name.filter(|v| !v.is_empty()) {
            self.name = name;
        }
        if let Some(username) = update.username.filter(|v| !v.is_empty()) {
            self.username = username;
        }
        if let Some(email) = update.email.filter(|v| !v.is_empty()) {
            self.email = email;
        }
        if let Some(picture) = update.profile_picture.filter(|v| !v.is_empty()) {
            self.profile_picture = Some(picture);
        }
        if let Some(birth_date) = update.birth_date {
            self.birth_date = Some(birth_date);
        }
    }
}
