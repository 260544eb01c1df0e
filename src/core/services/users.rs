use crate::auth::jwt::JwtService;
use crate::constants::{
    PROFILE_PICTURE_CHANGED, PROFILE_PICTURE_UPDATED, PROFILE_UPDATED, USER_GROUP_ASSIGNED, USER_LOGGED_IN,
    USER_REGISTERED,
};
use crate::core::errors::LedgerError;
use crate::core::models::{
    principal::Principal,
    user::{NewUser, ProfileUpdate, User},
};
use crate::infrastructure::media::MediaHost;
use crate::infrastructure::storage::UserRepository;
use bson::oid::ObjectId;
use chrono::Utc;
use tracing::info;

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfilePictureChange {
    pub message: String,
    pub profile_picture: String,
}

pub struct UserService<U: UserRepository, M: MediaHost> {
    users: U,
    media: M,
    jwt_service: JwtService,
    hash_cost: u32,
}

fn require_field(field: &str, value: &str) -> Result<(), LedgerError> {
    if value.trim().is_empty() {
        return Err(LedgerError::MissingField(field.to_string()));
    }
    Ok(())
}

/// Points a user's group reference at `group_id`. Shared with group creation.
pub(crate) async fn assign_group<U: UserRepository>(users: &U, user_id: &str, group_id: &str) -> Result<(), LedgerError> {
    if users.set_group(user_id, group_id).await? == 0 {
        return Err(LedgerError::UserGroupUpdateFailed);
    }
    info!(action = USER_GROUP_ASSIGNED, user_id, group_id);
    Ok(())
}

impl<U: UserRepository, M: MediaHost> UserService<U, M> {
    pub fn new(users: U, media: M, jwt_secret: &str, hash_cost: u32) -> Self {
        UserService {
            users,
            media,
            jwt_service: JwtService::new(jwt_secret),
            hash_cost,
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<Principal, LedgerError> {
        self.jwt_service.validate_token(token)
    }

    pub async fn register(&self, new_user: NewUser) -> Result<User, LedgerError> {
        let gender = new_user
            .gender
            .filter(|g| !g.trim().is_empty())
            .ok_or_else(|| LedgerError::MissingField("Gender".to_string()))?;
        require_field("Name", &new_user.name)?;
        require_field("Username", &new_user.username)?;
        require_field("Email", &new_user.email)?;
        require_field("Password", &new_user.password)?;

        if self
            .users
            .find_by_email_or_username(&new_user.email, &new_user.username)
            .await?
            .is_some()
        {
            return Err(LedgerError::UserAlreadyExists);
        }

        let password = bcrypt::hash(&new_user.password, self.hash_cost)
            .map_err(|e| LedgerError::InternalServerError(format!("Password hashing error: {}", e)))?;

        let mut user = User {
            id: ObjectId::new().to_hex(),
            name: new_user.name,
            username: new_user.username,
            email: new_user.email,
            password,
            gender,
            profile_picture: new_user.profile_picture,
            birth_date: new_user.birth_date,
            group_id: new_user.group_id,
            created_at: Utc::now(),
        };
        user.id = self
            .users
            .insert(&user)
            .await?
            .ok_or_else(|| LedgerError::PersistenceFailed("register user".to_string()))?;

        info!(action = USER_REGISTERED, user_id = %user.id, username = %user.username);
        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, LedgerError> {
        let user = self.users.find_by_email(email).await?.ok_or(LedgerError::UserNotFound)?;

        let valid = bcrypt::verify(password, &user.password)
            .map_err(|e| LedgerError::InternalServerError(format!("Password verification error: {}", e)))?;
        if !valid {
            return Err(LedgerError::InvalidPassword);
        }

        let access_token = self
            .jwt_service
            .generate_token(&Principal::new(&user.id, &user.name, &user.email))?;
        info!(action = USER_LOGGED_IN, user_id = %user.id);
        Ok(Session { access_token, user })
    }

    pub async fn list_users(&self) -> Result<Vec<User>, LedgerError> {
        self.users.find_all().await
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, LedgerError> {
        self.users.find_by_id(user_id).await
    }

    pub async fn update_profile(&self, principal: &Principal, update: ProfileUpdate) -> Result<User, LedgerError> {
        let mut user = self
            .users
            .find_by_id(&principal.id)
            .await?
            .ok_or(LedgerError::UserNotFound)?;
        user.apply_profile_update(update);

        if self.users.update_profile(&user).await? == 0 {
            return Err(LedgerError::UserNotFound);
        }
        info!(action = PROFILE_UPDATED, user_id = %user.id);

        self.users.find_by_id(&principal.id).await?.ok_or(LedgerError::UserNotFound)
    }

    pub async fn update_profile_picture(
        &self,
        principal: &Principal,
        file_name: &str,
        image: Vec<u8>,
    ) -> Result<ProfilePictureChange, LedgerError> {
        let user = self
            .users
            .find_by_id(&principal.id)
            .await?
            .ok_or(LedgerError::UserNotFound)?;

        let url = self.media.upload(file_name, image).await?;
        if self.users.set_profile_picture(&user.id, &url).await? == 0 {
            return Err(LedgerError::UserNotFound);
        }
        info!(action = PROFILE_PICTURE_CHANGED, user_id = %user.id);

        Ok(ProfilePictureChange {
            message: PROFILE_PICTURE_UPDATED.to_string(),
            profile_picture: url,
        })
    }

    pub async fn update_user_group(&self, user_id: &str, group_id: &str) -> Result<(), LedgerError> {
        assign_group(&self.users, user_id, group_id).await
    }
}
