use axum::{Json, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::core::errors::{ErrorKind, LedgerError};
use crate::core::models::user::User;
use crate::core::services::{ProfilePictureChange, Session};

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// User as returned to clients; the password hash never leaves the server.
#[derive(Serialize, ToSchema)]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub gender: String,
    pub profile_picture: Option<String>,
    #[schema(value_type = Option<String>, example = "1990-01-01")]
    pub birth_date: Option<NaiveDate>,
    pub group_id: Option<String>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            name: user.name,
            username: user.username,
            email: user.email,
            gender: user.gender,
            profile_picture: user.profile_picture,
            birth_date: user.birth_date,
            group_id: user.group_id,
            created_at: user.created_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserResponse,
}

impl From<Session> for LoginResponse {
    fn from(session: Session) -> Self {
        LoginResponse {
            access_token: session.access_token,
            user: session.user.into(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ProfilePictureResponse {
    pub message: String,
    pub profile_picture: String,
}

impl From<ProfilePictureChange> for ProfilePictureResponse {
    fn from(change: ProfilePictureChange) -> Self {
        ProfilePictureResponse {
            message: change.message,
            profile_picture: change.profile_picture,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct CreateAiGroupRequest {
    pub prompt: String,
}

#[derive(Deserialize, ToSchema)]
pub struct JoinGroupRequest {
    pub invite: String,
}

/// Missing fields arrive as empty strings and still overwrite.
#[derive(Deserialize, ToSchema)]
pub struct UpdateGroupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateUserGroupRequest {
    pub group_id: String,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Calendar month selector; the current month when either part is absent.
#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MonthQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl MonthQuery {
    pub fn explicit(&self) -> Option<(i32, u32)> {
        self.year.zip(self.month)
    }
}

// Error response struct
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// Newtype wrapper for LedgerError to implement IntoResponse
pub struct ApiError(pub LedgerError);

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        ApiError(err)
    }
}

fn status_for(err: &LedgerError) -> StatusCode {
    match err.kind() {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Auth => match err {
            LedgerError::InvalidPassword | LedgerError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::FORBIDDEN,
        },
        ErrorKind::Limit => StatusCode::FORBIDDEN,
        ErrorKind::AiGeneration | ErrorKind::Upstream => StatusCode::BAD_GATEWAY,
        ErrorKind::Persistence | ErrorKind::Update | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        (status, Json(ErrorResponse { error: self.0.to_string() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_error_kinds_to_statuses() {
        assert_eq!(status_for(&LedgerError::MissingField("Gender".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&LedgerError::AlreadyGroupMember), StatusCode::CONFLICT);
        assert_eq!(status_for(&LedgerError::IncomeNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(&LedgerError::InvalidPassword), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(&LedgerError::NotGroupAdmin), StatusCode::FORBIDDEN);
        assert_eq!(status_for(&LedgerError::AiGenerationFailed), StatusCode::BAD_GATEWAY);
        assert_eq!(
            status_for(&LedgerError::PersistenceFailed("join group".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
