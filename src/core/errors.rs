use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

/// Broad failure classes surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Auth,
    Limit,
    Persistence,
    Update,
    AiGeneration,
    Upstream,
    Internal,
}

#[derive(Error, Debug, Serialize)]
pub enum LedgerError {
    /// Required field is missing or empty
    #[error("{0} is required")]
    MissingField(String),

    /// Identifier is not a well-formed ObjectId
    #[error("Invalid id: {0}")]
    InvalidId(String),

    /// Generic input validation error with detailed field information
    #[error("Invalid input for field `{0}`: {1:?}")]
    InvalidInput(String, FieldError),

    #[error("Email or username already exists")]
    UserAlreadyExists,

    #[error("You are already a member of this group")]
    AlreadyGroupMember,

    #[error("User not found")]
    UserNotFound,

    #[error("Group not found")]
    GroupNotFound,

    #[error("Income not found")]
    IncomeNotFound,

    #[error("Expense not found")]
    ExpenseNotFound,

    #[error("Budget not found")]
    BudgetNotFound,

    #[error("Invalid password")]
    InvalidPassword,

    /// Bearer credential missing, malformed or not verifiable
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("You are not a member of this group")]
    NotGroupMember,

    #[error("You are not the admin of this group")]
    NotGroupAdmin,

    #[error("Only owners can delete the group")]
    NotGroupOwner,

    #[error("You can only own up to {0} groups")]
    OwnedGroupLimit(usize),

    #[error("You can only be a member of up to {0} groups")]
    JoinedGroupLimit(usize),

    /// A write reported that nothing was inserted or modified
    #[error("Failed to {0}")]
    PersistenceFailed(String),

    #[error("Failed to update user group")]
    UserGroupUpdateFailed,

    #[error("AI failed to generate group")]
    AiGenerationFailed,

    /// Media host rejected or failed the upload
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::MissingField(_) | LedgerError::InvalidId(_) | LedgerError::InvalidInput(..) => {
                ErrorKind::Validation
            }
            LedgerError::UserAlreadyExists | LedgerError::AlreadyGroupMember => ErrorKind::Conflict,
            LedgerError::UserNotFound
            | LedgerError::GroupNotFound
            | LedgerError::IncomeNotFound
            | LedgerError::ExpenseNotFound
            | LedgerError::BudgetNotFound => ErrorKind::NotFound,
            LedgerError::InvalidPassword
            | LedgerError::Unauthorized(_)
            | LedgerError::NotGroupMember
            | LedgerError::NotGroupAdmin
            | LedgerError::NotGroupOwner => ErrorKind::Auth,
            LedgerError::OwnedGroupLimit(_) | LedgerError::JoinedGroupLimit(_) => ErrorKind::Limit,
            LedgerError::PersistenceFailed(_) => ErrorKind::Persistence,
            LedgerError::UserGroupUpdateFailed => ErrorKind::Update,
            LedgerError::AiGenerationFailed => ErrorKind::AiGeneration,
            LedgerError::UploadFailed(_) => ErrorKind::Upstream,
            LedgerError::StorageError(_) | LedgerError::InternalServerError(_) => ErrorKind::Internal,
        }
    }
}

impl From<mongodb::error::Error> for LedgerError {
    fn from(err: mongodb::error::Error) -> Self {
        LedgerError::StorageError(err.to_string())
    }
}

impl From<bson::ser::Error> for LedgerError {
    fn from(err: bson::ser::Error) -> Self {
        LedgerError::StorageError(format!("Failed to encode document: {}", err))
    }
}
