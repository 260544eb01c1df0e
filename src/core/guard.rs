//! Membership and role checks shared by every group operation.

use crate::core::errors::LedgerError;
use crate::core::models::group::{Group, GroupMember};

/// Minimum standing a caller needs within a group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Requirement {
    /// Any role.
    Member,
    /// Owner or Admin.
    Manager,
    Owner,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DenyReason {
    NotMember,
    NotAdmin,
    NotOwner,
}

#[derive(Debug, PartialEq)]
pub enum Access<'a> {
    Allowed(&'a GroupMember),
    Denied(DenyReason),
}

impl From<DenyReason> for LedgerError {
    fn from(reason: DenyReason) -> Self {
        match reason {
            DenyReason::NotMember => LedgerError::NotGroupMember,
            DenyReason::NotAdmin => LedgerError::NotGroupAdmin,
            DenyReason::NotOwner => LedgerError::NotGroupOwner,
        }
    }
}

/// Membership is checked before role, so a stranger always gets `NotMember`.
pub fn check_access<'a>(group: &'a Group, user_id: &str, requirement: Requirement) -> Access<'a> {
    let Some(member) = group.member(user_id) else {
        return Access::Denied(DenyReason::NotMember);
    };
    match requirement {
        Requirement::Member => Access::Allowed(member),
        Requirement::Manager if member.can_manage() => Access::Allowed(member),
        Requirement::Manager => Access::Denied(DenyReason::NotAdmin),
        Requirement::Owner if member.is_owner() => Access::Allowed(member),
        Requirement::Owner => Access::Denied(DenyReason::NotOwner),
    }
}

impl<'a> Access<'a> {
    pub fn into_result(self) -> Result<&'a GroupMember, LedgerError> {
        match self {
            Access::Allowed(member) => Ok(member),
            Access::Denied(reason) => Err(reason.into()),
        }
    }
}

pub fn require<'a>(group: &'a Group, user_id: &str, requirement: Requirement) -> Result<&'a GroupMember, LedgerError> {
    check_access(group, user_id, requirement).into_result()
}
