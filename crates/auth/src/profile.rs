//! The authorization view of a directory user.

use serde::Serialize;

use shds_core::{BranchId, StudentId};

use crate::roles::RoleSet;

/// Roles and branch assignment of the current user.
///
/// Fetched fresh on every screen mount; the most recent fetch wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub roles: RoleSet,
    pub branch_id: Option<BranchId>,
    pub details: ProfileDetails,
}

/// Optional, display-oriented part of the profile document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileDetails {
    pub display_name: Option<String>,
    pub student_id: Option<StudentId>,
}

impl Profile {
    pub fn new(roles: RoleSet, branch_id: Option<BranchId>) -> Self {
        Self {
            roles,
            branch_id,
            details: ProfileDetails::default(),
        }
    }

    /// Profile used when the directory could not be reached: no roles, no branch.
    pub fn unassigned() -> Self {
        Self::default()
    }

    pub fn with_details(mut self, details: ProfileDetails) -> Self {
        self.details = details;
        self
    }

    /// Branch for display: the id, or `"-"` when unassigned.
    pub fn branch_display(&self) -> &str {
        self.branch_id.as_ref().map(BranchId::as_str).unwrap_or("-")
    }
}
