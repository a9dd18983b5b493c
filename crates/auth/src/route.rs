//! Destination policy: where a user belongs given roles and branch.

use serde::Serialize;

use shds_core::BranchId;

use crate::profile::Profile;
use crate::roles::{RoleBucket, RoleSet};

/// Screens of the portal that take part in routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Login,
    Setup,
    AdminDashboard,
    Students,
    Attendance,
    Fees,
    Invites,
    StudentPortal,
}

impl Screen {
    pub const ALL: [Screen; 8] = [
        Screen::Login,
        Screen::Setup,
        Screen::AdminDashboard,
        Screen::Students,
        Screen::Attendance,
        Screen::Fees,
        Screen::Invites,
        Screen::StudentPortal,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Screen::Login => "/login",
            Screen::Setup => "/setup",
            Screen::AdminDashboard => "/dashboard",
            Screen::Students => "/dashboard/students",
            Screen::Attendance => "/dashboard/attendance",
            Screen::Fees => "/dashboard/fees",
            Screen::Invites => "/dashboard/invites",
            Screen::StudentPortal => "/student",
        }
    }

    /// Resolve a path (query string ignored) to a screen.
    pub fn from_path(path: &str) -> Option<Screen> {
        let path = path.split('?').next().unwrap_or_default();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        Screen::ALL.into_iter().find(|s| s.path() == path)
    }

    /// Screens rendered inside the admin layout.
    pub fn is_admin_area(&self) -> bool {
        matches!(
            self,
            Screen::AdminDashboard
                | Screen::Students
                | Screen::Attendance
                | Screen::Fees
                | Screen::Invites
        )
    }
}

impl core::fmt::Display for Screen {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.path())
    }
}

/// Which rule of the policy produced a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteRule {
    MissingBranch,
    AdminBucket,
    StudentBucket,
    NoRecognizedRole,
}

impl RouteRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteRule::MissingBranch => "missing_branch",
            RouteRule::AdminBucket => "admin_bucket",
            RouteRule::StudentBucket => "student_bucket",
            RouteRule::NoRecognizedRole => "no_recognized_role",
        }
    }
}

/// Auditable account of a routing decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteExplanation {
    pub destination: Screen,
    pub rule: RouteRule,
    pub has_branch: bool,
    pub admin_hits: Vec<String>,
    pub student_hits: Vec<String>,
}

/// Compute the single canonical destination for a user.
///
/// First match wins:
/// 1. no branch: `Setup`
/// 2. any admin-like role: `AdminDashboard`
/// 3. any student-like role: `StudentPortal`
/// 4. otherwise: `Setup`
///
/// Total, deterministic, no IO.
pub fn resolve_destination(roles: &RoleSet, branch_id: Option<&BranchId>) -> Screen {
    explain_destination(roles, branch_id).destination
}

/// Same as [`resolve_destination`], with the reasoning attached.
pub fn explain_destination(roles: &RoleSet, branch_id: Option<&BranchId>) -> RouteExplanation {
    let admin_hits: Vec<String> = roles
        .hits(RoleBucket::AdminLike)
        .into_iter()
        .map(|r| r.as_str().to_string())
        .collect();
    let student_hits: Vec<String> = roles
        .hits(RoleBucket::StudentLike)
        .into_iter()
        .map(|r| r.as_str().to_string())
        .collect();

    let (destination, rule) = if branch_id.is_none() {
        (Screen::Setup, RouteRule::MissingBranch)
    } else if !admin_hits.is_empty() {
        (Screen::AdminDashboard, RouteRule::AdminBucket)
    } else if !student_hits.is_empty() {
        (Screen::StudentPortal, RouteRule::StudentBucket)
    } else {
        (Screen::Setup, RouteRule::NoRecognizedRole)
    };

    RouteExplanation {
        destination,
        rule,
        has_branch: branch_id.is_some(),
        admin_hits,
        student_hits,
    }
}

impl Profile {
    pub fn destination(&self) -> Screen {
        resolve_destination(&self.roles, self.branch_id.as_ref())
    }

    pub fn explain(&self) -> RouteExplanation {
        explain_destination(&self.roles, self.branch_id.as_ref())
    }
}
