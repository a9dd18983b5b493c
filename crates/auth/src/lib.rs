//! `shds-auth`: pure role-based access & redirection policy.
//!
//! This crate is intentionally decoupled from HTTP and the identity provider:
//! callers hand it roles, a branch assignment and the screen being mounted,
//! and it answers where the user belongs.

pub mod guard;
pub mod menu;
pub mod profile;
pub mod roles;
pub mod route;

pub use guard::{AuthPhase, GuardDecision, ProfileState, guard_screen};
pub use menu::{MenuItem, dashboard_menu};
pub use profile::{Profile, ProfileDetails};
pub use roles::{Role, RoleBucket, RoleSet};
pub use route::{RouteExplanation, RouteRule, Screen, explain_destination, resolve_destination};
