//! Admin layout: guard for the admin area plus the header/menu view.

use serde::Serialize;

use shds_auth::{MenuItem, Profile, Screen, dashboard_menu};

use crate::session::Identity;

use super::{Mounted, PortalContext};

/// What the admin header and menu show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutView {
    pub display_name: String,
    pub initials: String,
    pub email: Option<String>,
    pub role_label: String,
    pub branch: String,
    pub menu: Vec<MenuItem>,
}

impl LayoutView {
    pub fn build(profile: Option<&Profile>, identity: Option<&Identity>) -> Self {
        let display_name = display_name(profile, identity, "User");
        Self {
            initials: initials(&display_name),
            display_name,
            email: identity.and_then(|i| i.email.clone()),
            role_label: profile
                .map(|p| p.roles.label())
                .unwrap_or_else(|| "Pending role".to_string()),
            branch: profile.map(Profile::branch_display).unwrap_or("-").to_string(),
            menu: profile.map(|p| dashboard_menu(&p.roles)).unwrap_or_default(),
        }
    }
}

/// Profile display name, then identity display name, then email, then `fallback`.
pub fn display_name(
    profile: Option<&Profile>,
    identity: Option<&Identity>,
    fallback: &str,
) -> String {
    let candidates = [
        profile.and_then(|p| p.details.display_name.as_deref()),
        identity.and_then(|i| i.display_name.as_deref()),
        identity.and_then(|i| i.email.as_deref()),
    ];
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

fn initials(name: &str) -> String {
    name.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "?".to_string())
}

/// Mount `screen` and build the admin layout when it renders.
///
/// Screens outside the admin area are still guarded but never get a layout.
pub async fn mount(ctx: &PortalContext, screen: Screen) -> (Mounted, Option<LayoutView>) {
    let mounted = ctx.mount(screen).await;
    let view = (screen.is_admin_area() && mounted.may_render())
        .then(|| LayoutView::build(mounted.profile.as_ref(), mounted.session.identity()));
    (mounted, view)
}
