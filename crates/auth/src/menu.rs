//! Admin layout navigation.

use serde::Serialize;

use crate::roles::RoleSet;
use crate::route::Screen;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub label: &'static str,
    pub screen: Screen,
}

impl MenuItem {
    const fn new(label: &'static str, screen: Screen) -> Self {
        Self { label, screen }
    }
}

/// Entries of the dashboard menu visible to `roles`.
///
/// Invites are only offered to super admins.
pub fn dashboard_menu(roles: &RoleSet) -> Vec<MenuItem> {
    let mut items = vec![
        MenuItem::new("Home", Screen::AdminDashboard),
        MenuItem::new("Students", Screen::Students),
        MenuItem::new("Attendance", Screen::Attendance),
        MenuItem::new("Fees", Screen::Fees),
    ];
    if roles.is_super_admin() {
        items.push(MenuItem::new("Invites", Screen::Invites));
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invites_entry_only_for_super_admin() {
        let staff = dashboard_menu(&RoleSet::from_raw(["staff"]));
        assert_eq!(staff.len(), 4);
        assert!(staff.iter().all(|i| i.screen != Screen::Invites));

        let root = dashboard_menu(&RoleSet::from_raw(["super_admin"]));
        assert_eq!(root.last().map(|i| i.screen), Some(Screen::Invites));
    }
}
