use shared::types::Role;

use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub path: &'static str,
}

const fn item(label: &'static str, path: &'static str) -> MenuItem {
    MenuItem { label, path }
}

pub const PUBLIC_MENU: &[MenuItem] = &[item("Benefits", "/benefits"), item("FAQ", "/faq")];

pub const ADMIN_MENU: &[MenuItem] = &[
    item("Dashboard", "/admin"),
    item("Manage Ads", "/admin/manage-ads"),
    item("Manage Users", "/admin/users"),
    item("Analytics", "/admin/analytics"),
    item("Settings", "/settings"),
];

pub const ADVERTISER_MENU: &[MenuItem] = &[
    item("Dashboard", "/advertiser"),
    item("Create Ad", "/advertiser/create-ad"),
    item("Campaigns", "/advertiser/campaigns"),
    item("Targeting", "/advertiser/targeting"),
    item("Budget", "/advertiser/budget"),
    item("Analytics", "/advertiser/analytics"),
    item("Settings", "/settings"),
];

pub const VIEWER_MENU: &[MenuItem] = &[
    item("Dashboard", "/viewer"),
    item("My Ads", "/viewer/my-ads"),
    item("Preferences", "/viewer/preferences"),
    item("Settings", "/settings"),
];

pub fn menu_for_role(role: Role) -> &'static [MenuItem] {
    match role {
        Role::Administrator => ADMIN_MENU,
        Role::Advertiser => ADVERTISER_MENU,
        Role::Viewer => VIEWER_MENU,
        Role::Unknown => &[],
    }
}

/// Navigation entries for the current session. Nothing is shown while the
/// session is still loading.
pub fn menu_for(session: &Session) -> &'static [MenuItem] {
    if session.is_loading() {
        return &[];
    }
    match session.role() {
        Some(role) => menu_for_role(role),
        None => PUBLIC_MENU,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::RouteTable;

    #[test]
    fn anonymous_sees_public_menu() {
        assert_eq!(menu_for(&Session::anonymous()), PUBLIC_MENU);
        assert!(menu_for(&Session::loading()).is_empty());
    }

    #[test]
    fn unknown_role_sees_nothing() {
        assert!(menu_for_role(Role::Unknown).is_empty());
    }

    #[test]
    fn every_menu_entry_is_a_declared_route() {
        let table = RouteTable::dashboard();
        for role in Role::KNOWN {
            for entry in menu_for_role(role) {
                assert!(table.find(entry.path).is_some(), "{} has no route", entry.path);
            }
        }
        for entry in PUBLIC_MENU {
            assert!(table.find(entry.path).is_some());
        }
    }
}
