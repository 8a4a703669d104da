use std::collections::BTreeSet;

use shared::types::Role;

use crate::session::Session;

/// Roles permitted on a protected route.
///
/// An empty role set admits any authenticated identity. `Role::Unknown` is
/// never a member, so a role-restricted route can not admit it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteRequirement {
    roles: BTreeSet<Role>,
    restricted: bool,
}

impl RouteRequirement {
    pub fn any_authenticated() -> Self {
        Self::default()
    }

    /// Restrict to `roles`. Passing only `Role::Unknown` yields a route
    /// nobody can open, not an open one.
    pub fn roles(roles: impl IntoIterator<Item = Role>) -> Self {
        let requested: Vec<Role> = roles.into_iter().collect();
        Self {
            restricted: !requested.is_empty(),
            roles: requested.into_iter().filter(Role::is_known).collect(),
        }
    }

    pub fn only(role: Role) -> Self {
        Self::roles([role])
    }

    pub fn allowed_roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }

    pub fn is_role_restricted(&self) -> bool {
        self.restricted
    }

    pub fn admits(&self, role: Role) -> bool {
        if !self.restricted {
            return true;
        }
        role.is_known() && self.roles.contains(&role)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Restore still running; show a placeholder.
    Suspend,
    RedirectToLogin,
    RedirectToUnauthorized,
    Render,
}

/// Decide what a protected route shows for `session`. First match wins:
/// loading, then no identity, then role check.
pub fn evaluate(session: &Session, requirement: &RouteRequirement) -> GuardOutcome {
    if session.is_loading() {
        return GuardOutcome::Suspend;
    }

    let Some(identity) = session.identity() else {
        return GuardOutcome::RedirectToLogin;
    };

    if requirement.admits(identity.role()) {
        GuardOutcome::Render
    } else {
        GuardOutcome::RedirectToUnauthorized
    }
}
