//! Role-based access policy.
//!
//! The policy is a pure set-membership check: an action lists the roles that
//! may perform it and the caller's role either belongs to that set or not.
//! A request with no caller at all is an authentication gap and is reported
//! separately from a role mismatch.

use serde_json::json;

use super::{Caller, Error, Role};

/// Non-empty set of roles permitted to perform an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleSet(&'static [Role]);

/// Roles allowed to create, update, or delete checklists.
pub const CHECKLIST_WRITERS: RoleSet = role_set(&[Role::Admin, Role::Editor]);
/// Roles allowed to read checklists.
pub const CHECKLIST_READERS: RoleSet = role_set(&[Role::Admin, Role::Editor, Role::Viewer]);
/// Roles allowed to manage accounts.
pub const ACCOUNT_ADMINS: RoleSet = role_set(&[Role::Admin]);

/// Const-context constructor; an empty slice fails compilation.
const fn role_set(roles: &'static [Role]) -> RoleSet {
    match RoleSet::new(roles) {
        Some(set) => set,
        None => panic!("a role set needs at least one role"),
    }
}

impl RoleSet {
    /// Build a set from a static slice, rejecting the empty set.
    #[must_use]
    pub const fn new(roles: &'static [Role]) -> Option<Self> {
        if roles.is_empty() {
            None
        } else {
            Some(Self(roles))
        }
    }

    /// Whether `role` belongs to the set.
    #[must_use]
    pub fn contains(self, role: Role) -> bool {
        self.0.contains(&role)
    }

    /// Roles in the set, in declaration order.
    #[must_use]
    pub const fn roles(self) -> &'static [Role] {
        self.0
    }
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// The caller's role is in the required set.
    Allow,
    /// The caller's role is not in the required set.
    Deny {
        /// Roles that would have been accepted.
        required: RoleSet,
        /// Role the caller actually holds.
        actual: Role,
    },
}

/// Decide whether `caller` may perform an action admitting `required`.
///
/// # Examples
/// ```
/// use daybook::domain::authorization::{AccessDecision, CHECKLIST_WRITERS, authorize};
/// use daybook::domain::Role;
///
/// assert_eq!(authorize(CHECKLIST_WRITERS, Role::Editor), AccessDecision::Allow);
/// assert!(matches!(
///     authorize(CHECKLIST_WRITERS, Role::Viewer),
///     AccessDecision::Deny { actual: Role::Viewer, .. }
/// ));
/// ```
#[must_use]
pub fn authorize(required: RoleSet, caller: Role) -> AccessDecision {
    if required.contains(caller) {
        AccessDecision::Allow
    } else {
        AccessDecision::Deny {
            required,
            actual: caller,
        }
    }
}

/// Enforce the policy for an optional caller.
///
/// Returns the caller on success. A missing caller yields
/// [`Error::unauthorized`]; a role outside `required` yields
/// [`Error::forbidden`] with the required roles and the caller's role in the
/// details.
pub fn require_role(required: RoleSet, caller: Option<&Caller>) -> Result<&Caller, Error> {
    let Some(known) = caller else {
        return Err(Error::unauthorized("Not authenticated"));
    };
    match authorize(required, known.role) {
        AccessDecision::Allow => Ok(known),
        AccessDecision::Deny { required, actual } => {
            let roles: Vec<&str> = required.roles().iter().map(|role| role.as_str()).collect();
            Err(
                Error::forbidden("Access denied: insufficient role").with_details(json!({
                    "requiredRoles": roles,
                    "userRole": actual.as_str(),
                })),
            )
        }
    }
}
