//! Roles, capabilities and per-request context.
//!
//! The identity collaborator hands over a role string per user; it is
//! parsed once into a closed [`Role`] and checked against a capability
//! set. The context travels with each call; the allocator keeps no
//! process-wide user state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AllocationError, Result};

/// A user role in the college administration system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Faculty,
    Admin,
}

/// An action gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Look up one's own seat in a published plan.
    ViewOwnSeat,
    /// Read session rosters and published plans.
    ViewRoster,
    /// Maintain room geometry.
    ManageRooms,
    /// Run the seating solver.
    AllocateSeating,
    /// Publish a plan and release notifications.
    PublishPlan,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}' (expected student, faculty or admin)")]
pub struct UnknownRole(pub String);

impl Role {
    /// Capabilities granted to this role.
    pub fn capabilities(self) -> &'static [Capability] {
        use Capability::*;
        match self {
            Role::Student => &[ViewOwnSeat],
            Role::Faculty => &[ViewOwnSeat, ViewRoster, ManageRooms],
            Role::Admin => &[
                ViewOwnSeat,
                ViewRoster,
                ManageRooms,
                AllocateSeating,
                PublishPlan,
            ],
        }
    }

    /// Whether this role holds `capability`.
    pub fn can(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Student => write!(f, "student"),
            Role::Faculty => write!(f, "faculty"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "faculty" => Ok(Role::Faculty),
            "admin" => Ok(Role::Admin),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// Who is asking, passed explicitly into every gated operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Authenticated user ID.
    pub actor_id: String,
    /// Role resolved by the identity collaborator.
    pub role: Role,
}

impl RequestContext {
    /// Creates a context.
    pub fn new(actor_id: impl Into<String>, role: Role) -> Self {
        Self {
            actor_id: actor_id.into(),
            role,
        }
    }

    /// Fails with `PermissionDenied` unless the role holds `capability`.
    pub fn require(&self, capability: Capability) -> Result<()> {
        if self.role.can(capability) {
            Ok(())
        } else {
            tracing::warn!(
                actor = %self.actor_id,
                role = %self.role,
                ?capability,
                "capability check failed"
            );
            Err(AllocationError::PermissionDenied {
                role: self.role,
                capability,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!("Admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!(" faculty ".parse::<Role>(), Ok(Role::Faculty));
        assert_eq!("student".parse::<Role>(), Ok(Role::Student));
        assert_eq!(
            "registrar".parse::<Role>(),
            Err(UnknownRole("registrar".to_string()))
        );
    }

    #[test]
    fn test_capability_sets() {
        assert!(Role::Admin.can(Capability::AllocateSeating));
        assert!(Role::Admin.can(Capability::PublishPlan));
        assert!(Role::Faculty.can(Capability::ManageRooms));
        assert!(!Role::Faculty.can(Capability::AllocateSeating));
        assert!(Role::Student.can(Capability::ViewOwnSeat));
        assert!(!Role::Student.can(Capability::ViewRoster));
    }

    #[test]
    fn test_require() {
        let admin = RequestContext::new("u-1", Role::Admin);
        assert!(admin.require(Capability::AllocateSeating).is_ok());

        let student = RequestContext::new("u-2", Role::Student);
        let err = student.require(Capability::PublishPlan).unwrap_err();
        assert!(matches!(
            err,
            AllocationError::PermissionDenied {
                role: Role::Student,
                capability: Capability::PublishPlan
            }
        ));
    }
}
