//! Platform roles.

use serde::{Deserialize, Serialize};

/// Error returned when a role string is not one of the known roles.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid role: {0}")]
pub struct RoleParseError(pub String);

/// The role attached to an authenticated session.
///
/// Roles are flat: no role implies another. A session holds exactly one.
/// The wire and storage form is the upper-case name (`"ADMIN"`), matching
/// what the backend returns at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Platform administration (users, content, settings).
    Admin,
    /// Program management and reporting.
    Manager,
    /// Counselling and appointment handling.
    Consultant,
    /// Day-to-day content and activity operations.
    Staff,
    /// Registered learner.
    Member,
}

impl Role {
    /// Every role, in display order.
    pub const ALL: [Self; 5] = [
        Self::Admin,
        Self::Manager,
        Self::Consultant,
        Self::Staff,
        Self::Member,
    ];

    /// The storage/wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Manager => "MANAGER",
            Self::Consultant => "CONSULTANT",
            Self::Staff => "STAFF",
            Self::Member => "MEMBER",
        }
    }

    /// Human-readable label for templates.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Admin => "Administrator",
            Self::Manager => "Manager",
            Self::Consultant => "Consultant",
            Self::Staff => "Staff",
            Self::Member => "Member",
        }
    }

    /// Landing page for a freshly logged-in user of this role.
    #[must_use]
    pub const fn home_path(self) -> &'static str {
        match self {
            Self::Admin => "/admin",
            Self::Manager => "/manager",
            Self::Consultant => "/consultant",
            Self::Staff => "/staff",
            Self::Member => "/member/enrollments",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    /// Parses the exact upper-case name. Comparison is case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| RoleParseError(s.to_string()))
    }
}
