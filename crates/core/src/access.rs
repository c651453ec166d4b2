//! Route guard decision.
//!
//! The guard is a pure function of the session's role, the role a route
//! demands, and the location being requested. It holds no state between
//! evaluations, so calling it twice with the same inputs gives the same
//! answer.
//!
//! ```text
//! no role          -> RedirectToLogin { from }
//! role != required -> Denied
//! role == required -> Allow
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{Role, UserId};

/// Path of the login entry point that unauthenticated requests are sent to.
pub const LOGIN_PATH: &str = "/login";

/// Read-only snapshot of the authenticated user held in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    /// The single role of this session.
    pub role: Role,
    /// Backend-issued user identifier.
    pub user_id: UserId,
}

impl SessionIdentity {
    /// Create a new identity snapshot.
    #[must_use]
    pub const fn new(role: Role, user_id: UserId) -> Self {
        Self { role, user_id }
    }
}

/// Outcome of evaluating a route guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// No role in the session. Send the user to [`LOGIN_PATH`], remembering
    /// where they were going.
    RedirectToLogin {
        /// The originally requested location (path and query).
        from: String,
    },
    /// Authenticated, but with a different role. Render the denial view.
    Denied {
        /// The role the route demanded.
        required: Role,
        /// The role the session holds.
        actual: Role,
    },
    /// The session's role is exactly the required role.
    Allow,
}

impl AccessDecision {
    /// Returns `true` if the protected content may be rendered.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Decide whether a session with `role` may see a route guarded by `required`.
///
/// Role comparison is exact equality; there is no hierarchy.
#[must_use]
pub fn authorize(role: Option<Role>, required: Role, location: &str) -> AccessDecision {
    match role {
        None => AccessDecision::RedirectToLogin {
            from: location.to_owned(),
        },
        Some(actual) if actual != required => AccessDecision::Denied { required, actual },
        Some(_) => AccessDecision::Allow,
    }
}

/// Validate a redirect-back target.
///
/// Only local absolute paths are accepted: the target must start with a
/// single `/`, and must not contain a backslash or control characters.
/// Anything else (absent, `//evil.example`, `https://...`) yields `None`.
#[must_use]
pub fn safe_redirect_target(from: Option<&str>) -> Option<&str> {
    let from = from?;
    let local = from.starts_with('/') && !from.starts_with("//");
    let clean = !from.chars().any(|c| c == '\\' || c.is_control());
    (local && clean).then_some(from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_no_role_redirects_with_location() {
        assert_eq!(
            authorize(None, Role::Admin, "/dashboard"),
            AccessDecision::RedirectToLogin {
                from: "/dashboard".to_string()
            }
        );
    }

    #[test]
    fn test_no_role_redirects_for_every_required_role() {
        for required in Role::ALL {
            let decision = authorize(None, required, "/member/enrollments?page=2");
            assert_eq!(
                decision,
                AccessDecision::RedirectToLogin {
                    from: "/member/enrollments?page=2".to_string()
                }
            );
        }
    }

    #[test]
    fn test_wrong_role_is_denied() {
        assert_eq!(
            authorize(Some(Role::Member), Role::Admin, "/admin"),
            AccessDecision::Denied {
                required: Role::Admin,
                actual: Role::Member,
            }
        );
    }

    #[test]
    fn test_no_hierarchy_between_roles() {
        for actual in Role::ALL {
            for required in Role::ALL {
                let decision = authorize(Some(actual), required, "/x");
                assert_eq!(decision.is_allowed(), actual == required);
            }
        }
    }

    #[test]
    fn test_matching_role_is_allowed() {
        assert_eq!(
            authorize(Some(Role::Admin), Role::Admin, "/admin"),
            AccessDecision::Allow
        );
    }

    #[test]
    fn test_decision_is_idempotent() {
        let first = authorize(Some(Role::Staff), Role::Manager, "/manager");
        let second = authorize(Some(Role::Staff), Role::Manager, "/manager");
        assert_eq!(first, second);
    }

    #[test]
    fn test_safe_redirect_target_accepts_local_paths() {
        assert_eq!(safe_redirect_target(Some("/dashboard")), Some("/dashboard"));
        assert_eq!(
            safe_redirect_target(Some("/courses?page=2")),
            Some("/courses?page=2")
        );
    }

    #[test]
    fn test_safe_redirect_target_rejects_foreign_targets() {
        assert_eq!(safe_redirect_target(None), None);
        assert_eq!(safe_redirect_target(Some("")), None);
        assert_eq!(safe_redirect_target(Some("//evil.example")), None);
        assert_eq!(safe_redirect_target(Some("https://evil.example")), None);
        assert_eq!(safe_redirect_target(Some("/\\evil.example")), None);
        assert_eq!(safe_redirect_target(Some("dashboard")), None);
    }

    #[test]
    fn test_identity_serializes_flat() {
        let identity = SessionIdentity::new(Role::Member, UserId::parse("m-1").unwrap());
        let json = serde_json::to_string(&identity).unwrap();
        assert_eq!(json, r#"{"role":"MEMBER","user_id":"m-1"}"#);
    }
}
