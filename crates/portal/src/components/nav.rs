//! Navigation bar view.

use clearpath_core::{Role, SessionIdentity};

/// Logged-in user as shown in the navigation bar.
#[derive(Debug, Clone)]
pub struct UserView {
    pub user_id: String,
    pub role_label: &'static str,
    pub home_path: &'static str,
    pub is_member: bool,
}

impl From<&SessionIdentity> for UserView {
    fn from(identity: &SessionIdentity) -> Self {
        Self {
            user_id: identity.user_id.to_string(),
            role_label: identity.role.label(),
            home_path: identity.role.home_path(),
            is_member: identity.role == Role::Member,
        }
    }
}

impl UserView {
    /// Convert an optional identity, as returned by `OptionalUser`.
    #[must_use]
    pub fn from_optional(identity: Option<&SessionIdentity>) -> Option<Self> {
        identity.map(Self::from)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clearpath_core::UserId;

    #[test]
    fn test_member_view() {
        let identity = SessionIdentity::new(Role::Member, UserId::parse("m-3").unwrap());
        let view = UserView::from(&identity);
        assert_eq!(view.user_id, "m-3");
        assert_eq!(view.role_label, "Member");
        assert_eq!(view.home_path, "/member/enrollments");
        assert!(view.is_member);
    }

    #[test]
    fn test_staff_view() {
        let identity = SessionIdentity::new(Role::Staff, UserId::parse("s-1").unwrap());
        let view = UserView::from(&identity);
        assert_eq!(view.home_path, "/staff");
        assert!(!view.is_member);
    }
}
