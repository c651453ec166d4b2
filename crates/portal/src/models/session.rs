//! Session-related types for portal authentication.

/// Session keys for authentication data.
///
/// Both values are stored as plain strings: the role under its upper-case
/// name (`"MEMBER"`), the user id as issued by the backend.
pub mod keys {
    /// Key for the role of the logged-in user.
    pub const ROLE: &str = "role";

    /// Key for the backend-issued id of the logged-in user.
    pub const USER_ID: &str = "user_id";
}
