//! Domain models for the portal.
//!
//! Backend entities live in [`crate::backend`]; this module only holds what
//! the portal itself keeps in the session.

pub mod session;

pub use session::keys as session_keys;
