//! Clearpath Core - Shared types library.
//!
//! This crate provides the types used across the Clearpath components:
//! - `portal` - Server-rendered web portal (catalog, member pages, role dashboards)
//! - `cli` - Command-line tools for session store management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no session
//! store, no HTTP clients. The portal turns the decisions made here into
//! HTTP responses.
//!
//! # Modules
//!
//! - [`types`] - Roles and opaque identifiers
//! - [`access`] - The route guard decision (`authorize`)
//! - [`pagination`] - Page slicing for listing views

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod access;
pub mod pagination;
pub mod types;

pub use access::{AccessDecision, LOGIN_PATH, SessionIdentity, authorize, safe_redirect_target};
pub use pagination::{DEFAULT_PER_PAGE, Page, PageRequest};
pub use types::*;
