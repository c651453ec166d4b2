//! View types shared by several templates.

pub mod nav;

pub use nav::UserView;
