//! Server-rendered HTML pages.
//!
//! Every page is a plain function from already-loaded data to a `String`;
//! handlers do all I/O before calling into this module.

pub mod auth;
pub mod bulk;
pub mod format;
pub mod layout;
pub mod reports;
pub mod users;
