#![warn(missing_docs)]
//! Authoritative game session.
//!
//! The transport layer is a collaborator, not a concern of this crate: the
//! session consumes client message values (or raw JSON payloads) and returns
//! the server messages to deliver. Loss of a client is equivalent to that
//! entity leaving the registry.

mod session;
mod spawn;

pub use session::*;
pub use spawn::*;
