//! `spmi-core`: shared building blocks for the SPMI workspace.
//!
//! Identifiers and the domain error model. No infrastructure concerns.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{MenuId, SessionId, UserId};
