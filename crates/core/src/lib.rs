//! `shds-core`: shared foundation types.
//!
//! This crate contains identifiers and the domain error model used by the
//! access policy and the directory client (no IO, no HTTP).

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{BranchId, InviteToken, StudentId};
