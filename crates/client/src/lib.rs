//! `shds-client`
//!
//! **Responsibility:** portal client for the SHDS school administration
//! directory.
//!
//! This crate provides:
//! - A single-writer identity session and the identity provider seam
//! - A typed HTTP client for the directory service
//! - Screen controllers that enforce the role-based routing policy
//!
//! The directory service stays the authority; nothing is cached locally.

pub mod config;
pub mod directory;
pub mod dto;
pub mod error;
pub mod identity;
pub mod navigator;
pub mod notify;
pub mod screens;
pub mod session;

pub use config::{ClientConfig, ConfigError};
pub use directory::{DirectoryService, HttpDirectory, TOKEN_HEADER};
pub use error::ClientError;
pub use identity::{
    IdentityError, IdentityProvider, IdentitySession, OAuthProvider, StaticTokenProvider,
};
pub use navigator::Navigator;
pub use notify::{Notice, NoticeLevel, Notifier, TracingNotifier};
pub use screens::{Mounted, PortalContext};
pub use session::{IdToken, Identity, Session, SessionReader, SessionStore, SessionWriter, SignedIn};
