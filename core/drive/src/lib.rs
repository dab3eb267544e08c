//! Google Drive access for drivemcp.
//!
//! This crate provides:
//! - OAuth2 installed-application authorization with a loopback redirect
//! - A credential manager that caches, refreshes and persists tokens
//! - A Drive v3 query client for listing, searching and inspecting files
//!
//! Nothing is cached beyond the persisted token; every query goes to the API.

pub mod auth;
pub mod client;
pub mod credentials;
pub mod query;

pub use auth::{default_scopes, AuthConfig, AuthorizationSession, InstalledAppFlow, OAuthFlow};
pub use client::{DriveClient, DriveFile, DriveFileDetails, Owner, Permission, SearchCriteria};
pub use credentials::{
    Credential, CredentialConfig, CredentialManager, CredentialSource, ResolvedCredential,
};
pub use query::{resolve_mime_type, Query, MIME_ALIASES};
