//! Backend API module
//!
//! Wire models for credentials, the `CredentialService` command interface the
//! dialog is driven through, and its HTTP implementation.

pub mod client;
pub mod constants;
pub mod models;
pub mod service;

pub use client::CredentialsClient;
pub use models::{
    BecomeMethod, Credential, CredentialId, CredentialKind, CredentialPayload, Page, ViewOptions,
};
pub use service::CredentialService;
