use anyhow::Result;
use async_trait::async_trait;

use super::models::{Credential, CredentialId, CredentialPayload, Page, ViewOptions};

/// Commands the credential dialog dispatches to the backend.
///
/// The dialog never talks to the transport directly; it is handed an
/// implementation of this trait (the HTTP client in production, an
/// in-memory fake in tests).
#[async_trait]
pub trait CredentialService: Send + Sync {
    async fn create_credential(&self, payload: CredentialPayload) -> Result<Credential>;

    async fn update_credential(&self, id: CredentialId, payload: CredentialPayload) -> Result<Credential>;

    /// Fetch one stored credential
    async fn get_credential(&self, id: CredentialId) -> Result<Credential>;

    /// List credentials using the active view's filter/sort/pagination state
    async fn list_credentials(&self, options: &ViewOptions) -> Result<Page<Credential>>;

    /// Credentials offered by the add-source wizard
    async fn list_wizard_credentials(&self) -> Result<Vec<Credential>>;
}
