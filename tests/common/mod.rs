//! In-memory `CredentialService` used by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use credential_dialog::api::constants::WIZARD_CREDENTIALS_PAGE_SIZE;
use credential_dialog::api::{
    Credential, CredentialId, CredentialKind, CredentialPayload, CredentialService, Page, ViewOptions,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create(CredentialPayload),
    Update(CredentialId, CredentialPayload),
    List(ViewOptions),
    Get(CredentialId),
    ListWizard,
}

#[derive(Default)]
pub struct MockService {
    calls: Mutex<Vec<Call>>,
    save_failures: Mutex<VecDeque<String>>,
    stored: Mutex<Vec<Credential>>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(credentials: Vec<Credential>) -> Self {
        let service = Self::new();
        *service.stored.lock().unwrap() = credentials;
        service
    }

    /// Make the next create/update fail with `message`
    pub fn fail_next_save(&self, message: &str) {
        self.save_failures.lock().unwrap().push_back(message.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn saves(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, Call::Create(_) | Call::Update(..)))
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn save(&self, id: Option<CredentialId>, payload: CredentialPayload) -> Result<Credential> {
        if let Some(message) = self.save_failures.lock().unwrap().pop_front() {
            return Err(anyhow!(message));
        }

        let mut stored = self.stored.lock().unwrap();
        let kind = match id {
            Some(id) => stored
                .iter()
                .find(|credential| credential.id == id)
                .map(|credential| credential.kind)
                .unwrap_or(CredentialKind::Network),
            None => payload.kind.unwrap_or(CredentialKind::Network),
        };
        let id = id.unwrap_or(CredentialId(stored.len() as u64 + 1));

        let credential = Credential {
            id,
            name: payload.name,
            kind,
            username: payload.username,
            password: payload.password.map(|_| "********".to_string()),
            ssh_keyfile: payload.ssh_keyfile,
            passphrase: payload.passphrase.map(|_| "********".to_string()),
            become_method: payload.become_method,
            become_user: payload.become_user,
            become_password: payload.become_password.map(|_| "********".to_string()),
        };
        stored.retain(|existing| existing.id != id);
        stored.push(credential.clone());
        Ok(credential)
    }
}

#[async_trait]
impl CredentialService for MockService {
    async fn create_credential(&self, payload: CredentialPayload) -> Result<Credential> {
        self.record(Call::Create(payload.clone()));
        self.save(None, payload)
    }

    async fn update_credential(&self, id: CredentialId, payload: CredentialPayload) -> Result<Credential> {
        self.record(Call::Update(id, payload.clone()));
        self.save(Some(id), payload)
    }

    async fn get_credential(&self, id: CredentialId) -> Result<Credential> {
        self.record(Call::Get(id));
        self.stored
            .lock()
            .unwrap()
            .iter()
            .find(|credential| credential.id == id)
            .cloned()
            .ok_or_else(|| anyhow!("Not found."))
    }

    async fn list_credentials(&self, options: &ViewOptions) -> Result<Page<Credential>> {
        self.record(Call::List(options.clone()));
        let results = self.stored.lock().unwrap().clone();
        Ok(Page {
            count: results.len() as u64,
            next: None,
            previous: None,
            results,
        })
    }

    async fn list_wizard_credentials(&self) -> Result<Vec<Credential>> {
        self.record(Call::ListWizard);
        // Same single-page cap as the HTTP client
        let stored = self.stored.lock().unwrap();
        Ok(stored.iter().take(WIZARD_CREDENTIALS_PAGE_SIZE as usize).cloned().collect())
    }
}

pub fn network_credential(id: u64, name: &str) -> Credential {
    Credential {
        id: CredentialId(id),
        name: name.to_string(),
        kind: CredentialKind::Network,
        username: "root".to_string(),
        password: None,
        ssh_keyfile: Some("/root/.ssh/id_rsa".to_string()),
        passphrase: None,
        become_method: None,
        become_user: None,
        become_password: None,
    }
}
