use std::sync::Arc;

use super::payload::build_payload;
use super::session::{AuthorizationMode, DialogSession, OpenSignal, SessionId, TextField};
use super::view::{compose, DialogView};
use crate::api::{BecomeMethod, Credential, CredentialService, Page, ViewOptions};
use crate::tui::{Command, Resource};

// ============================================================================
// Context
// ============================================================================

/// Collaborators injected into the dialog: where commands go and which
/// listing to refresh after a save.
#[derive(Clone)]
pub struct DialogContext {
    pub service: Arc<dyn CredentialService>,
    pub view_options: ViewOptions,
}

impl DialogContext {
    pub fn new(service: Arc<dyn CredentialService>, view_options: ViewOptions) -> Self {
        Self { service, view_options }
    }
}

// ============================================================================
// State
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum DialogState {
    Closed,
    Open(DialogSession),
}

pub struct CredentialDialog {
    context: DialogContext,
    state: DialogState,
}

impl CredentialDialog {
    pub fn new(context: DialogContext) -> Self {
        Self {
            context,
            state: DialogState::Closed,
        }
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    pub fn session(&self) -> Option<&DialogSession> {
        match &self.state {
            DialogState::Open(session) => Some(session),
            DialogState::Closed => None,
        }
    }

    fn session_mut(&mut self) -> Option<&mut DialogSession> {
        match &mut self.state {
            DialogState::Open(session) => Some(session),
            DialogState::Closed => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, DialogState::Open(_))
    }

    fn close(&mut self) {
        self.state = DialogState::Closed;
    }
}

// ============================================================================
// Messages and events
// ============================================================================

#[derive(Clone, Debug)]
pub enum Msg {
    // Lifecycle
    Open(OpenSignal),
    Cancel,
    DismissError,

    // Form input
    FieldChanged(TextField, String),
    SetAuthorizationMode(AuthorizationMode),
    SetBecomeMethod(BecomeMethod),

    // Save workflow
    Confirm,
    SaveCompleted {
        session: SessionId,
        result: Result<Credential, String>,
    },

    // Best-effort refreshes after a save
    CredentialsRefreshed(Result<Page<Credential>, String>),
    WizardCredentialsRefreshed(Result<Vec<Credential>, String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
}

/// One-shot toast shown by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Events published to the dialog's host
#[derive(Debug, Clone, PartialEq)]
pub enum DialogEvent {
    Notification(Notification),
    CredentialsRefreshed(Page<Credential>),
    WizardCredentialsRefreshed(Vec<Credential>),
}

fn saved_message(name: &str, edit: bool) -> String {
    format!(
        "Credential {} successfully {}.",
        name,
        if edit { "updated" } else { "added" }
    )
}

// ============================================================================
// Update
// ============================================================================

pub fn update(dialog: &mut CredentialDialog, msg: Msg) -> Command<Msg> {
    match msg {
        Msg::Open(signal) => {
            let session = DialogSession::from_signal(&signal, SessionId::new());
            log::info!(
                "Opening credential dialog ({}, {})",
                if session.mode.is_edit() { "edit" } else { "create" },
                session.kind.as_str()
            );
            dialog.state = DialogState::Open(session);
            Command::None
        }

        Msg::Cancel => {
            if dialog.is_open() {
                log::info!("Credential dialog cancelled");
            }
            dialog.close();
            Command::None
        }

        Msg::DismissError => {
            if let Some(session) = dialog.session_mut() {
                if session.request.is_failure() {
                    session.request = Resource::NotAsked;
                }
            }
            Command::None
        }

        Msg::FieldChanged(field, value) => {
            if let Some(session) = dialog.session_mut() {
                session.set_field(field, value);
            }
            Command::None
        }

        Msg::SetAuthorizationMode(mode) => {
            if let Some(session) = dialog.session_mut() {
                if session.set_authorization_mode(mode) {
                    log::debug!("Authorization mode set to {:?}", mode);
                } else {
                    log::debug!("SSH key entry is not available for {} credentials", session.kind.as_str());
                }
            }
            Command::None
        }

        Msg::SetBecomeMethod(method) => {
            if let Some(session) = dialog.session_mut() {
                session.form.become_method = method;
            }
            Command::None
        }

        Msg::Confirm => {
            let service = dialog.context.service.clone();
            let Some(session) = dialog.session_mut() else {
                return Command::None;
            };

            if !session.can_confirm() {
                log::debug!("Confirm ignored: form invalid or save in flight");
                return Command::None;
            }

            let payload = build_payload(session);
            let session_id = session.id;
            session.request = Resource::Loading;

            let to_msg = move |result: anyhow::Result<Credential>| Msg::SaveCompleted {
                session: session_id,
                result: result.map_err(|e| e.to_string()),
            };

            match session.mode.credential_id() {
                Some(id) => Command::perform(
                    async move { service.update_credential(id, payload).await },
                    to_msg,
                ),
                None => Command::perform(
                    async move { service.create_credential(payload).await },
                    to_msg,
                ),
            }
        }

        Msg::SaveCompleted { session: session_id, result } => {
            let stale = match dialog.session() {
                Some(session) => session.id != session_id || !session.is_saving(),
                None => true,
            };
            if stale {
                match &result {
                    Ok(credential) => log::info!(
                        "Credential {} was saved after its dialog session {:?} ended",
                        credential.name,
                        session_id
                    ),
                    Err(_) => log::debug!("Discarding stale save failure for session {:?}", session_id),
                }
                return Command::None;
            }

            let Some(session) = dialog.session_mut() else {
                return Command::None;
            };
            session.request = Resource::from_result(result);

            if let Some(credential) = session.request.data() {
                let edit = session.mode.is_edit();
                log::info!("Credential {} saved", credential.name);
                let message = saved_message(&credential.name, edit);
                dialog.close();
                return after_save(&dialog.context, message, edit);
            }

            if let Some(message) = session.request.error() {
                log::error!("Failed to save credential: {}", message);
            }
            Command::None
        }

        Msg::CredentialsRefreshed(Ok(page)) => {
            log::debug!("Credentials listing refreshed ({} total)", page.count);
            Command::publish(DialogEvent::CredentialsRefreshed(page))
        }

        Msg::CredentialsRefreshed(Err(err)) => {
            log::error!("Failed to refresh credentials: {}", err);
            Command::None
        }

        Msg::WizardCredentialsRefreshed(Ok(credentials)) => {
            log::debug!("Wizard credentials refreshed ({})", credentials.len());
            Command::publish(DialogEvent::WizardCredentialsRefreshed(credentials))
        }

        Msg::WizardCredentialsRefreshed(Err(err)) => {
            log::error!("Failed to refresh wizard credentials: {}", err);
            Command::None
        }
    }
}

/// Toast, listing refresh and (for creates) the wizard list refresh
fn after_save(context: &DialogContext, message: String, edit: bool) -> Command<Msg> {
    let mut commands = vec![Command::publish(DialogEvent::Notification(Notification {
        level: NotificationLevel::Success,
        message,
    }))];

    let service = context.service.clone();
    let options = context.view_options.clone();
    commands.push(Command::perform(
        async move { service.list_credentials(&options).await },
        |result: anyhow::Result<Page<Credential>>| {
            Msg::CredentialsRefreshed(result.map_err(|e| e.to_string()))
        },
    ));

    if !edit {
        let service = context.service.clone();
        commands.push(Command::perform(
            async move { service.list_wizard_credentials().await },
            |result: anyhow::Result<Vec<Credential>>| {
                Msg::WizardCredentialsRefreshed(result.map_err(|e| e.to_string()))
            },
        ));
    }

    Command::batch(commands)
}

// ============================================================================
// View
// ============================================================================

pub fn view(dialog: &CredentialDialog) -> Option<DialogView> {
    dialog.session().map(compose)
}
