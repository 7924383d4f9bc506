use serde::{Deserialize, Serialize};

use super::validation::{self, FieldError};
use crate::api::{BecomeMethod, Credential, CredentialId, CredentialKind};
use crate::tui::Resource;

/// Identifies one open/close cycle of the dialog. Save results carry the id
/// of the session that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub uuid::Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

/// What the dialog was opened for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenSignal {
    Create { kind: CredentialKind },
    Edit { credential: Credential },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogMode {
    Create,
    Edit(Credential),
}

impl DialogMode {
    pub fn is_edit(&self) -> bool {
        matches!(self, DialogMode::Edit(_))
    }

    pub fn credential_id(&self) -> Option<CredentialId> {
        match self {
            DialogMode::Create => None,
            DialogMode::Edit(credential) => Some(credential.id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AuthorizationMode {
    #[default]
    UsernamePassword,
    SshKey,
}

impl AuthorizationMode {
    pub fn all() -> &'static [AuthorizationMode] {
        &[Self::UsernamePassword, Self::SshKey]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::UsernamePassword => "Username and Password",
            Self::SshKey => "SSH Key",
        }
    }
}

/// Free-text inputs of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Name,
    Username,
    Password,
    SshKeyFile,
    Passphrase,
    BecomeUser,
    BecomePassword,
}

impl TextField {
    /// Rendered masked
    pub fn is_secret(self) -> bool {
        matches!(self, Self::Password | Self::Passphrase | Self::BecomePassword)
    }
}

/// Raw field values of one session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CredentialForm {
    pub name: String,
    pub username: String,
    pub password: String,
    pub ssh_keyfile: String,
    pub passphrase: String,
    pub become_method: BecomeMethod,
    pub become_user: String,
    pub become_password: String,
}

impl CredentialForm {
    pub fn value(&self, field: TextField) -> &str {
        match field {
            TextField::Name => &self.name,
            TextField::Username => &self.username,
            TextField::Password => &self.password,
            TextField::SshKeyFile => &self.ssh_keyfile,
            TextField::Passphrase => &self.passphrase,
            TextField::BecomeUser => &self.become_user,
            TextField::BecomePassword => &self.become_password,
        }
    }

    fn value_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::Name => &mut self.name,
            TextField::Username => &mut self.username,
            TextField::Password => &mut self.password,
            TextField::SshKeyFile => &mut self.ssh_keyfile,
            TextField::Passphrase => &mut self.passphrase,
            TextField::BecomeUser => &mut self.become_user,
            TextField::BecomePassword => &mut self.become_password,
        }
    }
}

/// One error slot per validated field. `None` means valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldErrors {
    pub name: Option<FieldError>,
    pub username: Option<FieldError>,
    pub password: Option<FieldError>,
    pub ssh_keyfile: Option<FieldError>,
}

impl FieldErrors {
    pub fn get(&self, field: TextField) -> Option<FieldError> {
        match field {
            TextField::Name => self.name,
            TextField::Username => self.username,
            TextField::Password => self.password,
            TextField::SshKeyFile => self.ssh_keyfile,
            TextField::Passphrase | TextField::BecomeUser | TextField::BecomePassword => None,
        }
    }

    fn slot_mut(&mut self, field: TextField) -> Option<&mut Option<FieldError>> {
        match field {
            TextField::Name => Some(&mut self.name),
            TextField::Username => Some(&mut self.username),
            TextField::Password => Some(&mut self.password),
            TextField::SshKeyFile => Some(&mut self.ssh_keyfile),
            TextField::Passphrase | TextField::BecomeUser | TextField::BecomePassword => None,
        }
    }
}

/// Idle = NotAsked, Saving = Loading, Succeeded = Success, Failed = Failure
pub type RequestState = Resource<Credential, String>;

/// Transient state of one credential editing session
#[derive(Debug, Clone, PartialEq)]
pub struct DialogSession {
    pub id: SessionId,
    pub mode: DialogMode,
    pub kind: CredentialKind,
    pub form: CredentialForm,
    pub errors: FieldErrors,
    pub authorization_mode: AuthorizationMode,
    pub ssh_key_entry_allowed: bool,
    pub request: RequestState,
}

impl DialogSession {
    /// Build a fresh session for an open signal. Nothing is carried over
    /// from earlier sessions; the same signal and id give the same session.
    pub fn from_signal(signal: &OpenSignal, id: SessionId) -> Self {
        match signal {
            OpenSignal::Edit { credential } => {
                let uses_ssh_key = credential.uses_ssh_key();
                let form = CredentialForm {
                    name: credential.name.clone(),
                    username: credential.username.clone(),
                    password: credential.password.clone().unwrap_or_default(),
                    ssh_keyfile: credential.ssh_keyfile.clone().unwrap_or_default(),
                    passphrase: credential.passphrase.clone().unwrap_or_default(),
                    become_method: credential.become_method.unwrap_or_default(),
                    become_user: credential.become_user.clone().unwrap_or_default(),
                    become_password: credential.become_password.clone().unwrap_or_default(),
                };

                Self {
                    id,
                    mode: DialogMode::Edit(credential.clone()),
                    kind: credential.kind,
                    form,
                    errors: FieldErrors::default(),
                    authorization_mode: if uses_ssh_key {
                        AuthorizationMode::SshKey
                    } else {
                        AuthorizationMode::UsernamePassword
                    },
                    ssh_key_entry_allowed: credential.kind == CredentialKind::Network || uses_ssh_key,
                    request: Resource::NotAsked,
                }
            }
            OpenSignal::Create { kind } => Self {
                id,
                mode: DialogMode::Create,
                kind: *kind,
                form: CredentialForm::default(),
                errors: FieldErrors::default(),
                authorization_mode: AuthorizationMode::UsernamePassword,
                ssh_key_entry_allowed: *kind == CredentialKind::Network,
                request: Resource::NotAsked,
            },
        }
    }

    pub fn is_network(&self) -> bool {
        self.kind == CredentialKind::Network
    }

    pub fn is_saving(&self) -> bool {
        self.request.is_loading()
    }

    /// Store a new value and re-run that field's validator
    pub fn set_field(&mut self, field: TextField, value: String) {
        if let Some(slot) = self.errors.slot_mut(field) {
            *slot = validation::validate_field(field, &value);
        }
        *self.form.value_mut(field) = value;
    }

    /// Switch authorization mode. Values and errors of the other mode are
    /// left untouched. Key entry stays locked out when not allowed.
    pub fn set_authorization_mode(&mut self, mode: AuthorizationMode) -> bool {
        if mode == AuthorizationMode::SshKey && !self.ssh_key_entry_allowed {
            return false;
        }
        self.authorization_mode = mode;
        true
    }

    pub fn can_save(&self) -> bool {
        validation::can_save(self)
    }

    /// Confirm is offered when the form is valid and no save is in flight
    pub fn can_confirm(&self) -> bool {
        self.can_save() && !self.is_saving()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.request.error().map(String::as_str)
    }
}
