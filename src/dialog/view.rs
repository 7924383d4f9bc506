//! Conditional view composition.
//!
//! `compose` turns a session into the rows a renderer should draw. Rows that
//! are not visible are absent from the result, not disabled.

use super::session::{AuthorizationMode, DialogSession, TextField};
use super::validation::FieldError;
use crate::api::BecomeMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    SourceType,
    Name,
    AuthorizationType,
    Username,
    Password,
    SshKeyFile,
    Passphrase,
    BecomeMethod,
    BecomeUser,
    BecomePassword,
}

impl FieldId {
    pub fn text_field(self) -> Option<TextField> {
        match self {
            Self::Name => Some(TextField::Name),
            Self::Username => Some(TextField::Username),
            Self::Password => Some(TextField::Password),
            Self::SshKeyFile => Some(TextField::SshKeyFile),
            Self::Passphrase => Some(TextField::Passphrase),
            Self::BecomeUser => Some(TextField::BecomeUser),
            Self::BecomePassword => Some(TextField::BecomePassword),
            Self::SourceType | Self::AuthorizationType | Self::BecomeMethod => None,
        }
    }
}

impl From<TextField> for FieldId {
    fn from(field: TextField) -> Self {
        match field {
            TextField::Name => Self::Name,
            TextField::Username => Self::Username,
            TextField::Password => Self::Password,
            TextField::SshKeyFile => Self::SshKeyFile,
            TextField::Passphrase => Self::Passphrase,
            TextField::BecomeUser => Self::BecomeUser,
            TextField::BecomePassword => Self::BecomePassword,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    ReadOnly(String),
    Text {
        value: String,
        placeholder: &'static str,
        secret: bool,
    },
    Select {
        options: Vec<&'static str>,
        selected: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub id: FieldId,
    pub label: &'static str,
    pub input: InputKind,
    pub error: Option<FieldError>,
}

/// Element that receives focus when the dialog opens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Autofocus {
    Field(FieldId),
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogView {
    pub title: String,
    pub error_banner: Option<String>,
    pub fields: Vec<FieldView>,
    pub confirm_enabled: bool,
    pub saving: bool,
    pub autofocus: Autofocus,
}

impl DialogView {
    pub fn field(&self, id: FieldId) -> Option<&FieldView> {
        self.fields.iter().find(|field| field.id == id)
    }

    pub fn is_visible(&self, id: FieldId) -> bool {
        self.field(id).is_some()
    }
}

/// The mode selector is shown only when key entry is allowed
pub fn shows_authorization_selector(session: &DialogSession) -> bool {
    session.ssh_key_entry_allowed
}

pub fn shows_password_fields(session: &DialogSession) -> bool {
    session.authorization_mode == AuthorizationMode::UsernamePassword
}

pub fn shows_ssh_key_fields(session: &DialogSession) -> bool {
    session.authorization_mode == AuthorizationMode::SshKey && session.ssh_key_entry_allowed
}

pub fn shows_become_fields(session: &DialogSession) -> bool {
    session.is_network()
}

fn text_row(session: &DialogSession, field: TextField, label: &'static str, placeholder: &'static str) -> FieldView {
    FieldView {
        id: field.into(),
        label,
        input: InputKind::Text {
            value: session.form.value(field).to_string(),
            placeholder,
            secret: field.is_secret(),
        },
        error: session.errors.get(field),
    }
}

pub fn compose(session: &DialogSession) -> DialogView {
    let mut fields = vec![
        FieldView {
            id: FieldId::SourceType,
            label: "Source Type",
            input: InputKind::ReadOnly(session.kind.label().to_string()),
            error: None,
        },
        text_row(session, TextField::Name, "Credential Name", "Enter a name for the credential"),
    ];

    if shows_authorization_selector(session) {
        let modes = AuthorizationMode::all();
        fields.push(FieldView {
            id: FieldId::AuthorizationType,
            label: "Authentication Type",
            input: InputKind::Select {
                options: modes.iter().map(|mode| mode.label()).collect(),
                selected: modes
                    .iter()
                    .position(|mode| *mode == session.authorization_mode)
                    .unwrap_or(0),
            },
            error: None,
        });
    }

    fields.push(text_row(session, TextField::Username, "Username", "Enter Username"));

    if shows_password_fields(session) {
        fields.push(text_row(session, TextField::Password, "Password", "Enter Password"));
    } else if shows_ssh_key_fields(session) {
        fields.push(text_row(
            session,
            TextField::SshKeyFile,
            "SSH Key File",
            "Enter the full path to the SSH key file",
        ));
        fields.push(text_row(session, TextField::Passphrase, "Passphrase", "optional"));
    }

    if shows_become_fields(session) {
        let methods = BecomeMethod::all();
        fields.push(FieldView {
            id: FieldId::BecomeMethod,
            label: "Become Method",
            input: InputKind::Select {
                options: methods.iter().map(|method| method.as_str()).collect(),
                selected: methods
                    .iter()
                    .position(|method| *method == session.form.become_method)
                    .unwrap_or(0),
            },
            error: None,
        });
        fields.push(text_row(session, TextField::BecomeUser, "Become User", "optional"));
        fields.push(text_row(session, TextField::BecomePassword, "Become Password", "optional"));
    }

    let title = if session.mode.is_edit() {
        format!("Edit Credential - {}", session.form.name)
    } else {
        "Add Credential".to_string()
    };

    DialogView {
        title,
        error_banner: session.error_message().map(|message| format!("Error {}", message)),
        fields,
        confirm_enabled: session.can_confirm(),
        saving: session.is_saving(),
        autofocus: if session.mode.is_edit() {
            Autofocus::Cancel
        } else {
            Autofocus::Field(FieldId::Name)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Credential, CredentialId, CredentialKind};
    use crate::dialog::session::{OpenSignal, SessionId};
    use crate::tui::Resource;

    fn ids(view: &DialogView) -> Vec<FieldId> {
        view.fields.iter().map(|field| field.id).collect()
    }

    fn create(kind: CredentialKind) -> DialogSession {
        DialogSession::from_signal(&OpenSignal::Create { kind }, SessionId::new())
    }

    #[test]
    fn test_network_create_layout() {
        let view = compose(&create(CredentialKind::Network));
        assert_eq!(view.title, "Add Credential");
        assert_eq!(view.autofocus, Autofocus::Field(FieldId::Name));
        assert_eq!(
            ids(&view),
            vec![
                FieldId::SourceType,
                FieldId::Name,
                FieldId::AuthorizationType,
                FieldId::Username,
                FieldId::Password,
                FieldId::BecomeMethod,
                FieldId::BecomeUser,
                FieldId::BecomePassword,
            ]
        );
        assert!(!view.confirm_enabled);
    }

    #[test]
    fn test_vcenter_hides_selector_and_become_fields() {
        let view = compose(&create(CredentialKind::Vcenter));
        assert_eq!(
            ids(&view),
            vec![FieldId::SourceType, FieldId::Name, FieldId::Username, FieldId::Password]
        );
        assert_eq!(
            view.field(FieldId::SourceType).map(|field| field.input.clone()),
            Some(InputKind::ReadOnly("VCenter".to_string()))
        );
    }

    #[test]
    fn test_ssh_key_mode_swaps_password_for_key_fields() {
        let mut session = create(CredentialKind::Network);
        session.set_authorization_mode(AuthorizationMode::SshKey);
        let view = compose(&session);

        assert!(!view.is_visible(FieldId::Password));
        assert!(view.is_visible(FieldId::SshKeyFile));
        assert!(view.is_visible(FieldId::Passphrase));
        assert_eq!(
            view.field(FieldId::AuthorizationType).map(|field| field.input.clone()),
            Some(InputKind::Select { options: vec!["Username and Password", "SSH Key"], selected: 1 })
        );
    }

    #[test]
    fn test_ssh_key_mode_without_permission_renders_nothing() {
        let mut session = create(CredentialKind::Satellite);
        // Force the inconsistent combination; the view must not show key rows
        session.authorization_mode = AuthorizationMode::SshKey;
        let view = compose(&session);

        assert!(!view.is_visible(FieldId::SshKeyFile));
        assert!(!view.is_visible(FieldId::Passphrase));
        assert!(!view.is_visible(FieldId::Password));
    }

    #[test]
    fn test_edit_title_and_autofocus() {
        let credential = Credential {
            id: CredentialId(3),
            name: "sat".to_string(),
            kind: CredentialKind::Satellite,
            username: "admin".to_string(),
            password: Some("********".to_string()),
            ssh_keyfile: None,
            passphrase: None,
            become_method: None,
            become_user: None,
            become_password: None,
        };
        let mut session = DialogSession::from_signal(&OpenSignal::Edit { credential }, SessionId::new());
        session.set_field(TextField::Name, "sat-renamed".to_string());
        let view = compose(&session);

        assert_eq!(view.title, "Edit Credential - sat-renamed");
        assert_eq!(view.autofocus, Autofocus::Cancel);
        assert!(view.confirm_enabled);
    }

    #[test]
    fn test_errors_and_banner_surface() {
        let mut session = create(CredentialKind::Network);
        session.set_field(TextField::Name, String::new());
        session.request = Resource::Failure("network error".to_string());
        let view = compose(&session);

        assert_eq!(view.error_banner.as_deref(), Some("Error network error"));
        assert_eq!(
            view.field(FieldId::Name).and_then(|field| field.error),
            Some(FieldError::NameRequired)
        );
    }

    #[test]
    fn test_secret_rows_are_marked() {
        let view = compose(&create(CredentialKind::Network));
        let secret = |id| match view.field(id).map(|field| &field.input) {
            Some(InputKind::Text { secret, .. }) => *secret,
            _ => false,
        };

        assert!(secret(FieldId::Password));
        assert!(secret(FieldId::BecomePassword));
        assert!(!secret(FieldId::Username));
    }
}
