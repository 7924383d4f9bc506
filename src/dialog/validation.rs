//! Per-field validators and the whole-form save predicate.
//!
//! Validators are pure: they look at one raw value and report at most one
//! error. `can_save` is recomputed from the session every time it is asked.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use super::session::{AuthorizationMode, DialogSession, TextField};

pub const MAX_NAME_LENGTH: usize = 64;

static SSH_KEY_FILE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/.*$").expect("valid SSH key file pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldError {
    NameRequired,
    NameTooLong,
    UsernameRequired,
    PasswordRequired,
    SshKeyFileNotAbsolute,
}

impl FieldError {
    pub fn message(self) -> &'static str {
        match self {
            Self::NameRequired => "You must enter a credential name",
            Self::NameTooLong => "The credential name can only contain up to 64 characters",
            Self::UsernameRequired => "You must enter a user name",
            Self::PasswordRequired => "You must enter a password",
            Self::SshKeyFileNotAbsolute => "Please enter the full path to the SSH Key File",
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

pub fn validate_name(name: &str) -> Option<FieldError> {
    if name.is_empty() {
        return Some(FieldError::NameRequired);
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Some(FieldError::NameTooLong);
    }

    None
}

pub fn validate_username(username: &str) -> Option<FieldError> {
    username.is_empty().then_some(FieldError::UsernameRequired)
}

pub fn validate_password(password: &str) -> Option<FieldError> {
    password.is_empty().then_some(FieldError::PasswordRequired)
}

pub fn validate_ssh_key_file(path: &str) -> Option<FieldError> {
    (!SSH_KEY_FILE_PATTERN.is_match(path)).then_some(FieldError::SshKeyFileNotAbsolute)
}

/// Run the validator belonging to `field`. Optional fields always pass.
pub fn validate_field(field: TextField, value: &str) -> Option<FieldError> {
    match field {
        TextField::Name => validate_name(value),
        TextField::Username => validate_username(value),
        TextField::Password => validate_password(value),
        TextField::SshKeyFile => validate_ssh_key_file(value),
        TextField::Passphrase | TextField::BecomeUser | TextField::BecomePassword => None,
    }
}

/// Whole-form validity. Privilege escalation fields and the inactive
/// authorization mode's field do not take part.
pub fn can_save(session: &DialogSession) -> bool {
    let form = &session.form;
    let errors = &session.errors;

    let name_ok = !form.name.is_empty() && errors.name.is_none();
    let username_ok = !form.username.is_empty() && errors.username.is_none();
    let secret_ok = match session.authorization_mode {
        AuthorizationMode::UsernamePassword => {
            !form.password.is_empty() && errors.password.is_none()
        }
        AuthorizationMode::SshKey => !form.ssh_keyfile.is_empty() && errors.ssh_keyfile.is_none(),
    };

    name_ok && username_ok && secret_ok
}
