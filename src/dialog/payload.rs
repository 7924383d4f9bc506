use super::session::{AuthorizationMode, DialogMode, DialogSession};
use crate::api::CredentialPayload;

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Build the create/update body from the session.
///
/// - `id` only when editing, `cred_type` only when creating
/// - the active authorization mode decides between `password` and
///   `ssh_keyfile` + `sshpassphrase`
/// - `become_*` only for network credentials; user and password only when set
pub fn build_payload(session: &DialogSession) -> CredentialPayload {
    let form = &session.form;

    let (id, kind) = match &session.mode {
        DialogMode::Edit(credential) => (Some(credential.id), None),
        DialogMode::Create => (None, Some(session.kind)),
    };

    let (password, ssh_keyfile, passphrase) = match session.authorization_mode {
        AuthorizationMode::UsernamePassword => (Some(form.password.clone()), None, None),
        AuthorizationMode::SshKey => (
            None,
            Some(form.ssh_keyfile.clone()),
            Some(form.passphrase.clone()),
        ),
    };

    let (become_method, become_user, become_password) = if session.is_network() {
        (
            Some(form.become_method),
            non_empty(&form.become_user),
            non_empty(&form.become_password),
        )
    } else {
        (None, None, None)
    };

    CredentialPayload {
        name: form.name.clone(),
        username: form.username.clone(),
        id,
        kind,
        password,
        ssh_keyfile,
        passphrase,
        become_method,
        become_user,
        become_password,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{BecomeMethod, Credential, CredentialId, CredentialKind};
    use crate::dialog::session::{OpenSignal, SessionId, TextField};
    use serde_json::json;

    fn create(kind: CredentialKind) -> DialogSession {
        DialogSession::from_signal(&OpenSignal::Create { kind }, SessionId::new())
    }

    #[test]
    fn test_create_network_password_payload() {
        let mut session = create(CredentialKind::Network);
        session.set_field(TextField::Name, "host1".to_string());
        session.set_field(TextField::Username, "admin".to_string());
        session.set_field(TextField::Password, "p".to_string());

        let payload = serde_json::to_value(build_payload(&session)).unwrap();
        assert_eq!(
            payload,
            json!({
                "name": "host1",
                "username": "admin",
                "cred_type": "network",
                "password": "p",
                "become_method": "sudo"
            })
        );
    }

    #[test]
    fn test_network_become_fields_only_when_set() {
        let mut session = create(CredentialKind::Network);
        session.form.become_method = BecomeMethod::Pbrun;
        session.set_field(TextField::BecomeUser, "operator".to_string());

        let payload = build_payload(&session);
        assert_eq!(payload.become_method, Some(BecomeMethod::Pbrun));
        assert_eq!(payload.become_user.as_deref(), Some("operator"));
        assert_eq!(payload.become_password, None);
    }

    #[test]
    fn test_non_network_never_sends_become_fields() {
        let mut session = create(CredentialKind::Vcenter);
        session.set_field(TextField::BecomeUser, "stale".to_string());
        session.set_field(TextField::BecomePassword, "stale".to_string());

        let value = serde_json::to_value(build_payload(&session)).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("become_method"));
        assert!(!object.contains_key("become_user"));
        assert!(!object.contains_key("become_password"));
        assert_eq!(object["cred_type"], "vcenter");
    }

    #[test]
    fn test_edit_ssh_key_payload() {
        let credential = Credential {
            id: CredentialId(42),
            name: "lab".to_string(),
            kind: CredentialKind::Network,
            username: "root".to_string(),
            password: None,
            ssh_keyfile: Some("/home/k".to_string()),
            passphrase: None,
            become_method: Some(BecomeMethod::Sudo),
            become_user: None,
            become_password: None,
        };
        let mut session = DialogSession::from_signal(&OpenSignal::Edit { credential }, SessionId::new());
        session.set_field(TextField::Password, "left-over".to_string());
        session.set_field(TextField::SshKeyFile, "/tmp/newkey".to_string());

        let value = serde_json::to_value(build_payload(&session)).unwrap();
        assert_eq!(value["id"], 42);
        assert_eq!(value["ssh_keyfile"], "/tmp/newkey");
        assert_eq!(value["sshpassphrase"], "");
        assert!(value.get("password").is_none());
        assert!(value.get("cred_type").is_none());
    }
}
