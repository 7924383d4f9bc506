use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned credential identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialId(pub u64);

impl fmt::Display for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CredentialId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(CredentialId)
            .map_err(|_| anyhow::anyhow!("Invalid credential id '{}'", s))
    }
}

/// Source type a credential authenticates against. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialKind {
    Network,
    Vcenter,
    Satellite,
    /// Any source type this client does not know; listed and editable, never created
    #[serde(other)]
    Other,
}

impl CredentialKind {
    /// Kinds a new credential can be created with
    pub fn all() -> &'static [CredentialKind] {
        &[Self::Network, Self::Vcenter, Self::Satellite]
    }

    /// Wire value, as sent in `cred_type`
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Vcenter => "vcenter",
            Self::Satellite => "satellite",
            Self::Other => "other",
        }
    }

    /// Human readable source type
    pub fn label(self) -> &'static str {
        match self {
            Self::Network => "Network",
            Self::Vcenter => "VCenter",
            Self::Satellite => "Satellite",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for CredentialKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow::anyhow!("Unknown credential type '{}'", s))
    }
}

/// Privilege escalation method for network credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BecomeMethod {
    #[default]
    Sudo,
    Su,
    Pbrun,
    Pfexec,
    Doas,
    Dzdo,
    Ksu,
    Runas,
}

impl BecomeMethod {
    pub fn all() -> &'static [BecomeMethod] {
        &[
            Self::Sudo,
            Self::Su,
            Self::Pbrun,
            Self::Pfexec,
            Self::Doas,
            Self::Dzdo,
            Self::Ksu,
            Self::Runas,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sudo => "sudo",
            Self::Su => "su",
            Self::Pbrun => "pbrun",
            Self::Pfexec => "pfexec",
            Self::Doas => "doas",
            Self::Dzdo => "dzdo",
            Self::Ksu => "ksu",
            Self::Runas => "runas",
        }
    }
}

impl fmt::Display for BecomeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored credential as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub id: CredentialId,
    pub name: String,
    #[serde(rename = "cred_type")]
    pub kind: CredentialKind,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_keyfile: Option<String>,
    #[serde(default, rename = "sshpassphrase", skip_serializing_if = "Option::is_none")]
    pub passphrase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub become_method: Option<BecomeMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub become_user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub become_password: Option<String>,
}

impl Credential {
    /// True when the stored record authenticates with a key file
    pub fn uses_ssh_key(&self) -> bool {
        self.ssh_keyfile.as_deref().is_some_and(|path| !path.is_empty())
    }
}

/// Body sent on create/update. Only the keys relevant to the chosen
/// authorization mode and credential kind are present.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPayload {
    pub name: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<CredentialId>,
    #[serde(rename = "cred_type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<CredentialKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_keyfile: Option<String>,
    #[serde(rename = "sshpassphrase", skip_serializing_if = "Option::is_none")]
    pub passphrase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub become_method: Option<BecomeMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub become_user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub become_password: Option<String>,
}

fn redact(value: &Option<String>) -> Option<&'static str> {
    value.as_ref().map(|_| "********")
}

impl fmt::Debug for CredentialPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPayload")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("password", &redact(&self.password))
            .field("ssh_keyfile", &self.ssh_keyfile)
            .field("passphrase", &redact(&self.passphrase))
            .field("become_method", &self.become_method)
            .field("become_user", &self.become_user)
            .field("become_password", &redact(&self.become_password))
            .finish()
    }
}

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }
}

/// Last-known filter/sort/pagination state of the credentials listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewOptions {
    pub current_page: u32,
    pub page_size: u32,
    pub sort_field: String,
    pub sort_ascending: bool,
    #[serde(default)]
    pub filters: Vec<(String, String)>,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            current_page: 1,
            page_size: 10,
            sort_field: "name".to_string(),
            sort_ascending: true,
            filters: Vec::new(),
        }
    }
}

impl ViewOptions {
    /// Query string pairs for the list endpoint
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let ordering = if self.sort_ascending {
            self.sort_field.clone()
        } else {
            format!("-{}", self.sort_field)
        };

        let mut pairs = vec![
            ("page".to_string(), self.current_page.to_string()),
            ("page_size".to_string(), self.page_size.to_string()),
            ("ordering".to_string(), ordering),
        ];
        pairs.extend(self.filters.iter().cloned());
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_credential_deserializes_backend_shape() {
        let credential: Credential = serde_json::from_value(json!({
            "id": 7,
            "name": "lab",
            "cred_type": "network",
            "username": "root",
            "ssh_keyfile": "/root/.ssh/id_rsa",
            "become_method": "doas"
        }))
        .unwrap();

        assert_eq!(credential.id, CredentialId(7));
        assert_eq!(credential.kind, CredentialKind::Network);
        assert_eq!(credential.become_method, Some(BecomeMethod::Doas));
        assert!(credential.uses_ssh_key());
        assert!(credential.password.is_none());
    }

    #[test]
    fn test_empty_keyfile_is_not_ssh_key() {
        let credential: Credential = serde_json::from_value(json!({
            "id": 1,
            "name": "vc",
            "cred_type": "vcenter",
            "username": "admin",
            "ssh_keyfile": ""
        }))
        .unwrap();

        assert!(!credential.uses_ssh_key());
    }

    #[test]
    fn test_page_with_unknown_kind_still_decodes() {
        let page: Page<Credential> = serde_json::from_value(json!({
            "count": 2,
            "next": null,
            "previous": null,
            "results": [
                {"id": 1, "name": "lab", "cred_type": "network", "username": "root"},
                {"id": 2, "name": "ocp", "cred_type": "openshift", "username": "admin"}
            ]
        }))
        .unwrap();

        assert_eq!(page.results[0].kind, CredentialKind::Network);
        assert_eq!(page.results[1].kind, CredentialKind::Other);
        assert_ne!(page.results[1].kind, CredentialKind::Network);
        assert!(!CredentialKind::all().contains(&CredentialKind::Other));
    }

    #[test]
    fn test_kind_parses_case_insensitively() {
        assert_eq!("Network".parse::<CredentialKind>().unwrap(), CredentialKind::Network);
        assert!("openshift".parse::<CredentialKind>().is_err());
    }

    #[test]
    fn test_payload_debug_redacts_secrets() {
        let payload = CredentialPayload {
            name: "n".to_string(),
            username: "u".to_string(),
            id: None,
            kind: Some(CredentialKind::Network),
            password: Some("hunter2".to_string()),
            ssh_keyfile: None,
            passphrase: None,
            become_method: Some(BecomeMethod::Sudo),
            become_user: None,
            become_password: Some("root-secret".to_string()),
        };

        let rendered = format!("{:?}", payload);
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("root-secret"));
        assert!(rendered.contains("********"));
    }

    #[test]
    fn test_view_options_descending_ordering() {
        let options = ViewOptions {
            sort_ascending: false,
            filters: vec![("search_by_name".to_string(), "lab".to_string())],
            ..ViewOptions::default()
        };

        let pairs = options.query_pairs();
        assert!(pairs.contains(&("ordering".to_string(), "-name".to_string())));
        assert!(pairs.contains(&("search_by_name".to_string(), "lab".to_string())));
    }
}
