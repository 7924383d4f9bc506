use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use super::constants::{CREDENTIALS_PATH, USER_AGENT, WIZARD_CREDENTIALS_PAGE_SIZE};
use super::models::{Credential, CredentialId, CredentialPayload, Page, ViewOptions};
use super::service::CredentialService;
use crate::config::ApiConfig;

/// REST client for the scanning backend's credential endpoints
#[derive(Clone)]
pub struct CredentialsClient {
    base_url: String,
    http_client: reqwest::Client,
    token: Option<String>,
}

impl CredentialsClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::with_custom_client(config, http_client))
    }

    /// Create a new client with custom HTTP client configuration
    pub fn with_custom_client(config: &ApiConfig, http_client: reqwest::Client) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
            token: config.token.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        let builder = self.http_client.request(method, url);
        match &self.token {
            Some(token) => builder.header("Authorization", format!("Token {}", token)),
            None => builder,
        }
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response, what: &str) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .with_context(|| format!("Failed to parse {} response", what));
        }

        let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
        log::debug!("{} failed with status {}: {}", what, status, error_text);
        anyhow::bail!("{}", describe_error_body(&error_text, status))
    }
}

/// Flatten a backend error body (`{"field": ["msg"], "detail": "msg"}`) into
/// a single readable line. Falls back to the raw text or the status.
pub fn describe_error_body(body: &str, status: reqwest::StatusCode) -> String {
    fn collect(value: &Value, out: &mut Vec<String>) {
        match value {
            Value::String(s) => out.push(s.clone()),
            Value::Array(items) => items.iter().for_each(|item| collect(item, out)),
            Value::Object(map) => map.values().for_each(|item| collect(item, out)),
            _ => {}
        }
    }

    let trimmed = body.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        let mut messages = Vec::new();
        collect(&value, &mut messages);
        if !messages.is_empty() {
            return messages.join(" ");
        }
    }

    if trimmed.is_empty() {
        format!("Request failed with status {}", status)
    } else {
        trimmed.to_string()
    }
}

#[async_trait]
impl CredentialService for CredentialsClient {
    async fn create_credential(&self, payload: CredentialPayload) -> Result<Credential> {
        log::debug!("POST credential {:?}", payload);
        let response = self
            .request(reqwest::Method::POST, &self.url(CREDENTIALS_PATH))
            .json(&payload)
            .send()
            .await
            .context("Failed to send create credential request")?;

        Self::read_json(response, "Create credential").await
    }

    async fn update_credential(&self, id: CredentialId, payload: CredentialPayload) -> Result<Credential> {
        log::debug!("PUT credential {} {:?}", id, payload);
        let url = self.url(&format!("{}{}/", CREDENTIALS_PATH, id));
        let response = self
            .request(reqwest::Method::PUT, &url)
            .json(&payload)
            .send()
            .await
            .context("Failed to send update credential request")?;

        Self::read_json(response, "Update credential").await
    }

    async fn get_credential(&self, id: CredentialId) -> Result<Credential> {
        let url = self.url(&format!("{}{}/", CREDENTIALS_PATH, id));
        let response = self
            .request(reqwest::Method::GET, &url)
            .send()
            .await
            .context("Failed to send get credential request")?;

        Self::read_json(response, "Get credential").await
    }

    async fn list_credentials(&self, options: &ViewOptions) -> Result<Page<Credential>> {
        let response = self
            .request(reqwest::Method::GET, &self.url(CREDENTIALS_PATH))
            .query(&options.query_pairs())
            .send()
            .await
            .context("Failed to send list credentials request")?;

        Self::read_json(response, "List credentials").await
    }

    async fn list_wizard_credentials(&self) -> Result<Vec<Credential>> {
        let response = self
            .request(reqwest::Method::GET, &self.url(CREDENTIALS_PATH))
            .query(&[("page_size", WIZARD_CREDENTIALS_PAGE_SIZE.to_string())])
            .send()
            .await
            .context("Failed to send wizard credentials request")?;

        let page: Page<Credential> = Self::read_json(response, "Wizard credentials").await?;
        Ok(page.results)
    }
}
