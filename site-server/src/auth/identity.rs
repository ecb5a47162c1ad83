//! Identity provider client
//!
//! Credentials never touch this server. The browser signs in against the
//! hosted identity provider and sends us the short-lived identity token;
//! we verify it through the provider's account-lookup endpoint and only
//! then issue our own session cookie.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

/// Verified identity extracted from an identity token
#[derive(Debug, Clone)]
pub struct IdentityClaims {
    /// Provider-assigned user id
    pub uid: String,
    /// Verified email address
    pub email: String,
}

/// Identity verification errors
#[derive(Error, Debug)]
pub enum IdentityError {
    /// The token was rejected by the provider
    #[error("Invalid identity token")]
    InvalidToken,

    /// The provider was unreachable or answered with garbage
    #[error("Identity provider error: {0}")]
    Provider(String),
}

/// Seam between the session endpoint and the hosted identity provider.
///
/// Production uses [`HttpIdentityProvider`]; tests inject
/// [`StaticIdentityProvider`].
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify_id_token(&self, id_token: &str) -> Result<IdentityClaims, IdentityError>;
}

/// Account-lookup response shape (only the fields we read)
#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
struct LookupUser {
    #[serde(rename = "localId")]
    local_id: String,
    #[serde(default)]
    email: String,
}

/// Identity provider client backed by the hosted REST API
#[derive(Debug, Clone)]
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpIdentityProvider {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn verify_id_token(&self, id_token: &str) -> Result<IdentityClaims, IdentityError> {
        let url = format!(
            "{}/v1/accounts:lookup?key={}",
            self.base_url.trim_end_matches('/'),
            self.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&json!({ "idToken": id_token }))
            .send()
            .await
            .map_err(|e| IdentityError::Provider(e.to_string()))?;

        let status = response.status();
        if status.is_client_error() {
            tracing::warn!(target: "security", status = %status, "Identity token rejected");
            return Err(IdentityError::InvalidToken);
        }
        if !status.is_success() {
            return Err(IdentityError::Provider(format!(
                "unexpected status {status}"
            )));
        }

        let body: LookupResponse = response
            .json()
            .await
            .map_err(|e| IdentityError::Provider(e.to_string()))?;

        let user = body.users.into_iter().next().ok_or(IdentityError::InvalidToken)?;
        if user.email.is_empty() {
            return Err(IdentityError::Provider(
                "account record has no email".to_string(),
            ));
        }

        Ok(IdentityClaims {
            uid: user.local_id,
            email: user.email,
        })
    }
}

/// Test double: maps fixed tokens to fixed identities.
///
/// Lives in the library rather than a test module so integration tests can
/// construct a full server state around it.
#[derive(Debug, Default, Clone)]
pub struct StaticIdentityProvider {
    accounts: Vec<(String, IdentityClaims)>,
}

impl StaticIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(
        mut self,
        token: impl Into<String>,
        uid: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        self.accounts.push((
            token.into(),
            IdentityClaims {
                uid: uid.into(),
                email: email.into(),
            },
        ));
        self
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn verify_id_token(&self, id_token: &str) -> Result<IdentityClaims, IdentityError> {
        self.accounts
            .iter()
            .find(|(token, _)| token == id_token)
            .map(|(_, claims)| claims.clone())
            .ok_or(IdentityError::InvalidToken)
    }
}
