use serde::Deserialize;

use crate::config::Config;
use crate::error::AppError;

/// Client for the OAuth provider's authorization and token endpoints.
#[derive(Clone)]
pub struct OauthClient {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    scope: String,
    auth_endpoint: String,
    token_endpoint: String,
    http_client: reqwest::Client,
}

/// Token endpoint response. `refresh_token` is only present on the initial
/// authorization-code exchange (and even then only when the provider grants
/// offline access).
#[derive(Debug, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: i64,
}

impl OauthClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client_id: config.oauth_client_id.clone(),
            client_secret: config.oauth_client_secret.clone(),
            redirect_uri: config.oauth_redirect_uri.clone(),
            scope: config.oauth_scope.clone(),
            auth_endpoint: config.oauth_auth_endpoint.clone(),
            token_endpoint: config.oauth_token_endpoint.clone(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Authorization URL the agent is sent to; `state` carries the agent id
    /// back through the callback.
    pub fn authorization_url(&self, agent_id: i64) -> Result<String, AppError> {
        let url = reqwest::Url::parse_with_params(
            &self.auth_endpoint,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("response_type", "code"),
                ("access_type", "offline"),
                ("scope", self.scope.as_str()),
                ("state", agent_id.to_string().as_str()),
                ("prompt", "consent"),
            ],
        )
        .map_err(|e| AppError::Internal(format!("Failed to build authorization URL: {e}")))?;
        Ok(url.to_string())
    }

    /// Exchanges an authorization code for the initial token grant.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenGrant, AppError> {
        let params = [
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let resp = self
            .http_client
            .post(&self.token_endpoint)
            .form(&params)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::BadRequest(format!(
                "OAuth code exchange rejected: {status}: {body}"
            )));
        }

        Ok(resp.json().await?)
    }

    /// Exchanges a refresh token for a new access token. Any failure, network
    /// or provider-side, surfaces as `CredentialRefresh`.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, AppError> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];

        let resp = self
            .http_client
            .post(&self.token_endpoint)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::CredentialRefresh(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::CredentialRefresh(format!("{status}: {body}")));
        }

        resp.json()
            .await
            .map_err(|e| AppError::CredentialRefresh(format!("invalid token response: {e}")))
    }
}
