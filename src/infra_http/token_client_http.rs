use crate::domain_model::{CodeVerifier, Credential};
use crate::domain_port::{TokenClient, TokenClientError};
use chrono::Utc;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

/// Form-encoded `authorization_code` exchange against the provider's token
/// endpoint. MercadoLibre requires the client secret alongside PKCE.
pub struct HttpTokenClient {
    http: reqwest::Client,
    token_url: String,
    app_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl HttpTokenClient {
    pub fn try_new(
        token_url: impl Into<String>,
        app_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpTokenClient {
            http,
            token_url: token_url.into(),
            app_id: app_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
        })
    }
}

#[async_trait::async_trait]
impl TokenClient for HttpTokenClient {
    async fn exchange_code(
        &self,
        code: &str,
        verifier: &CodeVerifier,
    ) -> Result<Credential, TokenClientError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", self.app_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("code_verifier", verifier.0.as_str()),
        ];

        let response = self
            .http
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| TokenClientError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TokenClientError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| TokenClientError::Malformed(e.to_string()))?;
        info!("token exchange succeeded");

        Ok(Credential {
            access_token: body.access_token,
            refresh_token: body.refresh_token,
            expires_at: body
                .expires_in
                .map(|secs| Utc::now() + chrono::Duration::seconds(secs)),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_response_tolerates_missing_optionals() {
        let body: TokenResponse =
            serde_json::from_str(r#"{"access_token":"APP_USR-abc"}"#).unwrap();
        assert_eq!(body.access_token, "APP_USR-abc");
        assert!(body.refresh_token.is_none());
        assert!(body.expires_in.is_none());
    }

    #[test]
    fn token_response_reads_refresh_and_expiry() {
        let body: TokenResponse = serde_json::from_str(
            r#"{"access_token":"a","refresh_token":"r","expires_in":21600,"scope":"read"}"#,
        )
        .unwrap();
        assert_eq!(body.refresh_token.as_deref(), Some("r"));
        assert_eq!(body.expires_in, Some(21600));
    }
}
