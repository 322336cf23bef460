use crate::application_port::{
    AuthFlowError, AuthFlowService, AuthorizeRedirect, CallbackParams,
};
use crate::domain_model::{CodeVerifier, StateToken};
use crate::domain_port::{AuthAttemptStore, TokenClient, TokenHolder};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct OauthConfig {
    pub app_id: String,
    pub redirect_uri: String,
    /// Country-specific authorization host, e.g.
    /// `https://auth.mercadolibre.com.co`.
    pub auth_base: String,
}

pub struct RealAuthFlowService {
    config: OauthConfig,
    attempts: Arc<dyn AuthAttemptStore>,
    token_client: Arc<dyn TokenClient>,
    tokens: Arc<dyn TokenHolder>,
}

impl RealAuthFlowService {
    pub fn new(
        config: OauthConfig,
        attempts: Arc<dyn AuthAttemptStore>,
        token_client: Arc<dyn TokenClient>,
        tokens: Arc<dyn TokenHolder>,
    ) -> Self {
        RealAuthFlowService {
            config,
            attempts,
            token_client,
            tokens,
        }
    }
}

#[async_trait::async_trait]
impl AuthFlowService for RealAuthFlowService {
    async fn begin(&self) -> Result<AuthorizeRedirect, AuthFlowError> {
        let verifier =
            CodeVerifier::generate().map_err(|e| AuthFlowError::Internal(e.to_string()))?;
        let state = StateToken::generate().map_err(|e| AuthFlowError::Internal(e.to_string()))?;
        let challenge = verifier.challenge();

        self.attempts.put(state.clone(), verifier).await?;

        let mut url = url::Url::parse(&format!("{}/authorization", self.config.auth_base))
            .map_err(|e| AuthFlowError::Internal(format!("bad auth_base: {e}")))?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.app_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("code_challenge", &challenge.0)
            .append_pair("code_challenge_method", "S256")
            .append_pair("state", &state.0);

        info!("authorization started, state {}", state);
        Ok(AuthorizeRedirect {
            location: url.to_string(),
        })
    }

    async fn complete(&self, params: CallbackParams) -> Result<(), AuthFlowError> {
        // Provider-reported failure: reject before touching the store so the
        // pending attempt stays usable if the user retries from the consent
        // screen.
        if let Some(error) = params.error {
            warn!("provider denied authorization: {}", error);
            return Err(AuthFlowError::ProviderDenied {
                error,
                description: params.error_description,
            });
        }

        let code = params.code.ok_or(AuthFlowError::MissingParam("code"))?;
        let state = params.state.ok_or(AuthFlowError::MissingParam("state"))?;

        // Consumed exactly once, whatever the exchange outcome.
        let verifier = self.attempts.consume(&StateToken(state)).await?;

        let credential = self.token_client.exchange_code(&code, &verifier).await?;
        self.tokens.set(credential).await;
        info!("credential stored; polling is now authorized");
        Ok(())
    }

    async fn authenticated(&self) -> bool {
        self.tokens.get().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_model::Credential;
    use crate::domain_port::TokenClientError;
    use crate::infra_mem::{MemAuthAttemptStore, MemTokenHolder};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingTokenClient {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingTokenClient {
        fn new(fail: bool) -> Self {
            CountingTokenClient {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    #[async_trait::async_trait]
    impl TokenClient for CountingTokenClient {
        async fn exchange_code(
            &self,
            code: &str,
            _verifier: &CodeVerifier,
        ) -> Result<Credential, TokenClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(TokenClientError::Upstream {
                    status: 400,
                    body: "invalid_grant".to_string(),
                });
            }
            Ok(Credential {
                access_token: format!("token-for-{code}"),
                refresh_token: Some("refresh".to_string()),
                expires_at: None,
            })
        }
    }

    fn service(
        token_client: Arc<CountingTokenClient>,
    ) -> (RealAuthFlowService, Arc<MemTokenHolder>) {
        let holder = Arc::new(MemTokenHolder::new());
        let service = RealAuthFlowService::new(
            OauthConfig {
                app_id: "app-id".to_string(),
                redirect_uri: "http://localhost:3000/api/v1/callback".to_string(),
                auth_base: "https://auth.mercadolibre.com.co".to_string(),
            },
            Arc::new(MemAuthAttemptStore::new(Duration::from_secs(600))),
            token_client,
            holder.clone(),
        );
        (service, holder)
    }

    fn query_params(location: &str) -> HashMap<String, String> {
        url::Url::parse(location)
            .unwrap()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[tokio::test]
    async fn begin_builds_a_complete_authorization_url() {
        let (service, _) = service(Arc::new(CountingTokenClient::new(false)));
        let redirect = service.begin().await.unwrap();
        let params = query_params(&redirect.location);

        assert!(redirect.location.starts_with("https://auth.mercadolibre.com.co/authorization?"));
        assert_eq!(params["response_type"], "code");
        assert_eq!(params["client_id"], "app-id");
        assert_eq!(params["code_challenge_method"], "S256");
        assert!(!params["code_challenge"].is_empty());
        assert!(!params["state"].is_empty());
        assert_ne!(params["state"], params["code_challenge"]);
    }

    #[tokio::test]
    async fn callback_completes_and_stores_the_credential() {
        let token_client = Arc::new(CountingTokenClient::new(false));
        let (service, holder) = service(token_client.clone());

        let redirect = service.begin().await.unwrap();
        let state = query_params(&redirect.location)["state"].clone();

        service
            .complete(CallbackParams {
                code: Some("the-code".to_string()),
                state: Some(state),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(token_client.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            holder.get().await.unwrap().access_token,
            "token-for-the-code"
        );
        assert!(service.authenticated().await);
    }

    #[tokio::test]
    async fn replayed_state_is_rejected_without_a_second_exchange() {
        let token_client = Arc::new(CountingTokenClient::new(false));
        let (service, _) = service(token_client.clone());

        let redirect = service.begin().await.unwrap();
        let state = query_params(&redirect.location)["state"].clone();
        let params = CallbackParams {
            code: Some("the-code".to_string()),
            state: Some(state),
            ..Default::default()
        };

        service.complete(params.clone()).await.unwrap();
        let replay = service.complete(params).await;

        assert!(matches!(replay, Err(AuthFlowError::InvalidState)));
        assert_eq!(token_client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn provider_error_short_circuits_before_any_exchange() {
        let token_client = Arc::new(CountingTokenClient::new(false));
        let (service, holder) = service(token_client.clone());

        let result = service
            .complete(CallbackParams {
                error: Some("access_denied".to_string()),
                error_description: Some("the user said no".to_string()),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(AuthFlowError::ProviderDenied { .. })));
        assert_eq!(token_client.calls.load(Ordering::SeqCst), 0);
        assert!(holder.get().await.is_none());
    }

    #[tokio::test]
    async fn unknown_state_never_reaches_the_token_endpoint() {
        let token_client = Arc::new(CountingTokenClient::new(false));
        let (service, _) = service(token_client.clone());

        let result = service
            .complete(CallbackParams {
                code: Some("the-code".to_string()),
                state: Some("never-issued".to_string()),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(AuthFlowError::InvalidState)));
        assert_eq!(token_client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_exchange_still_consumes_the_state() {
        let token_client = Arc::new(CountingTokenClient::new(true));
        let (service, holder) = service(token_client.clone());

        let redirect = service.begin().await.unwrap();
        let state = query_params(&redirect.location)["state"].clone();
        let params = CallbackParams {
            code: Some("the-code".to_string()),
            state: Some(state),
            ..Default::default()
        };

        let first = service.complete(params.clone()).await;
        assert!(matches!(
            first,
            Err(AuthFlowError::TokenExchange { status: 400, .. })
        ));
        assert!(holder.get().await.is_none());

        // the state was spent by the failed attempt
        let second = service.complete(params).await;
        assert!(matches!(second, Err(AuthFlowError::InvalidState)));
        assert_eq!(token_client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_code_is_rejected() {
        let (service, _) = service(Arc::new(CountingTokenClient::new(false)));
        let result = service
            .complete(CallbackParams {
                state: Some("s".to_string()),
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(AuthFlowError::MissingParam("code"))));
    }
}
