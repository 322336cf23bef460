use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_model::SiteId;
use crate::domain_port::*;
use crate::infra_http::*;
use crate::infra_mem::*;
use crate::logger::*;
use crate::settings::Settings;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub struct Server {
    pub auth_flow_service: Arc<dyn AuthFlowService>,
    pub poll_service: Arc<dyn PollService>,
    sweeper_handle: Mutex<Option<JoinHandle<()>>>,
    cancel: CancellationToken,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let attempts: Arc<dyn AuthAttemptStore> = Arc::new(MemAuthAttemptStore::new(
            Duration::from_secs(settings.auth.state_ttl_secs),
        ));
        let tokens: Arc<dyn TokenHolder> = Arc::new(MemTokenHolder::new());
        let tracker: Arc<dyn DeltaTracker> = Arc::new(MemDeltaTracker::new(Duration::from_secs(
            settings.session.idle_ttl_secs,
        )));

        let gateway: Arc<dyn SearchGateway> = match settings.search.backend.as_str() {
            "fake" => Arc::new(FakeSearchGateway::demo()),
            "real" => Arc::new(MeliSearchGateway::try_new(
                settings.search.api_base.clone(),
                settings.search.sort.clone(),
                settings.search.limit,
                Duration::from_secs(settings.search.timeout_secs),
            )?),
            other => return Err(anyhow::anyhow!("Unknown search backend: {}", other)),
        };

        let token_client: Arc<dyn TokenClient> = Arc::new(HttpTokenClient::try_new(
            settings.auth.token_url.clone(),
            settings.auth.app_id.clone(),
            settings.auth.client_secret.clone(),
            settings.auth.redirect_uri.clone(),
            Duration::from_secs(settings.search.timeout_secs),
        )?);

        let auth_flow_service: Arc<dyn AuthFlowService> = Arc::new(RealAuthFlowService::new(
            OauthConfig {
                app_id: settings.auth.app_id.clone(),
                redirect_uri: settings.auth.redirect_uri.clone(),
                auth_base: settings.auth.auth_base.clone(),
            },
            attempts.clone(),
            token_client,
            tokens.clone(),
        ));

        let poll_service: Arc<dyn PollService> = Arc::new(RealPollService::new(
            tokens,
            gateway,
            tracker.clone(),
            SiteId(settings.search.site.clone()),
        ));

        // One sweeper covers both expiring pending attempts and idle
        // sessions, so neither map grows without bound.
        let cancel = CancellationToken::new();
        let sweeper_cancel = cancel.clone();
        let sweep_every = Duration::from_secs(settings.session.sweep_interval_secs);
        let sweeper_handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(sweep_every);
            loop {
                tokio::select! {
                    _ = sweeper_cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        attempts.sweep_expired().await;
                        tracker.sweep_idle().await;
                    }
                }
            }
        });

        info!("server started");

        Ok(Self {
            auth_flow_service,
            poll_service,
            sweeper_handle: Mutex::new(Some(sweeper_handle)),
            cancel,
        })
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");

        self.cancel.cancel();

        let handle = match self.sweeper_handle.lock() {
            Ok(mut lock) => lock.take(),
            Err(_) => None,
        };
        if let Some(handle) = handle {
            let r = handle.await;
            info!("sweeper handle dropped: {:?}", r);
        }
    }
}
