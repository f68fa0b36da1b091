use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::Request,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::configuration::{LocalFallbackSettings, PageSettings, Settings, WEBHOOK_URL_ENV};
use crate::local_recorder::{InMemoryRecorder, JsonFileRecorder, LocalRecorder};
use crate::routes::{health_check, landing_page, subscribe};
use crate::submission_router::SubmissionRouter;
use crate::webhook_client::WebhookClient;

#[derive(Clone)]
pub struct AppState {
    pub router: SubmissionRouter,
    pub recorder: Option<Arc<dyn LocalRecorder>>,
    pub page: Arc<PageSettings>,
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, anyhow::Error> {
        let webhook = config
            .webhook
            .configured_url()
            .map(|url| WebhookClient::new(url, config.webhook.timeout()))
            .transpose()?;
        if webhook.is_none() {
            tracing::warn!(
                "{} is not set, signups will be acknowledged without being forwarded",
                WEBHOOK_URL_ENV
            );
        }
        let state = AppState {
            router: SubmissionRouter::new(webhook),
            recorder: local_recorder(&config.local_fallback),
            page: Arc::new(config.page),
        };

        let addr = format!("{}:{}", config.application.host, config.application.port);
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Unable to bind to {}", addr))?;
        let port = listener.local_addr()?.port();
        Ok(Self {
            port,
            listener,
            router: app(state),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        axum::serve(self.listener, self.router).await
    }
}

fn local_recorder(settings: &LocalFallbackSettings) -> Option<Arc<dyn LocalRecorder>> {
    if !settings.enabled {
        return None;
    }
    let recorder: Arc<dyn LocalRecorder> = match &settings.path {
        Some(path) => Arc::new(JsonFileRecorder::new(path)),
        None => Arc::new(InMemoryRecorder::default()),
    };
    Some(recorder)
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(landing_page))
        .route("/health_check", get(health_check))
        .route("/api/subscribe", post(subscribe))
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http().make_span_with(
                |request: &Request| {
                    let request_id = Uuid::new_v4();
                    tracing::info_span!(
                        "http_request",
                        %request_id,
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                },
            )),
        )
        .with_state(state)
}
