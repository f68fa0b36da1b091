use std::time::Duration;

use once_cell::sync::Lazy;
use secrecy::Secret;
use waitlist::{
    configuration::get_config,
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};
use wiremock::MockServer;

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".into();
    let subscriber_name = "test".into();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber).expect("Failed to initialize tracing");
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber).expect("Failed to initialize tracing");
    }
});

pub struct TestApp {
    pub addr: String,
    pub webhook_server: MockServer,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn post_json(&self, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/subscribe", self.addr))
            .json(body)
            .send()
            .await
            .expect("Failed to send the request")
    }

    pub async fn post_form(&self, body: &str) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/subscribe", self.addr))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body.to_string())
            .send()
            .await
            .expect("Failed to send the request")
    }

    pub async fn post_raw(&self, content_type: &str, body: &str) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/subscribe", self.addr))
            .header("Content-Type", content_type)
            .body(body.to_string())
            .send()
            .await
            .expect("Failed to send the request")
    }

    pub async fn get_landing_page(&self, query: &str) -> String {
        self.api_client
            .get(format!("{}/{}", self.addr, query))
            .send()
            .await
            .expect("Failed to send the request")
            .text()
            .await
            .expect("Failed to read the page")
    }
}

pub fn assert_is_redirected_to(response: &reqwest::Response, location: &str) {
    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(response.headers().get("Location").unwrap(), location);
}

async fn spawn(forwarding: bool) -> TestApp {
    Lazy::force(&TRACING);
    let webhook_server = MockServer::start().await;
    // Randomise configuration to ensure test isolation
    let configuration = {
        let mut c = get_config().expect("Failed to read configuration.");
        c.application.port = 0;
        c.webhook.url = forwarding.then(|| Secret::new(format!("{}/exec", webhook_server.uri())));
        c.webhook.timeout_millis = 2_000;
        c.local_fallback.enabled = true;
        c.local_fallback.path = None;
        c
    };
    let app = Application::build(configuration)
        .await
        .expect("Failed to build application.");
    let port = app.port();
    let _ = tokio::spawn(app.run_until_stopped());

    let api_client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    TestApp {
        addr: format!("http://127.0.0.1:{}", port),
        webhook_server,
        api_client,
    }
}

/// The application with the webhook pointed at `webhook_server`.
pub async fn spawn_app() -> TestApp {
    spawn(true).await
}

pub async fn spawn_app_without_webhook() -> TestApp {
    spawn(false).await
}
