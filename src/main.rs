use anyhow::Context;

use waitlist::configuration::get_config;
use waitlist::startup::Application;
use waitlist::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("waitlist".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber)?;
    let config = get_config().context("Failed to read configuration")?;
    let app = Application::build(config).await?;
    tracing::info!("Listening on {}", app.local_addr()?);
    app.run_until_stopped().await?;
    Ok(())
}
