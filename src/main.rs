//! Jenkins Lex Bot server binary.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use jenkins_lex_bot::adapters::jenkins::JenkinsClient;
use jenkins_lex_bot::adapters::lex::{lex_routes, LexHandlers};
use jenkins_lex_bot::application::{IntentRouter, JobHandlers};
use jenkins_lex_bot::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    if config.server.log_json {
        fmt().json().with_env_filter(filter).init();
    } else {
        fmt().with_env_filter(filter).init();
    }

    config.validate().context("validating configuration")?;

    let client = JenkinsClient::new(config.jenkins.client_config())
        .context("building Jenkins client")?;
    let handlers = JobHandlers::new(Arc::new(client), config.handler_settings());
    let router = IntentRouter::new(handlers);

    let app = lex_routes(
        LexHandlers::new(Arc::new(router)),
        config.server.request_timeout(),
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    info!(
        %addr,
        jenkins = %config.jenkins.url,
        "Starting Jenkins Lex Bot"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
