//! # Instagram Messaging Webhook Relay
//!
//! Receives Instagram messaging webhooks and replies to each message through
//! the Graph API Send API, echoing its text and media back to the sender.

pub mod config;
pub mod consts;
pub mod server;
pub mod webhook;

use anyhow::Context;
use envconfig::Envconfig;
use logfire::config::SendToLogfire;
use ntex::web;
use openssl::ssl::{SslAcceptor, SslFiletype, SslMethod};
use webhook::instagram::client::GraphClient;

#[ntex::main]
async fn main() -> anyhow::Result<()> {
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    let app_config =
        config::AppConfig::init_from_env().context("failed to load app config from environment")?;

    // Initialize logging; spans are exported only when a token is available
    let mut logfire_builder = logfire::configure()
        .install_panic_handler()
        .send_to_logfire(SendToLogfire::IfTokenPresent);
    if let Some(token) = &app_config.logfire_token {
        logfire_builder = logfire_builder.with_token(token);
    }
    let shutdown_handler = logfire_builder.finish()?;

    if !dotenv_loaded {
        logfire::info!("No .env file found");
    }

    let graph_client = GraphClient::new(&app_config)?;

    configure_and_run_server(app_config, graph_client).await?;

    shutdown_handler.shutdown()?;

    Ok(())
}

/// Configures SSL acceptor for production environments
fn setup_ssl_acceptor(
    app_config: &config::AppConfig,
) -> anyhow::Result<openssl::ssl::SslAcceptorBuilder> {
    let mut ssl_acceptor = SslAcceptor::mozilla_intermediate(SslMethod::tls_server())
        .map_err(|e| anyhow::anyhow!("Failed to create SSL acceptor: {}", e))?;

    ssl_acceptor
        .set_private_key_file(&app_config.private_key_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load private key from {}: {}",
                app_config.private_key_path,
                e
            )
        })?;

    ssl_acceptor
        .set_certificate_file(&app_config.certificate_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load certificate from {}: {}",
                app_config.certificate_path,
                e
            )
        })?;

    Ok(ssl_acceptor)
}

/// Configures and starts the web server with appropriate SSL settings
async fn configure_and_run_server(
    app_config: config::AppConfig,
    graph_client: GraphClient,
) -> anyhow::Result<()> {
    let server_addr = (
        app_config.web_server_host.clone(),
        app_config.web_server_port,
    );
    let ssl_acceptor = if app_config.is_prod() {
        Some(setup_ssl_acceptor(&app_config)?)
    } else {
        None
    };

    logfire::info!(
        "Starting webhook relay on {host}:{port} (env={env}, text failure policy={policy})",
        host = server_addr.0.clone(),
        port = i64::from(server_addr.1),
        env = app_config.env.clone(),
        policy = format!("{:?}", app_config.text_failure_policy)
    );

    let server = web::server(move || {
        web::App::new()
            .wrap(web::middleware::Logger::default())
            .state(webhook::AppState {
                config: app_config.clone(),
                sender: Box::new(graph_client.clone()),
            })
            .configure(webhook::routes::instagram)
            .service(server::health)
    });

    let bound_server = match ssl_acceptor {
        Some(ssl_acceptor) => server.bind_openssl(server_addr, ssl_acceptor)?,
        None => server.bind(server_addr)?,
    };

    bound_server
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
