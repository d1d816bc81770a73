use server::{AppState, ServerConfig, app};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid server configuration");
            std::process::exit(1);
        }
    };
    let port = config.port;
    let variant = config.variant.as_str();
    if config.echo_codes {
        tracing::warn!("ECHO_CODES enabled: verification codes and reset tokens are returned in API replies");
    }

    let router = app(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, variant, "mock auth api listening");
    axum::serve(listener, router).await.expect("server failed");
}
