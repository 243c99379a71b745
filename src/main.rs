use contacts_api::bootstrap::{serve, Backend};
use contacts_api::{app, Config};
use std::process::ExitCode;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("contacts_api=info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    // No listener is bound until the store answers.
    let backend = match Backend::open(&config).await {
        Ok(b) => b,
        Err(e) => {
            tracing::error!(error = %e, "database connection failed");
            return ExitCode::FAILURE;
        }
    };

    let address = format!("0.0.0.0:{}", config.port);
    let listener = match TcpListener::bind(&address).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(error = %e, %address, "failed to bind");
            backend.close().await;
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("server running at http://localhost:{}", config.port);

    let result = serve(listener, app(backend.state.clone())).await;
    backend.close().await;
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "server error");
            ExitCode::FAILURE
        }
    }
}
