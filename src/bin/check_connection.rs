//! Connectivity diagnostic: connect with the service's settings, ping, list collections.
//!
//! Run: `cargo run --bin check-connection`

use contacts_api::store::{connect_client, MongoContactStore};
use contacts_api::MongoSettings;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = match MongoSettings::from_env() {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    info!(uri = %settings.redacted_uri(), "testing MongoDB connection");
    let client = match connect_client(&settings).await {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "connection failed");
            if e.is_server_selection() {
                error!("possible causes:");
                error!("1. your IP address is not on the cluster's access list");
                error!("2. wrong username or password in the connection string");
                error!("3. wrong cluster host name");
                error!("4. no network route to the MongoDB deployment");
            }
            return ExitCode::FAILURE;
        }
    };

    let store = MongoContactStore::from_client(&client, &settings);
    info!(database = %store.database_name(), "connection successful");
    let code = match store.collection_names().await {
        Ok(names) => {
            info!(collections = ?names, "collections");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "failed to list collections");
            ExitCode::FAILURE
        }
    };
    client.shutdown().await;
    code
}
