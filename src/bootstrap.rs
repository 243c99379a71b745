//! Process startup: open the configured store, serve until a shutdown signal, release the client.

use crate::config::{Config, StoreConfig};
use crate::error::StoreError;
use crate::service::ContactService;
use crate::state::AppState;
use crate::store::{connect_client, ContactStore, MemoryContactStore, MongoContactStore};
use axum::Router;
use mongodb::Client;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

/// The opened store plus whatever handle must be released on shutdown.
pub struct Backend {
    pub state: AppState,
    client: Option<Client>,
}

impl Backend {
    /// Connect to the configured store. For MongoDB this fails unless the deployment answers a ping.
    pub async fn open(config: &Config) -> Result<Self, StoreError> {
        let (store, client): (Arc<dyn ContactStore>, Option<Client>) = match &config.store {
            StoreConfig::Mongo(settings) => {
                info!(uri = %settings.redacted_uri(), "connecting to MongoDB");
                let client = connect_client(settings).await?;
                let store = MongoContactStore::from_client(&client, settings);
                info!(
                    database = %store.database_name(),
                    collection = %settings.collection,
                    "connected to MongoDB"
                );
                let store: Arc<dyn ContactStore> = Arc::new(store);
                (store, Some(client))
            }
            StoreConfig::Memory => {
                info!("using in-memory contact store");
                let store: Arc<dyn ContactStore> = Arc::new(MemoryContactStore::new());
                (store, None)
            }
        };
        Ok(Self {
            state: AppState::new(ContactService::new(store)),
            client,
        })
    }

    pub async fn close(self) {
        if let Some(client) = self.client {
            client.shutdown().await;
            info!("MongoDB client closed");
        }
    }
}

/// Serve `app` until Ctrl+C or SIGTERM.
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("received Ctrl+C, shutting down"),
            Err(e) => {
                error!(error = %e, "failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
