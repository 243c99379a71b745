//! Contacts API: REST CRUD over a single contact collection in MongoDB.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::{Config, MongoSettings, StoreConfig, StoreKind};
pub use error::{AppError, ConfigError, FieldViolation, StoreError};
pub use model::{Contact, ContactId, ContactPatch, NewContact};
pub use routes::{common_routes, common_routes_with_ready, contact_routes};
pub use service::{ContactService, ContactValidator};
pub use state::AppState;
pub use store::{ContactStore, MemoryContactStore, MongoContactStore};

use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

/// Largest accepted request body.
pub const BODY_LIMIT_BYTES: usize = 64 * 1024;

/// Full HTTP surface: common routes plus `/contacts`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .merge(contact_routes(state))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
}
