//! Shared application state for all routes.

use crate::service::ContactService;

#[derive(Clone)]
pub struct AppState {
    pub contacts: ContactService,
}

impl AppState {
    pub fn new(contacts: ContactService) -> Self {
        Self { contacts }
    }
}
