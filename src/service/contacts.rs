//! Contact operations over an injected store. Identifier syntax is checked here, before any store call.

use crate::error::AppError;
use crate::model::{Contact, ContactId, ContactPatch, NewContact};
use crate::store::ContactStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct ContactService {
    store: Arc<dyn ContactStore>,
}

impl ContactService {
    pub fn new(store: Arc<dyn ContactStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn ContactStore> {
        &self.store
    }

    pub async fn list(&self) -> Result<Vec<Contact>, AppError> {
        Ok(self.store.list_all().await?)
    }

    pub async fn get(&self, id: &str) -> Result<Contact, AppError> {
        parse_id(id)?;
        self.store
            .get_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn create(&self, new: NewContact) -> Result<Contact, AppError> {
        let contact = self.store.create(new).await?;
        tracing::info!(id = %contact.id, "contact created");
        Ok(contact)
    }

    pub async fn update(&self, id: &str, patch: ContactPatch) -> Result<Contact, AppError> {
        parse_id(id)?;
        self.store
            .update(id, patch)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Returns the removed count, which is always 1 on success.
    pub async fn delete(&self, id: &str) -> Result<u64, AppError> {
        parse_id(id)?;
        match self.store.delete(id).await? {
            0 => Err(AppError::NotFound),
            n => {
                tracing::info!(%id, "contact deleted");
                Ok(n)
            }
        }
    }
}

/// Syntax check only; the store receives the raw segment once it passes.
fn parse_id(id: &str) -> Result<ContactId, AppError> {
    ContactId::parse(id).ok_or(AppError::InvalidId)
}
