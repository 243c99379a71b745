//! In-process contact store for tests and database-less local runs.

use super::ContactStore;
use crate::error::StoreError;
use crate::model::{Contact, ContactId, ContactPatch, NewContact};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

/// Keeps insertion order so `list_all` behaves like an unsorted collection scan.
#[derive(Default)]
pub struct MemoryContactStore {
    contacts: RwLock<Vec<Contact>>,
    round_trips: AtomicUsize,
    unavailable: AtomicBool,
}

impl MemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of operations that reached the backing map (or failed trying).
    pub fn round_trips(&self) -> usize {
        self.round_trips.load(Ordering::SeqCst)
    }

    /// While set, every operation fails with `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn round_trip(&self) -> Result<(), StoreError> {
        self.round_trips.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store switched off".into()));
        }
        Ok(())
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("contact map lock poisoned".into())
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn list_all(&self) -> Result<Vec<Contact>, StoreError> {
        self.round_trip()?;
        let guard = self.contacts.read().map_err(poisoned)?;
        Ok(guard.clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Contact>, StoreError> {
        let Some(id) = ContactId::parse(id) else {
            return Ok(None);
        };
        self.round_trip()?;
        let guard = self.contacts.read().map_err(poisoned)?;
        Ok(guard.iter().find(|c| c.id == id).cloned())
    }

    async fn create(&self, new: NewContact) -> Result<Contact, StoreError> {
        self.round_trip()?;
        let contact = Contact::from_new(ContactId::new(), new);
        let mut guard = self.contacts.write().map_err(poisoned)?;
        guard.push(contact.clone());
        Ok(contact)
    }

    async fn update(&self, id: &str, patch: ContactPatch) -> Result<Option<Contact>, StoreError> {
        let Some(id) = ContactId::parse(id) else {
            return Ok(None);
        };
        self.round_trip()?;
        let mut guard = self.contacts.write().map_err(poisoned)?;
        Ok(guard.iter_mut().find(|c| c.id == id).map(|c| {
            c.apply(&patch);
            c.clone()
        }))
    }

    async fn delete(&self, id: &str) -> Result<u64, StoreError> {
        let Some(id) = ContactId::parse(id) else {
            return Ok(0);
        };
        self.round_trip()?;
        let mut guard = self.contacts.write().map_err(poisoned)?;
        let before = guard.len();
        guard.retain(|c| c.id != id);
        Ok((before - guard.len()) as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.round_trip()
    }
}
