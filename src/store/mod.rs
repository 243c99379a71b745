//! Contact persistence. One collection, five operations plus a liveness probe.
//!
//! Every id-bearing operation takes the raw path segment. A segment that fails the
//! identifier syntax check is treated as absent and never reaches the backend.

mod memory;
mod mongo;

pub use memory::MemoryContactStore;
pub use mongo::{connect_client, MongoContactStore};

use crate::error::StoreError;
use crate::model::{Contact, ContactPatch, NewContact};
use async_trait::async_trait;

#[async_trait]
pub trait ContactStore: Send + Sync {
    /// All contacts in the store's natural order.
    async fn list_all(&self) -> Result<Vec<Contact>, StoreError>;

    async fn get_by_id(&self, id: &str) -> Result<Option<Contact>, StoreError>;

    /// Persists a new contact; the store assigns the id.
    async fn create(&self, new: NewContact) -> Result<Contact, StoreError>;

    /// Sets only the fields present in `patch`. Returns the refreshed contact, or `None` if nothing matched.
    async fn update(&self, id: &str, patch: ContactPatch) -> Result<Option<Contact>, StoreError>;

    /// Returns the number of removed documents (0 or 1).
    async fn delete(&self, id: &str) -> Result<u64, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
