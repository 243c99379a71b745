//! MongoDB-backed contact store.

use super::ContactStore;
use crate::config::MongoSettings;
use crate::error::StoreError;
use crate::model::{Contact, ContactId, ContactPatch, NewContact};
use async_trait::async_trait;
use chrono::NaiveDate;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::options::{ClientOptions, ReturnDocument};
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Deserializer, Serialize};

/// On-disk shape. `_id` is a native ObjectId; the rest mirrors the JSON field names.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContactDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    favorite_color: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "stored_birthday"
    )]
    birthday: Option<NaiveDate>,
}

/// Older writers stored whatever date string passed their check, including `YYYY/MM/DD`.
/// Anything unreadable decodes as absent so one bad document cannot fail a whole listing.
fn stored_birthday<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
    let raw = Option::<Bson>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(Bson::Null) => None,
        Some(Bson::String(s)) => {
            let parsed = ["%Y-%m-%d", "%Y/%m/%d"]
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s.trim(), fmt).ok());
            if parsed.is_none() {
                tracing::warn!(value = %s, "ignoring unreadable stored birthday");
            }
            parsed
        }
        Some(other) => {
            tracing::warn!(value = %other, "ignoring non-string stored birthday");
            None
        }
    })
}

impl From<ContactDocument> for Contact {
    fn from(d: ContactDocument) -> Self {
        Contact {
            id: d.id.into(),
            first_name: d.first_name,
            last_name: d.last_name,
            email: d.email,
            favorite_color: d.favorite_color,
            birthday: d.birthday,
        }
    }
}

impl From<&Contact> for ContactDocument {
    fn from(c: &Contact) -> Self {
        ContactDocument {
            id: c.id.object_id(),
            first_name: c.first_name.clone(),
            last_name: c.last_name.clone(),
            email: c.email.clone(),
            favorite_color: c.favorite_color.clone(),
            birthday: c.birthday,
        }
    }
}

fn set_document(patch: &ContactPatch) -> Document {
    let mut set = Document::new();
    if let Some(v) = &patch.first_name {
        set.insert("firstName", v.as_str());
    }
    if let Some(v) = &patch.last_name {
        set.insert("lastName", v.as_str());
    }
    if let Some(v) = &patch.email {
        set.insert("email", v.as_str());
    }
    if let Some(v) = &patch.favorite_color {
        set.insert("favoriteColor", v.as_str());
    }
    if let Some(d) = patch.birthday {
        set.insert("birthday", d.format("%Y-%m-%d").to_string());
    }
    set
}

/// Build a client with the configured timeouts and verify the deployment answers a `ping`.
pub async fn connect_client(settings: &MongoSettings) -> Result<Client, StoreError> {
    let mut options = ClientOptions::parse(settings.uri.as_str()).await?;
    options.server_selection_timeout = Some(settings.server_selection_timeout);
    options.connect_timeout = Some(settings.connect_timeout);
    if options.app_name.is_none() {
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
    }
    let client = Client::with_options(options)?;
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await?;
    Ok(client)
}

#[derive(Clone)]
pub struct MongoContactStore {
    database: Database,
    collection: Collection<ContactDocument>,
}

impl MongoContactStore {
    pub fn new(database: Database, collection_name: &str) -> Self {
        let collection = database.collection::<ContactDocument>(collection_name);
        Self {
            database,
            collection,
        }
    }

    /// Resolve the database from settings, then the URI default, then `contacts`.
    pub fn from_client(client: &Client, settings: &MongoSettings) -> Self {
        let database = match &settings.database {
            Some(name) => client.database(name),
            None => client
                .default_database()
                .unwrap_or_else(|| client.database("contacts")),
        };
        Self::new(database, &settings.collection)
    }

    pub fn database_name(&self) -> &str {
        self.database.name()
    }

    pub async fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.database.list_collection_names().await?)
    }
}

#[async_trait]
impl ContactStore for MongoContactStore {
    async fn list_all(&self) -> Result<Vec<Contact>, StoreError> {
        tracing::debug!(collection = %self.collection.name(), "find all");
        let cursor = self.collection.find(doc! {}).await?;
        let docs: Vec<ContactDocument> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(Contact::from).collect())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Contact>, StoreError> {
        let Some(id) = ContactId::parse(id) else {
            return Ok(None);
        };
        tracing::debug!(collection = %self.collection.name(), %id, "find one");
        let found = self
            .collection
            .find_one(doc! { "_id": id.object_id() })
            .await?;
        Ok(found.map(Contact::from))
    }

    async fn create(&self, new: NewContact) -> Result<Contact, StoreError> {
        let contact = Contact::from_new(ContactId::new(), new);
        tracing::debug!(collection = %self.collection.name(), id = %contact.id, "insert one");
        self.collection
            .insert_one(ContactDocument::from(&contact))
            .await?;
        Ok(contact)
    }

    async fn update(&self, id: &str, patch: ContactPatch) -> Result<Option<Contact>, StoreError> {
        let Some(id) = ContactId::parse(id) else {
            return Ok(None);
        };
        let set = set_document(&patch);
        if set.is_empty() {
            return self.get_by_id(&id.to_string()).await;
        }
        tracing::debug!(collection = %self.collection.name(), %id, fields = set.len(), "update one");
        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": id.object_id() }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated.map(Contact::from))
    }

    async fn delete(&self, id: &str) -> Result<u64, StoreError> {
        let Some(id) = ContactId::parse(id) else {
            return Ok(0);
        };
        tracing::debug!(collection = %self.collection.name(), %id, "delete one");
        let result = self
            .collection
            .delete_one(doc! { "_id": id.object_id() })
            .await?;
        Ok(result.deleted_count)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
